//! Keyword rules for the scripted assistant.
//!
//! Rules are checked top to bottom and the first rule with a matching
//! trigger wins. An input mentioning both "drone" and "risk" therefore gets
//! the risk answer; tests rely on that order.

/// Which canned answer a reply came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReplyCategory {
    RiskZones,
    DronePilots,
    EmergencyProtocol,
    SoilSaturation,
    Confirmation,
    Default,
}

/// A canned response body with its follow-up suggestions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CannedResponse {
    pub content: &'static str,
    pub suggestions: &'static [&'static str],
}

/// A trigger list paired with its response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordRule {
    pub category: ReplyCategory,
    pub triggers: &'static [&'static str],
    pub response: CannedResponse,
}

impl KeywordRule {
    /// Whether any trigger occurs in already lower-cased `input`.
    pub fn matches(&self, input: &str) -> bool {
        self.triggers.iter().any(|t| input.contains(t))
    }
}

/// The assistant's reply to one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub category: ReplyCategory,
    pub content: &'static str,
    pub suggestions: &'static [&'static str],
}

/// Suggestions shown with the welcome message.
pub const INITIAL_SUGGESTIONS: &[&str] = &[
    "Show me high-risk zones in Wayanad",
    "How many drone pilots are available?",
    "Activate emergency protocol",
    "Check soil saturation levels",
];

/// Greeting posted when the assistant is first opened.
pub const WELCOME_MESSAGE: &str = "Welcome to GuardianNet AI. I'm here to assist with emergency coordination, asset discovery, and risk assessment for the Western Ghats region. How can I help you today?";

pub const DEFAULT_RESPONSE: CannedResponse = CannedResponse {
    content: "I'm GuardianNet AI, your emergency response coordinator. I can help you with asset discovery, risk assessment, and emergency protocols for the Western Ghats region. How can I assist you today?",
    suggestions: &[
        "Show risk assessment",
        "List available assets",
        "Emergency protocols",
    ],
};

/// Rules in priority order.
pub const KEYWORD_RULES: &[KeywordRule] = &[
    KeywordRule {
        category: ReplyCategory::RiskZones,
        triggers: &["risk", "zone", "high"],
        response: CannedResponse {
            content: "🔴 **Critical Risk Zones in Wayanad District:**\n\n1. **Meppadi Sector** - Risk Level: CRITICAL\n   - Soil saturation: 94%\n   - Elevation: 1,200m\n   - 24hr Rainfall: 187mm\n\n2. **Chooralmala** - Risk Level: HIGH\n   - Soil saturation: 78%\n   - Elevation: 980m\n\n3. **Mundakkai** - Risk Level: MODERATE\n   - Soil saturation: 65%\n   - Elevation: 850m\n\n⚠️ Recommendation: Pre-position assets in Meppadi sector.",
            suggestions: &[
                "Deploy assets to Meppadi",
                "View terrain map",
                "Alert local responders",
            ],
        },
    },
    KeywordRule {
        category: ReplyCategory::DronePilots,
        triggers: &["drone", "pilot", "aerial"],
        response: CannedResponse {
            content: "📡 **Available Drone Pilots in Region:**\n\n✅ **Arun K.** - DJI Mavic 3 Pro\n   - Status: STANDBY | ETA: Immediate\n   - Specialization: Aerial surveillance, thermal imaging\n\n✅ **Suresh M.** - DJI Mini 4 Pro\n   - Status: AVAILABLE | ETA: 12 min\n   - Specialization: Search patterns\n\n✅ **Kerala Drone Collective** (3 units)\n   - Status: ON-CALL | ETA: 25 min\n   - Specialization: Multi-drone coordination\n\nTotal Coverage Capacity: 15km² per hour",
            suggestions: &[
                "Deploy all drones",
                "Request thermal survey",
                "View flight zones",
            ],
        },
    },
    KeywordRule {
        category: ReplyCategory::EmergencyProtocol,
        triggers: &["emergency", "protocol", "activate"],
        response: CannedResponse {
            content: "🚨 **EMERGENCY PROTOCOL ACTIVATION**\n\n**Phase 1 - Immediate (0-30 min):**\n- Activate mesh network mode\n- Alert all verified responders in 5km radius\n- Deploy drone reconnaissance\n\n**Phase 2 - Response (30-60 min):**\n- Establish triage points\n- Route heavy machinery\n- Open Ham radio channels\n\n**Phase 3 - Coordination (1-2 hrs):**\n- KSDMA notification\n- Relief camp activation\n- Medical evacuation routes\n\n⚡ Say **\"CONFIRM\"** to initiate protocol.",
            suggestions: &["CONFIRM", "Modify protocol", "View responder list"],
        },
    },
    KeywordRule {
        category: ReplyCategory::SoilSaturation,
        triggers: &["soil", "saturation", "rain"],
        response: CannedResponse {
            content: "🌧️ **Real-time Soil Saturation Analysis:**\n\n**Meppadi Sector:**\n```\n████████████████████░░░░ 94%\n```\n🔴 CRITICAL - Landslide imminent\n\n**Chooralmala:**\n```\n███████████████░░░░░░░░░ 78%\n```\n🟠 HIGH - Monitor closely\n\n**Mundakkai:**\n```\n████████████░░░░░░░░░░░░ 65%\n```\n🟡 MODERATE - Stable\n\n📊 Data source: ISRO soil sensors + local rain gauges\n⏱️ Last updated: 2 minutes ago",
            suggestions: &[
                "Historical trends",
                "Predict next 6 hours",
                "Alert thresholds",
            ],
        },
    },
    KeywordRule {
        category: ReplyCategory::Confirmation,
        triggers: &["confirm"],
        response: CannedResponse {
            content: "✅ **PROTOCOL ACTIVATED**\n\n🔄 Initiating emergency response sequence...\n\n**Actions Triggered:**\n1. ✅ Mesh network activated\n2. ✅ 6 responders alerted\n3. ✅ Drone pilot en route\n4. ✅ Ham radio channel VU2KER active\n5. ⏳ KSDMA notification pending\n6. ⏳ Heavy machinery dispatched\n\n📡 Real-time tracking enabled on map.\n\n**Next Update:** 30 seconds",
            suggestions: &["View live map", "Contact responders", "Cancel protocol"],
        },
    },
];

/// Pure keyword matcher over a fixed rule table.
#[derive(Debug, Clone, Copy)]
pub struct KeywordResponder {
    rules: &'static [KeywordRule],
    fallback: &'static CannedResponse,
}

impl KeywordResponder {
    /// A responder over the built-in rule table.
    pub fn new() -> Self {
        Self::with_rules(KEYWORD_RULES, &DEFAULT_RESPONSE)
    }

    pub fn with_rules(rules: &'static [KeywordRule], fallback: &'static CannedResponse) -> Self {
        Self { rules, fallback }
    }

    /// Pick the reply for `text`.
    ///
    /// Matching is case-insensitive and substring based.
    pub fn respond(&self, text: &str) -> Reply {
        let lowered = text.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.matches(&lowered))
            .map(|rule| Reply {
                category: rule.category,
                content: rule.response.content,
                suggestions: rule.response.suggestions,
            })
            .unwrap_or(Reply {
                category: ReplyCategory::Default,
                content: self.fallback.content,
                suggestions: self.fallback.suggestions,
            })
    }
}

impl Default for KeywordResponder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_any_case() {
        let r = KeywordResponder::new();
        for input in ["risk", "RISK map", "Show me the Zone", "which zOnE is worst"] {
            assert_eq!(r.respond(input).category, ReplyCategory::RiskZones, "{input}");
        }
    }

    #[test]
    fn test_each_category() {
        let r = KeywordResponder::new();
        assert_eq!(r.respond("any pilots?").category, ReplyCategory::DronePilots);
        assert_eq!(
            r.respond("Activate emergency protocol").category,
            ReplyCategory::EmergencyProtocol
        );
        assert_eq!(r.respond("Check soil levels").category, ReplyCategory::SoilSaturation);
        assert_eq!(r.respond("CONFIRM").category, ReplyCategory::Confirmation);
    }

    #[test]
    fn test_priority_order() {
        let r = KeywordResponder::new();
        // risk beats drone
        assert_eq!(
            r.respond("drone coverage of the risk area").category,
            ReplyCategory::RiskZones
        );
        // drone beats emergency
        assert_eq!(
            r.respond("emergency drone launch").category,
            ReplyCategory::DronePilots
        );
        // "high" is a risk trigger, so this is not a drone answer
        assert_eq!(
            r.respond("how high can the pilot fly").category,
            ReplyCategory::RiskZones
        );
        // emergency beats confirm
        assert_eq!(
            r.respond("confirm the protocol").category,
            ReplyCategory::EmergencyProtocol
        );
    }

    #[test]
    fn test_fallback() {
        let r = KeywordResponder::new();
        let reply = r.respond("hello there");
        assert_eq!(reply.category, ReplyCategory::Default);
        assert_eq!(reply.content, DEFAULT_RESPONSE.content);
        assert_eq!(reply.suggestions.len(), 3);
    }

    #[test]
    fn test_substring_match_inside_words() {
        // "rain" inside "terrain" still counts.
        let r = KeywordResponder::new();
        assert_eq!(
            r.respond("View terrain map").category,
            ReplyCategory::SoilSaturation
        );
    }
}
