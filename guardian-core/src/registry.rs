//! The static registry of verified responders.
//!
//! The registry is a bundled JSON array loaded once at startup. The only
//! query is [`Registry::verify`], a linear scan.

use serde::{Deserialize, Serialize};
use thiserror::Error;

const BUNDLED_REGISTRY: &str = include_str!("../data/verified_registry.json");

/// Errors from loading registry data.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Registry JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Registry is empty")]
    Empty,
}

/// A verified responder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryEntry {
    pub id: String,
    pub name: String,
    pub skill: String,
    pub org: String,
    pub district: String,
}

/// Outcome of a lookup. "Not found" is an answer, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verification<'a> {
    Found(&'a RegistryEntry),
    NotFound,
}

impl<'a> Verification<'a> {
    pub fn is_found(&self) -> bool {
        matches!(self, Verification::Found(_))
    }

    pub fn entry(&self) -> Option<&'a RegistryEntry> {
        match self {
            Verification::Found(entry) => Some(entry),
            Verification::NotFound => None,
        }
    }
}

/// Read-only list of registry entries.
#[derive(Debug, Clone)]
pub struct Registry {
    entries: Vec<RegistryEntry>,
}

impl Registry {
    /// Parse a registry from a JSON array.
    pub fn from_json(json: &str) -> Result<Self, RegistryError> {
        let entries: Vec<RegistryEntry> = serde_json::from_str(json)?;
        if entries.is_empty() {
            return Err(RegistryError::Empty);
        }
        Ok(Self { entries })
    }

    /// The registry shipped with the crate.
    pub fn bundled() -> Result<Self, RegistryError> {
        Self::from_json(BUNDLED_REGISTRY)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up a responder.
    ///
    /// An entry matches if its id equals `id_number` ignoring case, or its
    /// name contains `full_name` ignoring case. The first match in list
    /// order wins. Short names can match unrelated people; that is how the
    /// demo has always behaved.
    pub fn verify(&self, full_name: &str, id_number: &str) -> Verification<'_> {
        let name = full_name.to_lowercase();
        let id = id_number.to_lowercase();

        self.entries
            .iter()
            .find(|entry| entry.id.to_lowercase() == id || entry.name.to_lowercase().contains(&name))
            .map(Verification::Found)
            .unwrap_or(Verification::NotFound)
    }
}

/// A skill the verification form lets a volunteer claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkillCategory {
    pub id: &'static str,
    pub label: &'static str,
    pub icon: &'static str,
    pub org: &'static str,
}

pub const SKILL_CATEGORIES: &[SkillCategory] = &[
    SkillCategory {
        id: "drone",
        label: "Drone Operator",
        icon: "🛸",
        org: "DGCA",
    },
    SkillCategory {
        id: "medical",
        label: "Trauma Surgeon",
        icon: "🏥",
        org: "IMA",
    },
    SkillCategory {
        id: "machinery",
        label: "JCB/Excavator Operator",
        icon: "🚜",
        org: "RTO",
    },
    SkillCategory {
        id: "ham",
        label: "Ham Radio",
        icon: "📡",
        org: "KSDMA",
    },
    SkillCategory {
        id: "unskilled",
        label: "Kudumbashree Volunteer",
        icon: "👩",
        org: "Kudumbashree",
    },
];

pub fn skill_by_id(id: &str) -> Option<&'static SkillCategory> {
    SKILL_CATEGORIES.iter().find(|s| s.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> Registry {
        Registry::bundled().unwrap()
    }

    #[test]
    fn test_bundled_loads() {
        let r = registry();
        assert!(r.len() >= 10);
        assert!(!r.is_empty());
    }

    #[test]
    fn test_id_match_ignores_case() {
        let r = registry();
        let hit = r.verify("Somebody Else", "dgca-2024-001");
        assert_eq!(hit.entry().unwrap().name, "Arun Kumar");
    }

    #[test]
    fn test_name_substring_match() {
        let r = registry();
        let hit = r.verify("priya", "NOPE-000");
        assert_eq!(hit.entry().unwrap().id, "IMA-KL-4521");
    }

    #[test]
    fn test_first_match_wins() {
        let r = registry();
        // "menon" appears in two names; list order decides.
        let hit = r.verify("MENON", "none");
        assert_eq!(hit.entry().unwrap().id, "DGCA-2024-017");
    }

    #[test]
    fn test_not_found() {
        let r = registry();
        assert_eq!(r.verify("Nobody Nowhere", "ZZZ-000"), Verification::NotFound);
    }

    #[test]
    fn test_short_name_false_positive_is_kept() {
        let r = registry();
        assert!(r.verify("a", "ZZZ-000").is_found());
    }

    #[test]
    fn test_empty_registry_rejected() {
        assert!(matches!(Registry::from_json("[]"), Err(RegistryError::Empty)));
        assert!(matches!(Registry::from_json("{"), Err(RegistryError::Json(_))));
    }

    #[test]
    fn test_skill_lookup() {
        assert_eq!(skill_by_id("ham").unwrap().org, "KSDMA");
        assert!(skill_by_id("pilot").is_none());
    }
}
