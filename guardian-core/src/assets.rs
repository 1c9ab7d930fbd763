//! Static field assets, risk zones and strike-team zones for the Wayanad map.
//!
//! These tables never change at runtime. The landslide simulation reveals
//! assets by id; nothing else about a record is ever mutated.

use serde::Serialize;

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Map centre for the Wayanad scenario.
pub const WAYANAD_CENTER: Coordinate = Coordinate::new(11.6854, 76.1320);

/// The kind of responder an asset represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AssetCategory {
    Aerial,
    Medical,
    GroundVehicle,
    HeavyEquipment,
    Radio,
}

impl AssetCategory {
    /// Single-glyph marker used on the map.
    pub fn glyph(&self) -> &'static str {
        match self {
            AssetCategory::Aerial => "🛸",
            AssetCategory::Medical => "🏥",
            AssetCategory::GroundVehicle => "🚙",
            AssetCategory::HeavyEquipment => "🚜",
            AssetCategory::Radio => "📡",
        }
    }

    /// Short label for list views.
    pub fn label(&self) -> &'static str {
        match self {
            AssetCategory::Aerial => "Drone",
            AssetCategory::Medical => "Medical",
            AssetCategory::GroundVehicle => "Jeep",
            AssetCategory::HeavyEquipment => "Excavator",
            AssetCategory::Radio => "Ham Radio",
        }
    }
}

/// Readiness of an asset before any deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Readiness {
    Standby,
    Deployed,
    EnRoute,
}

/// A field asset that can be revealed by the landslide simulation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssetRecord {
    pub id: u32,
    pub category: AssetCategory,
    pub name: &'static str,
    pub location: Coordinate,
    pub task: &'static str,
    pub readiness: Readiness,
    pub eta: Option<&'static str>,
    pub verified: bool,
}

impl AssetRecord {
    /// The part of the name before the " - " separator, used for map labels.
    pub fn short_name(&self) -> &'static str {
        self.name.split(" - ").next().unwrap_or(self.name)
    }
}

/// Every asset known to the map, in display order.
pub const ASSETS: &[AssetRecord] = &[
    AssetRecord {
        id: 1,
        category: AssetCategory::Aerial,
        name: "Arun K. - DJI Mavic 3 Pro",
        location: Coordinate::new(11.6890, 76.1280),
        task: "Thermal sweep of debris field",
        readiness: Readiness::Standby,
        eta: Some("2 min"),
        verified: true,
    },
    AssetRecord {
        id: 2,
        category: AssetCategory::Medical,
        name: "Dr. Priya Menon - Trauma Surgeon",
        location: Coordinate::new(11.6820, 76.1350),
        task: "Field triage at Meppadi school",
        readiness: Readiness::EnRoute,
        eta: Some("8 min"),
        verified: true,
    },
    AssetRecord {
        id: 3,
        category: AssetCategory::GroundVehicle,
        name: "Jeep Club Kalpetta - 4x4 Convoy",
        location: Coordinate::new(11.6750, 76.1210),
        task: "Evacuation shuttle to relief camp",
        readiness: Readiness::Standby,
        eta: Some("15 min"),
        verified: true,
    },
    AssetRecord {
        id: 4,
        category: AssetCategory::HeavyEquipment,
        name: "Rajan JCB Works - Excavator",
        location: Coordinate::new(11.6930, 76.1420),
        task: "Clear blocked access road",
        readiness: Readiness::Standby,
        eta: Some("22 min"),
        verified: true,
    },
    AssetRecord {
        id: 5,
        category: AssetCategory::Radio,
        name: "VU2KER - Ham Relay Station",
        location: Coordinate::new(11.6860, 76.1150),
        task: "Mesh relay for cut-off sector",
        readiness: Readiness::Deployed,
        eta: None,
        verified: true,
    },
    AssetRecord {
        id: 6,
        category: AssetCategory::Aerial,
        name: "Suresh M. - DJI Mini 4 Pro",
        location: Coordinate::new(11.6790, 76.1460),
        task: "Search pattern over Chooralmala",
        readiness: Readiness::Standby,
        eta: Some("12 min"),
        verified: true,
    },
];

/// Look up an asset by id.
pub fn asset_by_id(id: u32) -> Option<&'static AssetRecord> {
    ASSETS.iter().find(|a| a.id == id)
}

/// Severity of a risk zone or node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
    Critical,
}

impl RiskLevel {
    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Moderate => "moderate",
            RiskLevel::High => "high",
            RiskLevel::Critical => "critical",
        }
    }
}

/// A circular heat-layer zone on the map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskZone {
    pub name: &'static str,
    pub center: Coordinate,
    pub radius_m: u32,
    pub level: RiskLevel,
}

/// Heat-layer zones around Meppadi.
pub const RISK_ZONES: &[RiskZone] = &[
    RiskZone {
        name: "Meppadi",
        center: Coordinate::new(11.6854, 76.1320),
        radius_m: 800,
        level: RiskLevel::Critical,
    },
    RiskZone {
        name: "Chooralmala",
        center: Coordinate::new(11.6750, 76.1400),
        radius_m: 600,
        level: RiskLevel::High,
    },
    RiskZone {
        name: "Mundakkai",
        center: Coordinate::new(11.6950, 76.1200),
        radius_m: 500,
        level: RiskLevel::Moderate,
    },
    RiskZone {
        name: "Kalpetta Road",
        center: Coordinate::new(11.6700, 76.1150),
        radius_m: 400,
        level: RiskLevel::Low,
    },
];

/// Marker colour of a strike-team zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoneColor {
    Red,
    Orange,
    Yellow,
    Blue,
    Purple,
    Green,
}

/// A strike-team sector listed in the tactical briefing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrikeZone {
    pub id: &'static str,
    pub name: &'static str,
    pub area: &'static str,
    pub task: &'static str,
    pub gear: &'static str,
    pub color: ZoneColor,
    pub protocol: &'static str,
}

/// Strike-team zones, upstream to downstream.
pub const STRIKE_ZONES: &[StrikeZone] = &[
    StrikeZone {
        id: "zone-1",
        name: "Zone 1",
        area: "Punchirimattom",
        task: "High-Altitude Search",
        gear: "Thermal Drones, Ropes",
        color: ZoneColor::Red,
        protocol: "Focus on steep terrain scanning. All volunteers must be tethered. Continuous monitoring for secondary slides.",
    },
    StrikeZone {
        id: "zone-2",
        name: "Zone 2",
        area: "Mundakkai",
        task: "Search & Rescue",
        gear: "Excavators, Sniffer Dogs",
        color: ZoneColor::Orange,
        protocol: "Primary impact zone. Heavy machinery priority. Silence periods every 30 mins for voice detection.",
    },
    StrikeZone {
        id: "zone-3",
        name: "Zone 3",
        area: "School Area",
        task: "Transit & Medical",
        gear: "Trauma Kits, OT Units",
        color: ZoneColor::Yellow,
        protocol: "Casualty collection point. Triage active. Maintain clear ambulance path to Meppadi hospital.",
    },
    StrikeZone {
        id: "zone-4",
        name: "Zone 4",
        area: "Chooralmala Town",
        task: "Command & Comms",
        gear: "Ham Radio, Sat-Link",
        color: ZoneColor::Blue,
        protocol: "Central base. Registration of all personnel entering/exiting. Mesh network node maintenance.",
    },
    StrikeZone {
        id: "zone-5",
        name: "Zone 5",
        area: "Village Area",
        task: "Debris Clearance",
        gear: "Hydraulic Jacks, JCBs",
        color: ZoneColor::Purple,
        protocol: "Structure stabilization. Safe removal of debris. Check all voids before mechanical clearance.",
    },
    StrikeZone {
        id: "zone-6",
        name: "Zone 6",
        area: "Downstream",
        task: "Recovery Ops",
        gear: "Boats, Underwater Drones",
        color: ZoneColor::Green,
        protocol: "Monitoring Chaliyar river banks. Specialized dive teams only. Systematic mapping of debris deposition.",
    },
];

/// Position of a zone in [`STRIKE_ZONES`], by id (`zone-2`) or by its
/// 1-based number (`2`).
pub fn strike_zone_index(key: &str) -> Option<usize> {
    let key = key.trim();
    if let Ok(number) = key.parse::<usize>() {
        return (1..=STRIKE_ZONES.len()).contains(&number).then(|| number - 1);
    }
    STRIKE_ZONES.iter().position(|z| z.id.eq_ignore_ascii_case(key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_asset_ids_unique() {
        let ids: HashSet<u32> = ASSETS.iter().map(|a| a.id).collect();
        assert_eq!(ids.len(), ASSETS.len());
        assert_eq!(ASSETS.len(), 6);
    }

    #[test]
    fn test_short_name() {
        assert_eq!(asset_by_id(1).unwrap().short_name(), "Arun K.");
        assert!(asset_by_id(99).is_none());
    }

    #[test]
    fn test_risk_level_ordering() {
        assert!(RiskLevel::Critical > RiskLevel::High);
        assert!(RiskLevel::Moderate > RiskLevel::Low);
    }

    #[test]
    fn test_strike_zone_lookup() {
        assert_eq!(STRIKE_ZONES.len(), 6);
        assert_eq!(strike_zone_index("1"), Some(0));
        assert_eq!(strike_zone_index("zone-6"), Some(5));
        assert_eq!(STRIKE_ZONES[5].area, "Downstream");
        assert_eq!(strike_zone_index("ZONE-2"), Some(1));
        assert_eq!(strike_zone_index("0"), None);
        assert_eq!(strike_zone_index("7"), None);
        assert_eq!(strike_zone_index("meppadi"), None);
    }
}
