//! Resource overview: verified asset counts by category.
//!
//! Opening the overview counts every card up from zero. Each card ticks on
//! its own interval so all of them land on their target after
//! [`COUNT_UP`], and each interval cancels itself at the target.

use std::time::Duration;

use serde::Serialize;
use tokio::time::Instant;

use crate::schedule::{Schedule, TimerId};

/// How long every counter takes to reach its target.
pub const COUNT_UP: Duration = Duration::from_secs(2);

/// Kind of resource on a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResourceKind {
    HeavyMachinery,
    DroneFleet,
    HamOperators,
    MedicalTeams,
}

impl ResourceKind {
    pub fn glyph(&self) -> &'static str {
        match self {
            ResourceKind::HeavyMachinery => "🚜",
            ResourceKind::DroneFleet => "🛸",
            ResourceKind::HamOperators => "📡",
            ResourceKind::MedicalTeams => "🏥",
        }
    }
}

/// One card of the overview.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceCategory {
    pub kind: ResourceKind,
    pub title: &'static str,
    pub description: &'static str,
    pub count: u32,
    pub unit: &'static str,
    pub details: &'static [&'static str],
}

pub const RESOURCE_CATEGORIES: &[ResourceCategory] = &[
    ResourceCategory {
        kind: ResourceKind::HeavyMachinery,
        title: "Heavy Machinery",
        description: "Verified registry of JCBs, earthmovers, and cranes for debris clearance.",
        count: 42,
        unit: "Units",
        details: &["8 JCB Excavators", "12 Earthmovers", "6 Cranes", "16 Tractors"],
    },
    ResourceCategory {
        kind: ResourceKind::DroneFleet,
        title: "Drone Fleet",
        description: "Private pilots for aerial surveillance when ground access is impossible.",
        count: 18,
        unit: "Pilots",
        details: &["DJI Mavic 3 Pro x 6", "Thermal Imaging x 4", "Night Vision x 3", "Multi-rotor x 5"],
    },
    ResourceCategory {
        kind: ResourceKind::HamOperators,
        title: "Ham Operators",
        description: "Alternative communication nodes for when cell towers fail.",
        count: 24,
        unit: "Nodes",
        details: &["VHF Stations x 10", "UHF Stations x 8", "HF Long-range x 6"],
    },
    ResourceCategory {
        kind: ResourceKind::MedicalTeams,
        title: "Medical Teams",
        description: "Trauma surgeons and orthopedic specialists tagged for crush injuries.",
        count: 12,
        unit: "Specialists",
        details: &["Trauma Surgeons x 4", "Orthopedics x 3", "Emergency Nurses x 5"],
    },
];

/// Animated counters and the expanded card.
#[derive(Debug)]
pub struct ResourceOverview {
    open: bool,
    counts: Vec<u32>,
    counters: Vec<Option<TimerId>>,
    expanded: Option<usize>,
    schedule: Schedule<usize>,
}

impl ResourceOverview {
    pub fn new() -> Self {
        Self::with_time_scale(1.0)
    }

    pub fn with_time_scale(scale: f64) -> Self {
        Self {
            open: false,
            counts: vec![0; RESOURCE_CATEGORIES.len()],
            counters: vec![None; RESOURCE_CATEGORIES.len()],
            expanded: None,
            schedule: Schedule::with_time_scale(scale),
        }
    }

    /// Show the overview and start counting from zero. Inert while open.
    pub fn open(&mut self, now: Instant) {
        if self.open {
            return;
        }
        self.open = true;
        for (index, category) in RESOURCE_CATEGORIES.iter().enumerate() {
            self.counts[index] = 0;
            self.counters[index] = (category.count > 0)
                .then(|| self.schedule.every(now, COUNT_UP / category.count, index));
        }
        tracing::debug!(cards = RESOURCE_CATEGORIES.len(), "resource overview opened");
    }

    /// Hide the overview, cancelling every counter.
    pub fn close(&mut self) {
        self.schedule.cancel_all();
        self.open = false;
        self.counts.fill(0);
        self.counters.fill(None);
        self.expanded = None;
    }

    pub fn tick(&mut self, now: Instant) {
        while let Some(fired) = self.schedule.pop_due(now) {
            let index = fired.event;
            let target = RESOURCE_CATEGORIES[index].count;
            self.counts[index] = (self.counts[index] + 1).min(target);
            if self.counts[index] == target {
                if let Some(id) = self.counters[index].take() {
                    self.schedule.cancel(id);
                }
            }
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Whether any counter is still climbing.
    pub fn is_counting(&self) -> bool {
        self.counters.iter().any(Option::is_some)
    }

    /// Displayed count for card `index`.
    pub fn count(&self, index: usize) -> u32 {
        self.counts.get(index).copied().unwrap_or(0)
    }

    /// Expand card `index`, or collapse it if it is already expanded.
    pub fn toggle_expanded(&mut self, index: usize) -> bool {
        if index >= RESOURCE_CATEGORIES.len() {
            return false;
        }
        self.expanded = if self.expanded == Some(index) {
            None
        } else {
            Some(index)
        };
        true
    }

    pub fn expanded(&self) -> Option<usize> {
        self.expanded
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.schedule.next_deadline()
    }

    pub fn pending_timers(&self) -> usize {
        self.schedule.pending()
    }
}

impl Default for ResourceOverview {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_counters_reach_target_and_stop() {
        let t0 = Instant::now();
        let mut overview = ResourceOverview::new();
        overview.open(t0);
        assert_eq!(overview.pending_timers(), RESOURCE_CATEGORIES.len());

        overview.tick(t0 + ms(1000));
        let heavy = overview.count(0);
        assert!(heavy > 0 && heavy < 42, "{heavy}");
        assert!(overview.is_counting());

        overview.tick(t0 + COUNT_UP + ms(50));
        for (index, category) in RESOURCE_CATEGORIES.iter().enumerate() {
            assert_eq!(overview.count(index), category.count, "{}", category.title);
        }
        assert!(!overview.is_counting());
        assert_eq!(overview.pending_timers(), 0);
        assert_eq!(overview.next_deadline(), None);

        overview.tick(t0 + ms(60_000));
        assert_eq!(overview.count(0), 42);
    }

    #[test]
    fn test_medical_card_steps_every_166ms() {
        let t0 = Instant::now();
        let mut overview = ResourceOverview::new();
        overview.open(t0);
        overview.tick(t0 + ms(166));
        assert_eq!(overview.count(3), 0);
        overview.tick(t0 + ms(167));
        assert_eq!(overview.count(3), 1);
    }

    #[test]
    fn test_close_resets_and_reopen_counts_again() {
        let t0 = Instant::now();
        let mut overview = ResourceOverview::new();
        overview.open(t0);
        overview.toggle_expanded(1);
        overview.tick(t0 + ms(500));
        overview.close();
        assert_eq!(overview.count(0), 0);
        assert_eq!(overview.expanded(), None);
        assert_eq!(overview.pending_timers(), 0);

        overview.open(t0 + ms(1000));
        overview.tick(t0 + ms(2000));
        assert!(overview.count(1) < 18);
        overview.tick(t0 + ms(3100));
        assert_eq!(overview.count(1), 18);
        assert!(!overview.is_counting());
    }

    #[test]
    fn test_open_twice_keeps_progress() {
        let t0 = Instant::now();
        let mut overview = ResourceOverview::new();
        overview.open(t0);
        overview.tick(t0 + ms(1000));
        let before = overview.count(2);
        overview.open(t0 + ms(1000));
        assert_eq!(overview.count(2), before);
        assert_eq!(overview.pending_timers(), RESOURCE_CATEGORIES.len());
    }

    #[test]
    fn test_expand_toggle() {
        let mut overview = ResourceOverview::new();
        assert!(overview.toggle_expanded(2));
        assert_eq!(overview.expanded(), Some(2));
        assert!(overview.toggle_expanded(0));
        assert_eq!(overview.expanded(), Some(0));
        assert!(overview.toggle_expanded(0));
        assert_eq!(overview.expanded(), None);
        assert!(!overview.toggle_expanded(RESOURCE_CATEGORIES.len()));
    }
}
