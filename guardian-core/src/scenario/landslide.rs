//! The Wayanad landslide simulation shown on the map.
//!
//! Triggering the scenario degrades the network, starts a scan-progress
//! ticker, and reveals field assets in three fixed stages. Resetting returns
//! every derived value to its initial state and cancels all timers.
//!
//! While the scenario runs, the tactical briefing lists the strike-team
//! zones; one zone at a time can be selected to show its protocol.

use std::time::Duration;

use tokio::time::Instant;

use crate::assets::{AssetRecord, Coordinate, StrikeZone, ASSETS, STRIKE_ZONES};
use crate::scenario::ScenarioTrigger;
use crate::schedule::{Schedule, TimerId};

/// Coarse phase of the simulation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum LandslidePhase {
    #[default]
    Idle,
    Scanning,
    PartialDeployment,
    FullDeployment,
}

impl LandslidePhase {
    pub fn label(&self) -> &'static str {
        match self {
            LandslidePhase::Idle => "IDLE",
            LandslidePhase::Scanning => "SCANNING",
            LandslidePhase::PartialDeployment => "PARTIAL DEPLOYMENT",
            LandslidePhase::FullDeployment => "FULL DEPLOYMENT",
        }
    }
}

/// Connectivity indicator shown in the map header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum NetworkMode {
    #[default]
    Normal,
    Degraded,
    Mesh,
}

impl NetworkMode {
    pub fn label(&self) -> &'static str {
        match self {
            NetworkMode::Normal => "ONLINE",
            NetworkMode::Degraded => "DEGRADED",
            NetworkMode::Mesh => "MESH MODE",
        }
    }
}

/// One row of the reveal table.
#[derive(Debug)]
struct RevealStage {
    offset: Duration,
    active: &'static [u32],
    network: NetworkMode,
    phase: LandslidePhase,
}

/// Offsets are relative to the trigger, not to the previous stage.
const REVEAL_STAGES: [RevealStage; 3] = [
    RevealStage {
        offset: Duration::from_millis(1200),
        active: &[1, 5],
        network: NetworkMode::Degraded,
        phase: LandslidePhase::PartialDeployment,
    },
    RevealStage {
        offset: Duration::from_millis(2400),
        active: &[1, 5, 2, 6],
        network: NetworkMode::Mesh,
        phase: LandslidePhase::PartialDeployment,
    },
    RevealStage {
        offset: Duration::from_millis(3600),
        active: &[1, 2, 3, 4, 5, 6],
        network: NetworkMode::Mesh,
        phase: LandslidePhase::FullDeployment,
    },
];

const SCAN_TICK: Duration = Duration::from_millis(100);
const SCAN_STEP: u8 = 5;
const SCAN_COMPLETE: u8 = 100;

/// Active assets needed before the excavator shortage is flagged.
const SKILL_DEFICIT_THRESHOLD: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Reveal(usize),
    ScanTick,
}

/// The staged-reveal sequencer behind the map view.
#[derive(Debug)]
pub struct LandslideSimulation {
    trigger: ScenarioTrigger,
    phase: LandslidePhase,
    network: NetworkMode,
    active: Vec<u32>,
    scan_progress: u8,
    schedule: Schedule<Step>,
    scan_timer: Option<TimerId>,

    // Map presentation state, independent of the scenario.
    show_heat_layer: bool,
    selected_asset: Option<usize>,

    // Tactical briefing, only reachable while triggered.
    show_briefing: bool,
    selected_zone: Option<usize>,
}

impl LandslideSimulation {
    pub fn new() -> Self {
        Self::with_time_scale(1.0)
    }

    /// Create a simulation whose delays are scaled by `scale`.
    pub fn with_time_scale(scale: f64) -> Self {
        Self {
            trigger: ScenarioTrigger::new(),
            phase: LandslidePhase::Idle,
            network: NetworkMode::Normal,
            active: Vec::new(),
            scan_progress: 0,
            schedule: Schedule::with_time_scale(scale),
            scan_timer: None,
            show_heat_layer: true,
            selected_asset: None,
            show_briefing: false,
            selected_zone: None,
        }
    }

    /// Begin the scenario from the idle state.
    ///
    /// Any run already in progress is discarded first.
    pub fn start(&mut self, now: Instant) {
        self.reset();
        self.trigger.toggle();

        self.phase = LandslidePhase::Scanning;
        self.network = NetworkMode::Degraded;
        self.scan_progress = 0;

        self.scan_timer = Some(self.schedule.every(now, SCAN_TICK, Step::ScanTick));
        for (index, stage) in REVEAL_STAGES.iter().enumerate() {
            self.schedule.after(now, stage.offset, Step::Reveal(index));
        }
        tracing::info!("landslide scenario triggered");
    }

    /// Cancel every pending timer and restore the initial state.
    pub fn reset(&mut self) {
        self.schedule.cancel_all();
        self.scan_timer = None;
        self.trigger.disarm();
        self.phase = LandslidePhase::Idle;
        self.network = NetworkMode::Normal;
        self.active.clear();
        self.scan_progress = 0;
        self.show_briefing = false;
        self.selected_zone = None;
    }

    /// Flip the trigger: start when idle, reset when running.
    pub fn toggle(&mut self, now: Instant) {
        if self.trigger.is_armed() {
            self.reset();
            tracing::info!("landslide scenario reset");
        } else {
            self.start(now);
        }
    }

    /// Deliver every timer due at or before `now`.
    pub fn tick(&mut self, now: Instant) {
        while let Some(fired) = self.schedule.pop_due(now) {
            self.apply(fired.event);
        }
    }

    fn apply(&mut self, step: Step) {
        match step {
            Step::ScanTick => {
                self.scan_progress = self
                    .scan_progress
                    .saturating_add(SCAN_STEP)
                    .min(SCAN_COMPLETE);
                if self.scan_progress == SCAN_COMPLETE {
                    if let Some(id) = self.scan_timer.take() {
                        self.schedule.cancel(id);
                    }
                }
            }
            Step::Reveal(index) => {
                let stage = &REVEAL_STAGES[index];
                self.active = stage.active.to_vec();
                self.network = stage.network;
                self.phase = stage.phase;
                tracing::debug!(
                    stage = index,
                    deployed = self.active.len(),
                    network = stage.network.label(),
                    "assets revealed"
                );
            }
        }
    }

    pub fn is_triggered(&self) -> bool {
        self.trigger.is_armed()
    }

    pub fn phase(&self) -> LandslidePhase {
        self.phase
    }

    pub fn network(&self) -> NetworkMode {
        self.network
    }

    pub fn scan_progress(&self) -> u8 {
        self.scan_progress
    }

    /// Whether the scan bar should be visible.
    pub fn is_scanning(&self) -> bool {
        self.trigger.is_armed() && self.scan_progress < SCAN_COMPLETE
    }

    /// Ids of revealed assets, in reveal order.
    pub fn active_ids(&self) -> &[u32] {
        &self.active
    }

    pub fn is_active(&self, id: u32) -> bool {
        self.active.contains(&id)
    }

    /// Revealed assets in table order.
    pub fn active_assets(&self) -> Vec<&'static AssetRecord> {
        ASSETS.iter().filter(|a| self.is_active(a.id)).collect()
    }

    pub fn deployed_count(&self) -> usize {
        self.active.len()
    }

    pub fn total_assets(&self) -> usize {
        ASSETS.len()
    }

    /// Whether the "no additional excavators" warning applies.
    pub fn skill_deficit(&self) -> bool {
        self.active.len() >= SKILL_DEFICIT_THRESHOLD
    }

    /// Coordinates for the mesh link drawn between active assets.
    pub fn link_path(&self) -> Vec<Coordinate> {
        if !self.trigger.is_armed() || self.active.len() < 2 {
            return Vec::new();
        }
        self.active_assets().iter().map(|a| a.location).collect()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.schedule.next_deadline()
    }

    pub fn pending_timers(&self) -> usize {
        self.schedule.pending()
    }

    pub fn show_heat_layer(&self) -> bool {
        self.show_heat_layer
    }

    pub fn toggle_heat_layer(&mut self) {
        self.show_heat_layer = !self.show_heat_layer;
    }

    /// Move the asset cursor forward, wrapping at the end.
    pub fn select_next_asset(&mut self) {
        self.selected_asset = Some(match self.selected_asset {
            Some(i) => (i + 1) % ASSETS.len(),
            None => 0,
        });
    }

    /// Move the asset cursor backward, wrapping at the start.
    pub fn select_prev_asset(&mut self) {
        self.selected_asset = Some(match self.selected_asset {
            Some(0) | None => ASSETS.len() - 1,
            Some(i) => i - 1,
        });
    }

    pub fn clear_selection(&mut self) {
        self.selected_asset = None;
    }

    pub fn selected_asset(&self) -> Option<&'static AssetRecord> {
        self.selected_asset.and_then(|i| ASSETS.get(i))
    }

    pub fn briefing_visible(&self) -> bool {
        self.show_briefing
    }

    /// Show or hide the briefing. Returns `false` while idle.
    pub fn toggle_briefing(&mut self) -> bool {
        if !self.trigger.is_armed() {
            return false;
        }
        self.show_briefing = !self.show_briefing;
        true
    }

    /// Select zone `index`, or deselect it if it is already selected.
    ///
    /// Returns `false` while idle or for an index outside the zone table.
    pub fn toggle_zone(&mut self, index: usize) -> bool {
        if !self.trigger.is_armed() || index >= STRIKE_ZONES.len() {
            return false;
        }
        self.show_briefing = true;
        self.selected_zone = if self.selected_zone == Some(index) {
            None
        } else {
            Some(index)
        };
        tracing::debug!(zone = STRIKE_ZONES[index].id, selected = self.selected_zone.is_some(), "zone toggled");
        true
    }

    /// Step the zone cursor forward; past the last zone it deselects.
    pub fn select_next_zone(&mut self) -> bool {
        let next = match self.selected_zone {
            Some(i) if i + 1 >= STRIKE_ZONES.len() => i,
            Some(i) => i + 1,
            None => 0,
        };
        self.toggle_zone(next)
    }

    pub fn selected_zone(&self) -> Option<&'static StrikeZone> {
        self.selected_zone.and_then(|i| STRIKE_ZONES.get(i))
    }
}

impl Default for LandslideSimulation {
    fn default() -> Self {
        Self::new()
    }
}
