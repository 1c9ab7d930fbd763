//! Timer-driven scenario state machines.
//!
//! Each machine owns a [`Schedule`](crate::schedule::Schedule) and advances
//! only when its owner calls `tick` with the current instant. Transitions are
//! listed in a static table per machine; the code that applies them only
//! looks up the next step.

pub mod landslide;
pub mod volunteer;

pub use landslide::{LandslidePhase, LandslideSimulation, NetworkMode};
pub use volunteer::{MissionBrief, VolunteerPhase, VolunteerSimulator, MISSION};

/// A boolean start/reset flag owned by the parent view.
///
/// Flipping the trigger is the only input a scripted scenario takes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScenarioTrigger {
    armed: bool,
}

impl ScenarioTrigger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the scenario is currently running.
    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Flip the flag and return the new value.
    pub fn toggle(&mut self) -> bool {
        self.armed = !self.armed;
        self.armed
    }

    /// Force the flag off.
    pub fn disarm(&mut self) {
        self.armed = false;
    }
}
