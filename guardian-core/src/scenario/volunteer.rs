//! The field responder's phone screen.
//!
//! Opening the view starts a one-shot script: the phone idles on standby,
//! raises an alert, then offers a mission. Accepting is the only way forward
//! from the offer. Closing or rejecting tears the whole view down, and the
//! next open starts the script again from standby.

use std::time::Duration;

use tokio::time::Instant;

use crate::assets::Coordinate;
use crate::schedule::{Schedule, TimerId};

/// Screen shown on the simulated phone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum VolunteerPhase {
    #[default]
    Standby,
    Alerting,
    MissionOffered,
    Accepted,
}

impl VolunteerPhase {
    pub fn label(&self) -> &'static str {
        match self {
            VolunteerPhase::Standby => "Standby",
            VolunteerPhase::Alerting => "Emergency alert",
            VolunteerPhase::MissionOffered => "Mission offered",
            VolunteerPhase::Accepted => "Mission accepted",
        }
    }
}

/// Static briefing for the offered mission.
#[derive(Debug, Clone, PartialEq)]
pub struct MissionBrief {
    pub location: &'static str,
    pub task: &'static str,
    pub equipment: &'static str,
    pub victims: &'static str,
    pub coordinates: Coordinate,
    pub distance: &'static str,
}

pub const MISSION: MissionBrief = MissionBrief {
    location: "Chooralmala, Wayanad (Zone 4)",
    task: "🚁 Aerial Surveillance Required",
    equipment: "🔋 Bring Drone (Thermal Camera)",
    victims: "14 People trapped",
    coordinates: Coordinate::new(11.6750, 76.1400),
    distance: "1.2km",
};

/// Automatic transitions: (from, to, delay). Accepting is manual only.
const AUTO_TRANSITIONS: [(VolunteerPhase, VolunteerPhase, Duration); 2] = [
    (
        VolunteerPhase::Standby,
        VolunteerPhase::Alerting,
        Duration::from_millis(4000),
    ),
    (
        VolunteerPhase::Alerting,
        VolunteerPhase::MissionOffered,
        Duration::from_millis(1500),
    ),
];

const BATTERY_START: u8 = 88;
const BATTERY_DRAIN: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Advance(VolunteerPhase),
    BatteryDrain,
}

fn automatic_next(phase: VolunteerPhase) -> Option<(VolunteerPhase, Duration)> {
    AUTO_TRANSITIONS
        .iter()
        .find(|(from, _, _)| *from == phase)
        .map(|(_, to, delay)| (*to, *delay))
}

/// Mobile volunteer-app state machine.
#[derive(Debug)]
pub struct VolunteerSimulator {
    open: bool,
    phase: VolunteerPhase,
    battery: u8,
    schedule: Schedule<Step>,
    advance_timer: Option<TimerId>,
}

impl VolunteerSimulator {
    pub fn new() -> Self {
        Self::with_time_scale(1.0)
    }

    pub fn with_time_scale(scale: f64) -> Self {
        Self {
            open: false,
            phase: VolunteerPhase::Standby,
            battery: BATTERY_START,
            schedule: Schedule::with_time_scale(scale),
            advance_timer: None,
        }
    }

    /// Show the phone and start the script from standby.
    pub fn open(&mut self, now: Instant) {
        self.schedule.cancel_all();
        self.open = true;
        self.phase = VolunteerPhase::Standby;
        self.battery = BATTERY_START;
        self.advance_timer = None;

        self.schedule.every(now, BATTERY_DRAIN, Step::BatteryDrain);
        self.schedule_advance(now);
        tracing::info!("volunteer view opened");
    }

    /// Schedule the next automatic transition, if the current phase has one.
    fn schedule_advance(&mut self, from: Instant) {
        if let Some(id) = self.advance_timer.take() {
            self.schedule.cancel(id);
        }
        if let Some((next, delay)) = automatic_next(self.phase) {
            self.advance_timer = Some(self.schedule.after(from, delay, Step::Advance(next)));
        }
    }

    /// Deliver every timer due at or before `now`.
    pub fn tick(&mut self, now: Instant) {
        while let Some(fired) = self.schedule.pop_due(now) {
            match fired.event {
                Step::Advance(next) => {
                    self.advance_timer = None;
                    self.phase = next;
                    tracing::debug!(phase = ?next, "volunteer phase advanced");
                    // Chained from inside the callback so only one automatic
                    // transition is ever pending.
                    self.schedule_advance(fired.at);
                }
                Step::BatteryDrain => {
                    self.battery = self.battery.saturating_sub(1);
                }
            }
        }
    }

    /// Accept the offered mission. Returns whether the phase changed.
    pub fn accept(&mut self) -> bool {
        if self.open && self.phase == VolunteerPhase::MissionOffered {
            self.phase = VolunteerPhase::Accepted;
            tracing::info!("mission accepted");
            true
        } else {
            false
        }
    }

    /// Decline the mission. This exits the view without any further transition.
    pub fn reject(&mut self) {
        tracing::info!(phase = ?self.phase, "mission rejected");
        self.close();
    }

    /// Hide the phone and cancel every pending timer.
    pub fn close(&mut self) {
        self.schedule.cancel_all();
        self.advance_timer = None;
        self.open = false;
        self.phase = VolunteerPhase::Standby;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn phase(&self) -> VolunteerPhase {
        self.phase
    }

    pub fn battery(&self) -> u8 {
        self.battery
    }

    pub fn mission(&self) -> &'static MissionBrief {
        &MISSION
    }

    /// Whether an automatic transition is waiting to fire.
    pub fn has_pending_advance(&self) -> bool {
        self.advance_timer
            .map(|id| self.schedule.is_pending(id))
            .unwrap_or(false)
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.schedule.next_deadline()
    }
}

impl Default for VolunteerSimulator {
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
    fn test_automatic_chain() {
        let t0 = Instant::now();
        let mut phone = VolunteerSimulator::new();
        phone.open(t0);
        assert_eq!(phone.phase(), VolunteerPhase::Standby);

        phone.tick(t0 + ms(3999));
        assert_eq!(phone.phase(), VolunteerPhase::Standby);

        phone.tick(t0 + ms(4000));
        assert_eq!(phone.phase(), VolunteerPhase::Alerting);

        phone.tick(t0 + ms(5499));
        assert_eq!(phone.phase(), VolunteerPhase::Alerting);

        phone.tick(t0 + ms(5500));
        assert_eq!(phone.phase(), VolunteerPhase::MissionOffered);
        assert!(!phone.has_pending_advance());
    }

    #[test]
    fn test_late_tick_still_chains_from_deadline() {
        let t0 = Instant::now();
        let mut phone = VolunteerSimulator::new();
        phone.open(t0);
        // A single late wake-up delivers both transitions.
        phone.tick(t0 + ms(6000));
        assert_eq!(phone.phase(), VolunteerPhase::MissionOffered);
    }

    #[test]
    fn test_never_accepts_without_action() {
        let t0 = Instant::now();
        let mut phone = VolunteerSimulator::new();
        phone.open(t0);
        phone.tick(t0 + Duration::from_secs(600));
        assert_eq!(phone.phase(), VolunteerPhase::MissionOffered);

        assert!(phone.accept());
        assert_eq!(phone.phase(), VolunteerPhase::Accepted);
        assert!(!phone.accept());
    }

    #[test]
    fn test_accept_before_offer_is_noop() {
        let t0 = Instant::now();
        let mut phone = VolunteerSimulator::new();
        assert!(!phone.accept());
        phone.open(t0);
        assert!(!phone.accept());
        phone.tick(t0 + ms(4000));
        assert!(!phone.accept());
        assert_eq!(phone.phase(), VolunteerPhase::Alerting);
    }

    #[test]
    fn test_single_pending_advance() {
        let t0 = Instant::now();
        let mut phone = VolunteerSimulator::new();
        phone.open(t0);
        assert!(phone.has_pending_advance());
        // Battery interval plus exactly one advance.
        assert_eq!(phone.schedule.pending(), 2);
        phone.tick(t0 + ms(4000));
        assert_eq!(phone.schedule.pending(), 2);
    }

    #[test]
    fn test_reject_closes_view() {
        let t0 = Instant::now();
        let mut phone = VolunteerSimulator::new();
        phone.open(t0);
        phone.tick(t0 + ms(5500));
        phone.reject();
        assert!(!phone.is_open());

        phone.tick(t0 + Duration::from_secs(600));
        assert_eq!(phone.phase(), VolunteerPhase::Standby);
        assert!(phone.next_deadline().is_none());
    }

    #[test]
    fn test_reopen_restarts_script() {
        let t0 = Instant::now();
        let mut phone = VolunteerSimulator::new();
        phone.open(t0);
        phone.tick(t0 + ms(5500));
        phone.accept();
        phone.close();

        let t1 = t0 + ms(10_000);
        phone.open(t1);
        assert_eq!(phone.phase(), VolunteerPhase::Standby);
        phone.tick(t1 + ms(4000));
        assert_eq!(phone.phase(), VolunteerPhase::Alerting);
    }

    #[test]
    fn test_battery_drain() {
        let t0 = Instant::now();
        let mut phone = VolunteerSimulator::new();
        phone.open(t0);
        assert_eq!(phone.battery(), 88);
        phone.tick(t0 + Duration::from_secs(60));
        assert_eq!(phone.battery(), 86);

        phone.tick(t0 + Duration::from_secs(30 * 200));
        assert_eq!(phone.battery(), 0);
    }
}
