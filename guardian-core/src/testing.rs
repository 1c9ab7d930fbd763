//! Testing utilities.
//!
//! The state machines take the current instant as an argument, so tests
//! drive them with a [`ManualClock`] instead of sleeping. A clock starts at
//! a fixed origin and only moves when told to.

use std::time::Duration;

use tokio::time::Instant;

use crate::config::GuardianConfig;
use crate::language::MemoryStore;
use crate::registry::RegistryError;
use crate::session::{GuardianSession, Notice};

/// A clock that moves only when advanced.
#[derive(Debug, Clone, Copy)]
pub struct ManualClock {
    origin: Instant,
    elapsed: Duration,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    pub fn starting_at(origin: Instant) -> Self {
        Self {
            origin,
            elapsed: Duration::ZERO,
        }
    }

    pub fn now(&self) -> Instant {
        self.origin + self.elapsed
    }

    /// Time since the origin.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Move forward and return the new instant.
    pub fn advance(&mut self, by: Duration) -> Instant {
        self.elapsed += by;
        self.now()
    }

    pub fn advance_ms(&mut self, ms: u64) -> Instant {
        self.advance(Duration::from_millis(ms))
    }

    /// Jump to `ms` after the origin. Never moves backwards.
    pub fn set_ms(&mut self, ms: u64) -> Instant {
        self.elapsed = self.elapsed.max(Duration::from_millis(ms));
        self.now()
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

/// A seeded in-memory session for tests.
pub async fn test_session(seed: u64) -> Result<GuardianSession<MemoryStore>, RegistryError> {
    let config = GuardianConfig::new().with_seed(seed);
    GuardianSession::new(&config, MemoryStore::new()).await
}

/// Advance `clock` in `step` increments up to `total`, ticking the session
/// each time and collecting every notice.
pub fn run_for<S>(
    session: &mut GuardianSession<S>,
    clock: &mut ManualClock,
    total: Duration,
    step: Duration,
) -> Vec<Notice> {
    let end = clock.elapsed() + total;
    let mut notices = Vec::new();
    while clock.elapsed() < end {
        let by = step.min(end - clock.elapsed());
        notices.extend(session.tick(clock.advance(by)));
        if step.is_zero() {
            break;
        }
    }
    notices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock() {
        let mut clock = ManualClock::new();
        let origin = clock.now();
        assert_eq!(clock.advance_ms(250), origin + Duration::from_millis(250));
        assert_eq!(clock.set_ms(100), origin + Duration::from_millis(250));
        assert_eq!(clock.set_ms(1000), origin + Duration::from_millis(1000));
    }

    #[tokio::test]
    async fn test_run_for_collects_notices() {
        let mut session = test_session(1).await.unwrap();
        let mut clock = ManualClock::new();
        session.landslide.start(clock.now());

        let notices = run_for(
            &mut session,
            &mut clock,
            Duration::from_millis(4000),
            Duration::from_millis(100),
        );
        let reveals = notices
            .iter()
            .filter(|n| matches!(n, Notice::Reveal { .. }))
            .count();
        assert_eq!(reveals, 3);
        assert!(notices.contains(&Notice::ScanComplete));
        assert_eq!(clock.elapsed(), Duration::from_millis(4000));
    }
}
