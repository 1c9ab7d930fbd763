//! One demo session: every view's state machine plus the language context.
//!
//! Front-ends own a [`GuardianSession`] and drive it with
//! [`GuardianSession::tick`]. Each tick reports what changed as a list of
//! [`Notice`]s so a line-oriented front-end can print them and a terminal
//! front-end can flash them in its status bar.

use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::time::Instant;

use crate::assistant::{Conversation, Role};
use crate::config::GuardianConfig;
use crate::dashboard::Dashboard;
use crate::language::{KeyValueStore, Language, LanguageContext, StoreError, Strings};
use crate::registry::{Registry, RegistryError};
use crate::resources::ResourceOverview;
use crate::scenario::{LandslidePhase, LandslideSimulation, NetworkMode, VolunteerPhase, VolunteerSimulator};
use crate::verification::{VerificationFlow, VerificationStep};

/// Something that changed during a tick.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    /// The map revealed a new stage of assets.
    Reveal {
        phase: LandslidePhase,
        network: NetworkMode,
        deployed: usize,
        total: usize,
    },
    /// The scan bar reached 100%.
    ScanComplete,
    /// The assistant posted a message.
    AssistantMessage(String),
    /// The verification portal moved to a new screen.
    Verification(VerificationStep),
    /// The volunteer phone moved to a new phase.
    Volunteer(VolunteerPhase),
    /// Every resource counter reached its target.
    ResourcesCounted,
}

#[derive(Debug, Clone, PartialEq)]
struct Snapshot {
    phase: LandslidePhase,
    network: NetworkMode,
    deployed: usize,
    scan_progress: u8,
    turns: usize,
    verification: VerificationStep,
    volunteer: VolunteerPhase,
    resources_counting: bool,
}

impl Snapshot {
    fn take<S>(session: &GuardianSession<S>) -> Self {
        Self {
            phase: session.landslide.phase(),
            network: session.landslide.network(),
            deployed: session.landslide.deployed_count(),
            scan_progress: session.landslide.scan_progress(),
            turns: session.assistant.turns().len(),
            verification: session.verification.step().clone(),
            volunteer: session.volunteer.phase(),
            resources_counting: session.resources.is_counting(),
        }
    }
}

fn rng_for(seed: Option<u64>, stream: u64) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(stream)),
        None => StdRng::from_entropy(),
    }
}

/// Every machine in the demo, owned together.
#[derive(Debug)]
pub struct GuardianSession<S> {
    pub landslide: LandslideSimulation,
    pub assistant: Conversation,
    pub verification: VerificationFlow,
    pub volunteer: VolunteerSimulator,
    pub dashboard: Dashboard,
    pub resources: ResourceOverview,
    language: LanguageContext<S>,
}

impl<S: KeyValueStore> GuardianSession<S> {
    /// Build a session, reading the saved language from `store`.
    pub async fn new(config: &GuardianConfig, store: S) -> Result<Self, RegistryError> {
        let registry = Registry::bundled()?;
        let scale = config.time_scale;
        tracing::debug!(scale, entries = registry.len(), "session created");

        Ok(Self {
            landslide: LandslideSimulation::with_time_scale(scale),
            assistant: Conversation::with_rng(rng_for(config.seed, 0), scale),
            verification: VerificationFlow::with_time_scale(registry, scale),
            volunteer: VolunteerSimulator::with_time_scale(scale),
            dashboard: Dashboard::with_rng(rng_for(config.seed, 1), scale),
            resources: ResourceOverview::with_time_scale(scale),
            language: LanguageContext::init(store).await,
        })
    }

    pub fn language(&self) -> Language {
        self.language.language()
    }

    pub fn strings(&self) -> &'static Strings {
        self.language.strings()
    }

    /// Switch language; see [`LanguageContext::set_language`].
    pub async fn set_language(&mut self, language: Language) -> Result<(), StoreError> {
        self.language.set_language(language).await
    }
}

impl<S> GuardianSession<S> {
    /// Advance every machine to `now` and report what changed.
    pub fn tick(&mut self, now: Instant) -> Vec<Notice> {
        let before = Snapshot::take(self);

        self.landslide.tick(now);
        self.assistant.tick(now);
        self.verification.tick(now);
        self.volunteer.tick(now);
        self.dashboard.tick(now);
        self.resources.tick(now);

        let after = Snapshot::take(self);
        let mut notices = Vec::new();

        if after.scan_progress == 100 && before.scan_progress < 100 {
            notices.push(Notice::ScanComplete);
        }
        let map_changed = after.deployed != before.deployed
            || after.network != before.network
            || after.phase != before.phase;
        if map_changed && after.deployed > 0 {
            notices.push(Notice::Reveal {
                phase: after.phase,
                network: after.network,
                deployed: after.deployed,
                total: self.landslide.total_assets(),
            });
        }
        if let Some(new_turns) = self.assistant.turns().get(before.turns..) {
            notices.extend(
                new_turns
                    .iter()
                    .filter(|turn| turn.role == Role::Assistant)
                    .map(|turn| Notice::AssistantMessage(turn.text.clone())),
            );
        }
        if after.verification != before.verification {
            notices.push(Notice::Verification(after.verification));
        }
        if after.volunteer != before.volunteer {
            notices.push(Notice::Volunteer(after.volunteer));
        }
        if before.resources_counting && !after.resources_counting && self.resources.is_open() {
            notices.push(Notice::ResourcesCounted);
        }
        notices
    }

    /// The earliest pending timer across every machine.
    pub fn next_deadline(&self) -> Option<Instant> {
        [
            self.landslide.next_deadline(),
            self.assistant.next_deadline(),
            self.verification.next_deadline(),
            self.volunteer.next_deadline(),
            self.dashboard.next_deadline(),
            self.resources.next_deadline(),
        ]
        .into_iter()
        .flatten()
        .min()
    }

    /// Close every view and cancel every timer.
    pub fn shutdown(&mut self) {
        self.landslide.reset();
        self.assistant.close();
        self.verification.close();
        self.volunteer.close();
        self.dashboard.close();
        self.resources.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::MemoryStore;
    use std::time::Duration;

    async fn session() -> GuardianSession<MemoryStore> {
        let config = GuardianConfig::new().with_seed(4);
        GuardianSession::new(&config, MemoryStore::new()).await.unwrap()
    }

    #[tokio::test]
    async fn test_tick_reports_reveals() {
        let mut s = session().await;
        let t0 = Instant::now();
        s.landslide.start(t0);

        assert!(s.tick(t0 + Duration::from_millis(1100)).is_empty());
        let notices = s.tick(t0 + Duration::from_millis(1200));
        assert!(notices.contains(&Notice::Reveal {
            phase: LandslidePhase::PartialDeployment,
            network: NetworkMode::Degraded,
            deployed: 2,
            total: 6,
        }));
    }

    #[tokio::test]
    async fn test_tick_reports_assistant_and_volunteer() {
        let mut s = session().await;
        let t0 = Instant::now();
        s.assistant.open(t0);
        s.volunteer.open(t0);

        let notices = s.tick(t0 + Duration::from_millis(4000));
        assert!(matches!(notices[0], Notice::AssistantMessage(_)));
        assert!(notices.contains(&Notice::Volunteer(VolunteerPhase::Alerting)));
    }

    #[tokio::test]
    async fn test_tick_reports_resources_counted_once() {
        let mut s = session().await;
        let t0 = Instant::now();
        s.resources.open(t0);

        assert!(s.tick(t0 + Duration::from_millis(1000)).is_empty());
        let notices = s.tick(t0 + Duration::from_millis(2100));
        assert_eq!(notices, vec![Notice::ResourcesCounted]);
        assert!(s.tick(t0 + Duration::from_millis(5000)).is_empty());
        assert_eq!(s.next_deadline(), None);
    }

    #[tokio::test]
    async fn test_next_deadline_is_earliest() {
        let mut s = session().await;
        let t0 = Instant::now();
        assert_eq!(s.next_deadline(), None);
        s.volunteer.open(t0);
        s.assistant.open(t0);
        assert_eq!(s.next_deadline(), Some(t0 + Duration::from_millis(800)));

        s.shutdown();
        assert_eq!(s.next_deadline(), None);
    }
}
