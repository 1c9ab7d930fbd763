//! Scenario engine for the GuardianNet disaster-response demo.
//!
//! This crate provides:
//! - Timer-driven state machines for each demo view (landslide map,
//!   volunteer phone, verification portal, assistant chat, dashboard,
//!   resource overview)
//! - Static demo data: field assets, risk zones, strike-team zones, regional
//!   metrics, resource categories, and the responder registry
//! - A keyword-matching assistant with canned replies
//! - A persisted language preference
//! - A headless line protocol for scripted runs
//!
//! Nothing here talks to a network. Every "live" value is scripted.
//!
//! # Quick Start
//!
//! ```ignore
//! use guardian_core::{GuardianConfig, GuardianSession, JsonFileStore};
//! use tokio::time::Instant;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = GuardianConfig::from_env()?;
//!     let store = JsonFileStore::new(&config.lang_file);
//!     let mut session = GuardianSession::new(&config, store).await?;
//!
//!     session.landslide.start(Instant::now());
//!     for notice in session.tick(Instant::now()) {
//!         println!("{notice:?}");
//!     }
//!     Ok(())
//! }
//! ```

pub mod assets;
pub mod assistant;
pub mod config;
pub mod dashboard;
pub mod headless;
pub mod language;
pub mod registry;
pub mod resources;
pub mod scenario;
pub mod schedule;
pub mod session;
pub mod testing;
pub mod verification;

// Primary public API
pub use assets::{
    AssetCategory, AssetRecord, Coordinate, Readiness, RiskLevel, RiskZone, StrikeZone, ZoneColor, ASSETS,
    RISK_ZONES, STRIKE_ZONES,
};
pub use assistant::{Conversation, KeywordResponder, Reply, ReplyCategory};
pub use config::{ConfigError, GuardianConfig};
pub use dashboard::{Dashboard, Region};
pub use headless::{Command, HeadlessConsole};
pub use language::{JsonFileStore, KeyValueStore, Language, LanguageContext, MemoryStore, StoreError};
pub use registry::{Registry, RegistryEntry, RegistryError, Verification};
pub use resources::{ResourceCategory, ResourceKind, ResourceOverview, RESOURCE_CATEGORIES};
pub use scenario::{LandslidePhase, LandslideSimulation, NetworkMode, VolunteerPhase, VolunteerSimulator};
pub use schedule::Schedule;
pub use session::{GuardianSession, Notice};
pub use testing::ManualClock;
pub use verification::{VerificationFlow, VerificationForm, VerificationStep};
