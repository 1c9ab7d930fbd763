//! TUI widgets for the GuardianNet console

pub mod chat;
pub mod dashboard;
pub mod input;
pub mod map;
pub mod phone;
pub mod resources;
pub mod status_bar;
pub mod verification;

pub use chat::ChatWidget;
pub use dashboard::DashboardWidget;
pub use input::InputWidget;
pub use map::MapWidget;
pub use phone::PhoneWidget;
pub use resources::ResourcesWidget;
pub use status_bar::{HotkeyBarWidget, StatusBarWidget};
pub use verification::VerificationWidget;
