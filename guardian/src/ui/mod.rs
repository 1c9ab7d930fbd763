//! UI module for the GuardianNet console

pub mod layout;
pub mod render;
pub mod theme;
pub mod widgets;

pub use render::Overlay;
