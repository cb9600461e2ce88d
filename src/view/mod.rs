//! Read-only views of the simulation for presentation
//!
//! Everything here borrows `&GameState` after the tick and copies out what a
//! renderer or HUD needs. Nothing in this module mutates the simulation.

pub mod hud;
pub mod instance;

pub use hud::{HudSnapshot, PlayerPose};
pub use instance::{PointInstance, PulseRing, collect_lit_points, pulse_rings};
