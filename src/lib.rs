//! Night Radar - fly blind through a procedural cave, pulse sonar to see
//!
//! Core modules:
//! - `sim`: Simulation (noise tunnel, point cloud, pulses, physics, game state)
//! - `tuning`: Data-driven game balance
//! - `settings`: Player preferences (quality preset, accessibility)
//! - `view`: Read-only per-frame snapshot for whatever draws the game
//! - `platform`: Key-state input mapping and the browser binding

pub mod platform;
pub mod settings;
pub mod sim;
pub mod tuning;
pub mod view;

pub use settings::{QualityPreset, Settings};
pub use tuning::{Tuning, TuningError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Rate the per-tick decay constants are expressed against (Hz)
    pub const REFERENCE_RATE: f32 = 60.0;
    /// Frame time used by the headless runner
    pub const FRAME_DT: f32 = 1.0 / REFERENCE_RATE;
    /// Largest dt a single tick will integrate (tab stalls, debugger pauses)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Point scalars below this snap to exactly zero
    pub const ACTIVATION_EPSILON: f32 = 0.004;

    /// Pulses the view exposes as distinct rings
    pub const MAX_VISUAL_PULSES: usize = 4;
    /// Trail particle cap
    pub const MAX_TRAIL_PARTICLES: usize = 80;

    /// Seed used when the host does not supply one
    pub const DEFAULT_SEED: u64 = 0x5EED_CAFE;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    if !angle.is_finite() {
        return 0.0;
    }
    angle = angle.rem_euclid(TAU);
    if angle >= PI {
        angle -= TAU;
    }
    angle
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Convert cartesian (x, y) to polar (r, theta)
#[inline]
pub fn cartesian_to_polar(pos: Vec2) -> (f32, f32) {
    (pos.length(), pos.y.atan2(pos.x))
}

/// Frame-rate independent form of a per-reference-tick multiplier
#[inline]
pub fn decay_factor(per_tick: f32, dt: f32) -> f32 {
    per_tick.powf(dt * consts::REFERENCE_RATE)
}
