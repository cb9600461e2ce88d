//! Deterministic simulation module
//!
//! All gameplay logic lives here. Given the same seed, tuning and input
//! sequence, two runs produce the same cave, points and outcome:
//! - One explicit `GameState` context, no globals
//! - Seeded RNG for everything that affects play
//! - Time-step independent decay via `decay_factor`
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod effects;
pub mod noise;
pub mod pickup;
pub mod player;
pub mod points;
pub mod pulse;
pub mod state;
pub mod tick;
pub mod tunnel;

pub use collision::{WallProbe, check_collision, probe_walls};
pub use effects::{Effects, TrailParticle};
pub use noise::NoiseField;
pub use pickup::{Pickup, PickupField, PickupKind};
pub use player::{FlightControls, Player};
pub use points::PointCloud;
pub use pulse::{FireRefusal, Pulse, Pulses};
pub use state::{GameMode, GameState, PauseOption, Resources};
pub use tick::{TickInput, tick};
pub use tunnel::TunnelSurface;
