//! Demo pilot
//!
//! Fills in a `TickInput` the way a cautious player would: hug the middle of
//! the tunnel, lean toward the widest opening ahead, ping regularly and
//! restart after every crash. Used by attract mode and the headless runner.

use glam::Vec2;

use super::state::{GameMode, GameState};
use super::tick::TickInput;
use crate::polar_to_cartesian;

/// How far ahead (world units) to look for the opening
const LOOKAHEAD: f32 = 10.0;
/// Angular resolution of the opening scan
const SCAN_STEPS: usize = 24;
/// Largest offset from the centerline the pilot aims for
const MAX_LEAN: f32 = 0.5;
/// Velocity damping in the steering error (seconds)
const DAMPING: f32 = 0.25;
const DEADBAND: f32 = 0.15;
/// Minimum gap between pings (seconds)
const PING_INTERVAL: f32 = 0.6;

/// Overwrite `input` with the pilot's choices for this tick
pub fn steer(state: &GameState, input: &mut TickInput) {
    match state.mode {
        GameMode::Start => input.begin = true,
        GameMode::Crash => input.begin = state.crash_timer <= 0.0,
        GameMode::Paused => input.pause = true,
        GameMode::Play => fly(state, input),
    }
}

fn fly(state: &GameState, input: &mut TickInput) {
    let (angle, room) = state
        .tunnel
        .widest_bearing(state.scroll + LOOKAHEAD, SCAN_STEPS);
    let lean = (room - state.tunnel.floor_radius()).clamp(0.0, MAX_LEAN);
    let target = polar_to_cartesian(lean, angle);

    let player = &state.player;
    let err: Vec2 = target - player.pos - player.vel * DAMPING;

    input.controls.up = err.y > 0.0;
    input.controls.down = err.y < -DEADBAND * 4.0;
    input.controls.right = err.x > DEADBAND;
    input.controls.left = err.x < -DEADBAND;

    let rested = state
        .pulses
        .newest(1)
        .next()
        .is_none_or(|p| p.age >= PING_INTERVAL);
    input.fire = rested && state.resources.energy >= state.tuning.pulse.cost;
    input.ability = state.resources.meter >= 1.0;
}
