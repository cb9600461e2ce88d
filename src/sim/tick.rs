//! Simulation tick
//!
//! Advances the game state by one host frame. Every per-tick constant is
//! expressed per reference tick (1/60 s) and rescaled by `dt`, so the
//! host may call this at whatever rate it renders.

use super::autopilot;
use super::collision::check_collision;
use super::effects::SHAKE_PICKUP;
use super::pickup::PickupKind;
use super::player::FlightControls;
use super::state::{GameMode, GameState};
use crate::consts::MAX_FRAME_DT;
use crate::decay_factor;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Held flight keys
    pub controls: FlightControls,
    /// Start from the title screen or restart after a crash
    pub begin: bool,
    /// Fire a sonar pulse
    pub fire: bool,
    /// Spend the ability meter
    pub ability: bool,
    /// Pause toggle
    pub pause: bool,
    pub menu_up: bool,
    pub menu_down: bool,
    pub menu_confirm: bool,
    /// Abandon the run for the title screen
    pub return_to_menu: bool,
    /// Demo mode - the autopilot flies
    pub autopilot: bool,
}

/// Advance the game state by `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    let dt = if dt.is_finite() { dt.clamp(0.0, MAX_FRAME_DT) } else { 0.0 };

    let mut input = input.clone();
    if input.autopilot {
        autopilot::steer(state, &mut input);
    }

    if input.pause {
        state.toggle_pause();
    }
    if state.mode == GameMode::Paused {
        if input.menu_up {
            state.menu_move(-1);
        }
        if input.menu_down {
            state.menu_move(1);
        }
        if input.menu_confirm {
            state.menu_confirm();
        }
        // Frozen: no integration, decay, pulses or effects
        if state.mode == GameMode::Paused {
            return;
        }
    }
    if input.return_to_menu {
        state.return_to_menu();
    }
    if input.begin {
        state.begin_or_restart();
    }

    match state.mode {
        GameMode::Play => {
            if input.ability {
                state.activate_ability();
            }
            step_flight(state, &input.controls, dt);
        }
        GameMode::Crash => step_crash(state, dt),
        GameMode::Start | GameMode::Paused => {}
    }

    // Fade first so light added this tick survives to the frame
    let fade = &state.tuning.points;
    state
        .points
        .decay(dt, fade.activation_decay, fade.sparkle_decay);

    if matches!(state.mode, GameMode::Play | GameMode::Crash) {
        state
            .pulses
            .advance(&mut state.points, dt, &state.tuning.pulse);
    }
    if state.mode == GameMode::Crash {
        state.points.flood(state.flood_level);
    }
    // New pulses start at radius zero on the frame they are fired
    if state.mode == GameMode::Play && input.fire {
        state.fire_pulse();
    }

    state.effects.update(dt);
}

/// Flight, scoring, resources, recycling, collision and pickups
fn step_flight(state: &mut GameState, controls: &FlightControls, dt: f32) {
    let z_from = state.scroll;
    let forward = state
        .player
        .integrate(controls, dt, &state.tuning.player);
    state.scroll += forward;
    let score = (state.scroll * state.tuning.score_per_unit).floor().max(0.0) as u64;
    state.score = state.score.max(score);

    let res = state.tuning.resources.clone();
    let regen = if state.player.speed_multiplier(&state.tuning.player) > res.fast_speed_threshold {
        res.regen_fast
    } else {
        res.regen_base
    };
    state.resources.energy = (state.resources.energy + regen * dt).min(res.energy_max);
    state.resources.tick_timers(dt);

    state.points.recycle(&state.tunnel, state.scroll);

    let probe = check_collision(
        &state.tunnel,
        state.player.pos,
        state.scroll,
        &state.tuning.collision,
        state.resources.invulnerable(),
    );
    state.tightness = probe.tightness;
    if probe.hit {
        state.enter_crash();
        return;
    }

    // Flying close to the wall charges the ability
    if !state.resources.cloak_active() && probe.tightness >= res.tight_ratio {
        state.resources.meter = (state.resources.meter + res.meter_fill_rate * dt).min(1.0);
    }

    state
        .pickups
        .spawn_ahead(&state.tunnel, state.scroll, &state.tuning.pickups, &mut state.rng);
    let taken = state
        .pickups
        .collect(state.player.pos, z_from, state.scroll, &state.tuning.pickups);
    for kind in taken {
        match kind {
            PickupKind::Plasma => state.resources.energy = res.energy_max,
            PickupKind::Shield => state.resources.shield_timer = state.tuning.pickups.shield_duration,
            PickupKind::Fireball => state.resources.fireball_ready = true,
        }
        state.effects.kick(SHAKE_PICKUP);
        log::debug!("Picked up {:?} at z={:.1}", kind, state.scroll);
    }
    state.pickups.cull(state.scroll, state.tuning.points.behind);

    state.effects.emit_trail(state.player.pos, state.scroll, dt);
}

fn step_crash(state: &mut GameState, dt: f32) {
    state.crash_timer = (state.crash_timer - dt).max(0.0);
    state.flood_level *= decay_factor(state.tuning.crash.flood_decay, dt);
}
