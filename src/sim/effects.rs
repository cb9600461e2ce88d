//! Cosmetic state: screen shake and the glider's trail
//!
//! Nothing here feeds back into gameplay, so it draws from its own
//! entropy-seeded RNG instead of the run seed.

use glam::{Vec2, Vec3};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::MAX_TRAIL_PARTICLES;
use crate::decay_factor;

pub const SHAKE_FIRE: f32 = 4.0;
pub const SHAKE_FIREBALL: f32 = 8.0;
pub const SHAKE_PICKUP: f32 = 4.0;
pub const SHAKE_CRASH: f32 = 14.0;
/// Per reference tick
const SHAKE_DECAY: f32 = 0.86;
const SHAKE_CUTOFF: f32 = 0.2;

/// Chance per reference tick of emitting a trail particle
const TRAIL_EMIT_CHANCE: f32 = 0.7;

/// A fading speck left behind the glider
#[derive(Debug, Clone, Copy)]
pub struct TrailParticle {
    /// World position
    pub pos: Vec3,
    /// Cross-section drift (units/s)
    pub drift: Vec2,
    pub alpha: f32,
    pub size: f32,
}

#[derive(Debug, Clone)]
pub struct Effects {
    pub shake: f32,
    pub trail: Vec<TrailParticle>,
    shake_enabled: bool,
    trail_enabled: bool,
    rng: Pcg32,
}

impl Default for Effects {
    fn default() -> Self {
        Self::new()
    }
}

impl Effects {
    pub fn new() -> Self {
        Self {
            shake: 0.0,
            trail: Vec::with_capacity(MAX_TRAIL_PARTICLES),
            shake_enabled: true,
            trail_enabled: true,
            rng: Pcg32::seed_from_u64(rand::random()),
        }
    }

    pub fn set_shake_enabled(&mut self, enabled: bool) {
        self.shake_enabled = enabled;
        if !enabled {
            self.shake = 0.0;
        }
    }

    pub fn set_trail_enabled(&mut self, enabled: bool) {
        self.trail_enabled = enabled;
        if !enabled {
            self.trail.clear();
        }
    }

    /// Start a shake of at least `amount`
    pub fn kick(&mut self, amount: f32) {
        if self.shake_enabled {
            self.shake = self.shake.max(amount);
        }
    }

    pub fn clear(&mut self) {
        self.shake = 0.0;
        self.trail.clear();
    }

    /// Maybe drop a particle just behind the glider at depth `z`
    pub fn emit_trail(&mut self, player: Vec2, z: f32, dt: f32) {
        if !self.trail_enabled {
            return;
        }
        let chance = 1.0 - decay_factor(1.0 - TRAIL_EMIT_CHANCE, dt);
        if self.rng.random::<f32>() >= chance {
            return;
        }
        let jitter = Vec2::new(
            self.rng.random_range(-0.15..0.15),
            self.rng.random_range(-0.15..0.15),
        );
        self.trail.push(TrailParticle {
            pos: Vec3::new(player.x + jitter.x, player.y + jitter.y, z - 0.3),
            drift: Vec2::new(
                self.rng.random_range(-0.4..0.4),
                self.rng.random_range(-0.4..0.4),
            ),
            alpha: 0.5,
            size: self.rng.random_range(0.05..0.12),
        });
        if self.trail.len() > MAX_TRAIL_PARTICLES {
            let excess = self.trail.len() - MAX_TRAIL_PARTICLES;
            self.trail.drain(..excess);
        }
    }

    /// Fade shake and trail
    pub fn update(&mut self, dt: f32) {
        self.shake *= decay_factor(SHAKE_DECAY, dt);
        if self.shake < SHAKE_CUTOFF {
            self.shake = 0.0;
        }

        let k = dt * crate::consts::REFERENCE_RATE;
        let shrink = decay_factor(0.997, dt);
        for p in self.trail.iter_mut() {
            p.pos.x += p.drift.x * dt;
            p.pos.y += p.drift.y * dt;
            p.alpha -= 0.01 * k;
            p.size *= shrink;
        }
        self.trail.retain(|p| p.alpha > 0.0);
    }
}
