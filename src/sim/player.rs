//! Glider flight model
//!
//! The player moves in the tunnel cross-section (x right, y up) while the
//! world scrolls past along z. Every multiplicative decay goes through
//! `decay_factor` so a 30 Hz and a 144 Hz host fly the same.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::decay_factor;
use crate::tuning::PlayerTuning;

/// Held directional input, polled once per tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightControls {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

/// The glider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Cross-section position relative to the centerline
    pub pos: Vec2,
    pub vel: Vec2,
    /// Energy banked by diving, spent to climb harder and fly faster
    pub momentum_pool: f32,
    /// Visual elongation, 1 at rest
    pub stretch: f32,
    /// Bank angle from sideways speed (radians)
    pub roll: f32,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            momentum_pool: 0.0,
            stretch: 1.0,
            roll: 0.0,
        }
    }
}

impl Player {
    pub fn new() -> Self {
        Self::default()
    }

    /// Distance from the tunnel centerline
    #[inline]
    pub fn distance(&self) -> f32 {
        self.pos.length()
    }

    /// Bearing around the centerline (radians)
    #[inline]
    pub fn bearing(&self) -> f32 {
        self.pos.y.atan2(self.pos.x)
    }

    /// Forward speed factor from the momentum pool, in [1, 1 + pool_speed_gain]
    pub fn speed_multiplier(&self, t: &PlayerTuning) -> f32 {
        1.0 + t.pool_speed_gain * (self.momentum_pool / t.pool_max).clamp(0.0, 1.0)
    }

    /// Advance one tick. Returns the forward distance flown.
    pub fn integrate(&mut self, controls: &FlightControls, dt: f32, t: &PlayerTuning) -> f32 {
        let mut lift = 0.0;
        if controls.up {
            lift += t.lift;
        }
        if controls.down {
            lift -= t.lift * t.descend_factor;
        }

        if controls.up && self.momentum_pool > 0.0 {
            let boost = 1.0 + t.pool_lift_boost * (self.momentum_pool / t.pool_max).min(1.0);
            lift *= boost;
            let spend = (t.pool_spend_rate * dt).min(self.momentum_pool);
            self.momentum_pool -= spend;
        } else if !controls.up && self.vel.y < -t.pool_threshold {
            let gain = -self.vel.y * t.pool_gain * dt;
            self.momentum_pool = (self.momentum_pool + gain).min(t.pool_max);
        }

        let mut thrust = 0.0;
        if controls.right {
            thrust += t.thrust;
        }
        if controls.left {
            thrust -= t.thrust;
        }

        self.vel.y += (lift - t.gravity) * dt;
        self.vel.x += thrust * dt;
        self.vel.y *= decay_factor(t.drag, dt);
        self.vel.x *= decay_factor(t.drag_x, dt);
        self.pos += self.vel * dt;
        self.clamp_to_disk(t.max_radius);

        let mult = self.speed_multiplier(t);
        let target = 1.0 + t.stretch_gain * (mult - 1.0);
        self.stretch = target + (self.stretch - target) * decay_factor(t.stretch_ease, dt);
        self.roll = (-self.vel.x * t.roll_per_speed).clamp(-t.max_roll, t.max_roll);

        t.base_speed * mult * dt
    }

    /// Project back onto the disk edge, keeping the bearing
    pub fn clamp_to_disk(&mut self, max_radius: f32) {
        let d = self.pos.length();
        if d > max_radius {
            self.pos *= max_radius / d;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const DT: f32 = 1.0 / 60.0;

    fn hold(up: bool, down: bool) -> FlightControls {
        FlightControls {
            up,
            down,
            ..Default::default()
        }
    }

    #[test]
    fn test_gravity_pulls_down() {
        let t = PlayerTuning::default();
        let mut player = Player::new();
        for _ in 0..30 {
            player.integrate(&FlightControls::default(), DT, &t);
        }
        assert!(player.vel.y < 0.0);
        assert!(player.pos.y < 0.0);
    }

    #[test]
    fn test_lift_climbs() {
        let t = PlayerTuning::default();
        let mut player = Player::new();
        for _ in 0..30 {
            player.integrate(&hold(true, false), DT, &t);
        }
        assert!(player.pos.y > 0.0);
    }

    #[test]
    fn test_side_thrust() {
        let t = PlayerTuning::default();
        let mut player = Player::new();
        let right = FlightControls {
            right: true,
            ..Default::default()
        };
        for _ in 0..20 {
            player.integrate(&right, DT, &t);
        }
        assert!(player.pos.x > 0.0);
        assert!(player.roll < 0.0);
    }

    #[test]
    fn test_momentum_pool_fills_on_dive_and_drains_on_climb() {
        let t = PlayerTuning::default();
        let mut player = Player::new();

        let mut last = player.momentum_pool;
        for _ in 0..240 {
            player.integrate(&hold(false, true), DT, &t);
            assert!(player.momentum_pool >= last);
            assert!(player.momentum_pool <= t.pool_max);
            last = player.momentum_pool;
        }
        assert!(player.momentum_pool > 0.0);

        let mut last = player.momentum_pool;
        for _ in 0..60 {
            player.integrate(&hold(true, false), DT, &t);
            if last > 0.0 {
                assert!(player.momentum_pool < last);
            } else {
                assert_eq!(player.momentum_pool, 0.0);
            }
            assert!(player.momentum_pool >= 0.0);
            last = player.momentum_pool;
        }
    }

    #[test]
    fn test_pool_speeds_up_scroll() {
        let t = PlayerTuning::default();
        let mut player = Player::new();
        let base = player.integrate(&FlightControls::default(), DT, &t);
        assert!((base - t.base_speed * DT).abs() < 1e-6);

        player.momentum_pool = t.pool_max;
        player.vel = Vec2::ZERO;
        let fast = player.integrate(&FlightControls::default(), DT, &t);
        assert!(fast > base);
        assert!(player.speed_multiplier(&t) <= 1.0 + t.pool_speed_gain);
    }

    #[test]
    fn test_clamp_keeps_bearing() {
        let mut player = Player::new();
        player.pos = Vec2::new(30.0, 40.0);
        player.clamp_to_disk(10.0);
        assert!((player.distance() - 10.0).abs() < 1e-4);
        assert!((player.bearing() - (40.0f32).atan2(30.0)).abs() < 1e-5);
    }

    proptest! {
        #[test]
        fn prop_player_stays_in_disk(
            inputs in proptest::collection::vec(any::<(bool, bool, bool, bool)>(), 1..400),
            dt in 0.001f32..0.1,
        ) {
            let t = PlayerTuning::default();
            let mut player = Player::new();
            for (up, down, left, right) in inputs {
                let controls = FlightControls { up, down, left, right };
                player.integrate(&controls, dt, &t);
                prop_assert!(player.distance() <= t.max_radius + 1e-4);
                prop_assert!(player.momentum_pool >= 0.0);
                prop_assert!(player.momentum_pool <= t.pool_max);
            }
        }
    }
}
