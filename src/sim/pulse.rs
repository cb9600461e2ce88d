//! Sonar pulses
//!
//! A pulse is a sphere expanding from the point it was fired at. Points and
//! pulse origins share the same unwrapped world frame, so the shell test is a
//! plain 3D distance check with no scroll bookkeeping.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::points::{PointCloud, PointsMut};
use crate::consts::REFERENCE_RATE;
use crate::tuning::PulseTuning;

/// One expanding sonar front
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pulse {
    /// World position at fire time
    pub origin: Vec3,
    pub radius: f32,
    /// 1 at birth, 0 at max radius
    pub alpha: f32,
    /// Seconds since fired
    pub age: f32,
    /// Faster, wider, brighter front from a fireball charge
    pub fireball: bool,
}

impl Pulse {
    pub fn new(origin: Vec3) -> Self {
        Self {
            origin,
            radius: 0.0,
            alpha: 1.0,
            age: 0.0,
            fireball: false,
        }
    }

    pub fn fireball(origin: Vec3) -> Self {
        Self {
            fireball: true,
            ..Self::new(origin)
        }
    }

    fn speed(&self, tuning: &PulseTuning) -> f32 {
        if self.fireball {
            tuning.speed * tuning.fireball_speed_scale
        } else {
            tuning.speed
        }
    }

    fn shell_width(&self, tuning: &PulseTuning) -> f32 {
        if self.fireball {
            tuning.shell_width * tuning.fireball_shell_scale
        } else {
            tuning.shell_width
        }
    }
}

/// Why a fire request was ignored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireRefusal {
    NotEnoughEnergy,
    TooManyPulses,
}

/// All live pulses, oldest first
#[derive(Debug, Clone, Default)]
pub struct Pulses {
    live: Vec<Pulse>,
}

impl Pulses {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    pub fn clear(&mut self) {
        self.live.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pulse> {
        self.live.iter()
    }

    /// Up to `n` pulses, newest first
    pub fn newest(&self, n: usize) -> impl Iterator<Item = &Pulse> {
        self.live.iter().rev().take(n)
    }

    /// Spend `cost` plasma and launch a pulse at `origin`
    pub fn fire(
        &mut self,
        origin: Vec3,
        energy: &mut f32,
        tuning: &PulseTuning,
    ) -> Result<(), FireRefusal> {
        if self.live.len() >= tuning.max_live {
            return Err(FireRefusal::TooManyPulses);
        }
        if *energy < tuning.cost {
            return Err(FireRefusal::NotEnoughEnergy);
        }
        *energy -= tuning.cost;
        self.live.push(Pulse::new(origin));
        Ok(())
    }

    /// Launch a free fireball front alongside a regular pulse
    pub fn fire_fireball(&mut self, origin: Vec3, tuning: &PulseTuning) -> Result<(), FireRefusal> {
        if self.live.len() >= tuning.max_live {
            return Err(FireRefusal::TooManyPulses);
        }
        self.live.push(Pulse::fireball(origin));
        Ok(())
    }

    /// Grow every pulse, drop finished ones, light points inside each shell
    pub fn advance(&mut self, points: &mut PointCloud, dt: f32, tuning: &PulseTuning) {
        if self.live.is_empty() {
            return;
        }
        let k = dt * REFERENCE_RATE;
        let mut pts = points.split_mut();

        self.live.retain_mut(|pulse| {
            pulse.radius += pulse.speed(tuning) * dt;
            pulse.age += dt;
            pulse.alpha = (1.0 - pulse.radius / tuning.max_radius).max(0.0);
            if pulse.radius >= tuning.max_radius {
                return false;
            }
            light_shell(&mut pts, pulse, tuning, k);
            true
        });
    }
}

/// Activate points with `radius - shell_width < distance <= radius`
fn light_shell(pts: &mut PointsMut<'_>, pulse: &Pulse, tuning: &PulseTuning, k: f32) {
    let outer = pulse.radius;
    let inner = outer - pulse.shell_width(tuning);
    let outer2 = outer * outer;
    let inner2 = if inner >= 0.0 { inner * inner } else { -1.0 };

    let strength = if pulse.fireball { tuning.fireball_strength } else { 1.0 };
    let add = tuning.strong_increment * strength * k;
    let young = pulse.age < tuning.young_age;
    let sparkle_add = tuning.sparkle_increment * k;
    let sparkle_cap = tuning.sparkle_cap.clamp(0.0, 1.0);
    let o = pulse.origin;

    for i in 0..pts.zs.len() {
        let dz = pts.zs[i] - o.z;
        if dz.abs() > outer {
            continue;
        }
        let dx = pts.xs[i] - o.x;
        let dy = pts.ys[i] - o.y;
        let d2 = dx * dx + dy * dy + dz * dz;
        if d2 <= inner2 || d2 > outer2 {
            continue;
        }
        pts.activation[i] = (pts.activation[i] + add).min(1.0);
        if young {
            let s = pts.sparkle[i] + sparkle_add * pts.seeds[i];
            pts.sparkle[i] = s.min(sparkle_cap);
        }
    }
}
