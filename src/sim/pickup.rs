//! Collectibles floating in the tunnel
//!
//! Placement uses the seeded gameplay RNG so a run's pickups are as
//! reproducible as its cave.

use std::f32::consts::TAU;

use glam::{Vec2, Vec3};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::tunnel::TunnelSurface;
use crate::tuning::PickupTuning;

/// Pickup types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PickupKind {
    /// Refills plasma to max
    Plasma,
    /// Temporary invulnerability
    Shield,
    /// Next ping also launches a fireball front
    Fireball,
}

/// A pickup entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pickup {
    pub kind: PickupKind,
    /// World position
    pub pos: Vec3,
}

/// Live pickups plus the spawn cursor
#[derive(Debug, Clone)]
pub struct PickupField {
    items: Vec<Pickup>,
    /// Depth of the next pickup to place
    next_z: f32,
}

impl PickupField {
    pub fn new(t: &PickupTuning) -> Self {
        Self {
            items: Vec::new(),
            next_z: t.first_offset,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pickup> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn insert(&mut self, kind: PickupKind, pos: Vec3) {
        self.items.push(Pickup { kind, pos });
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Place pickups until the cursor is `spawn_ahead` past `scroll`
    pub fn spawn_ahead<R: Rng + ?Sized>(
        &mut self,
        tunnel: &TunnelSurface,
        scroll: f32,
        t: &PickupTuning,
        rng: &mut R,
    ) {
        while self.next_z < scroll + t.spawn_ahead {
            let z = self.next_z;
            let angle = rng.random_range(0.0..TAU);
            // Halfway to the wall: reachable, never inside rock
            let r = tunnel.radius(angle, z) * 0.5;
            let kind = match rng.random_range(0..3u8) {
                0 => PickupKind::Plasma,
                1 => PickupKind::Shield,
                _ => PickupKind::Fireball,
            };
            let xy = crate::polar_to_cartesian(r, angle);
            self.items.push(Pickup {
                kind,
                pos: Vec3::new(xy.x, xy.y, z),
            });

            let gap = if t.spacing_max > t.spacing_min {
                rng.random_range(t.spacing_min..=t.spacing_max)
            } else {
                t.spacing_min
            };
            self.next_z += gap;
        }
    }

    /// Remove and return pickups within reach of the player's path this tick,
    /// which ran from depth `z_from` to `z_to` at cross-section `pos`
    pub fn collect(&mut self, pos: Vec2, z_from: f32, z_to: f32, t: &PickupTuning) -> Vec<PickupKind> {
        let (lo, hi) = if z_from <= z_to { (z_from, z_to) } else { (z_to, z_from) };
        let reach2 = t.radius * t.radius;
        let mut taken = Vec::new();
        self.items.retain(|p| {
            let closest = Vec3::new(pos.x, pos.y, p.pos.z.clamp(lo, hi));
            if closest.distance_squared(p.pos) <= reach2 {
                taken.push(p.kind);
                false
            } else {
                true
            }
        });
        taken
    }

    /// Drop pickups the player has left behind
    pub fn cull(&mut self, scroll: f32, behind: f32) {
        self.items.retain(|p| p.pos.z >= scroll - behind);
    }
}
