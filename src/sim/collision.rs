//! Wall collision for the glider
//!
//! The glider's silhouette is approximated by a small fan of bearings around
//! its own bearing. The wall is a smooth implicit surface, so a handful of
//! samples plus a body margin is enough; no exact intersection is computed.

use glam::Vec2;

use super::tunnel::TunnelSurface;
use crate::tuning::CollisionTuning;

/// Result of sampling the wall around the player
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallProbe {
    /// Player body reaches the wall on at least one sampled bearing
    pub hit: bool,
    /// Closest wall radius among the samples
    pub nearest_wall: f32,
    /// `nearest_wall - distance` (negative once inside the wall)
    pub clearance: f32,
    /// `distance / nearest_wall`, 0 on the centerline, 1 on the wall
    pub tightness: f32,
}

impl WallProbe {
    /// Same probe with the hit suppressed
    pub fn miss(self) -> Self {
        Self { hit: false, ..self }
    }
}

/// Bearings sampled for a player at `bearing`
pub fn silhouette_bearings(bearing: f32, t: &CollisionTuning) -> impl Iterator<Item = f32> + '_ {
    let n = t.samples.max(1);
    (0..n).map(move |i| {
        if n == 1 {
            bearing
        } else {
            crate::normalize_angle(bearing + (i as f32 / (n - 1) as f32 - 0.5) * t.cone)
        }
    })
}

/// Sample the wall around `pos` at depth `z`
pub fn probe_walls(tunnel: &TunnelSurface, pos: Vec2, z: f32, t: &CollisionTuning) -> WallProbe {
    let (distance, bearing) = crate::cartesian_to_polar(pos);

    let mut hit = false;
    let mut nearest = f32::MAX;
    for angle in silhouette_bearings(bearing, t) {
        let wall = tunnel.radius(angle, z);
        nearest = nearest.min(wall);
        if distance > wall - t.margin {
            hit = true;
        }
    }

    WallProbe {
        hit,
        nearest_wall: nearest,
        clearance: nearest - distance,
        tightness: distance / nearest,
    }
}

/// Wall test honoring invulnerability
pub fn check_collision(
    tunnel: &TunnelSurface,
    pos: Vec2,
    z: f32,
    t: &CollisionTuning,
    invulnerable: bool,
) -> WallProbe {
    let probe = probe_walls(tunnel, pos, z, t);
    if invulnerable { probe.miss() } else { probe }
}
