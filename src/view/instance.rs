//! Instance types for point and ring rendering

use bytemuck::{Pod, Zeroable};

use crate::consts::MAX_VISUAL_PULSES;
use crate::sim::GameState;

/// One lit wall point, laid out for a GPU instance buffer
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct PointInstance {
    /// x, y in the cross-section; z relative to the player (positive is ahead)
    pub position: [f32; 3],
    pub activation: f32,
    pub sparkle: f32,
    /// Stable per-point value in [0, 1) for shader variation
    pub seed: f32,
}

impl PointInstance {
    pub const STRIDE: usize = std::mem::size_of::<PointInstance>();
}

/// Gather every point with visible light into `out` (cleared first).
/// Idle points are skipped so the buffer only holds what will be drawn.
pub fn collect_lit_points(state: &GameState, out: &mut Vec<PointInstance>) {
    out.clear();
    let points = &state.points;
    let (xs, ys, zs) = (points.xs(), points.ys(), points.zs());
    let (activation, sparkle, seeds) = (points.activation(), points.sparkle(), points.seeds());

    for i in 0..points.len() {
        if activation[i] == 0.0 && sparkle[i] == 0.0 {
            continue;
        }
        out.push(PointInstance {
            position: [xs[i], ys[i], zs[i] - state.scroll],
            activation: activation[i],
            sparkle: sparkle[i],
            seed: seeds[i],
        });
    }
}

/// A pulse front as drawn
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PulseRing {
    /// Origin relative to the player's depth
    pub center: [f32; 3],
    pub radius: f32,
    pub alpha: f32,
}

/// Newest pulses first, at most `MAX_VISUAL_PULSES`
pub fn pulse_rings(state: &GameState) -> Vec<PulseRing> {
    state
        .pulses
        .newest(MAX_VISUAL_PULSES)
        .map(|p| PulseRing {
            center: [p.origin.x, p.origin.y, p.origin.z - state.scroll],
            radius: p.radius,
            alpha: p.alpha,
        })
        .collect()
}
