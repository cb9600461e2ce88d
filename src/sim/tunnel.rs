//! Implicit cave boundary
//!
//! The tunnel runs along +z. Its cross-section at any forward distance is a
//! star-shaped closed curve given by `radius(angle, z)`. Nothing is cached:
//! point placement, collision and pickups all evaluate the same pure function.

use std::f32::consts::TAU;

use glam::Vec2;

use super::noise::NoiseField;
use crate::tuning::TunnelTuning;

/// Noise-driven tunnel radius function
#[derive(Debug, Clone)]
pub struct TunnelSurface {
    noise: NoiseField,
    shape: TunnelTuning,
}

impl TunnelSurface {
    pub fn new(noise: NoiseField, shape: TunnelTuning) -> Self {
        Self { noise, shape }
    }

    pub fn noise(&self) -> &NoiseField {
        &self.noise
    }

    /// Smallest radius `radius` can return
    pub fn floor_radius(&self) -> f32 {
        self.shape.base_radius * self.shape.floor_fraction
    }

    /// Periodic pinch term, in [narrowing_base - amp, narrowing_base + amp]
    #[inline]
    pub fn narrowing(&self, z: f32) -> f32 {
        self.shape.narrowing_base + self.shape.narrowing_amp * (z * self.shape.narrowing_freq).sin()
    }

    /// Wall distance from the centerline at bearing `angle`, forward distance `z`
    pub fn radius(&self, angle: f32, z: f32) -> f32 {
        let s = &self.shape;
        // Sampling on a circle keeps angle and angle + 2π identical
        let (sin, cos) = angle.sin_cos();

        let coarse = self.noise.fbm(
            cos * s.angular_freq_coarse,
            sin * s.angular_freq_coarse,
            z * s.z_scale_coarse,
            s.octaves_coarse,
        );
        let detail = self.noise.fbm(
            cos * s.angular_freq_detail + s.detail_phase,
            sin * s.angular_freq_detail + s.detail_phase,
            z * s.z_scale_detail + s.detail_phase,
            s.octaves_detail,
        );

        let shape = 1.0 + s.amp_coarse * coarse + s.amp_detail * detail;
        let r = s.base_radius * self.narrowing(z) * shape;
        // NaN-safe floor: f32::max returns the non-NaN operand
        r.max(self.floor_radius())
    }

    /// Point on the wall (cross-section coordinates)
    pub fn wall_point(&self, angle: f32, z: f32) -> Vec2 {
        crate::polar_to_cartesian(self.radius(angle, z), angle)
    }

    /// Bearing with the most room at `z`, scanning `steps` evenly spaced angles
    pub fn widest_bearing(&self, z: f32, steps: usize) -> (f32, f32) {
        let steps = steps.max(1);
        (0..steps)
            .map(|i| {
                let angle = i as f32 / steps as f32 * TAU;
                (angle, self.radius(angle, z))
            })
            .fold((0.0, f32::MIN), |best, cur| if cur.1 > best.1 { cur } else { best })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn surface(seed: u32) -> TunnelSurface {
        TunnelSurface::new(NoiseField::new(seed), TunnelTuning::default())
    }

    #[test]
    fn test_radius_is_pure() {
        let tunnel = surface(3);
        let copy = surface(3);
        for i in 0..100 {
            let a = i as f32 * 0.31;
            let z = i as f32 * 7.7;
            assert_eq!(tunnel.radius(a, z).to_bits(), tunnel.radius(a, z).to_bits());
            assert_eq!(tunnel.radius(a, z).to_bits(), copy.radius(a, z).to_bits());
        }
    }

    #[test]
    fn test_no_angular_seam() {
        let tunnel = surface(11);
        for i in 0..50 {
            let z = i as f32 * 13.0;
            let r0 = tunnel.radius(0.0, z);
            let r1 = tunnel.radius(TAU, z);
            assert!((r0 - r1).abs() < 1e-3, "seam at z={z}: {r0} vs {r1}");
        }
    }

    #[test]
    fn test_narrowing_pinches() {
        let tunnel = surface(1);
        let period = TAU / TunnelTuning::default().narrowing_freq;
        assert!((tunnel.narrowing(period * 0.25) - 1.0).abs() < 1e-4);
        assert!((tunnel.narrowing(period * 0.75) - 0.3).abs() < 1e-4);
    }

    #[test]
    fn test_floor_holds_for_extreme_shape() {
        let shape = TunnelTuning {
            amp_coarse: 5.0,
            amp_detail: 5.0,
            ..TunnelTuning::default()
        };
        let tunnel = TunnelSurface::new(NoiseField::new(8), shape);
        let floor = tunnel.floor_radius();
        for i in 0..2000 {
            let r = tunnel.radius(i as f32 * 0.7, i as f32 * 1.9);
            assert!(r >= floor);
        }
    }

    #[test]
    fn test_widest_bearing_is_max() {
        let tunnel = surface(21);
        let (angle, r) = tunnel.widest_bearing(40.0, 32);
        assert_eq!(r, tunnel.radius(angle, 40.0));
        for i in 0..32 {
            assert!(tunnel.radius(i as f32 / 32.0 * TAU, 40.0) <= r);
        }
    }

    proptest! {
        #[test]
        fn prop_radius_never_below_floor(
            seed in any::<u32>(),
            angle in -20.0f32..20.0,
            z in -1.0e4f32..1.0e5,
        ) {
            let tunnel = surface(seed);
            let r = tunnel.radius(angle, z);
            prop_assert!(r >= tunnel.floor_radius());
            prop_assert!(r > 0.0);
        }
    }
}
