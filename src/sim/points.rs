//! Point cloud sampling the invisible tunnel wall
//!
//! Stored as parallel arrays so the per-tick decay pass is a handful of tight
//! slice loops. Points cover a fixed forward window that slides with the
//! scroll; a point that falls behind is moved a whole number of window lengths
//! ahead and re-placed on the wall at its new depth.

use std::f32::consts::TAU;

use glam::Vec3;
use rand::Rng;

use super::tunnel::TunnelSurface;
use crate::consts::ACTIVATION_EPSILON;
use crate::decay_factor;
use crate::tuning::PointTuning;

/// Mutable scalar view handed to the pulse pass
pub struct PointsMut<'a> {
    pub xs: &'a [f32],
    pub ys: &'a [f32],
    pub zs: &'a [f32],
    pub seeds: &'a [f32],
    pub activation: &'a mut [f32],
    pub sparkle: &'a mut [f32],
}

/// Fixed-size set of wall samples
#[derive(Debug, Clone)]
pub struct PointCloud {
    xs: Vec<f32>,
    ys: Vec<f32>,
    /// World-space depth (unwrapped)
    zs: Vec<f32>,
    activation: Vec<f32>,
    sparkle: Vec<f32>,
    seeds: Vec<f32>,
    angles: Vec<f32>,
    jitters: Vec<f32>,
    repeat_length: f32,
    behind: f32,
}

impl PointCloud {
    /// Scatter `tuning.count` points over the window starting at `-behind`
    pub fn generate<R: Rng + ?Sized>(
        tunnel: &TunnelSurface,
        tuning: &PointTuning,
        rng: &mut R,
    ) -> Self {
        let n = tuning.count;
        let mut cloud = Self {
            xs: Vec::with_capacity(n),
            ys: Vec::with_capacity(n),
            zs: Vec::with_capacity(n),
            activation: vec![0.0; n],
            sparkle: vec![0.0; n],
            seeds: Vec::with_capacity(n),
            angles: Vec::with_capacity(n),
            jitters: Vec::with_capacity(n),
            repeat_length: tuning.repeat_length,
            behind: tuning.behind,
        };

        for _ in 0..n {
            let z = rng.random_range(0.0..tuning.repeat_length) - tuning.behind;
            let angle = rng.random_range(0.0..TAU);
            let jitter = if tuning.jitter_max > tuning.jitter_min {
                rng.random_range(tuning.jitter_min..tuning.jitter_max)
            } else {
                tuning.jitter_min
            };
            let seed: f32 = rng.random();

            let r = tunnel.radius(angle, z) * jitter;
            let (sin, cos) = angle.sin_cos();
            cloud.xs.push(r * cos);
            cloud.ys.push(r * sin);
            cloud.zs.push(z);
            cloud.seeds.push(seed);
            cloud.angles.push(angle);
            cloud.jitters.push(jitter);
        }

        log::debug!("Generated point cloud: {} points over {} units", n, tuning.repeat_length);
        cloud
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.zs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.zs.is_empty()
    }

    pub fn xs(&self) -> &[f32] {
        &self.xs
    }

    pub fn ys(&self) -> &[f32] {
        &self.ys
    }

    pub fn zs(&self) -> &[f32] {
        &self.zs
    }

    pub fn activation(&self) -> &[f32] {
        &self.activation
    }

    pub fn sparkle(&self) -> &[f32] {
        &self.sparkle
    }

    pub fn seeds(&self) -> &[f32] {
        &self.seeds
    }

    pub fn repeat_length(&self) -> f32 {
        self.repeat_length
    }

    /// World position of point `i`
    pub fn position(&self, i: usize) -> Vec3 {
        Vec3::new(self.xs[i], self.ys[i], self.zs[i])
    }

    /// Bearing and jitter the point was created with
    pub fn placement(&self, i: usize) -> (f32, f32) {
        (self.angles[i], self.jitters[i])
    }

    pub(crate) fn split_mut(&mut self) -> PointsMut<'_> {
        PointsMut {
            xs: &self.xs,
            ys: &self.ys,
            zs: &self.zs,
            seeds: &self.seeds,
            activation: &mut self.activation,
            sparkle: &mut self.sparkle,
        }
    }

    /// Move points that fell behind `scroll - behind` forward onto fresh wall.
    /// Returns how many points were recycled.
    pub fn recycle(&mut self, tunnel: &TunnelSurface, scroll: f32) -> usize {
        let start = scroll - self.behind;
        let length = self.repeat_length;
        let mut recycled = 0;

        for i in 0..self.zs.len() {
            if self.zs[i] >= start {
                continue;
            }
            let laps = ((start - self.zs[i]) / length).ceil().max(1.0);
            let mut z = self.zs[i] + laps * length;
            while z < start {
                z += length;
            }
            self.zs[i] = z;

            let angle = self.angles[i];
            let r = tunnel.radius(angle, z) * self.jitters[i];
            let (sin, cos) = angle.sin_cos();
            self.xs[i] = r * cos;
            self.ys[i] = r * sin;
            // Unseen wall
            self.activation[i] = 0.0;
            self.sparkle[i] = 0.0;
            recycled += 1;
        }
        recycled
    }

    /// Per-tick fade of activation and sparkle, snapping tiny values to zero
    pub fn decay(&mut self, dt: f32, activation_decay: f32, sparkle_decay: f32) {
        let ka = decay_factor(activation_decay, dt);
        let ks = decay_factor(sparkle_decay, dt);
        decay_slice(&mut self.activation, ka);
        decay_slice(&mut self.sparkle, ks);
    }

    /// Raise every activation to at least `level`
    pub fn flood(&mut self, level: f32) {
        let level = level.clamp(0.0, 1.0);
        if level < ACTIVATION_EPSILON {
            return;
        }
        for a in self.activation.iter_mut() {
            *a = a.max(level);
        }
    }

    /// Points with any visible scalar
    pub fn lit_count(&self) -> usize {
        self.activation
            .iter()
            .zip(&self.sparkle)
            .filter(|(a, s)| **a > 0.0 || **s > 0.0)
            .count()
    }
}

#[inline]
fn decay_slice(values: &mut [f32], k: f32) {
    for v in values.iter_mut() {
        let next = *v * k;
        *v = if next < ACTIVATION_EPSILON { 0.0 } else { next };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::noise::NoiseField;
    use crate::tuning::TunnelTuning;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn setup(count: usize) -> (TunnelSurface, PointCloud, PointTuning) {
        let tunnel = TunnelSurface::new(NoiseField::new(17), TunnelTuning::default());
        let tuning = PointTuning {
            count,
            ..PointTuning::default()
        };
        let mut rng = Pcg32::seed_from_u64(17);
        let cloud = PointCloud::generate(&tunnel, &tuning, &mut rng);
        (tunnel, cloud, tuning)
    }

    fn assert_on_surface(tunnel: &TunnelSurface, cloud: &PointCloud, i: usize) {
        let (angle, jitter) = cloud.placement(i);
        let p = cloud.position(i);
        let expected = tunnel.radius(angle, p.z) * jitter;
        let actual = glam::Vec2::new(p.x, p.y).length();
        assert!((actual - expected).abs() < 1e-3, "point {i}: {actual} vs {expected}");
    }

    #[test]
    fn test_generation_covers_window() {
        let (tunnel, cloud, tuning) = setup(2000);
        assert_eq!(cloud.len(), 2000);
        assert_eq!(cloud.lit_count(), 0);
        for i in 0..cloud.len() {
            let z = cloud.zs()[i];
            assert!(z >= -tuning.behind && z < tuning.repeat_length - tuning.behind);
            assert!((0.0..1.0).contains(&cloud.seeds()[i]));
            let (_, jitter) = cloud.placement(i);
            assert!((tuning.jitter_min..tuning.jitter_max).contains(&jitter));
            assert_on_surface(&tunnel, &cloud, i);
        }
    }

    #[test]
    fn test_same_seed_same_cloud() {
        let (_, a, _) = setup(500);
        let (_, b, _) = setup(500);
        assert_eq!(a.xs(), b.xs());
        assert_eq!(a.zs(), b.zs());
    }

    #[test]
    fn test_recycle_moves_points_onto_fresh_wall() {
        let (tunnel, mut cloud, tuning) = setup(1000);
        cloud.flood(1.0);

        let scroll = 100.0;
        let recycled = cloud.recycle(&tunnel, scroll);
        assert!(recycled > 0);

        let start = scroll - tuning.behind;
        for i in 0..cloud.len() {
            let z = cloud.zs()[i];
            assert!(z >= start && z < start + tuning.repeat_length + 1e-2);
            assert_on_surface(&tunnel, &cloud, i);
        }
        // Recycled points come back dark, untouched ones keep their light
        assert_eq!(cloud.lit_count(), cloud.len() - recycled);
    }

    #[test]
    fn test_decay_converges_to_exact_zero() {
        let (_, mut cloud, tuning) = setup(300);
        cloud.flood(1.0);
        for a in cloud.split_mut().sparkle.iter_mut() {
            *a = 1.0;
        }
        for _ in 0..2000 {
            cloud.decay(1.0 / 60.0, tuning.activation_decay, tuning.sparkle_decay);
            assert!(cloud.activation().iter().all(|a| (0.0..=1.0).contains(a)));
            assert!(cloud.sparkle().iter().all(|s| (0.0..=1.0).contains(s)));
        }
        assert!(cloud.activation().iter().all(|&a| a == 0.0));
        assert!(cloud.sparkle().iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_sparkle_fades_faster() {
        let (_, mut cloud, tuning) = setup(1);
        cloud.flood(1.0);
        cloud.split_mut().sparkle[0] = 1.0;
        for _ in 0..10 {
            cloud.decay(1.0 / 60.0, tuning.activation_decay, tuning.sparkle_decay);
        }
        assert!(cloud.sparkle()[0] < cloud.activation()[0]);
    }

    #[test]
    fn test_flood_only_raises() {
        let (_, mut cloud, _) = setup(10);
        cloud.split_mut().activation[0] = 0.9;
        cloud.flood(0.5);
        assert_eq!(cloud.activation()[0], 0.9);
        assert_eq!(cloud.activation()[1], 0.5);
    }
}
