//! Seeded 3D gradient noise
//!
//! The permutation table is shuffled with a fixed linear congruential
//! generator rather than a library RNG, so a given seed produces the same
//! cave on every platform and every build.

/// LCG multiplier (Numerical Recipes)
const LCG_MUL: u32 = 1_664_525;
/// LCG increment (Numerical Recipes)
const LCG_INC: u32 = 1_013_904_223;

/// Immutable gradient noise field
#[derive(Debug, Clone)]
pub struct NoiseField {
    seed: u32,
    /// Permutation of 0..=255, duplicated so lookups never wrap
    perm: [u8; 512],
}

impl NoiseField {
    /// Build the permutation table for `seed`
    pub fn new(seed: u32) -> Self {
        let mut table = [0u8; 256];
        for (i, slot) in table.iter_mut().enumerate() {
            *slot = i as u8;
        }

        // Fisher-Yates driven by the LCG
        let mut state = seed;
        for i in (1..256usize).rev() {
            state = state.wrapping_mul(LCG_MUL).wrapping_add(LCG_INC);
            let j = ((state >> 8) as usize) % (i + 1);
            table.swap(i, j);
        }

        let mut perm = [0u8; 512];
        for (i, slot) in perm.iter_mut().enumerate() {
            *slot = table[i & 255];
        }

        Self { seed, perm }
    }

    /// Fold a 64-bit run seed down to the table seed
    pub fn from_run_seed(seed: u64) -> Self {
        Self::new((seed ^ (seed >> 32)) as u32)
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    #[inline]
    fn p(&self, i: usize) -> usize {
        self.perm[i] as usize
    }

    /// Gradient noise in [-1, 1], zero at every lattice point
    pub fn sample3(&self, x: f32, y: f32, z: f32) -> f32 {
        let (xf, yf, zf) = (x.floor(), y.floor(), z.floor());
        let xi = (xf as i32 & 255) as usize;
        let yi = (yf as i32 & 255) as usize;
        let zi = (zf as i32 & 255) as usize;

        let x = x - xf;
        let y = y - yf;
        let z = z - zf;

        let u = fade(x);
        let v = fade(y);
        let w = fade(z);

        let a = self.p(xi) + yi;
        let aa = self.p(a) + zi;
        let ab = self.p(a + 1) + zi;
        let b = self.p(xi + 1) + yi;
        let ba = self.p(b) + zi;
        let bb = self.p(b + 1) + zi;

        let near = lerp(
            v,
            lerp(u, grad(self.p(aa), x, y, z), grad(self.p(ba), x - 1.0, y, z)),
            lerp(
                u,
                grad(self.p(ab), x, y - 1.0, z),
                grad(self.p(bb), x - 1.0, y - 1.0, z),
            ),
        );
        let far = lerp(
            v,
            lerp(
                u,
                grad(self.p(aa + 1), x, y, z - 1.0),
                grad(self.p(ba + 1), x - 1.0, y, z - 1.0),
            ),
            lerp(
                u,
                grad(self.p(ab + 1), x, y - 1.0, z - 1.0),
                grad(self.p(bb + 1), x - 1.0, y - 1.0, z - 1.0),
            ),
        );

        lerp(w, near, far).clamp(-1.0, 1.0)
    }

    /// Fractal sum of `octaves` samples, normalized by total amplitude
    pub fn fbm(&self, x: f32, y: f32, z: f32, octaves: u32) -> f32 {
        let mut sum = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = 1.0;
        let mut total = 0.0;
        for _ in 0..octaves {
            sum += amplitude * self.sample3(x * frequency, y * frequency, z * frequency);
            total += amplitude;
            amplitude *= 0.5;
            frequency *= 2.0;
        }
        if total > 0.0 { sum / total } else { 0.0 }
    }
}

/// Quintic smoothstep 6t^5 - 15t^4 + 10t^3
#[inline]
fn fade(t: f32) -> f32 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

#[inline]
fn lerp(t: f32, a: f32, b: f32) -> f32 {
    a + t * (b - a)
}

/// Dot product with one of the 12 cube-edge gradients
#[inline]
fn grad(hash: usize, x: f32, y: f32, z: f32) -> f32 {
    let h = hash & 15;
    let u = if h < 8 { x } else { y };
    let v = if h < 4 {
        y
    } else if h == 12 || h == 14 {
        x
    } else {
        z
    };
    let u = if h & 1 == 0 { u } else { -u };
    let v = if h & 2 == 0 { v } else { -v };
    u + v
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_values() {
        let a = NoiseField::new(1234);
        let b = NoiseField::new(1234);
        for i in 0..200 {
            let t = i as f32 * 0.173;
            let (x, y, z) = (t, t * 1.7 - 3.0, -t * 0.31);
            assert_eq!(a.sample3(x, y, z).to_bits(), b.sample3(x, y, z).to_bits());
            assert_eq!(a.sample3(x, y, z).to_bits(), a.sample3(x, y, z).to_bits());
        }
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = NoiseField::new(1);
        let b = NoiseField::new(2);
        let differs = (0..50).any(|i| {
            let t = i as f32 * 0.37 + 0.1;
            (a.sample3(t, 0.5, t) - b.sample3(t, 0.5, t)).abs() > 1e-4
        });
        assert!(differs);
    }

    #[test]
    fn test_permutation_is_complete() {
        let field = NoiseField::new(99);
        let mut seen = [false; 256];
        for &v in &field.perm[..256] {
            seen[v as usize] = true;
        }
        assert!(seen.iter().all(|&s| s));
        assert_eq!(field.perm[..256], field.perm[256..]);
    }

    #[test]
    fn test_zero_on_lattice() {
        let field = NoiseField::new(7);
        for (x, y, z) in [(0.0, 0.0, 0.0), (3.0, -2.0, 5.0), (-7.0, 11.0, -1.0)] {
            assert_eq!(field.sample3(x, y, z), 0.0);
        }
    }

    #[test]
    fn test_range_and_continuity() {
        let field = NoiseField::new(42);
        let mut prev = field.sample3(0.0, 0.3, 0.7);
        for i in 1..2000 {
            let x = i as f32 * 0.001;
            let v = field.sample3(x, 0.3, 0.7);
            assert!((-1.0..=1.0).contains(&v));
            assert!((v - prev).abs() < 0.02, "jump at x={x}");
            prev = v;
        }
    }

    #[test]
    fn test_fbm_normalized() {
        let field = NoiseField::new(5);
        assert_eq!(field.fbm(0.4, 0.2, 0.9, 0), 0.0);
        for i in 0..300 {
            let t = i as f32 * 0.21 - 30.0;
            let v = field.fbm(t, -t * 0.5, t * 0.13, 5);
            assert!((-1.0..=1.0).contains(&v));
        }
        // One octave is the raw sample
        assert_eq!(field.fbm(0.4, 0.2, 0.9, 1), field.sample3(0.4, 0.2, 0.9));
    }
}
