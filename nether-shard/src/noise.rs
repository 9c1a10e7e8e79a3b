//! Seeded 3D gradient noise
//!
//! Classic improved-Perlin noise over a permutation table shuffled by a
//! [`ShardRng`], plus the two fractal composites the sculptor and the
//! texture baker are built on:
//!
//! - [`NoiseEngine::fbm3`]: fractal sum with a slightly detuned lacunarity
//!   (2.02) so octaves never line up on the lattice
//! - [`NoiseEngine::ridged3`]: multiplicative ridges for fracture crests

use crate::rng::ShardRng;
use ::noise::NoiseFn;

/// Number of entries in the doubled permutation table
pub const PERMUTATION_SIZE: usize = 512;

/// Default octave count for [`NoiseEngine::fbm3`]
pub const FBM_OCTAVES: u32 = 5;

/// Default octave count for [`NoiseEngine::ridged3`]
pub const RIDGED_OCTAVES: u32 = 6;

const FBM_LACUNARITY: f64 = 2.02;
const RIDGED_LACUNARITY: f64 = 2.15;
const RIDGED_GAIN: f64 = 0.38;

/// Gradient noise engine with an immutable permutation table
#[derive(Clone)]
pub struct NoiseEngine {
    perm: [u8; PERMUTATION_SIZE],
}

impl NoiseEngine {
    /// Build the permutation table from `rng`
    ///
    /// Consumes exactly 255 values from the generator (one Fisher-Yates
    /// swap per index from 255 down to 1).
    pub fn new(rng: &mut ShardRng) -> Self {
        let mut p = [0u8; 256];
        for (i, v) in p.iter_mut().enumerate() {
            *v = i as u8;
        }
        for i in (1..256usize).rev() {
            let j = ((rng.next_f64() * (i + 1) as f64).floor() as usize).min(i);
            p.swap(i, j);
        }

        let mut perm = [0u8; PERMUTATION_SIZE];
        for (i, v) in perm.iter_mut().enumerate() {
            *v = p[i & 255];
        }
        Self { perm }
    }

    /// Convenience constructor seeding a fresh generator
    pub fn from_seed(seed: u32) -> Self {
        Self::new(&mut ShardRng::new(seed))
    }

    /// The doubled permutation table
    pub fn permutation(&self) -> &[u8; PERMUTATION_SIZE] {
        &self.perm
    }

    /// Gradient noise at a point, roughly in [-1, 1]
    pub fn noise3(&self, x: f64, y: f64, z: f64) -> f64 {
        let xf = x.floor();
        let yf = y.floor();
        let zf = z.floor();

        let xi = (xf as i64 & 255) as usize;
        let yi = (yf as i64 & 255) as usize;
        let zi = (zf as i64 & 255) as usize;

        let x = x - xf;
        let y = y - yf;
        let z = z - zf;

        let u = fade(x);
        let v = fade(y);
        let w = fade(z);

        let p = &self.perm;
        let a = p[xi] as usize + yi;
        let aa = p[a] as usize + zi;
        let ab = p[a + 1] as usize + zi;
        let b = p[xi + 1] as usize + yi;
        let ba = p[b] as usize + zi;
        let bb = p[b + 1] as usize + zi;

        lerp(
            lerp(
                lerp(grad(p[aa], x, y, z), grad(p[ba], x - 1.0, y, z), u),
                lerp(grad(p[ab], x, y - 1.0, z), grad(p[bb], x - 1.0, y - 1.0, z), u),
                v,
            ),
            lerp(
                lerp(
                    grad(p[aa + 1], x, y, z - 1.0),
                    grad(p[ba + 1], x - 1.0, y, z - 1.0),
                    u,
                ),
                lerp(
                    grad(p[ab + 1], x, y - 1.0, z - 1.0),
                    grad(p[bb + 1], x - 1.0, y - 1.0, z - 1.0),
                    u,
                ),
                v,
            ),
            w,
        )
    }

    /// Fractal Brownian motion: amplitude starts at 0.5 and halves per octave
    pub fn fbm3(&self, x: f64, y: f64, z: f64, octaves: u32) -> f64 {
        let mut value = 0.0;
        let mut amplitude = 0.5;
        let mut frequency = 1.0;

        for _ in 0..octaves {
            value += amplitude * self.noise3(x * frequency, y * frequency, z * frequency);
            frequency *= FBM_LACUNARITY;
            amplitude *= 0.5;
        }

        value
    }

    /// Ridged multifractal: each octave is `(1 - |n|)^2` weighted by the previous one
    pub fn ridged3(&self, x: f64, y: f64, z: f64, octaves: u32) -> f64 {
        let mut value = 0.0;
        let mut amplitude = 0.6;
        let mut previous = 1.0;
        let mut frequency = 1.0;

        for _ in 0..octaves {
            let n = 1.0 - self.noise3(x * frequency, y * frequency, z * frequency).abs();
            let n = n * n * previous;
            value += amplitude * n;
            previous = n;
            frequency *= RIDGED_LACUNARITY;
            amplitude *= RIDGED_GAIN;
        }

        value
    }
}

impl NoiseFn<f64, 3> for NoiseEngine {
    fn get(&self, point: [f64; 3]) -> f64 {
        self.noise3(point[0], point[1], point[2])
    }
}

/// Quintic fade curve 6t^5 - 15t^4 + 10t^3
#[inline]
fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

#[inline]
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + t * (b - a)
}

/// Dot product with one of 12 cube-edge gradients (16 hashed cases)
#[inline]
fn grad(hash: u8, x: f64, y: f64, z: f64) -> f64 {
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
