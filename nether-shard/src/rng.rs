//! Seeded xorshift32 random source
//!
//! Every random decision in shard generation flows through a single
//! `ShardRng` so that one seed reproduces the same crystal on every
//! platform.

use tracing::warn;

/// Deterministic xorshift32 generator (shifts 13, 17, 5)
#[derive(Debug, Clone)]
pub struct ShardRng {
    state: u32,
}

impl ShardRng {
    /// Create a generator from a 32-bit seed
    ///
    /// A seed of 0 would lock xorshift into the all-zero state, so it is
    /// treated as seed 1.
    pub fn new(seed: u32) -> Self {
        let state = if seed == 0 {
            warn!("ShardRng: seed 0 is degenerate, using 1");
            1
        } else {
            seed
        };
        Self { state }
    }

    /// Create a generator from a signed seed, wrapping it to 32 bits
    pub fn from_signed(seed: i64) -> Self {
        Self::new(seed as u32)
    }

    /// Current internal state (never zero)
    pub fn state(&self) -> u32 {
        self.state
    }

    /// Advance and return a float in [0, 1)
    pub fn next_f64(&mut self) -> f64 {
        let mut s = self.state;
        s ^= s << 13;
        s ^= s >> 17;
        s ^= s << 5;
        self.state = s;
        s as f64 / 4_294_967_296.0
    }

    /// Uniform float in [a, b)
    pub fn range(&mut self, a: f64, b: f64) -> f64 {
        a + self.next_f64() * (b - a)
    }

    /// Uniform integer in [a, b] (inclusive)
    pub fn int(&mut self, a: i64, b: i64) -> i64 {
        if b <= a {
            return a;
        }
        let v = self.range(a as f64, (b + 1) as f64).floor() as i64;
        v.min(b)
    }
}
