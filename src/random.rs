//! Deterministic seeded random stream
//!
//! The only source of randomness in generation. Backed by ChaCha8, whose
//! output is defined independently of platform and word size, so every
//! participant of a session draws the same sequence from the same seed.

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::f32::consts::TAU;

/// Seed type carried on the wire and used for all sub-seed arithmetic
///
/// Arithmetic on seeds is always wrapping.
pub type Seed = i32;

/// Offset between consecutive body sub-seeds
pub const BODY_SEED_STRIDE: Seed = 1000;

/// Offset between consecutive tunnel sub-seeds of one body
pub const TUNNEL_SEED_STRIDE: Seed = 500;

/// Offset from the body seed to its cellular field seed
pub const HOLE_FIELD_SEED_OFFSET: Seed = 1000;

/// Derive the sub-seed of body `index` from the world seed
#[inline]
pub fn body_seed(world_seed: Seed, index: i32) -> Seed {
    world_seed.wrapping_add(index.wrapping_mul(BODY_SEED_STRIDE))
}

/// Derive the sub-seed of tunnel `tunnel_index` from its body seed
#[inline]
pub fn tunnel_seed(body_seed: Seed, tunnel_index: usize) -> Seed {
    body_seed.wrapping_add((tunnel_index as i32).wrapping_mul(TUNNEL_SEED_STRIDE))
}

/// Deterministic pseudo-random stream keyed by an integer seed
#[derive(Debug, Clone)]
pub struct SeededStream {
    rng: ChaCha8Rng,
}

impl SeededStream {
    /// Create a stream from a 64-bit seed
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Create a stream from a (possibly negative) wire seed
    ///
    /// The seed is sign-extended so `-1` and `u32::MAX` produce different
    /// streams.
    pub fn from_seed(seed: Seed) -> Self {
        Self::new(seed as i64 as u64)
    }

    /// Restart the stream from a new seed
    pub fn reseed(&mut self, seed: Seed) {
        self.rng = ChaCha8Rng::seed_from_u64(seed as i64 as u64);
    }

    /// Next float in [0, 1)
    #[inline]
    pub fn next_float(&mut self) -> f32 {
        self.rng.gen::<f32>()
    }

    /// Next float in [min, max)
    #[inline]
    pub fn range(&mut self, min: f32, max: f32) -> f32 {
        min + self.next_float() * (max - min)
    }

    /// Next integer in [0, n); returns 0 when n is 0
    #[inline]
    pub fn next_index(&mut self, n: usize) -> usize {
        if n == 0 {
            return 0;
        }
        ((self.next_float() * n as f32) as usize).min(n - 1)
    }

    /// Uniformly distributed unit vector
    ///
    /// Draws exactly two floats: height, then azimuth.
    pub fn unit_vector(&mut self) -> Vec3 {
        let y = self.range(-1.0, 1.0);
        let azimuth = self.range(0.0, TAU);
        let ring = (1.0 - y * y).max(0.0).sqrt();
        Vec3::new(ring * azimuth.cos(), y, ring * azimuth.sin())
    }
}
