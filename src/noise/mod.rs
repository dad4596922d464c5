//! Coherent noise fields used to sculpt asteroid geometry
//!
//! Each body owns two independently seeded fields: a smooth Perlin field
//! that displaces the surface, and a cellular field that textures tunnel
//! walls.

mod cellular;
mod perlin;

pub use cellular::{cellular_3d, worley_f1_f2};
pub use perlin::{perlin_3d, perlin_fbm};

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::random::Seed;

/// Which evaluator a [`NoiseField`] samples
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NoiseKind {
    /// Gradient noise in [-1, 1]
    Smooth,
    /// Worley crack value (F2 - F1) in [0, 1]
    Cellular,
}

/// A seeded, immutable 3D noise sampler
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoiseField {
    seed: Seed,
    frequency: f32,
    kind: NoiseKind,
}

impl NoiseField {
    /// Create a field of the given kind
    pub fn new(seed: Seed, frequency: f32, kind: NoiseKind) -> Self {
        Self {
            seed,
            frequency,
            kind,
        }
    }

    /// Smooth displacement field
    pub fn smooth(seed: Seed, frequency: f32) -> Self {
        Self::new(seed, frequency, NoiseKind::Smooth)
    }

    /// Cellular carving field
    pub fn cellular(seed: Seed, frequency: f32) -> Self {
        Self::new(seed, frequency, NoiseKind::Cellular)
    }

    #[inline]
    pub fn seed(&self) -> Seed {
        self.seed
    }

    #[inline]
    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    #[inline]
    pub fn kind(&self) -> NoiseKind {
        self.kind
    }

    /// Sample the field at `point * frequency`
    ///
    /// Smooth fields return [-1, 1], cellular fields [0, 1].
    #[inline]
    pub fn sample(&self, point: Vec3) -> f32 {
        let scaled = point * self.frequency;
        match self.kind {
            NoiseKind::Smooth => perlin_3d(scaled, self.seed as u32),
            NoiseKind::Cellular => cellular_3d(scaled, self.seed as u32),
        }
    }

    /// Sample layered octaves of a smooth field
    ///
    /// Cellular fields ignore the octave parameters and sample once.
    pub fn sample_fbm(&self, point: Vec3, octaves: usize, persistence: f32, lacunarity: f32) -> f32 {
        match self.kind {
            NoiseKind::Smooth => perlin_fbm(
                point * self.frequency,
                self.seed as u32,
                octaves,
                persistence,
                lacunarity,
            ),
            NoiseKind::Cellular => self.sample(point),
        }
    }

    /// Surface displacement factor for a point on the unit sphere
    ///
    /// `1 + sample(p) * variation + 0.1 * sample(3p)`: the base term bends the
    /// silhouette, the secondary term adds small bumps.
    #[inline]
    pub fn shape_displacement(&self, unit_point: Vec3, variation: f32) -> f32 {
        1.0 + self.sample(unit_point) * variation + 0.1 * self.sample(unit_point * 3.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_determinism() {
        let a = NoiseField::smooth(42, 1.5);
        let b = NoiseField::smooth(42, 1.5);
        let p = Vec3::new(0.3, -0.8, 0.52);
        assert_eq!(a.sample(p).to_bits(), b.sample(p).to_bits());
    }

    #[test]
    fn test_kinds_have_their_ranges() {
        let smooth = NoiseField::smooth(1, 2.0);
        let cellular = NoiseField::cellular(1001, 2.0);
        for i in 0..100 {
            let t = i as f32 * 0.31;
            let p = Vec3::new(t.sin(), t.cos(), (t * 0.7).sin());
            assert!((-1.0..=1.0).contains(&smooth.sample(p)));
            assert!((0.0..=1.0).contains(&cellular.sample(p)));
        }
    }

    #[test]
    fn test_independent_seeds() {
        let p = Vec3::new(0.41, 0.17, -0.9);
        let a = NoiseField::smooth(5, 1.5);
        let b = NoiseField::smooth(6, 1.5);
        assert_ne!(a.sample(p), b.sample(p));
    }

    #[test]
    fn test_shape_displacement_bounds() {
        let field = NoiseField::smooth(42, 1.5);
        for i in 0..100 {
            let t = i as f32 * 0.5;
            let p = Vec3::new(t.cos(), 0.2, t.sin()).normalize();
            let d = field.shape_displacement(p, 0.3);
            assert!(d >= 1.0 - 0.3 - 0.1 && d <= 1.0 + 0.3 + 0.1);
        }
    }

    #[test]
    fn test_zero_variation_keeps_detail_only() {
        let field = NoiseField::smooth(3, 1.0);
        let p = Vec3::new(0.6, 0.0, 0.8);
        let expected = 1.0 + 0.1 * field.sample(p * 3.0);
        assert_eq!(field.shape_displacement(p, 0.0), expected);
    }

    #[test]
    fn test_fbm_sampling() {
        let field = NoiseField::smooth(8, 1.0);
        let v = field.sample_fbm(Vec3::new(0.2, 0.4, 0.6), 3, 0.5, 2.0);
        assert!((-1.0..=1.0).contains(&v));

        let cellular = NoiseField::cellular(8, 1.0);
        let p = Vec3::new(0.2, 0.4, 0.6);
        assert_eq!(cellular.sample_fbm(p, 3, 0.5, 2.0), cellular.sample(p));
    }
}
