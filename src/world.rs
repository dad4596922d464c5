//! Generated asteroid world
//!
//! A world is fully determined by its [`WorldConfig`] and its table of
//! [`BodySpawnRecord`]s. The authority derives the records from the seed;
//! peers receive them over the wire. Both then call [`World::generate`],
//! which consumes no randomness beyond the per-record seeds.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::body::Body;
use crate::config::AsteroidConfig;
use crate::random::Seed;

#[cfg(feature = "spatial-index")]
use crate::spatial::SpatialIndex;

/// World-level parameters shared by every participant
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldConfig {
    /// Edge length of the world cube
    pub world_size: f32,
    /// Root seed; every body seed is derived from it
    pub world_seed: Seed,
}

/// Everything needed to rebuild one body
///
/// This is the unit that crosses the wire. Meshes never do.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodySpawnRecord {
    /// Dense index, 0..N-1 within one world
    pub index: i32,
    /// Body center in world space
    pub position: Vec3,
    /// Body seed, `world_seed + index * 1000`
    pub seed: Seed,
    /// Scale applied to the base radius
    pub size_multiplier: f32,
}

/// A generated asteroid field
///
/// # Examples
///
/// ```
/// use rust_asteroid_field::*;
///
/// let settings = WorldSettings::default();
/// let (records, _) = derive_spawn_records(42, &settings);
/// let config = WorldConfig { world_size: settings.world_size, world_seed: 42 };
///
/// let world = World::generate(config, records, &AsteroidConfig::default());
/// assert_eq!(world.body_count(), 4);
/// ```
#[derive(Clone)]
pub struct World {
    config: WorldConfig,

    /// Spawn records sorted by index
    records: Vec<BodySpawnRecord>,

    /// One body per record, same order
    bodies: Vec<Body>,

    /// Nearest-body lookups (requires spatial-index feature); `None` when empty
    #[cfg(feature = "spatial-index")]
    spatial_index: Option<SpatialIndex>,
}

impl World {
    /// Build every body from its spawn record
    pub fn generate(config: WorldConfig, mut records: Vec<BodySpawnRecord>, asteroid: &AsteroidConfig) -> Self {
        records.sort_by_key(|r| r.index);

        let bodies: Vec<Body> = records
            .iter()
            .map(|record| {
                log::debug!(
                    "generating body {} (seed {}, multiplier {:.3})",
                    record.index,
                    record.seed,
                    record.size_multiplier
                );
                Body::generate(record, asteroid)
            })
            .collect();

        #[cfg(feature = "spatial-index")]
        let spatial_index = {
            let centers: Vec<Vec3> = bodies.iter().map(|b| b.position()).collect();
            SpatialIndex::new(&centers)
        };

        let fallbacks = bodies.iter().filter(|b| b.mesh.is_fallback()).count();
        let triangles: usize = bodies.iter().map(|b| b.mesh.triangle_count()).sum();
        log::info!(
            "world {} generated: {} bodies, {} triangles, {} fallbacks",
            config.world_seed,
            bodies.len(),
            triangles,
            fallbacks
        );

        Self {
            config,
            records,
            bodies,
            #[cfg(feature = "spatial-index")]
            spatial_index,
        }
    }

    #[inline]
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Spawn records, sorted by index
    #[inline]
    pub fn records(&self) -> &[BodySpawnRecord] {
        &self.records
    }

    #[inline]
    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    /// Get a body by its record index
    pub fn body(&self, index: i32) -> Option<&Body> {
        self.bodies
            .binary_search_by_key(&index, |b| b.index)
            .ok()
            .map(|i| &self.bodies[i])
    }

    #[inline]
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Body whose center is closest to `position`
    ///
    /// Returns `None` for a world without bodies.
    #[cfg(feature = "spatial-index")]
    pub fn nearest_body(&self, position: Vec3) -> Option<&Body> {
        let index = self.spatial_index.as_ref()?;
        self.bodies.get(index.find_nearest(position))
    }

    /// Body whose center is closest to `position` (linear scan)
    #[cfg(not(feature = "spatial-index"))]
    pub fn nearest_body(&self, position: Vec3) -> Option<&Body> {
        self.bodies.iter().min_by(|a, b| {
            a.position()
                .distance_squared(position)
                .total_cmp(&b.position().distance_squared(position))
        })
    }

    /// True when both worlds have the same config and records and every
    /// body mesh is bit-identical
    pub fn matches(&self, other: &World) -> bool {
        self.config == other.config
            && self.records == other.records
            && self.bodies.len() == other.bodies.len()
            && self
                .bodies
                .iter()
                .zip(&other.bodies)
                .all(|(a, b)| a.radius.to_bits() == b.radius.to_bits() && a.mesh.bitwise_eq(&b.mesh))
    }
}
