//! Asteroid body
//!
//! A body is a plain record composed of a transform, its mesh and an
//! optional collision shape, plus the spawn parameters it was built from.

use glam::Vec3;
use parry3d::shape::TriMesh;

use crate::collision::derive_collision_shape;
use crate::config::AsteroidConfig;
use crate::mesh::{generate_asteroid_mesh, MeshData};
use crate::random::Seed;
use crate::world::BodySpawnRecord;

/// World-space placement of a body
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
}

impl Transform {
    #[inline]
    pub fn from_translation(translation: Vec3) -> Self {
        Self { translation }
    }

    /// Map a body-local point to world space
    #[inline]
    pub fn transform_point(&self, local: Vec3) -> Vec3 {
        self.translation + local
    }
}

/// A generated asteroid
///
/// The mesh is immutable once built; a new world generation replaces the
/// whole body.
#[derive(Debug, Clone)]
pub struct Body {
    /// Index of the spawn record this body was built from
    pub index: i32,
    /// Body seed (sub-seed of the world seed)
    pub seed: Seed,
    /// Final radius (base radius times size multiplier)
    pub radius: f32,
    pub transform: Transform,
    pub mesh: MeshData,
    /// Concave collision shape, when enabled in the config
    pub collision: Option<TriMesh>,
}

impl Body {
    /// Build a body from its spawn record
    ///
    /// Consumes no randomness beyond the record's own seed, so every
    /// participant builds the same body from the same record.
    pub fn generate(record: &BodySpawnRecord, config: &AsteroidConfig) -> Self {
        let radius = config.base_radius() * record.size_multiplier;
        let mesh = generate_asteroid_mesh(record.seed, radius, config);

        let collision = if config.build_collision {
            match derive_collision_shape(&mesh) {
                Ok(shape) => Some(shape),
                Err(err) => {
                    log::warn!("body {}: {}", record.index, err);
                    None
                }
            }
        } else {
            None
        };

        Self {
            index: record.index,
            seed: record.seed,
            radius,
            transform: Transform::from_translation(record.position),
            mesh,
            collision,
        }
    }

    /// World-space position of the body center
    #[inline]
    pub fn position(&self) -> Vec3 {
        self.transform.translation
    }

    /// Mesh vertices in world space
    pub fn world_positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.mesh
            .positions
            .iter()
            .map(move |p| self.transform.transform_point(Vec3::from_array(*p)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AsteroidConfigBuilder;

    fn record() -> BodySpawnRecord {
        BodySpawnRecord {
            index: 1,
            position: Vec3::new(10.0, -4.0, 20.0),
            seed: 1042,
            size_multiplier: 1.2,
        }
    }

    #[test]
    fn test_body_from_record() {
        let config = AsteroidConfig::default();
        let body = Body::generate(&record(), &config);
        assert_eq!(body.index, 1);
        assert_eq!(body.seed, 1042);
        assert!((body.radius - 6.0).abs() < 1e-5);
        assert_eq!(body.position(), Vec3::new(10.0, -4.0, 20.0));
        assert!(body.collision.is_some());
        assert!(!body.mesh.is_empty());
    }

    #[test]
    fn test_collision_can_be_disabled() {
        let config = AsteroidConfigBuilder::new().build_collision(false).build().unwrap();
        let body = Body::generate(&record(), &config);
        assert!(body.collision.is_none());
    }

    #[test]
    fn test_world_positions_are_translated() {
        let config = AsteroidConfig::default();
        let body = Body::generate(&record(), &config);
        let first_local = Vec3::from_array(body.mesh.positions[0]);
        let first_world = body.world_positions().next().unwrap();
        assert_eq!(first_world, first_local + body.position());
    }
}
