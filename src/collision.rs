//! Collision shape derivation
//!
//! Bodies collide against their full triangle soup. A convex hull would
//! close the tunnels, so the shape is a concave `TriMesh`.

use parry3d::math::Point;
use parry3d::shape::TriMesh;

use crate::error::{AsteroidError, Result};
use crate::mesh::MeshData;

/// Build a concave collision shape from generated mesh buffers
///
/// # Errors
///
/// Returns `CollisionShape` if the mesh has no triangles; parry panics on an
/// empty index buffer.
pub fn derive_collision_shape(mesh: &MeshData) -> Result<TriMesh> {
    if mesh.triangle_count() == 0 {
        return Err(AsteroidError::CollisionShape("mesh has no triangles".into()));
    }

    let vertices: Vec<Point<f32>> = mesh
        .positions
        .iter()
        .map(|p| Point::new(p[0], p[1], p[2]))
        .collect();
    let indices: Vec<[u32; 3]> = mesh.triangles().collect();

    Ok(TriMesh::new(vertices, indices))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AsteroidConfig;
    use crate::mesh::{fallback::fallback_triangle, generate_asteroid_mesh, FallbackReason};

    #[test]
    fn test_shape_keeps_every_triangle() {
        let mesh = generate_asteroid_mesh(1042, 5.0, &AsteroidConfig::default());
        let shape = derive_collision_shape(&mesh).unwrap();
        assert_eq!(shape.indices().len(), mesh.triangle_count());
        assert_eq!(shape.vertices().len(), mesh.vertex_count());
    }

    #[test]
    fn test_shape_bounds_enclose_body() {
        let mesh = generate_asteroid_mesh(42, 5.0, &AsteroidConfig::default());
        let shape = derive_collision_shape(&mesh).unwrap();
        let aabb = shape.local_aabb();
        assert!(aabb.maxs.x > 2.0 && aabb.mins.x < -2.0);
        assert!(aabb.maxs.y > 2.0 && aabb.mins.y < -2.0);
    }

    #[test]
    fn test_fallback_triangle_is_collidable() {
        let mesh = fallback_triangle(FallbackReason::Degenerate);
        assert!(derive_collision_shape(&mesh).is_ok());
    }

    #[test]
    fn test_empty_mesh_rejected() {
        let result = derive_collision_shape(&MeshData::default());
        assert!(matches!(result, Err(AsteroidError::CollisionShape(_))));
    }
}
