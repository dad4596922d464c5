//! Minimal replacement meshes for bodies whose generated geometry failed
//! validation

use glam::Vec3;
use parry3d::shape::Ball;
use std::f32::consts::{PI, TAU};

use super::{FallbackReason, MeshData};

/// Latitude subdivisions of the fallback sphere
const FALLBACK_THETA_SUBDIV: u32 = 8;

/// Longitude subdivisions of the fallback sphere
const FALLBACK_PHI_SUBDIV: u32 = 6;

/// Low-poly sphere, or a single triangle when the radius is unusable
pub fn fallback_mesh(radius: f32, reason: FallbackReason) -> MeshData {
    if radius.is_finite() && radius > 0.0 {
        fallback_sphere(radius, reason)
    } else {
        fallback_triangle(reason)
    }
}

/// Low-poly sphere from parry's ball tessellation with radial normals
pub fn fallback_sphere(radius: f32, reason: FallbackReason) -> MeshData {
    let (points, triangles) =
        Ball::new(radius).to_trimesh(FALLBACK_THETA_SUBDIV, FALLBACK_PHI_SUBDIV);

    let mut mesh = MeshData {
        fallback: Some(reason),
        ..Default::default()
    };
    for p in &points {
        let position = Vec3::new(p.x, p.y, p.z);
        let normal = position.try_normalize().unwrap_or(Vec3::Y);
        mesh.positions.push(position.to_array());
        mesh.normals.push(normal.to_array());
        mesh.uvs.push([
            0.5 + normal.z.atan2(normal.x) / TAU,
            normal.y.clamp(-1.0, 1.0).acos() / PI,
        ]);
    }
    mesh.indices = triangles.iter().flatten().copied().collect();
    mesh.surface_vertex_count = mesh.positions.len();
    mesh
}

/// A single unit triangle facing +Z
pub fn fallback_triangle(reason: FallbackReason) -> MeshData {
    MeshData {
        positions: vec![[0.0, 1.0, 0.0], [-0.866, -0.5, 0.0], [0.866, -0.5, 0.0]],
        normals: vec![[0.0, 0.0, 1.0]; 3],
        uvs: vec![[0.5, 0.0], [0.0, 1.0], [1.0, 1.0]],
        indices: vec![0, 1, 2],
        surface_vertex_count: 3,
        tunnel_ranges: Vec::new(),
        tunnels: Vec::new(),
        fallback: Some(reason),
    }
}
