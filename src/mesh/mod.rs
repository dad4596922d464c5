//! Asteroid mesh generation
//!
//! Builds engine-agnostic mesh buffers for one body from its seed:
//! tunnels are planned first, then the displaced surface lattice is built
//! around them, tunnel wall lattices are appended, everything is
//! triangulated and smooth normals are reconstructed.
//!
//! The output is always renderable: a body whose geometry fails validation
//! is replaced by a small primitive and the failure is logged.

pub mod fallback;
pub mod normals;
pub mod surface;
pub mod triangulate;
pub mod tunnel;

pub use fallback::fallback_mesh;
pub use surface::{build_surface, SurfaceLattice};
pub use triangulate::{triangulate_surface, triangulate_tunnel, validate};
pub use tunnel::{build_tunnel_wall, perpendicular_basis, TunnelLattice};

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::config::AsteroidConfig;
use crate::error::{AsteroidError, Result};
use crate::noise::NoiseField;
use crate::random::{Seed, HOLE_FIELD_SEED_OFFSET};
use crate::tunnel::{plan_tunnels, TunnelSpec};

/// Contiguous block of vertices owned by one tunnel wall
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VertexRange {
    pub start: usize,
    pub count: usize,
}

impl VertexRange {
    /// One past the last vertex of the range
    #[inline]
    pub fn end(&self) -> usize {
        self.start + self.count
    }

    #[inline]
    pub fn contains(&self, index: usize) -> bool {
        index >= self.start && index < self.end()
    }
}

/// Why a body carries a fallback primitive instead of its generated mesh
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FallbackReason {
    /// Too few vertices or triangles, or non-finite positions
    Degenerate,
    /// An index pointed past the vertex buffer
    IndexOutOfRange,
}

/// Engine-agnostic mesh data output
///
/// Contains raw vertex data suitable for any rendering engine:
/// - Bevy: Convert to `Mesh` with attributes
/// - Godot: Convert to `ArrayMesh`
/// - wgpu: Use directly as vertex buffers
///
/// Surface vertices come first (`0..surface_vertex_count`), followed by one
/// contiguous range per tunnel wall.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    /// Vertex positions (3D coordinates, body-local)
    pub positions: Vec<[f32; 3]>,
    /// Unit vertex normals; outward on the surface, toward the axis in tunnels
    pub normals: Vec<[f32; 3]>,
    /// Texture coordinates
    pub uvs: Vec<[f32; 2]>,
    /// Triangle indices
    pub indices: Vec<u32>,
    /// Number of surface vertices before the tunnel walls
    pub surface_vertex_count: usize,
    /// Vertex range of each tunnel wall, in tunnel order
    pub tunnel_ranges: Vec<VertexRange>,
    /// Tunnels carved into this body, in the same order as `tunnel_ranges`
    pub tunnels: Vec<TunnelSpec>,
    /// Set when the generated geometry was replaced by a primitive
    pub fallback: Option<FallbackReason>,
}

impl MeshData {
    /// Get the number of vertices
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Get the number of triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Check if mesh is empty
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Whether this mesh is a fallback primitive
    pub fn is_fallback(&self) -> bool {
        self.fallback.is_some()
    }

    /// Triangles as index triples
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    /// Exact equality of every buffer, comparing floats by bit pattern
    pub fn bitwise_eq(&self, other: &MeshData) -> bool {
        fn bits<const N: usize>(a: &[[f32; N]], b: &[[f32; N]]) -> bool {
            a.len() == b.len()
                && a.iter()
                    .zip(b)
                    .all(|(x, y)| x.iter().zip(y).all(|(p, q)| p.to_bits() == q.to_bits()))
        }
        bits(&self.positions, &other.positions)
            && bits(&self.normals, &other.normals)
            && bits(&self.uvs, &other.uvs)
            && self.indices == other.indices
            && self.surface_vertex_count == other.surface_vertex_count
            && self.tunnel_ranges == other.tunnel_ranges
            && self.fallback == other.fallback
    }
}

/// Generate the mesh of one body
///
/// Never fails: invalid geometry is logged and replaced by
/// [`fallback_mesh`].
///
/// # Example
///
/// ```rust
/// use rust_asteroid_field::*;
///
/// let config = AsteroidConfig::default();
/// let mesh = generate_asteroid_mesh(1042, config.base_radius(), &config);
/// assert_eq!(mesh.surface_vertex_count, 325);
/// assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertex_count()));
/// ```
pub fn generate_asteroid_mesh(seed: Seed, radius: f32, config: &AsteroidConfig) -> MeshData {
    match build_asteroid_mesh(seed, radius, config) {
        Ok(mesh) => mesh,
        Err(err) => {
            let reason = match err {
                AsteroidError::IndexOutOfRange { .. } => FallbackReason::IndexOutOfRange,
                _ => FallbackReason::Degenerate,
            };
            log::warn!(
                "asteroid seed {} radius {}: {}, substituting fallback mesh",
                seed,
                radius,
                err
            );
            fallback_mesh(radius, reason)
        }
    }
}

/// Generate the mesh of one body, reporting validation failures
///
/// # Errors
///
/// `GenerationDegenerate` or `IndexOutOfRange` from [`validate`].
pub fn build_asteroid_mesh(seed: Seed, radius: f32, config: &AsteroidConfig) -> Result<MeshData> {
    let tunnels = plan_tunnels(seed, radius, config);
    let shape = NoiseField::smooth(seed, config.shape_frequency);
    let holes = NoiseField::cellular(seed.wrapping_add(HOLE_FIELD_SEED_OFFSET), config.hole_frequency);

    let rings = config.surface_rings();
    let sectors = config.complexity();
    let surface = build_surface(rings, sectors, radius, config.radius_variation, &shape, &tunnels);
    let surface_count = surface.positions.len();

    let mut indices = Vec::new();
    triangulate_surface(rings, sectors, &mut indices);
    let surface_index_count = indices.len();

    let walls: Vec<TunnelLattice> = tunnels
        .iter()
        .map(|t| build_tunnel_wall(t, config.tunnel_rings, config.tunnel_segments, radius, &holes))
        .collect();
    let wall_vertex_count: usize = walls.iter().map(|w| w.positions.len()).sum();

    let mut positions: Vec<Vec3> = Vec::with_capacity(surface_count + wall_vertex_count);
    let mut uvs = Vec::with_capacity(surface_count + wall_vertex_count);
    positions.extend_from_slice(&surface.positions);
    uvs.extend_from_slice(&surface.uvs);

    let mut tunnel_ranges = Vec::with_capacity(walls.len());
    for wall in &walls {
        let range = VertexRange {
            start: positions.len(),
            count: wall.positions.len(),
        };
        positions.extend_from_slice(&wall.positions);
        uvs.extend_from_slice(&wall.uvs);
        triangulate_tunnel(range, wall.rings, wall.segments, &mut indices);
        tunnel_ranges.push(range);
    }

    validate(&positions, &indices)?;

    let mut normals = normals::accumulate_normals(&surface.positions, &indices[..surface_index_count]);
    for wall in &walls {
        normals.extend_from_slice(&wall.normals);
    }
    normals::reconcile_tunnel_mouths(&mut normals, &tunnels, &tunnel_ranges, config.tunnel_segments);

    log::debug!(
        "asteroid seed {}: {} surface + {} tunnel vertices, {} triangles, {} tunnels",
        seed,
        surface_count,
        wall_vertex_count,
        indices.len() / 3,
        tunnels.len()
    );

    Ok(MeshData {
        positions: positions.iter().map(|p| p.to_array()).collect(),
        normals: normals.iter().map(|n| n.to_array()).collect(),
        uvs,
        indices,
        surface_vertex_count: surface_count,
        tunnel_ranges,
        tunnels,
        fallback: None,
    })
}
