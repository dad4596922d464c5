//! Index buffer construction and validation
//!
//! All triangles are wound counter-clockwise when seen from the side their
//! normal faces: outward on the surface, toward the axis inside tunnels.

use glam::Vec3;

use crate::error::{AsteroidError, Result};

use super::VertexRange;

/// Triangles produced for a surface lattice of the given resolution
///
/// Each cap ring contributes one fan triangle per sector, every other ring
/// two per sector.
#[inline]
pub fn surface_triangle_count(rings: u32, sectors: u32) -> usize {
    if rings < 2 {
        return sectors as usize;
    }
    (2 * sectors * (rings - 1)) as usize
}

/// Append surface indices for a `rings x sectors` lattice starting at vertex 0
pub fn triangulate_surface(rings: u32, sectors: u32, indices: &mut Vec<u32>) {
    indices.reserve(surface_triangle_count(rings, sectors) * 3);

    for ring in 0..rings {
        for sector in 0..sectors {
            let next = (sector + 1) % (sectors + 1);
            let k1 = ring * (sectors + 1) + sector;
            let k2 = k1 + sectors + 1;
            let k1_next = ring * (sectors + 1) + next;
            let k2_next = k1_next + sectors + 1;

            if ring == 0 {
                // North cap: k1 and k1_next are the same pole
                indices.extend_from_slice(&[k1, k2_next, k2]);
            } else if ring + 1 == rings {
                // South cap: k2 and k2_next are the same pole
                indices.extend_from_slice(&[k1, k1_next, k2]);
            } else {
                indices.extend_from_slice(&[k1, k1_next, k2]);
                indices.extend_from_slice(&[k1_next, k2_next, k2]);
            }
        }
    }
}

/// Append inward-facing indices for one tunnel wall lattice
pub fn triangulate_tunnel(range: VertexRange, rings: u32, segments: u32, indices: &mut Vec<u32>) {
    if rings < 2 || segments < 3 {
        return;
    }
    indices.reserve(((rings - 1) * segments * 6) as usize);

    let base = range.start as u32;
    for ring in 0..rings - 1 {
        for segment in 0..segments {
            let next = (segment + 1) % segments;
            let a = base + ring * segments + segment;
            let b = base + ring * segments + next;
            let c = base + (ring + 1) * segments + segment;
            let d = base + (ring + 1) * segments + next;

            indices.extend_from_slice(&[a, c, b]);
            indices.extend_from_slice(&[b, c, d]);
        }
    }
}

/// Check that a buffer set can be rendered and collided with
///
/// # Errors
///
/// - `GenerationDegenerate` for fewer than 3 vertices, fewer than one
///   triangle, a ragged index count, or non-finite positions
/// - `IndexOutOfRange` for the first index past the vertex buffer
pub fn validate(positions: &[Vec3], indices: &[u32]) -> Result<()> {
    if positions.len() < 3 {
        return Err(AsteroidError::GenerationDegenerate(format!(
            "{} vertices",
            positions.len()
        )));
    }
    if indices.len() < 3 || indices.len() % 3 != 0 {
        return Err(AsteroidError::GenerationDegenerate(format!(
            "{} indices",
            indices.len()
        )));
    }
    if let Some(&index) = indices.iter().find(|&&i| i as usize >= positions.len()) {
        return Err(AsteroidError::IndexOutOfRange {
            index,
            vertex_count: positions.len(),
        });
    }
    if let Some(i) = positions.iter().position(|p| !p.is_finite()) {
        return Err(AsteroidError::GenerationDegenerate(format!(
            "non-finite position at vertex {}",
            i
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::surface::SurfaceLattice;

    #[test]
    fn test_surface_triangle_count() {
        let mut indices = Vec::new();
        triangulate_surface(12, 24, &mut indices);
        assert_eq!(indices.len() / 3, surface_triangle_count(12, 24));
        assert_eq!(surface_triangle_count(12, 24), 528);
    }

    #[test]
    fn test_surface_indices_in_range() {
        let mut indices = Vec::new();
        triangulate_surface(8, 16, &mut indices);
        let count = SurfaceLattice::vertex_count(8, 16) as u32;
        assert!(indices.iter().all(|&i| i < count));
    }

    #[test]
    fn test_caps_touch_poles_once_per_triangle() {
        let mut indices = Vec::new();
        triangulate_surface(4, 8, &mut indices);
        // First ring triangles each use exactly one north pole vertex
        for tri in indices[..8 * 3].chunks(3) {
            assert_eq!(tri.iter().filter(|&&i| i <= 8).count(), 1);
        }
    }

    #[test]
    fn test_tunnel_indices() {
        let range = VertexRange {
            start: 325,
            count: 12 * 16,
        };
        let mut indices = Vec::new();
        triangulate_tunnel(range, 12, 16, &mut indices);
        assert_eq!(indices.len(), 11 * 16 * 6);
        assert!(indices.iter().all(|&i| (i as usize) >= range.start && (i as usize) < range.end()));
    }

    #[test]
    fn test_tunnel_wraps_segments() {
        let range = VertexRange { start: 0, count: 8 };
        let mut indices = Vec::new();
        triangulate_tunnel(range, 2, 4, &mut indices);
        // Last quad of ring 0 joins segment 3 back to segment 0
        assert_eq!(&indices[18..24], &[3, 7, 0, 0, 7, 4]);
    }

    #[test]
    fn test_validate_accepts_triangle() {
        let positions = [Vec3::ZERO, Vec3::X, Vec3::Y];
        assert!(validate(&positions, &[0, 1, 2]).is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_buffers() {
        let positions = [Vec3::ZERO, Vec3::X, Vec3::Y];
        assert!(matches!(
            validate(&positions[..2], &[0, 1, 1]),
            Err(AsteroidError::GenerationDegenerate(_))
        ));
        assert!(matches!(
            validate(&positions, &[]),
            Err(AsteroidError::GenerationDegenerate(_))
        ));
        assert!(matches!(
            validate(&positions, &[0, 1, 2, 0]),
            Err(AsteroidError::GenerationDegenerate(_))
        ));
        assert_eq!(
            validate(&positions, &[0, 1, 3]),
            Err(AsteroidError::IndexOutOfRange {
                index: 3,
                vertex_count: 3
            })
        );
        let broken = [Vec3::ZERO, Vec3::X, Vec3::new(f32::NAN, 0.0, 0.0)];
        assert!(validate(&broken, &[0, 1, 2]).is_err());
    }
}
