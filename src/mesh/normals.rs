//! Smooth normal reconstruction

use glam::Vec3;

use crate::tunnel::TunnelSpec;

use super::VertexRange;

/// Squared length below which an accumulated normal is treated as degenerate
pub const DEGENERATE_NORMAL_EPSILON: f32 = 1e-12;

/// Area-weighted vertex normals from face normals
///
/// Every triangle adds its unnormalized face normal to its three corners;
/// the sums are normalized at the end. A vertex whose sum is (near) zero,
/// such as an unused seam duplicate of a pole, falls back to the outward
/// radial direction, or +Y at the origin.
pub fn accumulate_normals(positions: &[Vec3], indices: &[u32]) -> Vec<Vec3> {
    let mut normals = vec![Vec3::ZERO; positions.len()];

    for tri in indices.chunks_exact(3) {
        let (a, b, c) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
        if a >= positions.len() || b >= positions.len() || c >= positions.len() {
            continue;
        }
        let face = (positions[b] - positions[a]).cross(positions[c] - positions[a]);
        normals[a] += face;
        normals[b] += face;
        normals[c] += face;
    }

    let mut degenerate = 0usize;
    for (normal, position) in normals.iter_mut().zip(positions) {
        if normal.length_squared() > DEGENERATE_NORMAL_EPSILON {
            *normal = normal.normalize();
        } else {
            degenerate += 1;
            *normal = radial_fallback(*position);
        }
    }
    if degenerate > 0 {
        log::debug!("{} vertices fell back to radial normals", degenerate);
    }

    normals
}

/// Outward direction from the body center, +Y at the center itself
#[inline]
pub fn radial_fallback(position: Vec3) -> Vec3 {
    position.try_normalize().unwrap_or(Vec3::Y)
}

/// Bend the end-ring normals of each tunnel toward the mouth's opening
///
/// The tunnel list and the vertex ranges are the ones recorded while the
/// mesh was built; nothing is re-planned here. Tunnel `i` pairs with range
/// `i`, and the first and last `segments` vertices of each range are the
/// two mouth rings.
pub fn reconcile_tunnel_mouths(
    normals: &mut [Vec3],
    tunnels: &[TunnelSpec],
    ranges: &[VertexRange],
    segments: u32,
) {
    if tunnels.len() != ranges.len() {
        log::warn!(
            "tunnel list ({}) and vertex ranges ({}) disagree, reconciling the common prefix",
            tunnels.len(),
            ranges.len()
        );
    }
    let segments = segments as usize;
    if segments == 0 {
        return;
    }

    for (tunnel, range) in tunnels.iter().zip(ranges) {
        if range.count < 2 * segments || range.end() > normals.len() {
            continue;
        }
        let first_ring = range.start..range.start + segments;
        let last_ring = range.end() - segments..range.end();

        for i in first_ring {
            normals[i] = blend_mouth(normals[i], -tunnel.direction);
        }
        for i in last_ring {
            normals[i] = blend_mouth(normals[i], tunnel.direction);
        }
    }
}

#[inline]
fn blend_mouth(wall: Vec3, opening: Vec3) -> Vec3 {
    (wall + opening).try_normalize().unwrap_or(wall)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_quad_normals() {
        let positions = [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ];
        let normals = accumulate_normals(&positions, &[0, 1, 2, 0, 2, 3]);
        for n in normals {
            assert!((n - Vec3::Z).length() < 1e-6);
        }
    }

    #[test]
    fn test_unused_vertex_falls_back_to_radial() {
        let positions = [
            Vec3::ZERO,
            Vec3::X,
            Vec3::Y,
            Vec3::new(0.0, 0.0, -3.0),
        ];
        let normals = accumulate_normals(&positions, &[0, 1, 2]);
        assert_eq!(normals[3], -Vec3::Z);
    }

    #[test]
    fn test_degenerate_at_origin_uses_up() {
        let positions = [Vec3::ZERO, Vec3::ZERO, Vec3::ZERO];
        let normals = accumulate_normals(&positions, &[0, 1, 2]);
        assert!(normals.iter().all(|&n| n == Vec3::Y));
    }

    #[test]
    fn test_out_of_range_triangles_are_skipped() {
        let positions = [Vec3::X, Vec3::Y, Vec3::Z];
        let normals = accumulate_normals(&positions, &[0, 1, 9]);
        assert_eq!(normals.len(), 3);
        assert!(normals.iter().all(|n| (n.length() - 1.0).abs() < 1e-5));
    }

    #[test]
    fn test_reconcile_only_touches_mouth_rings() {
        let tunnel = TunnelSpec::through_center(0, Vec3::X, 1.0, 4.0);
        let range = VertexRange { start: 2, count: 12 };
        let mut normals = vec![Vec3::Y; 14];
        reconcile_tunnel_mouths(&mut normals, &[tunnel], &[range], 4);

        // Surface vertices untouched
        assert_eq!(normals[0], Vec3::Y);
        assert_eq!(normals[1], Vec3::Y);
        // Start ring leans toward -X, end ring toward +X, middle ring untouched
        for i in 2..6 {
            assert!(normals[i].x < 0.0);
            assert!((normals[i].length() - 1.0).abs() < 1e-5);
        }
        for i in 6..10 {
            assert_eq!(normals[i], Vec3::Y);
        }
        for i in 10..14 {
            assert!(normals[i].x > 0.0);
        }
    }

    #[test]
    fn test_reconcile_ignores_mismatched_tail() {
        let tunnel = TunnelSpec::through_center(0, Vec3::Z, 1.0, 4.0);
        let mut normals = vec![Vec3::X; 8];
        reconcile_tunnel_mouths(&mut normals, &[tunnel, tunnel], &[VertexRange { start: 0, count: 8 }], 4);
        assert!(normals.iter().all(|n| n.z.abs() > 0.0));
    }
}
