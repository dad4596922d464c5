//! Displaced UV-sphere surface lattice

use glam::Vec3;
use std::f32::consts::{PI, TAU};

use crate::noise::NoiseField;
use crate::tunnel::{smoothstep, TunnelSpec};

/// How far a vertex at the tunnel axis is pulled toward the center
const ENTRANCE_PULL: f32 = 0.7;

/// Surface vertices laid out ring-major: `ring * (sectors + 1) + sector`
#[derive(Debug, Clone)]
pub struct SurfaceLattice {
    pub rings: u32,
    pub sectors: u32,
    pub positions: Vec<Vec3>,
    pub uvs: Vec<[f32; 2]>,
}

impl SurfaceLattice {
    /// Vertex count of a lattice with the given resolution
    #[inline]
    pub fn vertex_count(rings: u32, sectors: u32) -> usize {
        ((rings + 1) * (sectors + 1)) as usize
    }

    /// Buffer index of the vertex at (ring, sector)
    #[inline]
    pub fn index(&self, ring: u32, sector: u32) -> usize {
        (ring * (self.sectors + 1) + sector) as usize
    }
}

/// Unit-sphere point and texture coordinate of a lattice vertex
#[inline]
pub fn sphere_point(ring: u32, sector: u32, rings: u32, sectors: u32) -> (Vec3, [f32; 2]) {
    let u = sector as f32 / sectors as f32;
    let v = ring as f32 / rings as f32;
    let theta = PI * v;
    let phi = TAU * u;
    let point = Vec3::new(theta.sin() * phi.cos(), theta.cos(), theta.sin() * phi.sin());
    (point, [u, v])
}

/// Multiplicative pull toward the tunnels for a surface point at `world_point`
///
/// 1.0 outside every influence band; tunnels compose multiplicatively.
pub fn entrance_blend(world_point: Vec3, tunnels: &[TunnelSpec]) -> f32 {
    tunnels.iter().fold(1.0, |blend, tunnel| {
        let influence = tunnel.influence_radius();
        let d = tunnel.distance_to_axis(world_point);
        if d < influence {
            let factor = smoothstep(0.0, 1.0, 1.0 - d / influence);
            blend * (1.0 - ENTRANCE_PULL * factor)
        } else {
            blend
        }
    })
}

/// Build the displaced surface lattice of one body
///
/// Each unit point `p` becomes `p * radius * shape`, where `shape` is the
/// noise displacement pulled inward near tunnel mouths.
pub fn build_surface(
    rings: u32,
    sectors: u32,
    radius: f32,
    variation: f32,
    shape: &NoiseField,
    tunnels: &[TunnelSpec],
) -> SurfaceLattice {
    let count = SurfaceLattice::vertex_count(rings, sectors);
    let mut positions = vec![Vec3::ZERO; count];
    let mut uvs = vec![[0.0; 2]; count];

    for ring in 0..=rings {
        for sector in 0..=sectors {
            let (p, uv) = sphere_point(ring, sector, rings, sectors);
            let displacement = shape.shape_displacement(p, variation) * entrance_blend(p * radius, tunnels);

            let i = (ring * (sectors + 1) + sector) as usize;
            positions[i] = p * radius * displacement;
            uvs[i] = uv;
        }
    }

    SurfaceLattice {
        rings,
        sectors,
        positions,
        uvs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_count() {
        let field = NoiseField::smooth(1042, 1.5);
        let lattice = build_surface(12, 24, 5.0, 0.3, &field, &[]);
        assert_eq!(lattice.positions.len(), 325);
        assert_eq!(lattice.uvs.len(), 325);
        assert_eq!(SurfaceLattice::vertex_count(12, 24), 325);
    }

    #[test]
    fn test_poles() {
        let (north, _) = sphere_point(0, 5, 12, 24);
        let (south, _) = sphere_point(12, 5, 12, 24);
        assert!((north - Vec3::Y).length() < 1e-6);
        assert!((south + Vec3::Y).length() < 1e-5);
    }

    #[test]
    fn test_seam_columns_coincide() {
        let field = NoiseField::smooth(7, 1.5);
        let lattice = build_surface(8, 16, 3.0, 0.3, &field, &[]);
        for ring in 0..=8 {
            let first = lattice.positions[lattice.index(ring, 0)];
            let last = lattice.positions[lattice.index(ring, 16)];
            assert!((first - last).length() < 1e-3);
        }
    }

    #[test]
    fn test_displacement_stays_near_radius() {
        let field = NoiseField::smooth(5, 1.5);
        let lattice = build_surface(12, 24, 5.0, 0.3, &field, &[]);
        for p in &lattice.positions {
            let r = p.length();
            assert!(r >= 5.0 * 0.6 - 1e-3 && r <= 5.0 * 1.4 + 1e-3, "radius {}", r);
        }
    }

    #[test]
    fn test_entrance_blend_pulls_inward() {
        let tunnel = TunnelSpec::through_center(0, Vec3::X, 1.0, 11.0);
        // On the axis the full pull applies
        assert!((entrance_blend(Vec3::new(5.0, 0.0, 0.0), &[tunnel]) - 0.3).abs() < 1e-6);
        // Outside the band nothing changes
        assert_eq!(entrance_blend(Vec3::new(0.0, 5.0, 0.0), &[tunnel]), 1.0);
        // Inside the band the pull is partial
        let partial = entrance_blend(Vec3::new(5.0, 0.8, 0.0), &[tunnel]);
        assert!(partial > 0.3 && partial < 1.0);
    }

    #[test]
    fn test_entrance_blend_composes() {
        let a = TunnelSpec::through_center(0, Vec3::X, 1.0, 11.0);
        let b = TunnelSpec::through_center(1, Vec3::X, 1.0, 11.0);
        let p = Vec3::new(5.0, 0.0, 0.0);
        let single = entrance_blend(p, &[a]);
        let double = entrance_blend(p, &[a, b]);
        assert!((double - single * single).abs() < 1e-6);
    }

    #[test]
    fn test_tunnel_mouth_is_recessed() {
        let field = NoiseField::smooth(1, 1.5);
        let tunnel = TunnelSpec::through_center(0, Vec3::Y, 1.5, 11.0);
        let plain = build_surface(12, 24, 5.0, 0.3, &field, &[]);
        let carved = build_surface(12, 24, 5.0, 0.3, &field, &[tunnel]);
        // North pole sits on the tunnel axis
        assert!(carved.positions[0].length() < plain.positions[0].length() * 0.5);
    }
}
