//! Tunnel wall lattices
//!
//! Each tunnel gets a cylindrical `rings x segments` lattice of its own,
//! laid out ring-major: `ring * segments + segment`. The segment axis wraps
//! without a duplicated seam column.

use glam::Vec3;
use std::f32::consts::TAU;

use crate::noise::NoiseField;
use crate::tunnel::TunnelSpec;

/// Radius multiplier applied to the first and last ring
pub const END_FLARE: f32 = 1.2;

/// Amplitude of the sinusoidal radius variation along the tunnel
const PROFILE_AMPLITUDE: f32 = 0.1;

/// Number of full sine periods over the tunnel length
const PROFILE_PERIODS: f32 = 2.0;

/// Peak wall perturbation as a fraction of the tunnel radius
pub const WALL_ROUGHNESS: f32 = 0.08;

/// Below this, the axis counts as parallel to the reference vector
const BASIS_EPSILON: f32 = 1e-4;

/// Wall vertices of one tunnel
#[derive(Debug, Clone)]
pub struct TunnelLattice {
    pub rings: u32,
    pub segments: u32,
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub uvs: Vec<[f32; 2]>,
}

/// Two unit vectors orthogonal to `direction` with `u x v == direction`
///
/// Uses +Y as the reference and falls back to +X when the axis is (nearly)
/// parallel to it.
pub fn perpendicular_basis(direction: Vec3) -> (Vec3, Vec3) {
    let mut reference = Vec3::Y;
    let mut u = direction.cross(reference);
    if u.length_squared() < BASIS_EPSILON || direction.dot(reference).abs() > 0.999 {
        reference = Vec3::X;
        u = direction.cross(reference);
    }
    let u = u.normalize();
    let v = direction.cross(u).normalize();
    (u, v)
}

/// Radius multiplier of ring `ring` before wall roughness
#[inline]
pub fn ring_profile(ring: u32, rings: u32) -> f32 {
    if ring == 0 || ring + 1 == rings {
        return END_FLARE;
    }
    let t = ring as f32 / (rings - 1) as f32;
    1.0 + PROFILE_AMPLITUDE * (TAU * PROFILE_PERIODS * t).sin()
}

/// Build the wall lattice of one tunnel
///
/// The cellular field is sampled at body-relative coordinates so the wall
/// texture scales with the body.
pub fn build_tunnel_wall(
    tunnel: &TunnelSpec,
    rings: u32,
    segments: u32,
    body_radius: f32,
    holes: &NoiseField,
) -> TunnelLattice {
    let (u, v) = perpendicular_basis(tunnel.direction);
    let count = (rings * segments) as usize;
    let mut positions = vec![Vec3::ZERO; count];
    let mut normals = vec![Vec3::ZERO; count];
    let mut uvs = vec![[0.0; 2]; count];

    let inv_body = if body_radius > 0.0 { 1.0 / body_radius } else { 1.0 };

    for ring in 0..rings {
        let t = ring as f32 / (rings - 1) as f32;
        let center = tunnel.axis_point(t);
        let profile = ring_profile(ring, rings);

        for segment in 0..segments {
            let angle = TAU * segment as f32 / segments as f32;
            let radial = u * angle.cos() + v * angle.sin();

            let base = center + radial * tunnel.radius * profile;
            let crack = holes.sample(base * inv_body);
            let roughness = (crack - 0.5) * 2.0 * WALL_ROUGHNESS;
            let wall_radius = tunnel.radius * (profile + roughness);

            let i = (ring * segments + segment) as usize;
            positions[i] = center + radial * wall_radius;
            normals[i] = -radial;
            uvs[i] = [segment as f32 / segments as f32, t];
        }
    }

    TunnelLattice {
        rings,
        segments,
        positions,
        normals,
        uvs,
    }
}
