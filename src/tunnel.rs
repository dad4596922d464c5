//! Tunnel planning
//!
//! Tunnels are planned from the body seed before any vertex exists, because
//! the surface builder needs the tunnel axes to blend the entrances. The
//! resulting [`TunnelSpec`] list is then threaded unchanged through the
//! surface builder, the wall builder and normal reconciliation.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::config::AsteroidConfig;
use crate::random::{tunnel_seed, Seed, SeededStream};

/// Hard cap on tunnels per body
pub const MAX_TUNNELS: usize = 2;

/// Tunnel radius range as a fraction of the body radius
pub const TUNNEL_RADIUS_RANGE: (f32, f32) = (0.2, 0.4);

/// Tunnel length range as a fraction of the body radius
pub const TUNNEL_LENGTH_RANGE: (f32, f32) = (2.2, 2.5);

/// Distance from the axis, relative to the tunnel radius, inside which the
/// surface is pulled toward the tunnel
pub const INFLUENCE_FACTOR: f32 = 1.3;

/// A straight tunnel through the body center
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TunnelSpec {
    /// Position of this tunnel in the body's tunnel list
    pub index: usize,
    /// Unit axis direction
    pub direction: Vec3,
    pub radius: f32,
    pub length: f32,
    /// `-direction * length / 2`
    pub start: Vec3,
    /// `direction * length / 2`
    pub end: Vec3,
}

impl TunnelSpec {
    /// Build a tunnel through the origin along `direction`
    pub fn through_center(index: usize, direction: Vec3, radius: f32, length: f32) -> Self {
        let half = direction * (length * 0.5);
        Self {
            index,
            direction,
            radius,
            length,
            start: -half,
            end: half,
        }
    }

    /// Point on the axis at parameter `t` (0 = start, 1 = end)
    #[inline]
    pub fn axis_point(&self, t: f32) -> Vec3 {
        self.start.lerp(self.end, t)
    }

    /// Radius of the band in which surface vertices are blended inward
    #[inline]
    pub fn influence_radius(&self) -> f32 {
        self.radius * INFLUENCE_FACTOR
    }

    /// Distance from `point` to this tunnel's axis segment
    #[inline]
    pub fn distance_to_axis(&self, point: Vec3) -> f32 {
        point_segment_distance(point, self.start, self.end)
    }
}

/// Distance from `point` to the segment `a`-`b`
///
/// Degenerate segments (a == b) measure the distance to `a`.
pub fn point_segment_distance(point: Vec3, a: Vec3, b: Vec3) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq <= f32::EPSILON {
        return point.distance(a);
    }
    let t = ((point - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    point.distance(a + ab * t)
}

/// Cubic Hermite smoothstep, clamped
#[inline]
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Plan the tunnels of one body
///
/// Draws the tunnel count from the body stream, then gives each tunnel its
/// own stream seeded `seed + index * 500` for direction, radius and length.
pub fn plan_tunnels(seed: Seed, radius: f32, config: &AsteroidConfig) -> Vec<TunnelSpec> {
    if config.max_holes == 0 {
        return Vec::new();
    }

    let mut stream = SeededStream::from_seed(seed);
    let drawn = 1 + (stream.next_float() * config.max_holes as f32) as usize;
    let count = drawn.min(MAX_TUNNELS);

    (0..count)
        .map(|index| {
            let mut tunnel_stream = SeededStream::from_seed(tunnel_seed(seed, index));
            let direction = tunnel_stream.unit_vector();
            let tunnel_radius =
                radius * tunnel_stream.range(TUNNEL_RADIUS_RANGE.0, TUNNEL_RADIUS_RANGE.1);
            let length = radius * tunnel_stream.range(TUNNEL_LENGTH_RANGE.0, TUNNEL_LENGTH_RANGE.1);
            TunnelSpec::through_center(index, direction, tunnel_radius, length)
        })
        .collect()
}
