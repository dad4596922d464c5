//! Seeded 3D cellular (Worley) noise
//!
//! One feature point per unit cell, jittered by the same seeded lattice hash
//! as the Perlin field. The "crack" value F2 - F1 is near zero along the
//! borders between cells and grows toward cell interiors.

use glam::Vec3;

use super::perlin::hash;

/// Feature point of the lattice cell at (x, y, z), in absolute coordinates
#[inline]
fn feature_point(x: i32, y: i32, z: i32, seed: u32) -> Vec3 {
    let jx = hash(x, y, z, seed) as f32 / 255.0;
    let jy = hash(x, y, z, seed.wrapping_add(1)) as f32 / 255.0;
    let jz = hash(x, y, z, seed.wrapping_add(2)) as f32 / 255.0;
    Vec3::new(x as f32 + jx, y as f32 + jy, z as f32 + jz)
}

/// Distances to the nearest and second-nearest feature points
pub fn worley_f1_f2(pos: Vec3, seed: u32) -> (f32, f32) {
    let cx = pos.x.floor() as i32;
    let cy = pos.y.floor() as i32;
    let cz = pos.z.floor() as i32;

    let mut f1 = f32::MAX;
    let mut f2 = f32::MAX;

    for dz in -1..=1 {
        for dy in -1..=1 {
            for dx in -1..=1 {
                let point = feature_point(cx + dx, cy + dy, cz + dz, seed);
                let d = pos.distance(point);
                if d < f1 {
                    f2 = f1;
                    f1 = d;
                } else if d < f2 {
                    f2 = d;
                }
            }
        }
    }

    (f1, f2)
}

/// Sample the crack value F2 - F1
///
/// # Returns
/// Value in range [0, 1]
pub fn cellular_3d(pos: Vec3, seed: u32) -> f32 {
    let (f1, f2) = worley_f1_f2(pos, seed);
    (f2 - f1).clamp(0.0, 1.0)
}
