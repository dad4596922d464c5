//! Seeded 3D Perlin noise
//!
//! Classic gradient noise over Ken Perlin's permutation table with the seed
//! folded into the lattice hash. Output of [`perlin_3d`] is in [-1, 1].

use glam::Vec3;

// Standard 256-element permutation table from Ken Perlin's reference implementation.
// This table must remain unchanged to keep generated geometry stable across versions.
const PERM: [u32; 256] = [
    151, 160, 137, 91, 90, 15, 131, 13, 201, 95, 96, 53, 194, 233, 7, 225, 140, 36, 103, 30, 69,
    142, 8, 99, 37, 240, 21, 10, 23, 190, 6, 148, 247, 120, 234, 75, 0, 26, 197, 62, 94, 252, 219,
    203, 117, 35, 11, 32, 57, 177, 33, 88, 237, 149, 56, 87, 174, 20, 125, 136, 171, 168, 68, 175,
    74, 165, 71, 134, 139, 48, 27, 166, 77, 146, 158, 231, 83, 111, 229, 122, 60, 211, 133, 230,
    220, 105, 92, 41, 55, 46, 245, 40, 244, 102, 143, 54, 65, 25, 63, 161, 1, 216, 80, 73, 209, 76,
    132, 187, 208, 89, 18, 169, 200, 196, 135, 130, 116, 188, 159, 86, 164, 100, 109, 198, 173,
    186, 3, 64, 52, 217, 226, 250, 124, 123, 5, 202, 38, 147, 118, 126, 255, 82, 85, 212, 207, 206,
    59, 227, 47, 16, 58, 17, 182, 189, 28, 42, 223, 183, 170, 213, 119, 248, 152, 2, 44, 154, 163,
    70, 221, 153, 101, 155, 167, 43, 172, 9, 129, 22, 39, 253, 19, 98, 108, 110, 79, 113, 224, 232,
    178, 185, 112, 104, 218, 246, 97, 228, 251, 34, 242, 193, 238, 210, 144, 12, 191, 179, 162,
    241, 81, 51, 145, 235, 249, 14, 239, 107, 49, 192, 214, 31, 181, 199, 106, 157, 184, 84, 204,
    176, 115, 121, 50, 45, 127, 4, 150, 254, 138, 236, 205, 93, 222, 114, 67, 29, 24, 72, 243, 141,
    128, 195, 78, 66, 215, 61, 156, 180,
];

/// Hash a lattice corner together with the seed
///
/// The seed is scrambled with an LCG step, its bytes are XORed into the
/// three coordinates, and the result goes through three table lookups.
#[inline]
pub(crate) fn hash(x: i32, y: i32, z: i32, seed: u32) -> u32 {
    let seed_hash = (seed.wrapping_mul(1103515245).wrapping_add(12345)) >> 16;
    let ix = ((x as u32) ^ seed_hash) & 255;
    let iy = ((y as u32) ^ (seed_hash >> 8)) & 255;
    let iz = ((z as u32) ^ (seed_hash >> 16)) & 255;
    let a = PERM[ix as usize];
    let b = PERM[((a + iy) & 255) as usize];
    PERM[((b + iz) & 255) as usize]
}

/// Dot product of (x, y, z) with one of the 12 cube edge gradients
#[inline]
fn gradient(hash_value: u32, x: f32, y: f32, z: f32) -> f32 {
    let h = hash_value & 15;

    let u = if h < 8 { x } else { y };
    let v = if h < 4 {
        y
    } else if h == 12 || h == 14 {
        z
    } else {
        x
    };

    let sign_u = if (h & 1) == 0 { -u } else { u };
    let sign_v = if (h & 2) == 0 { -v } else { v };

    sign_u + sign_v
}

/// Quintic fade curve 6t⁵ - 15t⁴ + 10t³
#[inline]
fn fade(t: f32) -> f32 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + t * (b - a)
}

/// Sample raw 3D Perlin noise
///
/// # Returns
/// Value in range [-1, 1]
pub fn perlin_3d(pos: Vec3, seed: u32) -> f32 {
    let x0 = pos.x.floor() as i32;
    let y0 = pos.y.floor() as i32;
    let z0 = pos.z.floor() as i32;
    let x1 = x0 + 1;
    let y1 = y0 + 1;
    let z1 = z0 + 1;

    let xf = pos.x - pos.x.floor();
    let yf = pos.y - pos.y.floor();
    let zf = pos.z - pos.z.floor();

    let u = fade(xf);
    let v = fade(yf);
    let w = fade(zf);

    let aaa = hash(x0, y0, z0, seed);
    let aba = hash(x0, y1, z0, seed);
    let aab = hash(x0, y0, z1, seed);
    let abb = hash(x0, y1, z1, seed);
    let baa = hash(x1, y0, z0, seed);
    let bba = hash(x1, y1, z0, seed);
    let bab = hash(x1, y0, z1, seed);
    let bbb = hash(x1, y1, z1, seed);

    let g_aaa = gradient(aaa, xf, yf, zf);
    let g_baa = gradient(baa, xf - 1.0, yf, zf);
    let g_aba = gradient(aba, xf, yf - 1.0, zf);
    let g_bba = gradient(bba, xf - 1.0, yf - 1.0, zf);
    let g_aab = gradient(aab, xf, yf, zf - 1.0);
    let g_bab = gradient(bab, xf - 1.0, yf, zf - 1.0);
    let g_abb = gradient(abb, xf, yf - 1.0, zf - 1.0);
    let g_bbb = gradient(bbb, xf - 1.0, yf - 1.0, zf - 1.0);

    let x00 = lerp(g_aaa, g_baa, u);
    let x10 = lerp(g_aba, g_bba, u);
    let x01 = lerp(g_aab, g_bab, u);
    let x11 = lerp(g_abb, g_bbb, u);
    let y0_val = lerp(x00, x10, v);
    let y1_val = lerp(x01, x11, v);

    // Edge gradients can reach slightly past 1 at some points
    lerp(y0_val, y1_val, w).clamp(-1.0, 1.0)
}

/// Sample fractal Brownian motion built from [`perlin_3d`]
///
/// # Returns
/// Value in range [-1, 1], normalized by total amplitude
pub fn perlin_fbm(
    position: Vec3,
    seed: u32,
    octaves: usize,
    persistence: f32,
    lacunarity: f32,
) -> f32 {
    let mut total = 0.0;
    let mut amplitude = 1.0;
    let mut frequency = 1.0;
    let mut max_value = 0.0;

    for _ in 0..octaves {
        total += perlin_3d(position * frequency, seed) * amplitude;
        max_value += amplitude;
        amplitude *= persistence;
        frequency *= lacunarity;
    }

    if max_value > 0.0 {
        total / max_value
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determinism() {
        let pos = Vec3::new(1.5, 2.3, 0.7);
        let v1 = perlin_3d(pos, 42);
        let v2 = perlin_3d(pos, 42);
        assert_eq!(v1.to_bits(), v2.to_bits());
    }

    #[test]
    fn test_range() {
        for i in 0..200 {
            let t = i as f32 * 0.173;
            let pos = Vec3::new(t.sin() * 3.0, t * 0.5, t.cos() * 2.0);
            let value = perlin_3d(pos, 12345);
            assert!((-1.0..=1.0).contains(&value), "value {} out of range", value);
        }
    }

    #[test]
    fn test_zero_at_lattice_points() {
        // Gradient noise vanishes on integer lattice corners
        assert_eq!(perlin_3d(Vec3::new(2.0, -3.0, 5.0), 7), 0.0);
    }

    #[test]
    fn test_different_seeds() {
        let pos = Vec3::new(0.5, 0.5, 0.5);
        assert_ne!(perlin_3d(pos, 42), perlin_3d(pos, 999));
    }

    #[test]
    fn test_fbm_range() {
        let value = perlin_fbm(Vec3::new(0.3, 0.9, -1.2), 123, 4, 0.5, 2.0);
        assert!((-1.0..=1.0).contains(&value));
        assert_eq!(perlin_fbm(Vec3::ONE, 1, 0, 0.5, 2.0), 0.0);
    }
}
