//! Body placement inside the world cube
//!
//! Rejection sampling with a bounded attempt budget. This is the only step
//! that may legitimately produce fewer bodies than requested.

use glam::Vec3;

use crate::config::WorldSettings;
use crate::random::{body_seed, Seed, SeededStream};
use crate::world::BodySpawnRecord;

/// Outcome of one placement run
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    /// Accepted body centers, in acceptance order
    pub positions: Vec<Vec3>,
    /// Number of bodies requested
    pub requested: usize,
    /// Number of candidate points drawn
    pub attempts: usize,
}

impl Placement {
    #[inline]
    pub fn placed(&self) -> usize {
        self.positions.len()
    }

    /// How many requested bodies could not be placed
    #[inline]
    pub fn shortfall(&self) -> usize {
        self.requested.saturating_sub(self.positions.len())
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        self.shortfall() == 0
    }
}

/// Place up to `settings.body_count` body centers
///
/// A candidate is accepted when it is at least `min_separation` from every
/// accepted center and at least `2 * min_separation` from the origin.
/// Stops after `body_count * 10` candidates and reports any shortfall.
/// Counts above [`MAX_BODY_COUNT`](crate::config::MAX_BODY_COUNT) are
/// placed up to the cap and the rest reported as shortfall.
pub fn place_bodies(stream: &mut SeededStream, settings: &WorldSettings) -> Placement {
    let half = settings.placement_half_extent();
    let target = settings.placement_target();
    let max_attempts = settings.max_attempts();
    let min_sep = settings.min_separation;
    let spawn_clearance = 2.0 * min_sep;

    let mut positions: Vec<Vec3> = Vec::with_capacity(target);
    let mut attempts = 0;

    while positions.len() < target && attempts < max_attempts {
        attempts += 1;
        let candidate = Vec3::new(
            stream.range(-half, half),
            stream.range(-half, half),
            stream.range(-half, half),
        );

        if candidate.length() < spawn_clearance {
            continue;
        }
        if positions.iter().any(|p| p.distance(candidate) < min_sep) {
            continue;
        }
        positions.push(candidate);
    }

    let placement = Placement {
        positions,
        requested: settings.body_count,
        attempts,
    };

    if !placement.is_complete() {
        log::warn!(
            "placement shortfall: placed {} of {} bodies after {} attempts",
            placement.placed(),
            placement.requested,
            placement.attempts
        );
    }

    placement
}

/// Derive the spawn records of a world from its seed
///
/// Placement and size multipliers come from one stream seeded with the world
/// seed: all positions first, then one multiplier per placed body in index
/// order. Body seeds are `world_seed + index * 1000`.
pub fn derive_spawn_records(world_seed: Seed, settings: &WorldSettings) -> (Vec<BodySpawnRecord>, Placement) {
    let mut stream = SeededStream::from_seed(world_seed);
    let placement = place_bodies(&mut stream, settings);

    let records = placement
        .positions
        .iter()
        .enumerate()
        .map(|(i, &position)| {
            let index = i as i32;
            BodySpawnRecord {
                index,
                position,
                seed: body_seed(world_seed, index),
                size_multiplier: stream.range(settings.min_size_multiplier, settings.max_size_multiplier),
            }
        })
        .collect();

    (records, placement)
}

/// Wrap a position into the world cube
///
/// A coordinate beyond ±world_size/2 re-enters from the opposite face
/// (teleport, not bounce). The overshoot is reduced modulo the world size
/// rather than snapped to the opposite boundary, so an object that moved
/// several world widths in one step still lands where a torus would put
/// it. Coordinates already inside are returned unchanged, so wrapping is
/// idempotent.
///
/// Infinite coordinates clamp to the face they point at and NaN goes to 0,
/// keeping every output inside the cube.
pub fn wrap_position(position: Vec3, world_size: f32) -> Vec3 {
    if !world_size.is_finite() || world_size <= 0.0 {
        return position;
    }
    let half = world_size * 0.5;
    let wrap = |x: f32| {
        if x.is_nan() {
            0.0
        } else if x.is_infinite() {
            x.clamp(-half, half)
        } else if x > half || x < -half {
            (x + half).rem_euclid(world_size) - half
        } else {
            x
        }
    };
    Vec3::new(wrap(position.x), wrap(position.y), wrap(position.z))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WorldSettingsBuilder;

    fn settings(world_size: f32, count: usize, min_sep: f32) -> WorldSettings {
        WorldSettingsBuilder::new()
            .world_size(world_size)
            .unwrap()
            .body_count(count)
            .min_separation(min_sep)
            .unwrap()
            .build()
            .unwrap()
    }

    #[test]
    fn test_end_to_end_placement() {
        let s = settings(100.0, 4, 8.0);
        let (records, placement) = derive_spawn_records(42, &s);

        assert_eq!(placement.placed(), 4);
        assert!(placement.is_complete());
        let seeds: Vec<Seed> = records.iter().map(|r| r.seed).collect();
        assert_eq!(seeds, vec![42, 1042, 2042, 3042]);

        for (i, a) in records.iter().enumerate() {
            assert_eq!(a.index, i as i32);
            assert!(a.position.length() >= 16.0);
            for b in &records[i + 1..] {
                assert!(a.position.distance(b.position) >= 8.0);
            }
        }
    }

    #[test]
    fn test_separation_invariant() {
        for seed in 0..10 {
            let s = settings(200.0, 30, 10.0);
            let mut stream = SeededStream::from_seed(seed);
            let placement = place_bodies(&mut stream, &s);
            let half = s.placement_half_extent();
            for (i, a) in placement.positions.iter().enumerate() {
                assert!(a.length() >= 2.0 * s.min_separation);
                assert!(a.abs().max_element() <= half);
                for b in &placement.positions[i + 1..] {
                    assert!(a.distance(*b) >= s.min_separation);
                }
            }
        }
    }

    #[test]
    fn test_shortfall_terminates() {
        let s = settings(20.0, 50, 8.0);
        let (records, placement) = derive_spawn_records(1, &s);
        assert!(placement.placed() < 50);
        assert_eq!(records.len(), placement.placed());
        assert_eq!(placement.attempts, 500);
        assert_eq!(placement.shortfall(), 50 - placement.placed());
    }

    #[test]
    fn test_oversized_count_reports_shortfall() {
        let s = WorldSettings {
            body_count: usize::MAX / 8,
            ..WorldSettings::default()
        };
        let (records, placement) = derive_spawn_records(1, &s);
        assert_eq!(records.len(), placement.placed());
        assert!(placement.placed() <= crate::config::MAX_BODY_COUNT);
        assert!(placement.attempts <= s.max_attempts());
        assert_eq!(placement.shortfall(), usize::MAX / 8 - placement.placed());
    }

    #[test]
    fn test_zero_bodies() {
        let s = settings(100.0, 0, 8.0);
        let (records, placement) = derive_spawn_records(5, &s);
        assert!(records.is_empty());
        assert_eq!(placement.attempts, 0);
        assert!(placement.is_complete());
    }

    #[test]
    fn test_placement_is_deterministic() {
        let s = settings(150.0, 12, 8.0);
        let (a, _) = derive_spawn_records(77, &s);
        let (b, _) = derive_spawn_records(77, &s);
        assert_eq!(a, b);
        let (c, _) = derive_spawn_records(78, &s);
        assert_ne!(a, c);
    }

    #[test]
    fn test_size_multipliers_in_range() {
        let s = settings(150.0, 12, 8.0);
        let (records, _) = derive_spawn_records(3, &s);
        for r in records {
            assert!(r.size_multiplier >= s.min_size_multiplier);
            assert!(r.size_multiplier < s.max_size_multiplier);
        }
    }

    #[test]
    fn test_wrap_position() {
        let size = 100.0;
        assert_eq!(wrap_position(Vec3::new(10.0, -20.0, 50.0), size), Vec3::new(10.0, -20.0, 50.0));
        let wrapped = wrap_position(Vec3::new(51.0, -51.0, 0.0), size);
        assert!((wrapped.x + 49.0).abs() < 1e-4);
        assert!((wrapped.y - 49.0).abs() < 1e-4);
        assert_eq!(wrapped.z, 0.0);
    }

    #[test]
    fn test_wrap_idempotent_and_bounded() {
        let size = 37.5;
        let half = size / 2.0;
        let mut stream = SeededStream::from_seed(9);
        for _ in 0..1000 {
            let p = Vec3::new(
                stream.range(-500.0, 500.0),
                stream.range(-500.0, 500.0),
                stream.range(-500.0, 500.0),
            );
            let once = wrap_position(p, size);
            let twice = wrap_position(once, size);
            assert_eq!(once, twice);
            assert!(once.abs().max_element() <= half);
        }
    }

    #[test]
    fn test_wrap_non_finite_coordinates() {
        let size = 100.0;
        let wrapped = wrap_position(Vec3::new(f32::INFINITY, f32::NEG_INFINITY, f32::NAN), size);
        assert_eq!(wrapped, Vec3::new(50.0, -50.0, 0.0));
        assert_eq!(wrap_position(wrapped, size), wrapped);

        let huge = wrap_position(Vec3::new(f32::MAX, -f32::MAX, 3.0), size);
        assert!(huge.is_finite());
        assert!(huge.abs().max_element() <= 50.0);
    }

    #[test]
    fn test_wrap_degenerate_world() {
        let p = Vec3::new(1e6, -3.0, 2.0);
        assert_eq!(wrap_position(p, 0.0), p);
    }
}
