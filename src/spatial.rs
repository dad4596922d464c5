//! Spatial indexing for nearest-body lookups
//!
//! This module is only available with the `spatial-index` feature.

#[cfg(feature = "spatial-index")]
use kiddo::immutable::float::kdtree::ImmutableKdTree;
#[cfg(feature = "spatial-index")]
use kiddo::SquaredEuclidean;
#[cfg(feature = "spatial-index")]
use glam::Vec3;

/// KD-tree over body centers
///
/// Answers "which asteroid is closest to this point" in O(log n), which is
/// what ship spawning, targeting and proximity queries need. Built once per
/// world generation and never mutated.
#[cfg(feature = "spatial-index")]
#[derive(Clone)]
pub struct SpatialIndex {
    tree: ImmutableKdTree<f32, usize, 3, 32>,
    len: usize,
}

#[cfg(feature = "spatial-index")]
impl SpatialIndex {
    /// Build the index from body centers
    ///
    /// Returns `None` for an empty world; a tree with no points has no
    /// nearest neighbor to report.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_asteroid_field::*;
    ///
    /// # #[cfg(feature = "spatial-index")]
    /// # {
    /// let centers = vec![
    ///     Vec3::new(20.0, 0.0, 0.0),
    ///     Vec3::new(0.0, 20.0, 0.0),
    ///     Vec3::new(0.0, 0.0, 20.0),
    /// ];
    ///
    /// let index = SpatialIndex::new(&centers).unwrap();
    /// assert_eq!(index.find_nearest(Vec3::new(18.0, 1.0, 0.0)), 0);
    /// # }
    /// ```
    pub fn new(centers: &[Vec3]) -> Option<Self> {
        if centers.is_empty() {
            return None;
        }

        let points: Vec<[f32; 3]> = centers.iter().map(|c| c.to_array()).collect();

        Some(Self {
            tree: ImmutableKdTree::new_from_slice(&points),
            len: points.len(),
        })
    }

    /// Number of indexed centers
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always false; empty indexes are never constructed
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Position (in the slice given to [`SpatialIndex::new`]) of the center
    /// nearest to `position`
    pub fn find_nearest(&self, position: Vec3) -> usize {
        let query = position.to_array();
        let result = self.tree.nearest_one::<SquaredEuclidean>(&query);
        result.item
    }
}
