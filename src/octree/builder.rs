//! Bottom-up octree level construction from dense voxel data

use rayon::prelude::*;

use crate::math::morton::morton_decode;
use crate::octree::level::OctreeLevel;
use crate::volume::grid::VoxelGrid;

/// How a parent node combines its eight children into one value
///
/// `Mean` reproduces the density a ray-marcher would see through the whole
/// octet; `Max` is an upper bound, the right choice when the traversal uses
/// coarse levels for empty-space skipping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Aggregate {
    /// Unweighted arithmetic mean of the eight children
    #[default]
    Mean,
    /// Maximum of the eight children
    Max,
}

impl Aggregate {
    /// Combine one octet of child values
    ///
    /// Accumulates in f64 and narrows on write so rounding error does not
    /// compound across levels.
    fn reduce(self, octet: &[f32]) -> f32 {
        debug_assert_eq!(octet.len(), 8);
        match self {
            Aggregate::Mean => {
                let sum: f64 = octet.iter().map(|&v| v as f64).sum();
                (sum / 8.0) as f32
            }
            Aggregate::Max => octet.iter().copied().fold(f32::NEG_INFINITY, f32::max),
        }
    }
}

/// Builder deriving the full level stack from a [`VoxelGrid`]
///
/// The leaf level is the grid reordered into Morton order; every coarser
/// level aggregates child octets of the one below. `VoxelGrid` enforces
/// the power-of-two dimension, so construction itself cannot fail.
pub struct OctreeBuilder {
    aggregate: Aggregate,
}

impl OctreeBuilder {
    /// Create a builder with the default mean aggregation
    pub fn new() -> Self {
        Self::with_aggregate(Aggregate::default())
    }

    /// Create a builder with an explicit aggregation strategy
    pub fn with_aggregate(aggregate: Aggregate) -> Self {
        Self { aggregate }
    }

    /// Build all levels, returned root-first
    ///
    /// Nodes within a level are independent, so each level is computed in
    /// parallel; the loop over levels is the barrier between a level and
    /// its children.
    pub fn build(&self, grid: &VoxelGrid) -> Vec<OctreeLevel> {
        let max_level = grid.dim().trailing_zeros();
        let mut levels = Vec::with_capacity(max_level as usize + 1);

        // Leaf level: gather the raster-ordered grid into Morton order.
        // Values are untouched, only reordered.
        let mut values: Vec<f32> = (0..grid.voxel_count() as u32)
            .into_par_iter()
            .map(|m| grid.sample(morton_decode(m)))
            .collect();
        log::debug!(
            "placed leaf level: {} nodes at level {}",
            values.len(),
            max_level
        );

        let mut level = max_level;
        while values.len() > 1 {
            let parents = self.reduce_level(&values);
            levels.push(OctreeLevel::new(level, values));
            values = parents;
            level -= 1;
            log::debug!("derived level {}: {} nodes", level, values.len());
        }
        levels.push(OctreeLevel::new(level, values));

        levels.reverse();
        levels
    }

    /// Derive one parent level from its fully-materialized child level
    fn reduce_level(&self, children: &[f32]) -> Vec<f32> {
        debug_assert_eq!(children.len() % 8, 0);
        let aggregate = self.aggregate;
        (0..children.len() / 8)
            .into_par_iter()
            .map(|i| aggregate.reduce(&children[8 * i..8 * i + 8]))
            .collect()
    }
}

impl Default for OctreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}
