//! Dense cubic voxel grid

use glam::UVec3;

use crate::core::error::Error;
use crate::core::types::Result;
use crate::math::morton::MAX_DIM;

/// Dense cubic grid of normalized scalar samples
///
/// Samples are stored in raster order (x varies fastest, then y, then z),
/// matching the layout of headerless .raw scan files. The grid is immutable
/// once constructed; it exists only to seed the finest octree level.
#[derive(Debug, Clone)]
pub struct VoxelGrid {
    /// Edge length in voxels (power of two)
    dim: u32,
    /// dim^3 samples in raster order
    samples: Vec<f32>,
}

impl VoxelGrid {
    /// Create a grid from raster-ordered samples
    ///
    /// `dim` must be a power of two no larger than [`MAX_DIM`]; anything
    /// else cannot be subdivided down to single-voxel leaves.
    pub fn new(dim: u32, samples: Vec<f32>) -> Result<Self> {
        if !dim.is_power_of_two() || dim > MAX_DIM {
            return Err(Error::InvalidDimension { dim });
        }
        assert_eq!(
            samples.len(),
            (dim as usize).pow(3),
            "sample count does not match dimension"
        );
        Ok(Self { dim, samples })
    }

    /// Edge length in voxels
    pub fn dim(&self) -> u32 {
        self.dim
    }

    /// Number of samples in the grid
    pub fn voxel_count(&self) -> usize {
        self.samples.len()
    }

    /// Sample at integer coordinates, each in `0..dim`
    pub fn sample(&self, p: UVec3) -> f32 {
        debug_assert!(p.x < self.dim && p.y < self.dim && p.z < self.dim);
        let dim = self.dim as usize;
        self.samples[p.x as usize + p.y as usize * dim + p.z as usize * dim * dim]
    }

    /// All samples in raster order
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_power_of_two() {
        assert!(matches!(
            VoxelGrid::new(3, vec![0.0; 27]),
            Err(Error::InvalidDimension { dim: 3 })
        ));
    }

    #[test]
    fn test_rejects_oversized_dim() {
        assert!(matches!(
            VoxelGrid::new(2048, Vec::new()),
            Err(Error::InvalidDimension { dim: 2048 })
        ));
    }

    #[test]
    fn test_raster_order_sampling() {
        let samples: Vec<f32> = (0..8).map(|i| i as f32).collect();
        let grid = VoxelGrid::new(2, samples).unwrap();
        assert_eq!(grid.sample(UVec3::new(0, 0, 0)), 0.0);
        assert_eq!(grid.sample(UVec3::new(1, 0, 0)), 1.0);
        assert_eq!(grid.sample(UVec3::new(0, 1, 0)), 2.0);
        assert_eq!(grid.sample(UVec3::new(0, 0, 1)), 4.0);
        assert_eq!(grid.sample(UVec3::new(1, 1, 1)), 7.0);
    }
}
