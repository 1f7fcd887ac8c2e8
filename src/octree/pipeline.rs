//! End-to-end construction pipeline
//!
//! Load a raw scan, reorder it into Morton order, aggregate upward, pack
//! the levels into one flat buffer, and hand it to the graphics target.

use std::path::Path;

use crate::core::error::Error;
use crate::core::types::Result;
use crate::gpu::GpuTarget;
use crate::math::morton::MAX_DIM;
use crate::octree::builder::{Aggregate, OctreeBuilder};
use crate::octree::level::{level_count, node_count};
use crate::octree::packer::{LinearOctreeBuffer, MAX_PACKABLE_ELEMENTS, pack};
use crate::volume::loader::load_raw;

/// Build the octree buffer from a raw scan file with mean aggregation
///
/// All parameters are caller-supplied: source path, bits per sample (8 or
/// 16), and cubic edge length.
pub fn build_from_file(
    path: impl AsRef<Path>,
    bits: u32,
    dim: u32,
    target: &mut dyn GpuTarget,
) -> Result<LinearOctreeBuffer> {
    build_from_file_with(path, bits, dim, Aggregate::Mean, target)
}

/// Build the octree buffer with an explicit aggregation strategy
///
/// The target's capacity is checked up front, before the file is touched:
/// the finished size depends only on `dim`, and an oversized structure
/// fails the build whether or not the data loads.
pub fn build_from_file_with(
    path: impl AsRef<Path>,
    bits: u32,
    dim: u32,
    aggregate: Aggregate,
    target: &mut dyn GpuTarget,
) -> Result<LinearOctreeBuffer> {
    let path = path.as_ref();

    if !dim.is_power_of_two() || dim > MAX_DIM {
        return Err(Error::InvalidDimension { dim });
    }

    let limit = target.max_buffer_elements().min(MAX_PACKABLE_ELEMENTS);
    let required = node_count(level_count(dim)) * 2;
    if required > limit {
        return Err(Error::CapacityExceeded { required, limit });
    }

    let grid = load_raw(path, bits, dim)?;
    let levels = OctreeBuilder::with_aggregate(aggregate).build(&grid);
    let buffer = pack(&levels, limit)?;

    log::info!(
        "built octree from {}: {} voxels in base level, {} levels, {} nodes, {} scalars",
        path.display(),
        (dim as u64).pow(3),
        buffer.levels(),
        buffer.node_count(),
        buffer.len()
    );

    target.upload(&buffer)?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpu::FixedCapacity;
    use crate::octree::node::LEAF_SENTINEL;
    use tempfile::TempDir;

    /// Records uploads so tests can observe what the graphics layer saw
    struct CaptureTarget {
        max_elements: usize,
        uploads: Vec<Vec<f32>>,
    }

    impl CaptureTarget {
        fn new(max_elements: usize) -> Self {
            Self {
                max_elements,
                uploads: Vec::new(),
            }
        }
    }

    impl GpuTarget for CaptureTarget {
        fn max_buffer_elements(&self) -> usize {
            self.max_elements
        }

        fn upload(&mut self, buffer: &LinearOctreeBuffer) -> Result<()> {
            self.uploads.push(buffer.scalars().to_vec());
            Ok(())
        }
    }

    #[test]
    fn test_end_to_end_uniform_volume() {
        let dir = TempDir::new().expect("failed to create temp dir");
        let path = dir.path().join("uniform.raw");
        std::fs::write(&path, vec![128u8; 512]).unwrap();

        let mut target = CaptureTarget::new(1 << 20);
        let buffer = build_from_file(&path, 8, 8, &mut target).unwrap();

        // (8^4 - 1) / 7 = 585 nodes
        assert_eq!(buffer.levels(), 4);
        assert_eq!(buffer.node_count(), 585);
        assert_eq!(buffer.len(), 1170);

        // A constant volume aggregates to the same constant everywhere
        for node in buffer.nodes() {
            assert_eq!(node.value, 0.5);
        }
        let leaf_start = crate::octree::level::level_start(3) / 2;
        for i in leaf_start..buffer.node_count() {
            assert_eq!(buffer.node(i).child_offset, LEAF_SENTINEL);
        }

        assert_eq!(target.uploads.len(), 1);
        assert_eq!(target.uploads[0].len(), 1170);
    }

    #[test]
    fn test_truncated_input_uploads_nothing() {
        let dir = TempDir::new().expect("failed to create temp dir");
        let path = dir.path().join("short.raw");
        std::fs::write(&path, vec![0u8; 100]).unwrap();

        let mut target = CaptureTarget::new(1 << 20);
        let result = build_from_file(&path, 8, 8, &mut target);

        assert!(matches!(result, Err(Error::TruncatedData { .. })));
        assert!(target.uploads.is_empty());
    }

    #[test]
    fn test_capacity_checked_before_io() {
        // The file does not exist; the capacity failure must come first
        let mut target = FixedCapacity::new(16);
        let result = build_from_file("does-not-exist.raw", 8, 8, &mut target);

        match result {
            Err(Error::CapacityExceeded { required, limit }) => {
                assert_eq!(required, 1170);
                assert_eq!(limit, 16);
            }
            other => panic!("expected CapacityExceeded, got {:?}", other.map(|_| ())),
        }
        assert_eq!(target.last_upload_len(), None);
    }

    #[test]
    fn test_rejects_bad_dimension_before_io() {
        let mut target = FixedCapacity::new(1 << 20);
        assert!(matches!(
            build_from_file("does-not-exist.raw", 8, 24, &mut target),
            Err(Error::InvalidDimension { dim: 24 })
        ));
        assert_eq!(target.last_upload_len(), None);
    }
}
