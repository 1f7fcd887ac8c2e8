//! Graphics-layer collaborator seam
//!
//! The construction pipeline never reaches into global render state; the
//! capacity limit and the upload destination are passed in at call time.
//! The real renderer implements [`GpuTarget`] over its device; offline
//! tools and tests use value-backed implementations.

use crate::core::types::Result;
use crate::octree::packer::LinearOctreeBuffer;

/// The graphics layer as the construction pipeline sees it
pub trait GpuTarget {
    /// Maximum number of f32 elements the target accepts in one buffer
    ///
    /// Queried before a build is finalized; a structure that would not fit
    /// fails the whole build.
    fn max_buffer_elements(&self) -> usize;

    /// Receive the finished buffer
    ///
    /// Called at most once per build, and only with a complete, validated
    /// buffer; a failed build uploads nothing.
    fn upload(&mut self, buffer: &LinearOctreeBuffer) -> Result<()>;
}

/// Value-backed target with a fixed capacity
///
/// Keeps only the length of the last uploaded buffer, enough for sizing
/// checks in offline tools and for tests asserting that a failed build
/// uploaded nothing.
#[derive(Debug, Clone)]
pub struct FixedCapacity {
    max_elements: usize,
    last_upload_len: Option<usize>,
}

impl FixedCapacity {
    pub fn new(max_elements: usize) -> Self {
        Self {
            max_elements,
            last_upload_len: None,
        }
    }

    /// Scalar length of the most recent upload, if any happened
    pub fn last_upload_len(&self) -> Option<usize> {
        self.last_upload_len
    }
}

impl GpuTarget for FixedCapacity {
    fn max_buffer_elements(&self) -> usize {
        self.max_elements
    }

    fn upload(&mut self, buffer: &LinearOctreeBuffer) -> Result<()> {
        self.last_upload_len = Some(buffer.len());
        Ok(())
    }
}
