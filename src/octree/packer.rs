//! Level-major linear buffer packing

use crate::core::error::Error;
use crate::core::types::Result;
use crate::octree::level::{OctreeLevel, level_start, node_count};
use crate::octree::node::OctreeNode;

/// Largest packable buffer length in f32 scalars
///
/// Child offsets are float-encoded, and even integers (offsets are always
/// two scalars per node) survive the f32 round trip exactly only up to
/// 2^25. A larger buffer would hold child pointers the shader cannot read
/// back, whatever the target's own capacity says.
pub const MAX_PACKABLE_ELEMENTS: usize = 1 << 25;

/// The finished, immutable octree buffer
///
/// Levels are concatenated root-first: node 0 is the root, and each node is
/// a (value, child offset) pair of f32 scalars. The shader reads values at
/// even scalar indices and child offsets at odd ones, starting at index 0.
#[derive(Debug, Clone)]
pub struct LinearOctreeBuffer {
    nodes: Vec<OctreeNode>,
    levels: u32,
    dim: u32,
}

impl LinearOctreeBuffer {
    /// Number of levels packed into the buffer
    pub fn levels(&self) -> u32 {
        self.levels
    }

    /// Leaf-level edge length in voxels
    pub fn dim(&self) -> u32 {
        self.dim
    }

    /// Total number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Buffer length in f32 scalars (two per node)
    pub fn len(&self) -> usize {
        self.nodes.len() * 2
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node at a flat node index (root is 0)
    pub fn node(&self, index: usize) -> OctreeNode {
        self.nodes[index]
    }

    /// All nodes, root-first
    pub fn nodes(&self) -> &[OctreeNode] {
        &self.nodes
    }

    /// The buffer as the flat scalar sequence handed to the shader
    pub fn scalars(&self) -> &[f32] {
        bytemuck::cast_slice(&self.nodes)
    }

    /// The buffer as raw bytes for upload
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.nodes)
    }
}

/// Flatten a root-first level stack into one [`LinearOctreeBuffer`]
///
/// Each level lands at its [`level_start`] offset with intra-level Morton
/// order preserved, and every interior node's implicit child reference is
/// rewritten to the absolute scalar index of child octet `8i` in the next
/// level. Leaves receive the sentinel.
///
/// `max_elements` is the capacity reported by the graphics target, further
/// capped at [`MAX_PACKABLE_ELEMENTS`]; a structure that would not fit is a
/// hard [`Error::CapacityExceeded`], never a truncation.
pub fn pack(levels: &[OctreeLevel], max_elements: usize) -> Result<LinearOctreeBuffer> {
    assert!(!levels.is_empty(), "cannot pack an empty level stack");

    let depth_count = levels.len() as u32;
    let total_nodes = node_count(depth_count);
    let required = total_nodes * 2;
    let limit = max_elements.min(MAX_PACKABLE_ELEMENTS);
    if required > limit {
        return Err(Error::CapacityExceeded { required, limit });
    }

    let mut nodes = Vec::with_capacity(total_nodes);
    for (depth, level) in levels.iter().enumerate() {
        debug_assert_eq!(level.level() as usize, depth);
        // Levels are contiguous, so the write cursor must sit exactly at
        // this level's start offset.
        debug_assert_eq!(nodes.len() * 2, level_start(level.level()));

        let is_leaf_level = level.level() + 1 == depth_count;
        if is_leaf_level {
            nodes.extend(level.values().iter().map(|&v| OctreeNode::leaf(v)));
        } else {
            let child_level_start = level_start(level.level() + 1);
            nodes.extend(level.values().iter().enumerate().map(|(i, &v)| {
                let child_offset = child_level_start + 2 * level.first_child_index(i);
                OctreeNode::interior(v, child_offset as u32)
            }));
        }
    }
    debug_assert_eq!(nodes.len(), total_nodes);
    validate_layout(&nodes, depth_count);

    let dim = levels[levels.len() - 1].level_dim();
    log::debug!(
        "packed {} levels into {} nodes ({} scalars)",
        depth_count,
        total_nodes,
        total_nodes * 2
    );

    Ok(LinearOctreeBuffer {
        nodes,
        levels: depth_count,
        dim,
    })
}

/// Check the packed invariants: every interior child offset points at a
/// full octet inside the child level, and every leaf carries the sentinel.
fn validate_layout(nodes: &[OctreeNode], depth_count: u32) {
    let scalar_len = nodes.len() * 2;
    for level in 0..depth_count {
        let start = level_start(level) / 2;
        let end = level_start(level + 1) / 2;
        let is_leaf_level = level + 1 == depth_count;
        for node in &nodes[start..end.min(nodes.len())] {
            if is_leaf_level {
                debug_assert!(node.is_leaf());
            } else if let Some(child) = node.child_index() {
                debug_assert!(child >= level_start(level + 1));
                debug_assert!(child < level_start(level + 2));
                debug_assert!(child + 7 * 2 + 1 < scalar_len);
            } else {
                debug_assert!(false, "interior node carries the leaf sentinel");
            }
        }
    }
}
