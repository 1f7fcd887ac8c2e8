//! Morton encoding (Z-order curve) for spatial indexing
//!
//! Laying voxels out in Morton order makes the eight children of any octree
//! node contiguous: `encode(2x+dx, 2y+dy, 2z+dz) == 8 * encode(x,y,z) +
//! encode(dx,dy,dz)`. Deriving a coarser level from a finer one is then a
//! single linear scan over octets instead of a scattered gather.

use glam::UVec3;

/// Largest cubic edge length addressable per axis (10 bits in a u32 code)
pub const MAX_DIM: u32 = 1024;

/// Spread bits of a 10-bit integer into every third bit of a 32-bit integer
fn spread_bits(x: u32) -> u32 {
    let mut x = x & 0x3ff; // 10 bits max
    x = (x | (x << 16)) & 0x030000ff;
    x = (x | (x << 8)) & 0x0300f00f;
    x = (x | (x << 4)) & 0x030c30c3;
    x = (x | (x << 2)) & 0x09249249;
    x
}

/// Compact every third bit of a 32-bit integer into a 10-bit integer
fn compact_bits(x: u32) -> u32 {
    let mut x = x & 0x09249249;
    x = (x | (x >> 2)) & 0x030c30c3;
    x = (x | (x >> 4)) & 0x0300f00f;
    x = (x | (x >> 8)) & 0x030000ff;
    x = (x | (x >> 16)) & 0x3ff;
    x
}

/// Encode 3D coordinates into a Morton code (Z-order curve)
///
/// Each coordinate can be up to 10 bits (0..1024). For coordinates inside a
/// cube of power-of-two edge length `d`, the codes are a bijection onto
/// `0..d*d*d`.
pub fn morton_encode(p: UVec3) -> u32 {
    spread_bits(p.x) | (spread_bits(p.y) << 1) | (spread_bits(p.z) << 2)
}

/// Decode a Morton code back to 3D coordinates
pub fn morton_decode(code: u32) -> UVec3 {
    UVec3::new(
        compact_bits(code),
        compact_bits(code >> 1),
        compact_bits(code >> 2),
    )
}
