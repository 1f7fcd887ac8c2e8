//! Raw volume scan file loading

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::core::error::Error;
use crate::core::types::Result;
use crate::math::morton::MAX_DIM;
use crate::volume::grid::VoxelGrid;

/// Read a headerless .raw scan file into a normalized [`VoxelGrid`]
///
/// The file holds `dim^3` samples of `bits/8` bytes each in raster order
/// (x fastest, then y, then z). Samples are normalized by the maximum
/// representable value for the bit depth, so results land in `[0, 1)`.
/// 16-bit samples are little-endian.
///
/// A file shorter than the required byte count is an error; missing samples
/// are never zero-filled, since a silently hollow volume is far harder to
/// diagnose downstream than a failed load.
pub fn load_raw(path: impl AsRef<Path>, bits: u32, dim: u32) -> Result<VoxelGrid> {
    let path = path.as_ref();

    let bytes_per_sample = match bits {
        8 => 1usize,
        16 => 2usize,
        _ => return Err(Error::UnsupportedBitDepth { bits }),
    };
    if !dim.is_power_of_two() || dim > MAX_DIM {
        return Err(Error::InvalidDimension { dim });
    }

    let voxel_count = (dim as usize).pow(3);
    let expected = bytes_per_sample * voxel_count;

    let mut file = File::open(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut raw = vec![0u8; expected];
    let mut filled = 0usize;
    while filled < expected {
        let n = file.read(&mut raw[filled..]).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if n == 0 {
            return Err(Error::TruncatedData {
                path: path.to_path_buf(),
                expected,
                actual: filled,
            });
        }
        filled += n;
    }

    let samples: Vec<f32> = if bytes_per_sample == 1 {
        raw.iter().map(|&b| b as f32 / 256.0).collect()
    } else {
        raw.chunks_exact(2)
            .map(|c| u16::from_le_bytes([c[0], c[1]]) as f32 / 65536.0)
            .collect()
    };

    log::info!(
        "loaded volume {}: {}^3 voxels, {}-bit samples, {} bytes",
        path.display(),
        dim,
        bits,
        expected
    );

    VoxelGrid::new(dim, samples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::UVec3;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str, bytes: &[u8]) -> std::path::PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, bytes).expect("failed to write test file");
        path
    }

    #[test]
    fn test_load_8bit_normalizes_by_256() {
        let dir = TempDir::new().expect("failed to create temp dir");
        let path = write_file(&dir, "cube.raw", &[0, 64, 128, 255, 1, 2, 3, 4]);

        let grid = load_raw(&path, 8, 2).unwrap();
        assert_eq!(grid.sample(UVec3::new(0, 0, 0)), 0.0);
        assert_eq!(grid.sample(UVec3::new(1, 0, 0)), 64.0 / 256.0);
        assert_eq!(grid.sample(UVec3::new(0, 1, 0)), 128.0 / 256.0);
        assert_eq!(grid.sample(UVec3::new(1, 1, 0)), 255.0 / 256.0);
        assert!(grid.samples().iter().all(|&v| (0.0..1.0).contains(&v)));
    }

    #[test]
    fn test_load_16bit_little_endian() {
        let dir = TempDir::new().expect("failed to create temp dir");
        // First sample 0x0100 = 256, second 0xFFFF, rest zero
        let mut bytes = vec![0u8; 16];
        bytes[0] = 0x00;
        bytes[1] = 0x01;
        bytes[2] = 0xFF;
        bytes[3] = 0xFF;
        let path = write_file(&dir, "cube16.raw", &bytes);

        let grid = load_raw(&path, 16, 2).unwrap();
        assert_eq!(grid.sample(UVec3::new(0, 0, 0)), 256.0 / 65536.0);
        assert_eq!(grid.sample(UVec3::new(1, 0, 0)), 65535.0 / 65536.0);
    }

    #[test]
    fn test_truncated_file_is_an_error() {
        let dir = TempDir::new().expect("failed to create temp dir");
        let path = write_file(&dir, "short.raw", &[0u8; 5]);

        match load_raw(&path, 8, 2) {
            Err(Error::TruncatedData { expected, actual, .. }) => {
                assert_eq!(expected, 8);
                assert_eq!(actual, 5);
            }
            other => panic!("expected TruncatedData, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_missing_file_is_an_io_error() {
        let dir = TempDir::new().expect("failed to create temp dir");
        let path = dir.path().join("nope.raw");
        assert!(matches!(load_raw(&path, 8, 2), Err(Error::Io { .. })));
    }

    #[test]
    fn test_rejects_bad_bit_depth() {
        let dir = TempDir::new().expect("failed to create temp dir");
        let path = write_file(&dir, "cube.raw", &[0u8; 8]);
        assert!(matches!(
            load_raw(&path, 12, 2),
            Err(Error::UnsupportedBitDepth { bits: 12 })
        ));
    }

    #[test]
    fn test_rejects_non_power_of_two_dim() {
        let dir = TempDir::new().expect("failed to create temp dir");
        let path = write_file(&dir, "cube.raw", &[0u8; 27]);
        assert!(matches!(
            load_raw(&path, 8, 3),
            Err(Error::InvalidDimension { dim: 3 })
        ));
    }
}
