//! Dense voxel volumes and raw scan file loading

pub mod grid;
pub mod loader;

pub use grid::VoxelGrid;
pub use loader::load_raw;
