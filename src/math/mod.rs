//! Mathematical utilities for spatial indexing

pub mod morton;

pub use morton::{morton_decode, morton_encode};
