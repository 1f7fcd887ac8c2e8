//! Core error types, logging, and shared aliases

pub mod error;
pub mod logging;
pub mod types;

pub use error::Error;
pub use types::*;
