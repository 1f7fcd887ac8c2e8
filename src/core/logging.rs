//! Logging initialization for octree build runs

/// Initialize the logging system
///
/// Uses env_logger with a default filter of `info` and millisecond
/// timestamps, so per-level build reports line up against wall-clock
/// timings. Override the filter with the RUST_LOG environment variable.
///
/// # Example
/// ```
/// voxtree::core::logging::init();
/// log::info!("building octree");
/// ```
pub fn init() {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info"),
    )
    .format_timestamp_millis()
    .init();
}
