//! Tracing/logging setup shared by every anvil binary.

/// Tracing configuration (filters, layers).
pub mod tracing;

/// Initialize process-wide tracing with the `info` fallback filter.
///
/// Safe to call multiple times; subsequent calls become no-ops.
pub fn init() -> bool {
    tracing::init(tracing::DEFAULT_FILTER)
}

/// Initialize process-wide tracing, using `fallback` when `RUST_LOG` is unset.
pub fn init_with_filter(fallback: &str) -> bool {
    tracing::init(fallback)
}
