//! Bidirectional value bridge between a host object model and an embedded
//! QuickJS heap.
//!
//! - [`host`]: the host object model ([`HostValue`](host::HostValue),
//!   [`HostObject`](host::HostObject)).
//! - [`api`]: contexts, evaluation, bindings, variable bundles and `require`.

pub mod api;
mod bridge;
pub mod host;

/// Test utilities for enabling logging in tests
#[cfg(test)]
pub mod test_utils {
    /// Initialize tracing subscriber for tests with DEBUG level
    /// Call this at the start of tests where you want to see logging output
    ///
    /// # Example
    /// ```ignore
    /// #[test]
    /// fn test_proxy_enumeration() {
    ///     test_utils::init_test_logging();
    ///     // ... your test code
    /// }
    /// ```
    pub fn init_test_logging() {
        use tracing_subscriber::{EnvFilter, fmt};

        // Try to initialize, ignore error if already initialized
        let _ = fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
            )
            .with_test_writer()
            .try_init();
    }
}
