//! Configuration options for script contexts.

/// How proxies over host objects treat mutating and querying operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProxyMode {
    /// `set`, `has` and `deleteProperty` are observed and logged, report
    /// failure, and leave the host object untouched.
    #[default]
    ReportOnly,

    /// `set`, `has` and `deleteProperty` are forwarded to the host object.
    ReadWrite,
}

/// What a bound host callable hands back to its script caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReturnPolicy {
    /// The host return value is converted and returned to script.
    #[default]
    Forward,

    /// The host return value is dropped; script sees `undefined`.
    /// Suited to callables bound purely for their side effect.
    Discard,
}

/// Configuration options for a [`Context`](super::Context).
///
/// # Example
///
/// ```
/// use hostjs_core::api::{ContextOptions, ProxyMode};
///
/// let options = ContextOptions {
///     memory_limit: Some(64 * 1024 * 1024),
///     proxy_mode: ProxyMode::ReadWrite,
///     ..ContextOptions::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct ContextOptions {
    /// Upper bound on the script heap, in bytes.
    ///
    /// Exceeding it is fatal for the context.
    ///
    /// Default: None (unlimited)
    pub memory_limit: Option<usize>,

    /// Upper bound on the engine's native stack usage, in bytes.
    ///
    /// Default: None (engine default)
    pub max_stack_size: Option<usize>,

    /// Run a garbage collection pass before every evaluation.
    ///
    /// Default: true
    pub gc_before_eval: bool,

    /// Behavior of proxies over host objects.
    ///
    /// Default: [`ProxyMode::ReportOnly`]
    pub proxy_mode: ProxyMode,

    /// Global name the decoded variable bundle is bound to.
    ///
    /// Default: `"host"`
    pub variables_name: String,
}

impl Default for ContextOptions {
    fn default() -> Self {
        Self {
            memory_limit: None,
            max_stack_size: None,
            gc_before_eval: true,
            proxy_mode: ProxyMode::default(),
            variables_name: "host".to_string(),
        }
    }
}
