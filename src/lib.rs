//! hostjs - run JavaScript against live host values
//!
//! # Overview
//!
//! hostjs embeds a QuickJS heap and bridges values in both directions:
//!
//! - Script values returned to the host are copied into [`HostValue`]s,
//!   preserving shared sub-objects and cycles.
//! - Host callables bound into the heap become script functions; every other
//!   host object is exposed behind a proxy that forwards property access,
//!   enumeration and (optionally) mutation to the host.
//! - Each wrapper holds exactly one host reference, released when the
//!   script heap collects the wrapper.
//!
//! # Quick Start
//!
//! ```
//! use hostjs::{Context, HostError, HostValue};
//!
//! let context = Context::new().unwrap();
//!
//! // Register a callable
//! let add = HostValue::function("add", |args| {
//!     let sum = args.iter().map(|a| a.as_float().unwrap_or(0.0)).sum::<f64>();
//!     Ok(HostValue::Float(sum))
//! });
//! context.bind_callable("add", &add).unwrap();
//!
//! // Expose a host container by reference
//! let limits = HostValue::dict([("max", HostValue::Int(10))]);
//! context.bind_object("limits", &limits).unwrap();
//!
//! let result = context.evaluate("add(limits.max, host.extra)", r#"{"extra": 5}"#).unwrap();
//! assert_eq!(result, HostValue::Float(15.0));
//! ```
//!
//! # One-shot evaluation
//!
//! [`evaljs`] evaluates source in a throwaway context:
//!
//! ```
//! use hostjs::{HostValue, Variables, evaljs, join_fragments};
//!
//! let vars = Variables::new().with("n", &4).unwrap();
//! let source = join_fragments(&["var twice = host.n * 2", "twice + 1"]);
//! let result = evaljs(&source, &vars).unwrap();
//! assert_eq!(result, HostValue::Float(9.0));
//! ```

// Re-export public API from hostjs_core
pub use hostjs_core::api::{
    BridgeStats, Context, ContextOptions, Error, Location, ModuleLoader, ProxyMode, Resolved,
    ReturnPolicy, ScriptError, Variables, evaljs, join_fragments,
};

// Re-export the host object model
pub use hostjs_core::host::{
    self, Capsule, HostDict, HostError, HostKey, HostList, HostObject, HostRef, HostValue,
    NativeFunction,
};

mod error_renderer;
pub use error_renderer::{
    render_error, render_error_to, render_error_to_string, render_error_to_string_no_color,
};
