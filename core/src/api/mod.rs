//! Public API for embedding the script engine.
//!
//! A [`Context`] owns one script heap. Host values are exposed to it with
//! [`Context::bind_callable`] and [`Context::bind_object`], and scripts run
//! with [`Context::evaluate`], whose completion value comes back as a
//! [`HostValue`](crate::host::HostValue).
//!
//! # Example
//!
//! ```
//! use hostjs_core::api::{Context, Variables};
//! use hostjs_core::host::HostValue;
//!
//! let context = Context::new().unwrap();
//! context
//!     .bind_object("config", &HostValue::dict([("retries", HostValue::Int(3))]))
//!     .unwrap();
//!
//! let vars = Variables::new().with("base", &10).unwrap();
//! let result = context.evaluate_with("host.base + config.retries", &vars).unwrap();
//! assert_eq!(result, HostValue::Float(13.0));
//! ```

pub mod context;
pub mod error;
pub mod modules;
pub mod options;
pub mod variables;

pub use crate::bridge::state::BridgeStats;
pub use context::Context;
pub use error::{Error, Location, ScriptError};
pub use modules::{ModuleLoader, Resolved};
pub use options::{ContextOptions, ProxyMode, ReturnPolicy};
pub use variables::{Variables, evaljs, join_fragments};

#[cfg(test)]
mod error_test;
