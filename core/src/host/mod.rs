//! The host object model exchanged with the script engine.
//!
//! Values cross the bridge as [`HostValue`]s. Immutable primitives (none,
//! booleans, numbers, text, bytes) are plain data; containers and objects are
//! reference counted, so a value handed to script and later handed back is the
//! same host object, and mutations made on either side are visible to the
//! other.
//!
//! Arbitrary host behavior plugs in through the [`HostObject`] trait, which
//! exposes the attribute, mapping, sequence and call protocols the script-side
//! proxy forwards to.
//!
//! # Example
//!
//! ```
//! use hostjs_core::host::{HostError, HostValue};
//!
//! let config = HostValue::dict([("name", HostValue::str("demo"))]);
//! assert_eq!(config.get_attr("name").unwrap(), Some(HostValue::str("demo")));
//!
//! let double = HostValue::function("double", |args| {
//!     let n = args.first().and_then(HostValue::as_float).ok_or_else(|| {
//!         HostError::type_error("double() expects a number")
//!     })?;
//!     Ok(HostValue::Float(n * 2.0))
//! });
//! assert!(double.is_callable());
//! ```

mod display;
mod object;
mod protocol;
mod value;

pub use object::{HostError, HostObject, NativeFn, NativeFunction};
pub use value::{Capsule, HostDict, HostKey, HostList, HostRef, HostValue};

#[cfg(test)]
mod value_test;
