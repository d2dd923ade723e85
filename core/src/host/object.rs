//! The protocol surface of arbitrary host objects.

use core::fmt;

use super::value::HostValue;

/// A failure raised on the host side of the bridge.
///
/// `kind` names the failure category (`TypeError`, `KeyError`, ...) and is
/// carried into the script exception message alongside `message`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct HostError {
    pub kind: String,
    pub message: String,
}

impl HostError {
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
        }
    }

    pub fn type_error(message: impl Into<String>) -> Self {
        Self::new("TypeError", message)
    }

    pub fn value_error(message: impl Into<String>) -> Self {
        Self::new("ValueError", message)
    }

    pub fn key_error(key: &str) -> Self {
        Self::new("KeyError", key)
    }

    pub fn index_error(message: impl Into<String>) -> Self {
        Self::new("IndexError", message)
    }

    pub fn attribute_error(type_name: &str, name: &str) -> Self {
        Self::new(
            "AttributeError",
            format!("'{type_name}' object has no attribute '{name}'"),
        )
    }

    pub fn not_callable(type_name: &str) -> Self {
        Self::type_error(format!("'{type_name}' object is not callable"))
    }
}

/// Behavior of an arbitrary host object as seen from script.
///
/// Every method has a conservative default, so an implementor only overrides
/// the protocols its object supports. The bridge picks the enumeration
/// protocol in priority order: [`mapping_keys`](Self::mapping_keys), then
/// [`sequence_len`](Self::sequence_len), then [`dir`](Self::dir).
pub trait HostObject {
    /// Runtime type name, used in diagnostics and display.
    fn type_name(&self) -> &str;

    /// Look up an attribute. `Ok(None)` means the attribute does not exist.
    fn get_attr(&self, _name: &str) -> Result<Option<HostValue>, HostError> {
        Ok(None)
    }

    fn set_attr(&self, name: &str, _value: HostValue) -> Result<(), HostError> {
        Err(HostError::attribute_error(self.type_name(), name))
    }

    fn del_attr(&self, name: &str) -> Result<(), HostError> {
        Err(HostError::attribute_error(self.type_name(), name))
    }

    fn has_attr(&self, name: &str) -> Result<bool, HostError> {
        Ok(self.get_attr(name)?.is_some())
    }

    /// Names of the object's attributes, including internal ones.
    fn dir(&self) -> Result<Vec<String>, HostError> {
        Ok(Vec::new())
    }

    /// Keys of a mapping object, or `None` if the object is not a mapping.
    fn mapping_keys(&self) -> Option<Result<Vec<HostValue>, HostError>> {
        None
    }

    /// Length of a sequence object, or `None` if the object is not a sequence.
    fn sequence_len(&self) -> Option<Result<usize, HostError>> {
        None
    }

    fn is_callable(&self) -> bool {
        false
    }

    /// Invoke the object with positional arguments.
    fn call(&self, _args: &[HostValue]) -> Result<HostValue, HostError> {
        Err(HostError::not_callable(self.type_name()))
    }
}

/// Signature of a Rust closure callable from script.
pub type NativeFn = dyn Fn(&[HostValue]) -> Result<HostValue, HostError>;

/// Wrapper that exposes a Rust closure as a callable host object.
pub struct NativeFunction {
    name: String,
    func: Box<NativeFn>,
}

impl NativeFunction {
    pub fn new(
        name: impl Into<String>,
        func: impl Fn(&[HostValue]) -> Result<HostValue, HostError> + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            func: Box::new(func),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeFunction")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl HostObject for NativeFunction {
    fn type_name(&self) -> &str {
        "builtin_function"
    }

    fn get_attr(&self, name: &str) -> Result<Option<HostValue>, HostError> {
        match name {
            "name" => Ok(Some(HostValue::str(self.name.as_str()))),
            _ => Ok(None),
        }
    }

    fn dir(&self) -> Result<Vec<String>, HostError> {
        Ok(vec!["__call__".to_string(), "name".to_string()])
    }

    fn is_callable(&self) -> bool {
        true
    }

    fn call(&self, args: &[HostValue]) -> Result<HostValue, HostError> {
        (self.func)(args)
    }
}
