//! The variable bundle handed to a script evaluation.

use serde::Serialize;
use serde_json::{Map, Value as Json};

use super::{Context, Error};
use crate::host::HostValue;

/// Named values serialized into the JSON bundle that [`Context::evaluate`]
/// decodes into the script's variable namespace.
///
/// # Example
///
/// ```
/// use hostjs_core::api::{Variables, evaljs};
///
/// let vars = Variables::new().with("n", &20).unwrap();
/// let result = evaljs("host.n + 1", &vars).unwrap();
/// assert_eq!(result.as_float(), Some(21.0));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Variables {
    values: Map<String, Json>,
}

impl Variables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a variable.
    pub fn insert<T: Serialize + ?Sized>(
        &mut self,
        name: impl Into<String>,
        value: &T,
    ) -> Result<&mut Self, Error> {
        let name = name.into();
        let value = serde_json::to_value(value)
            .map_err(|e| Error::Api(format!("variable '{name}' is not serializable: {e}")))?;
        self.values.insert(name, value);
        Ok(self)
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with<T: Serialize + ?Sized>(
        mut self,
        name: impl Into<String>,
        value: &T,
    ) -> Result<Self, Error> {
        self.insert(name, value)?;
        Ok(self)
    }

    pub fn get(&self, name: &str) -> Option<&Json> {
        self.values.get(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The serialized bundle.
    pub fn to_json(&self) -> String {
        Json::Object(self.values.clone()).to_string()
    }
}

/// Join source fragments into one program, in order.
pub fn join_fragments<S: AsRef<str>>(fragments: &[S]) -> String {
    fragments
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(";\n")
}

/// Evaluate `source` in a fresh context and return the result.
///
/// The context is destroyed before returning.
pub fn evaljs(source: &str, variables: &Variables) -> Result<HostValue, Error> {
    let context = Context::new()?;
    context.evaluate_with(source, variables)
}
