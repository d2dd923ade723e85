//! Public error types for the context API.
//!
//! Engine errors are converted to these types at the API boundary; nothing in
//! them borrows from the script heap, so they outlive the context.

use core::fmt;

use rquickjs::CaughtError;
use rquickjs::convert::Coerced;

use crate::bridge::glue::FRAME_PREFIX;
use crate::host::HostError;

/// Public error type for all context operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// Invalid API usage: destroyed or busy context, non-callable bound as a
    /// callable, absent object, malformed variable bundle.
    #[error("API error: {0}")]
    Api(String),

    /// The script failed to compile or threw during evaluation. The context
    /// remains usable.
    #[error("Script error: {0}")]
    Script(ScriptError),

    /// The engine ran out of memory. The context has been destroyed.
    #[error("Fatal error: {0}")]
    Fatal(String),
}

/// A syntax or runtime failure reported by the script engine.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptError {
    /// The exception rendered as `Name: message`.
    pub message: String,

    /// The engine's stack trace, when the thrown value carried one.
    pub stack: Option<String>,

    /// Position of the innermost frame in the evaluated source.
    pub location: Option<Location>,

    /// The host callable failure that caused the exception, if any.
    pub host_cause: Option<HostError>,
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(location) = &self.location {
            write!(f, " (at {location})")?;
        }
        Ok(())
    }
}

/// 1-based position in evaluated source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub line: usize,
    pub column: Option<usize>,
}

impl Location {
    /// Extract the innermost source position from an engine stack trace.
    ///
    /// Frames look like `at fn (file:line:col)` or `at file:line:col`. Frames
    /// without a line number (native functions) and frames of the bridge's
    /// own script functions are skipped.
    pub fn from_stack(stack: &str) -> Option<Self> {
        stack.lines().find_map(|line| {
            let frame = line.trim().strip_prefix("at ")?;
            if frame.starts_with(FRAME_PREFIX) {
                return None;
            }
            let position = match (frame.rfind('('), frame.ends_with(')')) {
                (Some(open), true) => &frame[open + 1..frame.len() - 1],
                _ => frame,
            };
            let mut parts = position.rsplit(':');
            let last = parts.next()?.parse::<usize>().ok()?;
            match parts.next().and_then(|p| p.parse::<usize>().ok()) {
                Some(line) => Some(Location {
                    line,
                    column: Some(last),
                }),
                None => Some(Location {
                    line: last,
                    column: None,
                }),
            }
        })
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.column {
            Some(column) => write!(f, "line {}, column {}", self.line, column),
            None => write!(f, "line {}", self.line),
        }
    }
}

const OUT_OF_MEMORY: &str = "out of memory";

impl Error {
    /// Convert an exception caught from the engine.
    pub(crate) fn from_caught(caught: CaughtError<'_>, host_cause: Option<HostError>) -> Self {
        let (message, stack) = match caught {
            CaughtError::Error(rquickjs::Error::Allocation) => {
                return Error::Fatal(OUT_OF_MEMORY.to_string());
            }
            CaughtError::Error(error) => (error.to_string(), None),
            CaughtError::Exception(exception) => {
                let text = exception.message().unwrap_or_default();
                if text == OUT_OF_MEMORY {
                    return Error::Fatal(text);
                }
                let name = exception
                    .as_object()
                    .get::<_, Option<String>>("name")
                    .ok()
                    .flatten()
                    .unwrap_or_else(|| "Error".to_string());
                let message = if text.is_empty() { name } else { format!("{name}: {text}") };
                (message, exception.stack())
            }
            CaughtError::Value(value) => {
                let text = value
                    .get::<Coerced<String>>()
                    .map(|coerced| coerced.0)
                    .unwrap_or_else(|_| format!("{value:?}"));
                (format!("Uncaught {text}"), None)
            }
        };
        let location = stack.as_deref().and_then(Location::from_stack);
        Error::Script(ScriptError {
            message,
            stack,
            location,
            host_cause,
        })
    }
}
