//! Tests for error rendering and stack location parsing.

use super::{Error, Location, ScriptError};
use crate::host::HostError;

#[test]
fn test_location_from_named_frame() {
    let stack = "    at boom (eval_script:3:11)\n    at <eval> (eval_script:5:1)\n";
    assert_eq!(
        Location::from_stack(stack),
        Some(Location {
            line: 3,
            column: Some(11)
        })
    );
}

#[test]
fn test_location_from_bare_frame() {
    let stack = "    at eval_script:2:4\n";
    assert_eq!(
        Location::from_stack(stack),
        Some(Location {
            line: 2,
            column: Some(4)
        })
    );
}

#[test]
fn test_location_without_column() {
    assert_eq!(
        Location::from_stack("    at <eval> (eval_script:7)"),
        Some(Location {
            line: 7,
            column: None
        })
    );
}

#[test]
fn test_location_skips_native_frames() {
    let stack = "    at map (native)\n    at <eval> (eval_script:1:20)\n";
    assert_eq!(
        Location::from_stack(stack),
        Some(Location {
            line: 1,
            column: Some(20)
        })
    );
    assert_eq!(Location::from_stack("    at map (native)"), None);
    assert_eq!(
        Location::from_stack("    at hostjs$call (eval_script:76:25)\n    at <eval> (eval_script:2:1)\n"),
        Some(Location {
            line: 2,
            column: Some(1)
        })
    );
    assert_eq!(Location::from_stack(""), None);
}

#[test]
fn test_error_display() {
    let error = Error::Script(ScriptError {
        message: "TypeError: not a function".to_string(),
        stack: None,
        location: Some(Location {
            line: 1,
            column: Some(5),
        }),
        host_cause: None,
    });
    assert_eq!(
        error.to_string(),
        "Script error: TypeError: not a function (at line 1, column 5)"
    );
    assert_eq!(
        Error::Api("context is busy".to_string()).to_string(),
        "API error: context is busy"
    );
    assert_eq!(
        Error::Fatal("out of memory".to_string()).to_string(),
        "Fatal error: out of memory"
    );
}

#[test]
fn test_host_error_display() {
    let error = HostError::new("KeyError", "k");
    assert_eq!(error.to_string(), "KeyError: k");
}
