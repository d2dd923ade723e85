//! Unit tests for proxy key enumeration.

use pretty_assertions::assert_eq;

use super::proxy::{EnumeratedKey, enumerate_keys, own_key_names};
use crate::host::{HostError, HostObject, HostValue};

struct Widget;

impl HostObject for Widget {
    fn type_name(&self) -> &str {
        "Widget"
    }

    fn dir(&self) -> Result<Vec<String>, HostError> {
        Ok(vec![
            "__init__".to_string(),
            "_private".to_string(),
            "size".to_string(),
        ])
    }
}

/// A mapping whose key listing fails, to exercise the fallback order.
struct BrokenMapping;

impl HostObject for BrokenMapping {
    fn type_name(&self) -> &str {
        "BrokenMapping"
    }

    fn mapping_keys(&self) -> Option<Result<Vec<HostValue>, HostError>> {
        Some(Err(HostError::type_error("no keys today")))
    }

    fn sequence_len(&self) -> Option<Result<usize, HostError>> {
        Some(Ok(2))
    }
}

#[test]
fn test_mapping_keys_come_first() {
    let dict = HostValue::dict([("k", HostValue::Int(1))]);
    assert_eq!(enumerate_keys(&dict), vec![EnumeratedKey::Text("k".to_string())]);
}

#[test]
fn test_sequences_enumerate_numeric_indices() {
    let list = HostValue::list([HostValue::None, HostValue::None, HostValue::None]);
    assert_eq!(
        enumerate_keys(&list),
        vec![
            EnumeratedKey::Number(0.0),
            EnumeratedKey::Number(1.0),
            EnumeratedKey::Number(2.0),
        ]
    );
    assert_eq!(enumerate_keys(&HostValue::str("ab")).len(), 2);
}

#[test]
fn test_attribute_names_hide_double_underscore() {
    let widget = HostValue::object(Widget);
    assert_eq!(
        enumerate_keys(&widget),
        vec![
            EnumeratedKey::Text("_private".to_string()),
            EnumeratedKey::Text("size".to_string()),
        ]
    );
}

#[test]
fn test_failed_mapping_falls_back_to_sequence() {
    let broken = HostValue::object(BrokenMapping);
    assert_eq!(
        enumerate_keys(&broken),
        vec![EnumeratedKey::Number(0.0), EnumeratedKey::Number(1.0)]
    );
}

#[test]
fn test_unconvertible_keys_become_placeholders() {
    let dict = HostValue::dict::<&str>([]);
    dict.as_dict()
        .unwrap()
        .borrow_mut()
        .insert(true.into(), HostValue::None);
    assert_eq!(enumerate_keys(&dict), vec![EnumeratedKey::Number(1.0)]);

    let keys = vec![
        EnumeratedKey::Text("a".to_string()),
        EnumeratedKey::Placeholder,
        EnumeratedKey::Number(2.0),
    ];
    assert_eq!(own_key_names(&keys), vec!["a", "2"]);
}

#[test]
fn test_own_key_names_are_distinct() {
    let keys = vec![
        EnumeratedKey::Number(1.0),
        EnumeratedKey::Text("1".to_string()),
        EnumeratedKey::Number(0.5),
        EnumeratedKey::Number(-3.0),
    ];
    assert_eq!(own_key_names(&keys), vec!["1", "0.5", "-3"]);
}
