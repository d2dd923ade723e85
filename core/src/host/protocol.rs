//! Protocol dispatch over every kind of host value.
//!
//! Built-in containers answer the same attribute, mapping and sequence
//! protocols as [`HostObject`](super::HostObject) implementors, so the bridge
//! never has to special-case them:
//!
//! - dicts expose their items as attributes (text key first, then integer key
//!   when the name parses as one, then boolean key for `"1"` and `"0"`);
//! - lists, text and bytes expose `length` and positional indices;
//! - other primitives expose nothing.

use super::object::HostError;
use super::value::{HostDict, HostKey, HostValue};

const LENGTH: &str = "length";

/// Parse a canonical non-negative index (`"0"`, `"17"`, never `"01"` or `"+1"`).
fn parse_index(name: &str) -> Option<usize> {
    let canonical = !name.is_empty()
        && name.bytes().all(|b| b.is_ascii_digit())
        && (name == "0" || !name.starts_with('0'));
    if canonical { name.parse().ok() } else { None }
}

/// Find the key an attribute name refers to in a dict.
fn lookup_key(dict: &HostDict, name: &str) -> Option<HostKey> {
    let map = dict.borrow();
    let text = HostKey::from(name);
    if map.contains_key(&text) {
        return Some(text);
    }
    let n: i64 = name.parse().ok()?;
    let int = HostKey::Int(n);
    if map.contains_key(&int) {
        return Some(int);
    }
    // Boolean keys enumerate as 1 and 0.
    let flag = match n {
        1 => HostKey::Bool(true),
        0 => HostKey::Bool(false),
        _ => return None,
    };
    map.contains_key(&flag).then_some(flag)
}

fn to_int(n: usize) -> HostValue {
    HostValue::Int(i64::try_from(n).unwrap_or(i64::MAX))
}

impl HostValue {
    /// Look up an attribute. `Ok(None)` means it does not exist.
    pub fn get_attr(&self, name: &str) -> Result<Option<HostValue>, HostError> {
        match self {
            HostValue::Object(object) => object.get_attr(name),
            HostValue::Dict(dict) => Ok(lookup_key(dict, name)
                .and_then(|key| dict.borrow().get(&key).cloned())),
            HostValue::List(list) => {
                let items = list.borrow();
                if name == LENGTH {
                    return Ok(Some(to_int(items.len())));
                }
                Ok(parse_index(name).and_then(|i| items.get(i).cloned()))
            }
            HostValue::Str(text) => {
                if name == LENGTH {
                    return Ok(Some(to_int(text.chars().count())));
                }
                Ok(parse_index(name)
                    .and_then(|i| text.chars().nth(i))
                    .map(|c| HostValue::str(c.to_string())))
            }
            HostValue::Bytes(data) => {
                if name == LENGTH {
                    return Ok(Some(to_int(data.len())));
                }
                Ok(parse_index(name)
                    .and_then(|i| data.get(i))
                    .map(|b| HostValue::Int(i64::from(*b))))
            }
            HostValue::None
            | HostValue::Bool(_)
            | HostValue::Int(_)
            | HostValue::Float(_)
            | HostValue::Capsule(_) => Ok(None),
        }
    }

    pub fn set_attr(&self, name: &str, value: HostValue) -> Result<(), HostError> {
        match self {
            HostValue::Object(object) => object.set_attr(name, value),
            HostValue::Dict(dict) => {
                let key = lookup_key(dict, name).unwrap_or_else(|| HostKey::from(name));
                dict.borrow_mut().insert(key, value);
                Ok(())
            }
            HostValue::List(list) => {
                let mut items = list.borrow_mut();
                let len = items.len();
                match parse_index(name).and_then(|i| items.get_mut(i)) {
                    Some(slot) => {
                        *slot = value;
                        Ok(())
                    }
                    None => Err(HostError::index_error(format!(
                        "list assignment index '{name}' out of range for length {len}"
                    ))),
                }
            }
            other => Err(HostError::type_error(format!(
                "'{}' object does not support attribute assignment",
                other.type_name()
            ))),
        }
    }

    pub fn del_attr(&self, name: &str) -> Result<(), HostError> {
        match self {
            HostValue::Object(object) => object.del_attr(name),
            HostValue::Dict(dict) => {
                let key = lookup_key(dict, name).ok_or_else(|| HostError::key_error(name))?;
                dict.borrow_mut().remove(&key);
                Ok(())
            }
            HostValue::List(list) => {
                let mut items = list.borrow_mut();
                match parse_index(name) {
                    Some(i) if i < items.len() => {
                        items.remove(i);
                        Ok(())
                    }
                    _ => Err(HostError::index_error(format!(
                        "list deletion index '{name}' out of range"
                    ))),
                }
            }
            other => Err(HostError::type_error(format!(
                "'{}' object does not support attribute deletion",
                other.type_name()
            ))),
        }
    }

    pub fn has_attr(&self, name: &str) -> Result<bool, HostError> {
        match self {
            HostValue::Object(object) => object.has_attr(name),
            HostValue::Dict(dict) => Ok(lookup_key(dict, name).is_some()),
            other => Ok(other.get_attr(name)?.is_some()),
        }
    }

    /// Attribute names of an object. Containers and primitives report none;
    /// their contents are reached through the mapping and sequence protocols.
    pub fn dir(&self) -> Result<Vec<String>, HostError> {
        match self {
            HostValue::Object(object) => object.dir(),
            _ => Ok(Vec::new()),
        }
    }

    /// Keys of a mapping, or `None` if the value is not a mapping.
    pub fn mapping_keys(&self) -> Option<Result<Vec<HostValue>, HostError>> {
        match self {
            HostValue::Object(object) => object.mapping_keys(),
            HostValue::Dict(dict) => Some(Ok(dict.borrow().keys().map(HostKey::to_value).collect())),
            _ => None,
        }
    }

    /// Length of a sequence, or `None` if the value is not a sequence.
    pub fn sequence_len(&self) -> Option<Result<usize, HostError>> {
        match self {
            HostValue::Object(object) => object.sequence_len(),
            HostValue::List(list) => Some(Ok(list.borrow().len())),
            HostValue::Str(text) => Some(Ok(text.chars().count())),
            HostValue::Bytes(data) => Some(Ok(data.len())),
            _ => None,
        }
    }

    /// Invoke a callable value with positional arguments.
    pub fn call(&self, args: &[HostValue]) -> Result<HostValue, HostError> {
        match self {
            HostValue::Object(object) if object.is_callable() => object.call(args),
            other => Err(HostError::not_callable(other.type_name())),
        }
    }
}
