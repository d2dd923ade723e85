//! Literal-style rendering of host values.
//!
//! Containers may be cyclic, so rendering tracks the containers currently
//! being printed and renders a re-entered one as `[...]` or `{...}`.
//! Dict entries are sorted by their rendered key to keep output stable.

use core::fmt::{self, Write};

use super::value::{HostKey, HostValue};

impl fmt::Display for HostValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_value(f, self, &mut Vec::new())
    }
}

impl fmt::Debug for HostValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for HostKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostKey::Text(text) => write!(f, "\"{}\"", text.escape_debug()),
            HostKey::Int(n) => write!(f, "{n}"),
            HostKey::Bool(b) => write!(f, "{b}"),
        }
    }
}

fn write_float(f: &mut dyn Write, x: f64) -> fmt::Result {
    if x.is_nan() {
        f.write_str("nan")
    } else if x.is_infinite() {
        f.write_str(if x > 0.0 { "inf" } else { "-inf" })
    } else if x.fract() == 0.0 && x.abs() < 1e16 {
        write!(f, "{x:.1}")
    } else {
        write!(f, "{x}")
    }
}

fn write_value(f: &mut dyn Write, value: &HostValue, active: &mut Vec<usize>) -> fmt::Result {
    match value {
        HostValue::None => f.write_str("none"),
        HostValue::Bool(b) => write!(f, "{b}"),
        HostValue::Int(n) => write!(f, "{n}"),
        HostValue::Float(x) => write_float(f, *x),
        HostValue::Str(text) => write!(f, "\"{}\"", text.escape_debug()),
        HostValue::Bytes(data) => write!(f, "b\"{}\"", data.escape_ascii()),
        HostValue::Capsule(capsule) => write!(f, "<capsule {:#x}>", capsule.address()),
        HostValue::Object(object) => write!(f, "<{} object>", object.type_name()),
        HostValue::List(list) => {
            let id = value.identity().unwrap_or_default();
            if active.contains(&id) {
                return f.write_str("[...]");
            }
            active.push(id);
            f.write_char('[')?;
            for (i, item) in list.borrow().iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write_value(f, item, active)?;
            }
            active.pop();
            f.write_char(']')
        }
        HostValue::Dict(dict) => {
            let id = value.identity().unwrap_or_default();
            if active.contains(&id) {
                return f.write_str("{...}");
            }
            active.push(id);
            let mut entries = dict
                .borrow()
                .iter()
                .map(|(key, item)| (key.to_string(), item.clone()))
                .collect::<Vec<_>>();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            f.write_char('{')?;
            for (i, (key, item)) in entries.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{key}: ")?;
                write_value(f, item, active)?;
            }
            active.pop();
            f.write_char('}')
        }
    }
}
