//! Host value representation.

use core::cell::RefCell;
use std::rc::Rc;

use hashbrown::HashMap;

use super::object::{HostError, HostObject, NativeFunction};

/// Shared, mutable host sequence.
pub type HostList = Rc<RefCell<Vec<HostValue>>>;

/// Shared, mutable host mapping. Unordered.
pub type HostDict = Rc<RefCell<HashMap<HostKey, HostValue>>>;

/// Shared handle to an arbitrary host object.
pub type HostRef = Rc<dyn HostObject>;

/// An opaque address tunneled through script space.
///
/// The bridge never interprets the address. A capsule handed to script is
/// wrapped like any other object and comes back as the identical capsule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Capsule(usize);

impl Capsule {
    pub fn new(address: usize) -> Self {
        Self(address)
    }

    pub fn address(self) -> usize {
        self.0
    }
}

/// Hashable key of a host mapping.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HostKey {
    Text(Rc<str>),
    Int(i64),
    Bool(bool),
}

impl HostKey {
    /// The key as a host value, as seen by code enumerating the mapping.
    pub fn to_value(&self) -> HostValue {
        match self {
            HostKey::Text(text) => HostValue::Str(text.clone()),
            HostKey::Int(n) => HostValue::Int(*n),
            HostKey::Bool(b) => HostValue::Bool(*b),
        }
    }
}

impl From<&str> for HostKey {
    fn from(text: &str) -> Self {
        HostKey::Text(text.into())
    }
}

impl From<String> for HostKey {
    fn from(text: String) -> Self {
        HostKey::Text(text.into())
    }
}

impl From<i64> for HostKey {
    fn from(n: i64) -> Self {
        HostKey::Int(n)
    }
}

impl From<bool> for HostKey {
    fn from(b: bool) -> Self {
        HostKey::Bool(b)
    }
}

/// A value in the host's dynamic object model.
///
/// Cloning is cheap: containers and objects clone the reference, never the
/// contents.
#[derive(Clone)]
pub enum HostValue {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(Rc<str>),
    Bytes(Rc<[u8]>),
    List(HostList),
    Dict(HostDict),
    Capsule(Capsule),
    Object(HostRef),
}

impl HostValue {
    pub fn str(text: impl Into<Rc<str>>) -> Self {
        HostValue::Str(text.into())
    }

    pub fn bytes(data: impl Into<Rc<[u8]>>) -> Self {
        HostValue::Bytes(data.into())
    }

    pub fn list(items: impl IntoIterator<Item = HostValue>) -> Self {
        HostValue::List(Rc::new(RefCell::new(items.into_iter().collect())))
    }

    pub fn dict<K: Into<HostKey>>(entries: impl IntoIterator<Item = (K, HostValue)>) -> Self {
        let map = entries
            .into_iter()
            .map(|(key, value)| (key.into(), value))
            .collect::<HashMap<_, _>>();
        HostValue::Dict(Rc::new(RefCell::new(map)))
    }

    pub fn object(object: impl HostObject + 'static) -> Self {
        HostValue::Object(Rc::new(object))
    }

    /// Wrap a Rust closure as a callable host value.
    pub fn function(
        name: impl Into<String>,
        func: impl Fn(&[HostValue]) -> Result<HostValue, HostError> + 'static,
    ) -> Self {
        HostValue::object(NativeFunction::new(name, func))
    }

    /// Name of the value's runtime type, used in diagnostics.
    pub fn type_name(&self) -> &str {
        match self {
            HostValue::None => "none",
            HostValue::Bool(_) => "bool",
            HostValue::Int(_) => "int",
            HostValue::Float(_) => "float",
            HostValue::Str(_) => "str",
            HostValue::Bytes(_) => "bytes",
            HostValue::List(_) => "list",
            HostValue::Dict(_) => "dict",
            HostValue::Capsule(_) => "capsule",
            HostValue::Object(object) => object.type_name(),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, HostValue::None)
    }

    pub fn is_number(&self) -> bool {
        matches!(self, HostValue::Int(_) | HostValue::Float(_))
    }

    pub fn is_callable(&self) -> bool {
        match self {
            HostValue::Object(object) => object.is_callable(),
            _ => false,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            HostValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            HostValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Any number as a double. Integers beyond 2^53 lose precision.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            HostValue::Int(n) => Some(*n as f64),
            HostValue::Float(x) => Some(*x),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            HostValue::Str(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            HostValue::Bytes(data) => Some(data),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&HostList> {
        match self {
            HostValue::List(list) => Some(list),
            _ => None,
        }
    }

    pub fn as_dict(&self) -> Option<&HostDict> {
        match self {
            HostValue::Dict(dict) => Some(dict),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&HostRef> {
        match self {
            HostValue::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn as_capsule(&self) -> Option<Capsule> {
        match self {
            HostValue::Capsule(capsule) => Some(*capsule),
            _ => None,
        }
    }

    /// Address of the shared allocation behind a container or object.
    ///
    /// Primitives have no identity and return `None`.
    pub fn identity(&self) -> Option<usize> {
        match self {
            HostValue::List(list) => Some(Rc::as_ptr(list) as *const () as usize),
            HostValue::Dict(dict) => Some(Rc::as_ptr(dict) as *const () as usize),
            HostValue::Object(object) => Some(Rc::as_ptr(object) as *const () as usize),
            _ => None,
        }
    }

    /// True when both values are the same shared container or object.
    pub fn same_object(&self, other: &HostValue) -> bool {
        match (self.identity(), other.identity()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}

impl PartialEq for HostValue {
    fn eq(&self, other: &Self) -> bool {
        structural_eq(self, other, &mut Vec::new())
    }
}

/// Structural equality. A container pair already under comparison counts as
/// equal, so cyclic values terminate.
fn structural_eq(a: &HostValue, b: &HostValue, active: &mut Vec<(usize, usize)>) -> bool {
    match (a, b) {
        (HostValue::None, HostValue::None) => true,
        (HostValue::Bool(a), HostValue::Bool(b)) => a == b,
        (HostValue::Int(a), HostValue::Int(b)) => a == b,
        (HostValue::Str(a), HostValue::Str(b)) => a == b,
        (HostValue::Bytes(a), HostValue::Bytes(b)) => a == b,
        (HostValue::Capsule(a), HostValue::Capsule(b)) => a == b,
        (HostValue::Object(a), HostValue::Object(b)) => Rc::ptr_eq(a, b),
        (HostValue::List(x), HostValue::List(y)) => {
            if Rc::ptr_eq(x, y) {
                return true;
            }
            with_pair(a, b, active, |active| {
                let (x, y) = (x.borrow(), y.borrow());
                x.len() == y.len()
                    && x.iter().zip(y.iter()).all(|(v, w)| structural_eq(v, w, active))
            })
        }
        (HostValue::Dict(x), HostValue::Dict(y)) => {
            if Rc::ptr_eq(x, y) {
                return true;
            }
            with_pair(a, b, active, |active| {
                let (x, y) = (x.borrow(), y.borrow());
                x.len() == y.len()
                    && x.iter().all(|(key, v)| {
                        y.get(key).is_some_and(|w| structural_eq(v, w, active))
                    })
            })
        }
        (a, b) if a.is_number() && b.is_number() => a.as_float() == b.as_float(),
        _ => false,
    }
}

fn with_pair(
    a: &HostValue,
    b: &HostValue,
    active: &mut Vec<(usize, usize)>,
    compare: impl FnOnce(&mut Vec<(usize, usize)>) -> bool,
) -> bool {
    let (Some(x), Some(y)) = (a.identity(), b.identity()) else {
        return false;
    };
    if active.contains(&(x, y)) {
        return true;
    }
    active.push((x, y));
    let equal = compare(active);
    active.pop();
    equal
}

impl From<bool> for HostValue {
    fn from(b: bool) -> Self {
        HostValue::Bool(b)
    }
}

impl From<i64> for HostValue {
    fn from(n: i64) -> Self {
        HostValue::Int(n)
    }
}

impl From<f64> for HostValue {
    fn from(x: f64) -> Self {
        HostValue::Float(x)
    }
}

impl From<&str> for HostValue {
    fn from(text: &str) -> Self {
        HostValue::str(text)
    }
}

impl From<String> for HostValue {
    fn from(text: String) -> Self {
        HostValue::str(text)
    }
}

impl From<Vec<HostValue>> for HostValue {
    fn from(items: Vec<HostValue>) -> Self {
        HostValue::List(Rc::new(RefCell::new(items)))
    }
}

impl From<Capsule> for HostValue {
    fn from(capsule: Capsule) -> Self {
        HostValue::Capsule(capsule)
    }
}

impl<T: Into<HostValue>> From<Option<T>> for HostValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(HostValue::None, Into::into)
    }
}
