//! Script → host conversion.
//!
//! Produces an isomorphic host copy of a script value. Arrays and plain
//! objects are registered in the [`Visited`] map before their contents are
//! converted, so shared sub-objects convert to one shared host container and
//! cycles terminate. Objects that wrap a host value convert back to that very
//! host value.

use core::cell::RefCell;
use std::rc::Rc;

use hashbrown::HashMap;
use rquickjs::{Array, Object, Value};

use super::Bridge;
use crate::host::{HostDict, HostKey, HostList, HostValue};

/// Script object identity → host value produced for it, for one conversion.
pub(crate) type Visited = HashMap<u64, HostValue>;

/// Drop a container whose conversion failed, so later references convert it
/// afresh instead of reusing the partial copy.
fn forget(visited: &mut Visited, id: u64) {
    visited.remove(&id);
}

/// How the glue classified an object-tagged script value.
enum Shape<'js> {
    Host(Value<'js>),
    Array(u64),
    Object(u64),
    Bytes(Value<'js>),
    Text(String),
}

impl<'js> Bridge<'js> {
    /// Convert one script value with a fresh visited map.
    pub(crate) fn to_host(&self, value: &Value<'js>) -> rquickjs::Result<HostValue> {
        self.to_host_with(value, &mut Visited::new())
    }

    /// Convert one script value, sharing `visited` with sibling conversions.
    pub(crate) fn to_host_with(
        &self,
        value: &Value<'js>,
        visited: &mut Visited,
    ) -> rquickjs::Result<HostValue> {
        if value.is_null() || value.is_undefined() {
            return Ok(HostValue::None);
        }
        if let Some(b) = value.as_bool() {
            return Ok(HostValue::Bool(b));
        }
        if let Some(n) = value.as_int() {
            return Ok(HostValue::Float(f64::from(n)));
        }
        if let Some(x) = value.as_float() {
            return Ok(HostValue::Float(x));
        }
        if let Some(text) = value.as_string() {
            return Ok(HostValue::str(text.to_string()?));
        }
        let Some(object) = value.as_object() else {
            // Symbols, big integers and other exotic primitives.
            return self.describe(value).map(HostValue::str);
        };

        match self.object_to_host(value, object, visited) {
            Err(rquickjs::Error::Exception) => {
                let error = self.ctx.catch();
                tracing::debug!(?error, "conversion failed; falling back to text");
                self.describe(value).map(HostValue::str)
            }
            result => result,
        }
    }

    fn object_to_host(
        &self,
        value: &Value<'js>,
        object: &Object<'js>,
        visited: &mut Visited,
    ) -> rquickjs::Result<HostValue> {
        match self.inspect(value)? {
            Shape::Host(handle) => self.handle_target(Some(&handle)),
            Shape::Text(text) => Ok(HostValue::str(text)),
            Shape::Bytes(bytes) => self.bytes_to_host(&bytes),
            Shape::Array(id) => match visited.get(&id) {
                Some(found) => Ok(found.clone()),
                None => self
                    .array_to_host(object, id, visited)
                    .inspect_err(|_| forget(visited, id)),
            },
            Shape::Object(id) => match visited.get(&id) {
                Some(found) => Ok(found.clone()),
                None => self
                    .mapping_to_host(object, id, visited)
                    .inspect_err(|_| forget(visited, id)),
            },
        }
    }

    fn inspect(&self, value: &Value<'js>) -> rquickjs::Result<Shape<'js>> {
        let info: Array<'js> = self.call_glue("inspect", (value.clone(),))?;
        let kind: String = info.get(0)?;
        let payload: Value<'js> = info.get(1)?;
        let identity = payload.get::<f64>().map_or(0, |n| n as u64);
        Ok(match kind.as_str() {
            "host" => Shape::Host(payload),
            "array" => Shape::Array(identity),
            "object" => Shape::Object(identity),
            "bytes" => Shape::Bytes(payload),
            _ => Shape::Text(payload.get::<String>()?),
        })
    }

    fn array_to_host(
        &self,
        array: &Object<'js>,
        id: u64,
        visited: &mut Visited,
    ) -> rquickjs::Result<HostValue> {
        let len: u32 = array.get("length")?;
        let list: HostList = Rc::new(RefCell::new(vec![HostValue::None; len as usize]));
        visited.insert(id, HostValue::List(list.clone()));

        for index in 0..len {
            let item: Value<'js> = array.get(index)?;
            let converted = self.to_host_with(&item, visited)?;
            if let Some(slot) = list.borrow_mut().get_mut(index as usize) {
                *slot = converted;
            }
        }
        Ok(HostValue::List(list))
    }

    fn mapping_to_host(
        &self,
        object: &Object<'js>,
        id: u64,
        visited: &mut Visited,
    ) -> rquickjs::Result<HostValue> {
        let dict: HostDict = HostDict::default();
        visited.insert(id, HostValue::Dict(dict.clone()));

        for name in object.keys::<String>() {
            let name = name?;
            let item: Value<'js> = object.get(name.as_str())?;
            let converted = self.to_host_with(&item, visited)?;
            dict.borrow_mut().insert(HostKey::from(name), converted);
        }
        Ok(HostValue::Dict(dict))
    }

    fn bytes_to_host(&self, bytes: &Value<'js>) -> rquickjs::Result<HostValue> {
        let array: Array<'js> = bytes.get()?;
        let mut data = Vec::with_capacity(array.len());
        for index in 0..array.len() {
            let byte: i32 = array.get(index)?;
            data.push(byte as u8);
        }
        Ok(HostValue::bytes(data))
    }

    /// The engine's textual rendering of any value.
    pub(crate) fn describe(&self, value: &Value<'js>) -> rquickjs::Result<String> {
        self.call_glue("describe", (value.clone(),))
    }
}
