//! Proxy traps for wrapped host objects.
//!
//! Every trap acts on the single host value owned by the handle it receives.
//! `get` and the key enumeration traps always read through to the host. The
//! mutating and querying traps (`set`, `has`, `deleteProperty`) only report
//! the attempt under [`ProxyMode::ReportOnly`] and forward it under
//! [`ProxyMode::ReadWrite`].

use hashbrown::HashSet;
use rquickjs::{Array, Object, Value};

use super::Bridge;
use crate::api::ProxyMode;
use crate::host::HostValue;

/// One entry of an enumerated key list.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum EnumeratedKey {
    Number(f64),
    Text(String),
    /// A key the bridge could not express as a number or text.
    Placeholder,
}

impl EnumeratedKey {
    fn from_host(key: &HostValue) -> Self {
        match key {
            HostValue::Str(text) => EnumeratedKey::Text(text.to_string()),
            HostValue::Bool(b) => EnumeratedKey::Number(if *b { 1.0 } else { 0.0 }),
            number if number.is_number() => {
                EnumeratedKey::Number(number.as_float().unwrap_or(f64::NAN))
            }
            _ => EnumeratedKey::Placeholder,
        }
    }

    /// The property name the engine would use for this key.
    fn property_name(&self) -> Option<String> {
        match self {
            EnumeratedKey::Text(text) => Some(text.clone()),
            EnumeratedKey::Number(n) if n.fract() == 0.0 && n.abs() < 1e21 => {
                Some(format!("{}", *n as i64))
            }
            EnumeratedKey::Number(n) => Some(n.to_string()),
            EnumeratedKey::Placeholder => None,
        }
    }
}

/// Keys of a host value, by container protocol priority: mapping keys, then
/// sequence indices, then public attribute names.
pub(crate) fn enumerate_keys(target: &HostValue) -> Vec<EnumeratedKey> {
    if let Some(Ok(keys)) = target.mapping_keys() {
        return keys.iter().map(EnumeratedKey::from_host).collect();
    }
    if let Some(Ok(len)) = target.sequence_len() {
        return (0..len).map(|i| EnumeratedKey::Number(i as f64)).collect();
    }
    match target.dir() {
        Ok(names) => names
            .into_iter()
            .filter(|name| !name.starts_with("__"))
            .map(EnumeratedKey::Text)
            .collect(),
        Err(error) => {
            tracing::debug!(%error, "attribute listing failed");
            Vec::new()
        }
    }
}

/// Distinct property names, in enumeration order, without placeholders.
pub(crate) fn own_key_names(keys: &[EnumeratedKey]) -> Vec<String> {
    let mut seen = HashSet::new();
    keys.iter()
        .filter_map(EnumeratedKey::property_name)
        .filter(|name| seen.insert(name.clone()))
        .collect()
}

impl<'js> Bridge<'js> {
    /// Text name of a property key. Symbols have none.
    fn property_name(&self, key: Option<&Value<'js>>) -> Option<String> {
        let key = key?;
        if let Some(text) = key.as_string() {
            return text.to_string().ok();
        }
        key.get::<f64>()
            .ok()
            .and_then(|n| EnumeratedKey::Number(n).property_name())
    }

    fn report(&self, trap: &str, name: &str) -> rquickjs::Result<Value<'js>> {
        tracing::debug!(trap, property = name, "proxy operation observed, host object unchanged");
        Ok(Value::new_bool(self.ctx.clone(), false))
    }

    pub(crate) fn trap_get(&self, args: &[Value<'js>]) -> rquickjs::Result<Value<'js>> {
        let target = self.handle_target(args.first())?;
        let Some(name) = self.property_name(args.get(1)) else {
            return Ok(self.undefined());
        };
        tracing::trace!(property = %name, "proxy get");
        match target.get_attr(&name) {
            Ok(Some(found)) => self.to_script(&found),
            Ok(None) => Ok(self.undefined()),
            Err(error) => {
                tracing::debug!(property = %name, %error, "attribute lookup failed");
                Ok(self.undefined())
            }
        }
    }

    pub(crate) fn trap_set(&self, args: &[Value<'js>]) -> rquickjs::Result<Value<'js>> {
        let target = self.handle_target(args.first())?;
        let Some(name) = self.property_name(args.get(1)) else {
            return self.report("set", "<symbol>");
        };
        if self.state.proxy_mode() == ProxyMode::ReportOnly {
            return self.report("set", &name);
        }
        let value = match args.get(2) {
            Some(value) => self.to_host(value)?,
            None => HostValue::None,
        };
        let stored = match target.set_attr(&name, value) {
            Ok(()) => true,
            Err(error) => {
                tracing::debug!(property = %name, %error, "attribute assignment failed");
                false
            }
        };
        Ok(Value::new_bool(self.ctx.clone(), stored))
    }

    pub(crate) fn trap_has(&self, args: &[Value<'js>]) -> rquickjs::Result<Value<'js>> {
        let target = self.handle_target(args.first())?;
        let Some(name) = self.property_name(args.get(1)) else {
            return self.report("has", "<symbol>");
        };
        if self.state.proxy_mode() == ProxyMode::ReportOnly {
            return self.report("has", &name);
        }
        let present = target.has_attr(&name).unwrap_or(false);
        Ok(Value::new_bool(self.ctx.clone(), present))
    }

    pub(crate) fn trap_delete(&self, args: &[Value<'js>]) -> rquickjs::Result<Value<'js>> {
        let target = self.handle_target(args.first())?;
        let Some(name) = self.property_name(args.get(1)) else {
            return self.report("deleteProperty", "<symbol>");
        };
        if self.state.proxy_mode() == ProxyMode::ReportOnly {
            return self.report("deleteProperty", &name);
        }
        let deleted = match target.del_attr(&name) {
            Ok(()) => true,
            Err(error) => {
                tracing::debug!(property = %name, %error, "attribute deletion failed");
                false
            }
        };
        Ok(Value::new_bool(self.ctx.clone(), deleted))
    }

    /// `ownKeys`: distinct string keys, as the engine requires.
    pub(crate) fn trap_own_keys(&self, args: &[Value<'js>]) -> rquickjs::Result<Value<'js>> {
        let target = self.handle_target(args.first())?;
        let names = own_key_names(&enumerate_keys(&target));
        let array = Array::new(self.ctx.clone())?;
        for (index, name) in names.into_iter().enumerate() {
            array.set(index, name)?;
        }
        Ok(array.into_value())
    }

    /// `enumerate`: the raw key list, numbers and placeholders included.
    pub(crate) fn trap_enumerate(&self, args: &[Value<'js>]) -> rquickjs::Result<Value<'js>> {
        let target = self.handle_target(args.first())?;
        let array = Array::new(self.ctx.clone())?;
        for (index, key) in enumerate_keys(&target).into_iter().enumerate() {
            let value = match key {
                EnumeratedKey::Number(n) => Value::new_number(self.ctx.clone(), n),
                EnumeratedKey::Text(text) => {
                    rquickjs::String::from_str(self.ctx.clone(), &text)?.into_value()
                }
                EnumeratedKey::Placeholder => self.undefined(),
            };
            array.set(index, value)?;
        }
        Ok(array.into_value())
    }

    /// `getOwnPropertyDescriptor`: lets `Object.keys` and `for..in` see the
    /// keys reported by `ownKeys` as enumerable data properties.
    pub(crate) fn trap_descriptor(&self, args: &[Value<'js>]) -> rquickjs::Result<Value<'js>> {
        let target = self.handle_target(args.first())?;
        let Some(name) = self.property_name(args.get(1)) else {
            return Ok(self.undefined());
        };
        let found = match target.get_attr(&name) {
            Ok(Some(found)) => found,
            Ok(None) | Err(_) => return Ok(self.undefined()),
        };
        let descriptor = Object::new(self.ctx.clone())?;
        descriptor.set("value", self.to_script(&found)?)?;
        descriptor.set("writable", self.state.proxy_mode() == ProxyMode::ReadWrite)?;
        descriptor.set("enumerable", true)?;
        descriptor.set("configurable", true)?;
        Ok(descriptor.into_value())
    }
}
