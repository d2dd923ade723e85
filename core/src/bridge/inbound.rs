//! Host → script conversion.
//!
//! Only immutable primitives are copied. Callables become wrapper functions
//! and everything else becomes a proxy; both reference the host value rather
//! than copying it. No identity map is kept in this direction: converting the
//! same host object twice yields two wrappers that are not `===` in script.

use rquickjs::Value;

use super::Bridge;
use super::handle::HandleKind;
use crate::api::ReturnPolicy;
use crate::host::HostValue;

impl<'js> Bridge<'js> {
    pub(crate) fn to_script(&self, value: &HostValue) -> rquickjs::Result<Value<'js>> {
        let ctx = self.ctx.clone();
        match value {
            HostValue::Str(text) => Ok(rquickjs::String::from_str(ctx, text)?.into_value()),
            HostValue::None => Ok(Value::new_null(ctx)),
            HostValue::Bool(b) => Ok(Value::new_bool(ctx, *b)),
            HostValue::Int(n) => Ok(Value::new_number(ctx, *n as f64)),
            HostValue::Float(x) => Ok(Value::new_number(ctx, *x)),
            callable if callable.is_callable() => {
                self.wrap_callable(callable.clone(), ReturnPolicy::Forward)
            }
            other => self.wrap_object(other.clone()),
        }
    }

    /// Script function forwarding calls to a host callable.
    pub(crate) fn wrap_callable(
        &self,
        target: HostValue,
        policy: ReturnPolicy,
    ) -> rquickjs::Result<Value<'js>> {
        let handle = self.new_handle(target, HandleKind::Callable(policy))?;
        self.call_glue("wrapCallable", (handle,))
    }

    /// Proxy forwarding property operations to a host object.
    pub(crate) fn wrap_object(&self, target: HostValue) -> rquickjs::Result<Value<'js>> {
        let handle = self.new_handle(target, HandleKind::Object)?;
        self.call_glue("wrapObject", (handle,))
    }
}
