//! The value bridge between host values and the script heap.
//!
//! A [`Bridge`] is a short-lived view of one context's bridge state inside an
//! engine scope. Marshaling in both directions, the callable bridge and the
//! proxy traps are all methods on it, split across the submodules:
//!
//! - `outbound`: script value → [`HostValue`](crate::host::HostValue)
//! - `inbound`: host value → script value
//! - `callable`: invocation of wrapped host callables
//! - `proxy`: trap implementations for wrapped host objects

pub(crate) mod alloc;
mod callable;
pub(crate) mod glue;
mod handle;
mod inbound;
mod outbound;
mod proxy;
pub(crate) mod state;

#[cfg(test)]
mod proxy_test;

use std::rc::Rc;

use rquickjs::function::IntoArgs;
use rquickjs::{Class, Ctx, Exception, FromJs, Function, Object, Value};

use crate::host::HostValue;
use handle::{HandleKind, HostHandle};
use state::BridgeState;

pub(crate) use outbound::Visited;

pub(crate) struct Bridge<'js> {
    ctx: Ctx<'js>,
    state: Rc<BridgeState>,
    glue: Object<'js>,
}

impl<'js> Bridge<'js> {
    pub(crate) fn enter(ctx: &Ctx<'js>, state: &Rc<BridgeState>) -> rquickjs::Result<Self> {
        Ok(Self {
            ctx: ctx.clone(),
            state: state.clone(),
            glue: state.glue(ctx)?,
        })
    }

    fn call_glue<A, R>(&self, name: &str, args: A) -> rquickjs::Result<R>
    where
        A: IntoArgs<'js>,
        R: FromJs<'js>,
    {
        let func: Function<'js> = self.glue.get(name)?;
        func.call(args)
    }

    fn undefined(&self) -> Value<'js> {
        Value::new_undefined(self.ctx.clone())
    }

    fn new_handle(&self, target: HostValue, kind: HandleKind) -> rquickjs::Result<Class<'js, HostHandle>> {
        tracing::trace!(target_type = target.type_name(), ?kind, "wrapping host value");
        let handle = HostHandle::new(target, kind, self.state.counters());
        Class::instance(self.ctx.clone(), handle)
    }

    /// The handle passed as a hook's first argument.
    fn handle(&self, value: Option<&Value<'js>>) -> rquickjs::Result<Class<'js, HostHandle>> {
        value
            .and_then(|value| value.get::<Class<'js, HostHandle>>().ok())
            .ok_or_else(|| Exception::throw_type(&self.ctx, "receiver is not a host wrapper"))
    }

    /// The host value owned by a handle.
    fn handle_target(&self, value: Option<&Value<'js>>) -> rquickjs::Result<HostValue> {
        let handle = self.handle(value)?;
        let target = handle.borrow().target().clone();
        Ok(target)
    }
}
