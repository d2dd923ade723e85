//! Invocation of wrapped host callables.

use rquickjs::{Array, Exception, Value};

use super::handle::HandleKind;
use super::{Bridge, Visited};
use crate::api::ReturnPolicy;

impl<'js> Bridge<'js> {
    /// Hook behind every wrapper function: `invoke(handle, args)`.
    ///
    /// Arguments convert left to right with one shared visited map, so a
    /// script object passed in two positions arrives as one host object.
    pub(crate) fn invoke(&self, args: &[Value<'js>]) -> rquickjs::Result<Value<'js>> {
        let handle = self.handle(args.first())?;
        let (target, kind) = {
            let handle = handle.borrow();
            (handle.target().clone(), handle.kind())
        };
        let policy = match kind {
            HandleKind::Callable(policy) => policy,
            HandleKind::Object => ReturnPolicy::Forward,
        };
        if !target.is_callable() {
            return Err(Exception::throw_reference(
                &self.ctx,
                &format!("'{}' object is not callable", target.type_name()),
            ));
        }

        let call_args: Array<'js> = match args.get(1) {
            Some(list) => list.get()?,
            None => Array::new(self.ctx.clone())?,
        };
        let mut visited = Visited::new();
        let mut host_args = Vec::with_capacity(call_args.len());
        for index in 0..call_args.len() {
            let arg: Value<'js> = call_args.get(index)?;
            host_args.push(self.to_host_with(&arg, &mut visited)?);
        }

        tracing::trace!(callee = target.type_name(), argc = host_args.len(), "invoking host callable");
        match target.call(&host_args) {
            Ok(result) => match policy {
                ReturnPolicy::Forward => self.to_script(&result),
                ReturnPolicy::Discard => Ok(self.undefined()),
            },
            Err(error) => {
                tracing::debug!(%error, "host callable failed");
                let message = error.to_string();
                self.state.record_host_error(error);
                Err(Exception::throw_message(&self.ctx, &message))
            }
        }
    }
}
