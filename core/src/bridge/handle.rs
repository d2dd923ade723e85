//! The script-side owner of one host reference.

use std::rc::Rc;

use rquickjs::JsLifetime;
use rquickjs::class::{Trace, Tracer};

use super::state::WrapperCounters;
use crate::api::ReturnPolicy;
use crate::host::HostValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HandleKind {
    Callable(ReturnPolicy),
    Object,
}

/// Engine class instance holding exactly one host reference.
///
/// Every wrapped callable and wrapped object is backed by one handle. The
/// engine finalizes the handle once the wrapper is unreachable, which drops
/// the host reference; the engine never finalizes an object twice, so the
/// release happens exactly once.
#[rquickjs::class]
pub(crate) struct HostHandle {
    target: HostValue,
    kind: HandleKind,
    counters: Rc<WrapperCounters>,
}

impl HostHandle {
    pub(crate) fn new(target: HostValue, kind: HandleKind, counters: Rc<WrapperCounters>) -> Self {
        counters.record_created();
        Self {
            target,
            kind,
            counters,
        }
    }

    pub(crate) fn target(&self) -> &HostValue {
        &self.target
    }

    pub(crate) fn kind(&self) -> HandleKind {
        self.kind
    }
}

impl Drop for HostHandle {
    fn drop(&mut self) {
        self.counters.record_released();
        tracing::trace!(
            target_type = self.target.type_name(),
            kind = ?self.kind,
            "released host reference"
        );
    }
}

// Holds no engine values, so there is nothing to trace.
impl<'js> Trace<'js> for HostHandle {
    fn trace<'a>(&self, _tracer: Tracer<'a, 'js>) {}
}

unsafe impl<'js> JsLifetime<'js> for HostHandle {
    type Changed<'to> = HostHandle;
}
