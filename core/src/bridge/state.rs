//! Per-context bridge state shared by the native hooks.

use core::cell::{Cell, RefCell};
use std::rc::Rc;

use rquickjs::{Ctx, Exception, Object, Persistent};

use crate::api::ProxyMode;
use crate::host::HostError;

/// Live counters of script-side wrappers.
///
/// Shared (by `Rc`) between the context handle and every wrapper, so the
/// counts stay readable after the context is torn down.
#[derive(Debug, Default)]
pub(crate) struct WrapperCounters {
    created: Cell<usize>,
    released: Cell<usize>,
}

impl WrapperCounters {
    pub(crate) fn record_created(&self) {
        self.created.set(self.created.get() + 1);
    }

    pub(crate) fn record_released(&self) {
        self.released.set(self.released.get() + 1);
    }

    pub(crate) fn snapshot(&self) -> BridgeStats {
        BridgeStats {
            wrappers_created: self.created.get(),
            wrappers_released: self.released.get(),
        }
    }
}

/// Snapshot of wrapper lifetimes within one context.
///
/// Every wrapper owns exactly one host reference, so `wrappers_released`
/// never exceeds `wrappers_created`, and once the context is destroyed the
/// two are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BridgeStats {
    pub wrappers_created: usize,
    pub wrappers_released: usize,
}

impl BridgeStats {
    /// Wrappers still reachable from the script heap.
    pub fn live_wrappers(&self) -> usize {
        self.wrappers_created - self.wrappers_released
    }
}

pub(crate) struct BridgeState {
    proxy_mode: ProxyMode,
    counters: Rc<WrapperCounters>,
    host_error: RefCell<Option<HostError>>,
    glue: RefCell<Option<Persistent<Object<'static>>>>,
}

impl BridgeState {
    pub(crate) fn new(proxy_mode: ProxyMode, counters: Rc<WrapperCounters>) -> Self {
        Self {
            proxy_mode,
            counters,
            host_error: RefCell::new(None),
            glue: RefCell::new(None),
        }
    }

    pub(crate) fn proxy_mode(&self) -> ProxyMode {
        self.proxy_mode
    }

    pub(crate) fn counters(&self) -> Rc<WrapperCounters> {
        self.counters.clone()
    }

    /// Remember the latest host-callable failure so the evaluation that
    /// observes the resulting script exception can report its cause.
    pub(crate) fn record_host_error(&self, error: HostError) {
        *self.host_error.borrow_mut() = Some(error);
    }

    pub(crate) fn take_host_error(&self) -> Option<HostError> {
        self.host_error.borrow_mut().take()
    }

    pub(crate) fn set_glue(&self, glue: Persistent<Object<'static>>) {
        *self.glue.borrow_mut() = Some(glue);
    }

    pub(crate) fn glue<'js>(&self, ctx: &Ctx<'js>) -> rquickjs::Result<Object<'js>> {
        let glue = self.glue.borrow();
        match glue.as_ref() {
            Some(persistent) => persistent.clone().restore(ctx),
            None => Err(Exception::throw_internal(ctx, "bridge has been torn down")),
        }
    }

    /// Drop every script value held from Rust. Must run before the engine
    /// context and runtime are freed.
    pub(crate) fn teardown(&self) {
        self.glue.borrow_mut().take();
        self.host_error.borrow_mut().take();
    }
}
