//! The script context handle.

use core::cell::RefCell;
use std::rc::Rc;

use rquickjs::context::EvalOptions;
use rquickjs::{CatchResultExt, Ctx, Function, Runtime, Value};

use super::modules::{ModuleLoader, REQUIRE_SOURCE};
use super::{ContextOptions, Error, ReturnPolicy, Variables};
use crate::bridge::alloc::{FatalSignal, HostAllocator};
use crate::bridge::glue;
use crate::bridge::state::{BridgeState, BridgeStats, WrapperCounters};
use crate::bridge::Bridge;
use crate::host::HostValue;

/// One isolated script heap plus its bridge state.
///
/// A context is confined to the thread that created it. Calls are
/// serialized: a host callable that calls back into the context it was
/// invoked from gets [`Error::Api`] instead of re-entering the engine.
///
/// The heap is torn down exactly once, by [`destroy`](Self::destroy), by a
/// fatal engine error, or when the handle is dropped. Every operation on a
/// torn-down context fails with [`Error::Api`].
///
/// # Example
///
/// ```
/// use hostjs_core::api::Context;
/// use hostjs_core::host::HostValue;
///
/// let context = Context::new().unwrap();
/// let greet = HostValue::function("greet", |args| {
///     let name = args.first().and_then(HostValue::as_str).unwrap_or("world");
///     Ok(HostValue::str(format!("hello, {name}")))
/// });
/// context.bind_callable("greet", &greet).unwrap();
///
/// let result = context.evaluate("greet(host.who)", r#"{"who": "bridge"}"#).unwrap();
/// assert_eq!(result, HostValue::str("hello, bridge"));
/// ```
pub struct Context {
    inner: RefCell<Option<ContextInner>>,
    options: ContextOptions,
    counters: Rc<WrapperCounters>,
}

struct ContextInner {
    state: Rc<BridgeState>,
    context: rquickjs::Context,
    runtime: Runtime,
    fatal: FatalSignal,
}

impl Drop for ContextInner {
    fn drop(&mut self) {
        // Script values held from Rust go first, then the context, then the heap.
        self.state.teardown();
        tracing::debug!("context destroyed");
    }
}

impl ContextInner {
    /// Run `f` inside an engine scope with a bridge view, converting engine
    /// exceptions into [`Error`].
    fn run<T>(
        &self,
        f: impl for<'js> FnOnce(&Ctx<'js>, &Bridge<'js>) -> rquickjs::Result<T>,
    ) -> Result<T, Error> {
        self.context.with(|ctx| {
            let result = Bridge::enter(&ctx, &self.state).and_then(|bridge| f(&ctx, &bridge));
            result
                .catch(&ctx)
                .map_err(|caught| Error::from_caught(caught, self.state.take_host_error()))
        })
    }
}

impl Context {
    /// Create a context with default options.
    pub fn new() -> Result<Self, Error> {
        Self::with_options(ContextOptions::default())
    }

    pub fn with_options(options: ContextOptions) -> Result<Self, Error> {
        let fatal = FatalSignal::default();
        let runtime = Runtime::new_with_alloc(HostAllocator::new(fatal.clone()))
            .map_err(|e| Error::Fatal(format!("cannot create script heap: {e}")))?;
        if let Some(limit) = options.memory_limit {
            runtime.set_memory_limit(limit);
        }
        if let Some(size) = options.max_stack_size {
            runtime.set_max_stack_size(size);
        }
        let context = rquickjs::Context::full(&runtime)
            .map_err(|e| Error::Fatal(format!("cannot create script context: {e}")))?;

        let counters = Rc::new(WrapperCounters::default());
        let state = Rc::new(BridgeState::new(options.proxy_mode, counters.clone()));
        context.with(|ctx| {
            glue::install(&ctx, &state)
                .catch(&ctx)
                .map_err(|caught| Error::from_caught(caught, None))
        })?;

        tracing::debug!(
            memory_limit = ?options.memory_limit,
            proxy_mode = ?options.proxy_mode,
            "context created"
        );
        Ok(Self {
            inner: RefCell::new(Some(ContextInner {
                state,
                context,
                runtime,
                fatal,
            })),
            options,
            counters,
        })
    }

    pub fn options(&self) -> &ContextOptions {
        &self.options
    }

    /// Serialize access to the live context.
    ///
    /// A fatal failure tears the context down before the error is returned.
    fn with_inner<T>(
        &self,
        operation: &str,
        f: impl FnOnce(&ContextInner) -> Result<T, Error>,
    ) -> Result<T, Error> {
        let mut slot = self
            .inner
            .try_borrow_mut()
            .map_err(|_| Error::Api(format!("{operation}: context is busy")))?;
        let (result, fatal) = {
            let inner = slot
                .as_ref()
                .ok_or_else(|| Error::Api(format!("{operation}: context has been destroyed")))?;
            let result = f(inner);
            (result, inner.fatal.is_raised())
        };
        match result {
            Err(Error::Fatal(message)) => {
                tracing::warn!(operation, %message, "fatal engine error, destroying context");
                slot.take();
                Err(Error::Fatal(message))
            }
            _ if fatal => {
                tracing::warn!(operation, "host allocator exhausted, destroying context");
                slot.take();
                Err(Error::Fatal("host allocator exhausted".to_string()))
            }
            result => result,
        }
    }

    /// Evaluate `source` with `variables` (a JSON object) bound to the
    /// variable namespace, and convert the completion value to the host.
    pub fn evaluate(&self, source: &str, variables: &str) -> Result<HostValue, Error> {
        let namespace = self.options.variables_name.as_str();
        let gc_before_eval = self.options.gc_before_eval;
        self.with_inner("evaluate", |inner| {
            if gc_before_eval {
                inner.runtime.run_gc();
            }
            inner.state.take_host_error();

            inner.context.with(|ctx| {
                let bundle = match ctx.json_parse(variables).catch(&ctx) {
                    Ok(bundle) => bundle,
                    Err(caught) => {
                        return Err(match Error::from_caught(caught, None) {
                            Error::Script(error) => Error::Api(format!(
                                "malformed variable bundle: {}",
                                error.message
                            )),
                            other => other,
                        });
                    }
                };
                ctx.globals()
                    .set(namespace, bundle)
                    .catch(&ctx)
                    .map_err(|caught| Error::from_caught(caught, None))
            })?;

            tracing::trace!(len = source.len(), "evaluating script");
            inner.run(|ctx, bridge| {
                // Sloppy mode: a refused proxy write is ignored instead of thrown.
                let mut options = EvalOptions::default();
                options.strict = false;
                let value: Value = ctx.eval_with_options(source, options)?;
                bridge.to_host(&value)
            })
        })
    }

    /// [`evaluate`](Self::evaluate) with a typed variable bundle.
    pub fn evaluate_with(&self, source: &str, variables: &Variables) -> Result<HostValue, Error> {
        self.evaluate(source, &variables.to_json())
    }

    /// Bind a host callable as the global `name`, forwarding its return value.
    pub fn bind_callable(&self, name: &str, callable: &HostValue) -> Result<(), Error> {
        self.bind_callable_with(name, callable, ReturnPolicy::Forward)
    }

    /// Bind a host callable as the global `name` with an explicit return policy.
    pub fn bind_callable_with(
        &self,
        name: &str,
        callable: &HostValue,
        policy: ReturnPolicy,
    ) -> Result<(), Error> {
        check_name("bind_callable", name)?;
        if !callable.is_callable() {
            return Err(Error::Api(format!(
                "bind_callable: must provide a valid callable, got '{}'",
                callable.type_name()
            )));
        }
        self.with_inner("bind_callable", |inner| {
            inner.run(|ctx, bridge| {
                let wrapper = bridge.wrap_callable(callable.clone(), policy)?;
                ctx.globals().set(name, wrapper)
            })
        })?;
        tracing::debug!(name, ?policy, "bound host callable");
        Ok(())
    }

    /// Bind a host object as the global `name`, behind a proxy.
    pub fn bind_object(&self, name: &str, object: &HostValue) -> Result<(), Error> {
        check_name("bind_object", name)?;
        if object.is_none() {
            return Err(Error::Api("bind_object: must provide an object".to_string()));
        }
        self.with_inner("bind_object", |inner| {
            inner.run(|ctx, bridge| {
                let proxy = bridge.wrap_object(object.clone())?;
                ctx.globals().set(name, proxy)
            })
        })?;
        tracing::debug!(name, object_type = object.type_name(), "bound host object");
        Ok(())
    }

    /// Install the global `require`, resolving ids through `loader`.
    pub fn install_require(&self, loader: ModuleLoader) -> Result<(), Error> {
        let resolver = loader.into_resolver();
        self.with_inner("install_require", |inner| {
            inner.run(|ctx, bridge| {
                let resolve = bridge.wrap_callable(resolver, ReturnPolicy::Forward)?;
                let factory: Function = ctx.eval(REQUIRE_SOURCE)?;
                let require: Function = factory.call((resolve,))?;
                ctx.globals().set("require", require)
            })
        })?;
        tracing::debug!("installed require");
        Ok(())
    }

    /// Force a full garbage collection of the script heap.
    pub fn collect_garbage(&self) -> Result<(), Error> {
        self.with_inner("collect_garbage", |inner| {
            inner.runtime.run_gc();
            Ok(())
        })
    }

    /// Tear the context down now. Fails if it is already destroyed.
    pub fn destroy(&self) -> Result<(), Error> {
        let mut slot = self
            .inner
            .try_borrow_mut()
            .map_err(|_| Error::Api("destroy: context is busy".to_string()))?;
        match slot.take() {
            Some(inner) => {
                drop(inner);
                Ok(())
            }
            None => Err(Error::Api("destroy: context has been destroyed".to_string())),
        }
    }

    /// Whether the context can still be used.
    pub fn is_alive(&self) -> bool {
        self.inner.try_borrow().map_or(true, |slot| slot.is_some())
    }

    /// Wrapper lifetime counters. Available after teardown too.
    pub fn stats(&self) -> BridgeStats {
        self.counters.snapshot()
    }
}

fn check_name(operation: &str, name: &str) -> Result<(), Error> {
    if name.is_empty() {
        return Err(Error::Api(format!("{operation}: global name must not be empty")));
    }
    Ok(())
}
