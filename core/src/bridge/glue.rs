//! Script-side half of the bridge.
//!
//! The glue is evaluated once per context. It closes over the native hooks
//! and keeps the wrapper registry and the proxy trap table in closure scope,
//! so script code can neither see nor replace them. Intrinsics are captured
//! at install time for the same reason.

use std::rc::Rc;

use rquickjs::function::Rest;
use rquickjs::{Ctx, Function, Object, Persistent, Value};

use super::Bridge;
use super::state::BridgeState;

/// Name prefix of glue functions, so their stack frames can be told apart
/// from frames of evaluated source.
pub(crate) const FRAME_PREFIX: &str = "hostjs$";

const GLUE_SOURCE: &str = r#"
(function (native) {
    "use strict";
    var registry = new WeakMap();
    var identities = new WeakMap();
    var nextIdentity = 1;
    var ProxyCtor = Proxy;
    var ArrayBufferCtor = ArrayBuffer;
    var Uint8ArrayCtor = Uint8Array;
    var ErrorCtor = Error;
    var isArray = Array.isArray;
    var isView = ArrayBuffer.isView;
    var arrayFrom = Array.from;
    var toText = String;
    var invoke = native.invoke;

    function handleOf(target) {
        return registry.get(target);
    }

    function identityOf(value) {
        var id = identities.get(value);
        if (id === undefined) {
            id = nextIdentity++;
            identities.set(value, id);
        }
        return id;
    }

    function describe(value) {
        try {
            return toText(value);
        } catch (e) {
            return "[" + typeof value + "]";
        }
    }

    var traps = {
        get: function hostjs$get(target, key) { return native.get(handleOf(target), key); },
        set: function hostjs$set(target, key, value) { return native.set(handleOf(target), key, value); },
        has: function hostjs$has(target, key) { return native.has(handleOf(target), key); },
        deleteProperty: function hostjs$deleteProperty(target, key) { return native.deleteProperty(handleOf(target), key); },
        ownKeys: function hostjs$ownKeys(target) { return native.ownKeys(handleOf(target)); },
        enumerate: function hostjs$enumerate(target) { return native.enumerate(handleOf(target)); },
        getOwnPropertyDescriptor: function hostjs$getOwnPropertyDescriptor(target, key) { return native.describe(handleOf(target), key); }
    };

    return {
        wrapObject: function (handle) {
            var target = {};
            var proxy = new ProxyCtor(target, traps);
            registry.set(target, handle);
            registry.set(proxy, handle);
            return proxy;
        },
        wrapCallable: function (handle) {
            var hostjs$call = (...args) => invoke(handle, args);
            registry.set(hostjs$call, handle);
            return hostjs$call;
        },
        inspect: function (value) {
            var handle = registry.get(value);
            if (handle !== undefined) return ["host", handle];
            if (isArray(value)) return ["array", identityOf(value)];
            if (value instanceof ArrayBufferCtor) return ["bytes", arrayFrom(new Uint8ArrayCtor(value))];
            if (isView(value)) {
                return ["bytes", arrayFrom(new Uint8ArrayCtor(value.buffer, value.byteOffset, value.byteLength))];
            }
            if (typeof value === "function" || value instanceof ErrorCtor) return ["text", describe(value)];
            return ["object", identityOf(value)];
        },
        describe: describe
    };
})
"#;

/// Native hook signature: the bridge view plus the raw call arguments.
type Hook<'js> = fn(&Bridge<'js>, &[Value<'js>]) -> rquickjs::Result<Value<'js>>;

fn native_hooks<'js>(ctx: &Ctx<'js>, state: &Rc<BridgeState>) -> rquickjs::Result<Object<'js>> {
    let hooks = Object::new(ctx.clone())?;
    let table: [(&str, Hook<'js>); 8] = [
        ("invoke", Bridge::invoke),
        ("get", Bridge::trap_get),
        ("set", Bridge::trap_set),
        ("has", Bridge::trap_has),
        ("deleteProperty", Bridge::trap_delete),
        ("ownKeys", Bridge::trap_own_keys),
        ("enumerate", Bridge::trap_enumerate),
        ("describe", Bridge::trap_descriptor),
    ];
    for (name, hook) in table {
        let state = state.clone();
        let func = Function::new(
            ctx.clone(),
            move |ctx: Ctx<'js>, args: Rest<Value<'js>>| -> rquickjs::Result<Value<'js>> {
                let bridge = Bridge::enter(&ctx, &state)?;
                hook(&bridge, &args.0)
            },
        )?;
        hooks.set(name, func)?;
    }
    Ok(hooks)
}

/// Evaluate the glue in `ctx` and keep it in the bridge state.
pub(crate) fn install<'js>(ctx: &Ctx<'js>, state: &Rc<BridgeState>) -> rquickjs::Result<()> {
    let hooks = native_hooks(ctx, state)?;
    let factory: Function<'js> = ctx.eval(GLUE_SOURCE)?;
    let glue: Object<'js> = factory.call((hooks,))?;
    state.set_glue(Persistent::save(ctx, glue));
    tracing::debug!("bridge glue installed");
    Ok(())
}
