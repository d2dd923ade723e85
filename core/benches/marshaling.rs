//! Benchmark: crossing the bridge
//!
//! Measures:
//! 1. Outbound conversion of a nested script structure
//! 2. Round trips through a bound host callable
//! 3. Property reads through a host object proxy
//!
//! Run with: `cargo bench --bench marshaling`

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use hostjs_core::api::{Context, ContextOptions};
use hostjs_core::host::HostValue;

fn context() -> Context {
    Context::with_options(ContextOptions {
        gc_before_eval: false,
        ..ContextOptions::default()
    })
    .unwrap()
}

// ============================================================================
// Script to host
// ============================================================================

fn bench_outbound(c: &mut Criterion) {
    let context = context();
    context
        .evaluate(
            "var rows = []; for (var i = 0; i < 100; i++) rows.push({id: i, tags: ['a', 'b']});",
            "{}",
        )
        .unwrap();

    c.bench_function("outbound_100_rows", |b| {
        b.iter(|| black_box(context.evaluate("rows", "{}").unwrap()))
    });
}

// ============================================================================
// Host callables
// ============================================================================

fn bench_callable(c: &mut Criterion) {
    let context = context();
    let add = HostValue::function("add", |args| {
        let sum = args.iter().filter_map(HostValue::as_float).sum::<f64>();
        Ok(HostValue::Float(sum))
    });
    context.bind_callable("add", &add).unwrap();

    c.bench_function("callable_1000_calls", |b| {
        b.iter(|| {
            black_box(
                context
                    .evaluate("var t = 0; for (var i = 0; i < 1000; i++) t = add(t, i); t", "{}")
                    .unwrap(),
            )
        })
    });
}

// ============================================================================
// Object proxies
// ============================================================================

fn bench_proxy(c: &mut Criterion) {
    let context = context();
    let config = HostValue::dict([("limit", HostValue::Int(3))]);
    context.bind_object("config", &config).unwrap();

    c.bench_function("proxy_1000_reads", |b| {
        b.iter(|| {
            black_box(
                context
                    .evaluate("var t = 0; for (var i = 0; i < 1000; i++) t += config.limit; t", "{}")
                    .unwrap(),
            )
        })
    });
}

criterion_group!(benches, bench_outbound, bench_callable, bench_proxy);
criterion_main!(benches);
