mod cases;

use hostjs::{Context, Error, HostError, HostValue, render_error_to_string_no_color};

eval_case!(
    syntax_error,
    input: "var = 1",
    error_contains: "SyntaxError",
);

eval_case!(
    reference_error,
    input: "notDefined + 1",
    error_contains: "ReferenceError",
);

eval_case!(
    thrown_error,
    input: "throw new RangeError('too far')",
    expected: Err("RangeError: too far".to_string()),
);

eval_case!(
    thrown_string,
    input: "throw 'plain'",
    expected: Err("Uncaught plain".to_string()),
);

#[test]
fn host_failure_renders_with_cause() {
    let context = Context::new().unwrap();
    let lookup = HostValue::function("lookup", |_| Err(HostError::key_error("user")));
    context.bind_callable("lookup", &lookup).unwrap();

    let source = "var id = 1;\nlookup(id);\n";
    let error = context.evaluate(source, "{}").unwrap_err();
    let Error::Script(script) = &error else {
        panic!("expected a script error, got {error:?}");
    };
    assert_eq!(script.host_cause.as_ref().map(|c| c.kind.as_str()), Some("KeyError"));
    assert_eq!(script.location.map(|l| l.line), Some(2));

    let rendered = render_error_to_string_no_color(&error, source);
    assert!(rendered.contains("lookup(id);"), "{rendered}");
    assert!(rendered.contains("caused by host error: KeyError"), "{rendered}");
}

#[test]
fn destroyed_context_renders_api_error() {
    let context = Context::new().unwrap();
    context.destroy().unwrap();
    let error = context.evaluate("1", "{}").unwrap_err();
    assert_eq!(
        render_error_to_string_no_color(&error, "1"),
        "API error: evaluate: context has been destroyed\n"
    );
}
