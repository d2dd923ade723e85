use hostjs::{Context, ContextOptions, HostValue, Variables, evaljs, join_fragments};
use pretty_assertions::assert_eq;
use serde_json::json;

#[test]
fn typed_variables_reach_the_namespace() {
    let vars = Variables::new()
        .with("name", "world")
        .unwrap()
        .with("scores", &[1, 2, 3])
        .unwrap()
        .with("nested", &json!({"ok": true}))
        .unwrap();
    assert_eq!(vars.len(), 3);

    let source = "host.name + ':' + host.scores.length + ':' + host.nested.ok";
    assert_eq!(evaljs(source, &vars).unwrap(), HostValue::str("world:3:true"));
}

#[test]
fn raw_bundle_is_decoded_as_json() {
    let context = Context::new().unwrap();
    let result = context
        .evaluate("host.list.map(x => x * 2)", r#"{"list": [1, 2]}"#)
        .unwrap();
    assert_eq!(result, HostValue::list([HostValue::Int(2), HostValue::Int(4)]));
}

#[test]
fn namespace_is_replaced_on_each_evaluation() {
    let context = Context::new().unwrap();
    context.evaluate("1", r#"{"a": 1}"#).unwrap();
    let result = context.evaluate("host.a === undefined", r#"{"b": 2}"#).unwrap();
    assert_eq!(result, HostValue::Bool(true));
}

#[test]
fn custom_namespace_name() {
    let context = Context::with_options(ContextOptions {
        variables_name: "vars".to_string(),
        ..ContextOptions::default()
    })
    .unwrap();
    assert_eq!(
        context.evaluate("vars.x", r#"{"x": "y"}"#).unwrap(),
        HostValue::str("y")
    );
}

#[test]
fn fragments_run_in_order() {
    let source = join_fragments(&["var total = 1", "total += 2", "total * 10"]);
    assert_eq!(source, "var total = 1;\ntotal += 2;\ntotal * 10");
    assert_eq!(
        evaljs(&source, &Variables::new()).unwrap(),
        HostValue::Float(30.0)
    );
}
