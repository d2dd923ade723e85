mod cases;

use hostjs::HostValue;
use indoc::indoc;

eval_case!(
    empty_array,
    input: "[]",
    expected: Ok(HostValue::list([])),
);

eval_case!(
    nested_array,
    input: "[1, [2, [3]]]",
    expected: Ok(HostValue::list([
        HostValue::Int(1),
        HostValue::list([HostValue::Int(2), HostValue::list([HostValue::Int(3)])]),
    ])),
);

eval_case!(
    sparse_array_holes_are_none,
    input: "var a = [1]; a[2] = 3; a",
    expected: Ok(HostValue::list([HostValue::Int(1), HostValue::None, HostValue::Int(3)])),
);

eval_case!(
    empty_object,
    input: "({})",
    expected: Ok(HostValue::dict::<&str>([])),
);

eval_case!(
    object_with_mixed_values,
    input: indoc! {"
        ({
            name: 'widget',
            tags: ['a', 'b'],
            size: { w: 2, h: 3 },
            missing: null,
        })"},
    expected: Ok(HostValue::dict([
        ("name", HostValue::str("widget")),
        ("tags", HostValue::list([HostValue::str("a"), HostValue::str("b")])),
        ("size", HostValue::dict([("w", HostValue::Int(2)), ("h", HostValue::Int(3))])),
        ("missing", HostValue::None),
    ])),
);

eval_case!(
    numeric_object_keys_stay_text,
    input: "({1: 'one'})",
    expected: Ok(HostValue::dict([("1", HostValue::str("one"))])),
);

eval_case!(
    typed_array,
    input: "new Uint8Array([104, 105])",
    expected: Ok(HostValue::bytes(b"hi".to_vec())),
);

#[test]
fn cycle_through_object_and_array() {
    let result = cases::evaluate("var o = {items: []}; o.items.push(o); o").unwrap();
    let items = result.get_attr("items").unwrap().unwrap();
    let first = items.as_list().unwrap().borrow()[0].clone();
    assert!(first.same_object(&result));
    assert_eq!(result.to_string(), "{\"items\": [{...}]}");
}
