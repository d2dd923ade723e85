mod cases;

use hostjs::HostValue;

eval_case!(
    integer_arithmetic,
    input: "6 * 7",
    expected: Ok(HostValue::Float(42.0)),
);

eval_case!(
    fractional_number,
    input: "1 / 4",
    expected: Ok(HostValue::Float(0.25)),
);

eval_case!(
    string_concatenation,
    input: "'foo' + 'bar'",
    expected: Ok(HostValue::str("foobar")),
);

eval_case!(
    unicode_string,
    input: "'caf\\u00e9 \\u{1F600}'",
    expected: Ok(HostValue::str("café 😀")),
);

eval_case!(
    boolean_comparison,
    input: "3 > 2",
    expected: Ok(HostValue::Bool(true)),
);

eval_case!(
    null_is_none,
    input: "null",
    expected: Ok(HostValue::None),
);

eval_case!(
    undefined_is_none,
    input: "void 0",
    expected: Ok(HostValue::None),
);

eval_case!(
    empty_program_is_none,
    input: "",
    expected: Ok(HostValue::None),
);

#[test]
fn not_a_number() {
    let result = cases::evaluate("0 / 0").unwrap();
    assert!(result.as_float().unwrap().is_nan());
}

#[test]
fn infinity() {
    assert_eq!(
        cases::evaluate("-1 / 0").unwrap().as_float(),
        Some(f64::NEG_INFINITY)
    );
}
