use hostjs::{Context, Error, HostValue};

/// Evaluate `source` in a fresh context, flattening failures to their message.
pub fn evaluate(source: &str) -> Result<HostValue, String> {
    let context = Context::new().map_err(|e| e.to_string())?;
    context.evaluate(source, "{}").map_err(|e| match e {
        Error::Script(error) => error.message,
        other => other.to_string(),
    })
}

/// Declare a test evaluating `input` in a fresh context.
///
/// `expected:` compares the whole result; `error_contains:` checks the
/// failure message.
#[macro_export]
macro_rules! eval_case {
    ($name:ident, input: $input:expr, expected: $expected:expr $(,)?) => {
        #[test]
        fn $name() {
            let result = crate::cases::evaluate($input);
            pretty_assertions::assert_eq!(result, $expected);
        }
    };
    ($name:ident, input: $input:expr, error_contains: $needle:expr $(,)?) => {
        #[test]
        fn $name() {
            match crate::cases::evaluate($input) {
                Err(message) => assert!(
                    message.contains($needle),
                    "expected {:?} in {:?}",
                    $needle,
                    message
                ),
                Ok(value) => panic!("expected an error, got {value}"),
            }
        }
    };
}
