//! Error rendering using ariadne
//!
//! Script errors that carry a source position are rendered as an annotated
//! snippet of the evaluated source. Everything else renders as one line.

use std::io::Write;
use std::ops::Range;

use ariadne::{ColorGenerator, Label, Report, ReportKind, Source};

use crate::{Error, Location, ScriptError};

const SOURCE_ID: &str = "<script>";

/// Render an error for `source` to stderr
///
/// # Example
/// ```no_run
/// use hostjs::{Context, render_error};
///
/// let context = Context::new().unwrap();
/// let source = "undefinedFunction()";
/// if let Err(e) = context.evaluate(source, "{}") {
///     render_error(&e, source);
/// }
/// ```
pub fn render_error(error: &Error, source: &str) {
    render_error_to_writer(error, source, &mut std::io::stderr(), true).ok();
}

/// Render an error to a specific writer
pub fn render_error_to(error: &Error, source: &str, writer: &mut dyn Write) -> std::io::Result<()> {
    render_error_to_writer(error, source, writer, true)
}

/// Render an error to a String (useful for logs and UIs)
pub fn render_error_to_string(error: &Error, source: &str) -> String {
    let mut buf = Vec::new();
    render_error_to_writer(error, source, &mut buf, true).ok();
    String::from_utf8_lossy(&buf).to_string()
}

/// Render an error to a String without color codes (useful for tests)
pub fn render_error_to_string_no_color(error: &Error, source: &str) -> String {
    let mut buf = Vec::new();
    render_error_to_writer(error, source, &mut buf, false).ok();
    String::from_utf8_lossy(&buf).to_string()
}

fn render_error_to_writer(
    error: &Error,
    source: &str,
    writer: &mut dyn Write,
    use_color: bool,
) -> std::io::Result<()> {
    match error {
        Error::Script(script) => match script.location.and_then(|l| line_span(source, &l)) {
            Some(span) => render_script_error(script, source, span, writer, use_color),
            None => {
                writeln!(writer, "Script error: {}", script.message)?;
                if let Some(cause) = &script.host_cause {
                    writeln!(writer, "  caused by host error: {cause}")?;
                }
                Ok(())
            }
        },
        Error::Fatal(msg) => writeln!(writer, "Fatal error: {}", msg),
        Error::Api(msg) => writeln!(writer, "API error: {}", msg),
    }
}

fn render_script_error(
    error: &ScriptError,
    source: &str,
    span: Range<usize>,
    writer: &mut dyn Write,
    use_color: bool,
) -> std::io::Result<()> {
    let mut colors = ColorGenerator::new();
    colors.next(); // Skip the first color.

    let mut report = Report::build(ReportKind::Error, (SOURCE_ID, span.clone()))
        .with_message(&error.message)
        .with_config(ariadne::Config::default().with_color(use_color))
        .with_label(
            Label::new((SOURCE_ID, span))
                .with_message("thrown here")
                .with_color(colors.next()),
        );

    if let Some(cause) = &error.host_cause {
        report = report.with_note(format!("caused by host error: {cause}"));
    }

    report.finish().write((SOURCE_ID, Source::from(source)), &mut *writer)
}

/// Character span from `location` to the end of its line.
fn line_span(source: &str, location: &Location) -> Option<Range<usize>> {
    let mut start = 0;
    for (number, line) in source.split('\n').enumerate() {
        let len = line.chars().count();
        if number + 1 == location.line {
            let line_len = line.trim_end_matches('\r').chars().count();
            let column = location
                .column
                .map_or(0, |c| c.saturating_sub(1))
                .min(line_len);
            return Some(start + column..start + line_len);
        }
        start += len + 1;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Context, HostError, HostValue};

    #[test]
    fn test_render_syntax_error() {
        let context = Context::new().unwrap();
        let source = "1 + + ;";
        let error = context.evaluate(source, "{}").unwrap_err();

        let output = render_error_to_string_no_color(&error, source);
        assert!(output.contains("SyntaxError"), "{output}");
        assert!(output.contains("1 + + ;"), "{output}");
    }

    #[test]
    fn test_render_host_cause() {
        let context = Context::new().unwrap();
        let fail = HostValue::function("fail", |_| Err(HostError::key_error("missing")));
        context.bind_callable("fail", &fail).unwrap();

        let source = "var x = 1;\nfail();";
        let error = context.evaluate(source, "{}").unwrap_err();
        let output = render_error_to_string_no_color(&error, source);
        assert!(output.contains("KeyError"), "{output}");
        assert!(output.contains("caused by host error"), "{output}");
    }

    #[test]
    fn test_render_without_location() {
        let error = Error::Api("evaluate: context has been destroyed".to_string());
        assert_eq!(
            render_error_to_string_no_color(&error, ""),
            "API error: evaluate: context has been destroyed\n"
        );

        let error = Error::Script(ScriptError {
            message: "Uncaught 42".to_string(),
            stack: None,
            location: None,
            host_cause: None,
        });
        assert_eq!(
            render_error_to_string_no_color(&error, "throw 42"),
            "Script error: Uncaught 42\n"
        );
    }

    #[test]
    fn test_line_span() {
        let source = "first\nsecond line\r\nthird";
        let at = |line, column| Location { line, column };
        assert_eq!(line_span(source, &at(1, Some(1))), Some(0..5));
        assert_eq!(line_span(source, &at(2, Some(8))), Some(13..17));
        assert_eq!(line_span(source, &at(3, None)), Some(19..24));
        assert_eq!(line_span(source, &at(4, None)), None);
        assert_eq!(line_span(source, &at(1, Some(99))), Some(5..5));
    }
}
