//! End-to-end behavior of the trace engine on realistic console output.

use pretty_assertions::assert_eq;
use rstest::rstest;

use tracetrim::trace::{self, DetectionOptions, TraceAnalyzer};

const REACT_CHILD_ERROR: &str = "Error: Objects are not valid as a React child
    at ReactErrorUtils.invokeGuardedCallback (react-dom.development.js:138:15)
    at ReactErrorUtils.invokeGuardedCallback (react-dom.development.js:138:15)
    at ReactErrorUtils.invokeGuardedCallback (react-dom.development.js:138:15)
    at ReactCompositeComponent._renderValidatedComponent (react-dom.development.js:185:13)";

const CHROME_REACT_19: &str = "Uncaught Error: Maximum update depth exceeded.
    at getRootForUpdatedFiber (react-dom-client.development.js:3848:11)
commitPassiveMountOnFiber @ react-dom-client.development.js:14380
commitPassiveMountOnFiber @ react-dom-client.development.js:14514
recursivelyTraversePassiveMountEffects @ react-dom-client.development.js:14360
commitPassiveMountOnFiber @ react-dom-client.development.js:14391
handleClick @ Counter.tsx:18
recursivelyTraversePassiveMountEffects @ react-dom-client.development.js:14360";

#[test]
fn react_child_error_collapses_guarded_callbacks() {
    let result = trace::analyze(REACT_CHILD_ERROR);

    assert_eq!(result.removed_count, 2);
    assert_eq!(
        result.cleaned,
        "// Removed 2 repetitive stack frame(s)
Error: Objects are not valid as a React child
    at ReactErrorUtils.invokeGuardedCallback (react-dom.development.js:138:15)
    at ReactCompositeComponent._renderValidatedComponent (react-dom.development.js:185:13)"
    );
    assert_eq!(result.lines_before, 5);
    assert_eq!(result.lines_after, 4);
}

#[test]
fn plain_text_is_not_processed() {
    let text = "This is just regular text that should not be processed as a stack trace";

    assert!(!trace::is_stack_trace(text));
    assert_eq!(trace::clean(text).content, text);
    assert_eq!(trace::clean(text).removed_count, 0);
    assert!(trace::extract_info(text).is_none());
}

#[test]
fn internal_arrow_frames_ignore_line_numbers() {
    let input = "commitPassiveMountOnFiber @ react-dom-client.development.js:14380
commitPassiveMountOnFiber @ react-dom-client.development.js:14514";
    let analyzer = TraceAnalyzer::new();

    let first = analyzer.signature_of("commitPassiveMountOnFiber @ react-dom-client.development.js:14380");
    assert_eq!(first.as_str(), "commitPassiveMountOnFiber|react-dom-client.development.js");

    let outcome = analyzer.clean(input);
    assert_eq!(outcome.removed_count, 1);
    assert_eq!(
        outcome.content,
        "// Removed 1 repetitive stack frame(s)
commitPassiveMountOnFiber @ react-dom-client.development.js:14380"
    );
}

#[test]
fn oversized_content_is_rejected() {
    let huge = "a".repeat(60 * 1024 * 1024);

    assert!(!trace::is_valid(&huge));
    assert!(!trace::is_stack_trace(&huge));
    assert_eq!(trace::clean(&huge).removed_count, 0);
}

#[test]
fn chrome_console_trace_keeps_user_frames() {
    let result = trace::analyze(CHROME_REACT_19);
    let info = result.error_info.as_ref().expect("chrome trace is recognized");

    assert_eq!(info.message, "Uncaught Error: Maximum update depth exceeded.");
    assert_eq!(info.source.as_deref(), Some("Counter.tsx:18"));
    assert_eq!(info.stack_lines.len(), 8);

    // Three internal repeats: two commitPassiveMountOnFiber and one
    // recursivelyTraversePassiveMountEffects.
    assert_eq!(result.removed_count, 3);
    assert!(result.cleaned.contains("handleClick @ Counter.tsx:18"));
    assert_eq!(result.cleaned.matches("commitPassiveMountOnFiber").count(), 1);
}

#[test]
fn user_frames_with_different_lines_are_kept() {
    let input = "TypeError: items.map is not a function
    at TodoList (TodoList.jsx:12:20)
    at TodoList (TodoList.jsx:14:9)
    at TodoList (TodoList.jsx:12:20)";
    let outcome = trace::clean(input);

    assert_eq!(outcome.removed_count, 1);
    assert!(outcome.content.contains("TodoList.jsx:12:20"));
    assert!(outcome.content.contains("TodoList.jsx:14:9"));
}

#[test]
fn error_info_for_class_component() {
    let input = "TypeError: Cannot read properties of null (reading 'name')
    at UserCard.render (UserCard.js:22:31)
    at finishClassComponent (react-dom.development.js:17485:31)
    at Dashboard.componentDidMount (Dashboard.js:40:5)";
    let info = trace::extract_info(input).expect("trace");

    assert_eq!(info.message, "TypeError: Cannot read properties of null (reading 'name')");
    assert_eq!(info.source.as_deref(), Some("UserCard.js:22"));
    assert_eq!(info.component.as_deref(), Some("UserCard"));
}

#[rstest]
#[case::single_frame_with_keyword("TypeError: undefined is not a function\n    at main (index.js:1:1)", true)]
#[case::firefox_style("render@http://localhost:3000/static/js/main.js:120:9\ncommit@http://localhost:3000/static/js/main.js:88:3", true)]
#[case::uncaught_reference("Uncaught ReferenceError: foo is not defined\n    at bar (app.js:3:5)", true)]
#[case::one_frame_only("some log output\n    at main (index.js:1:1)", false)]
#[case::too_short("at a (a.js:1:1)", false)]
#[case::prose("Meeting notes: discuss the error budget at 3pm tomorrow", false)]
#[case::nul_byte("TypeError: x\0\n    at a (a.js:1:1)", false)]
fn classification_table(#[case] input: &str, #[case] expected: bool) {
    assert_eq!(trace::is_stack_trace(input), expected, "input: {input:?}");
}

#[rstest]
#[case(1, true)]
#[case(2, false)]
fn threshold_controls_detection(#[case] min_lines: usize, #[case] expected: bool) {
    let options = DetectionOptions {
        min_detection_lines: min_lines,
        ..DetectionOptions::default()
    };
    let analyzer = TraceAnalyzer::with_options(options).unwrap();
    assert_eq!(
        analyzer.is_stack_trace("Something failed somewhere\n    at main (index.js:1:1)"),
        expected
    );
}

#[test]
fn custom_pattern_extends_detection() {
    let input = "Fatal: worker crashed\n    at native code\n    at native code";
    assert!(!trace::is_stack_trace(input));

    let options = DetectionOptions {
        custom_patterns: vec![r"^\s*at native code$".to_string()],
        ..DetectionOptions::default()
    };
    let analyzer = TraceAnalyzer::with_options(options).unwrap();
    assert!(analyzer.is_stack_trace(input));
}

#[test]
fn crlf_input_keeps_carriage_returns() {
    let input = "TypeError: boom\r\n    at a (a.js:1:1)\r\n    at a (a.js:1:1)\r\n";
    let outcome = trace::clean(input);

    assert_eq!(outcome.removed_count, 1);
    assert_eq!(
        outcome.content,
        "// Removed 1 repetitive stack frame(s)\nTypeError: boom\r\n    at a (a.js:1:1)\r\n"
    );
}

#[test]
fn arrow_frames_with_trailing_text_are_collapsed() {
    let input = "Uncaught TypeError: boom
handleClick @ Counter.tsx:18 (anonymous)
handleClick @ Counter.tsx:18 (anonymous)";
    let result = trace::analyze(input);

    assert_eq!(result.removed_count, 1);
    assert_eq!(
        result.cleaned,
        "// Removed 1 repetitive stack frame(s)\nUncaught TypeError: boom\nhandleClick @ Counter.tsx:18 (anonymous)"
    );
    assert_eq!(
        result.error_info.unwrap().source.as_deref(),
        Some("Counter.tsx:18")
    );
}
