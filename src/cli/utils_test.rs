use serde_json::json;

use crate::cli::error::CliError;
use crate::cli::utils::*;

#[test]
fn test_truncate_with_ellipsis_short_string() {
    let result = truncate_with_ellipsis("hello", 10);
    assert_eq!(result, "hello");
}

#[test]
fn test_truncate_with_ellipsis_exact_length() {
    let result = truncate_with_ellipsis("hello", 5);
    assert_eq!(result, "hello");
}

#[test]
fn test_truncate_with_ellipsis_long_string() {
    let result = truncate_with_ellipsis("hello world this is a long string", 10);
    assert_eq!(result, "hello w...");
}

#[test]
fn test_truncate_with_ellipsis_unicode() {
    let result = truncate_with_ellipsis("hello 世界", 8);
    assert_eq!(result, "hello 世界");

    let result2 = truncate_with_ellipsis("hello 世界", 7);
    assert_eq!(result2, "hell...");
}

#[test]
fn test_format_approved() {
    assert_eq!(format_approved(true), "✓");
    assert_eq!(format_approved(false), "✗");
}

#[test]
fn test_parse_task_arg_title_only() {
    let task = parse_task_arg("Write docs").unwrap();
    assert_eq!(task, json!({"title": "Write docs", "description": ""}));
}

#[test]
fn test_parse_task_arg_with_description() {
    let task = parse_task_arg("Write docs :: cover the CLI").unwrap();
    assert_eq!(
        task,
        json!({"title": "Write docs", "description": "cover the CLI"})
    );
}

#[test]
fn test_parse_task_arg_keeps_later_separators() {
    let task = parse_task_arg("Parse::handle a::b paths").unwrap();
    assert_eq!(task["description"], "handle a::b paths");
}

#[test]
fn test_parse_task_arg_empty_title() {
    let err = parse_task_arg("  ::only description").unwrap_err();
    assert!(matches!(err, CliError::InvalidArgument { .. }));
}
