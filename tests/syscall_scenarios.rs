//! Integration tests for checked command execution

use osc_common::logging::{subscriber, LoggerConfig, SharedBuffer, Sink, Sinks};
use osc_common::{CheckPolicy, Error, Failure, Syscall};

fn with_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
    let buffer = SharedBuffer::new();
    let config = LoggerConfig::default()
        .with_timestamps(false)
        .with_filter("info")
        .with_sinks(Sinks::all(Sink::Buffer(buffer.clone())));
    let value = tracing::subscriber::with_default(subscriber(&config).unwrap(), f);
    (value, buffer.contents())
}

#[test]
fn test_echo_hello_default_policy() {
    let result = Syscall::new(["echo", "hello"]).exec().unwrap();
    assert!(result.ok);
    assert_eq!(result.output, "hello");
}

#[test]
fn test_echo_hello_output_gt_zero() {
    let result = Syscall::new(["echo", "hello"])
        .with_check(CheckPolicy::OutputGtZero)
        .exec()
        .unwrap();
    assert!(!result.ok);
}

#[test]
fn test_echo_hello_folks_matching_pattern() {
    let result = Syscall::new(["echo", "hello", "folks"])
        .with_check(CheckPolicy::OutputGtZero)
        .with_output_error_pattern("folks")
        .exec()
        .unwrap();
    assert!(!result.ok);
}

#[test]
fn test_echo_hello_folks_non_matching_pattern() {
    let result = Syscall::new(["echo", "hello", "folks"])
        .with_check(CheckPolicy::OutputGtZero)
        .with_output_error_pattern("nomatch")
        .exec()
        .unwrap();
    assert!(result.ok);
}

#[test]
fn test_false_fails_under_any_policy() {
    let requests = [
        Syscall::new(["false"]),
        Syscall::new(["false"]).with_check(CheckPolicy::OutputGtZero),
        Syscall::new(["false"])
            .with_check(CheckPolicy::OutputGtZero)
            .with_output_error_pattern("never"),
    ];

    for request in requests {
        let result = request.exec().unwrap();
        assert!(!result.ok, "{request:?} should fail");
        assert!(matches!(result.failure, Some(Failure::NonZeroExit { .. })));
    }
}

#[test]
fn test_request_is_reusable() {
    let mut request = Syscall::new(["echo", "one"]);
    assert_eq!(request.exec().unwrap().output, "one");

    request.cmd_line = vec!["echo".into(), "two".into()];
    request.check = CheckPolicy::OutputGtZero;
    let second = request.exec().unwrap();
    assert!(!second.ok);
    assert_eq!(second.output, "two");
}

#[test]
fn test_output_is_trimmed() {
    let result = Syscall::new(["printf", "  \n padded \n\n"]).exec().unwrap();
    assert_eq!(result.output, "padded");
}

#[test]
fn test_failures_log_once_at_error() {
    let (result, logs) = with_logs(|| {
        Syscall::new(["echo", "hello"])
            .with_check(CheckPolicy::OutputGtZero)
            .exec()
            .unwrap()
    });

    assert!(!result.ok);
    assert_eq!(logs.matches("[ osc:ERROR ]").count(), 1);
    assert!(!logs.contains("FATAL"));
}

#[test]
fn test_success_logs_nothing_at_info() {
    let (result, logs) = with_logs(|| Syscall::new(["echo", "hello"]).exec().unwrap());
    assert!(result.ok);
    assert_eq!(logs, "");
}

#[test]
fn test_empty_command_line_never_returns_a_result() {
    let (result, logs) = with_logs(|| Syscall::new(Vec::<String>::new()).exec());

    assert!(matches!(result, Err(Error::EmptyCommandLine)));
    assert_eq!(logs.matches("[ osc:FATAL ]").count(), 1);
}

#[test]
fn test_request_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("request.json");
    let request = Syscall::new(["echo", "hello", "folks"])
        .with_check(CheckPolicy::OutputGtZero)
        .with_output_error_pattern("folks");
    std::fs::write(&path, serde_json::to_string_pretty(&request).unwrap()).unwrap();

    let loaded = Syscall::from_file(&path).unwrap();
    assert_eq!(loaded, request);
    assert!(!loaded.exec().unwrap().ok);
}
