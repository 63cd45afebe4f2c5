use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use std::time::{SystemTime, UNIX_EPOCH};

// Closed stdin takes every setup default and ends the chat without any network call.
fn run_with_logging_env(
    log_output: &str,
    log_format: &str,
    log_file_path: Option<&Path>,
) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_parley"));
    cmd.stdin(Stdio::null())
        .env("PROXYAPI_KEY", "test-key")
        .env("OPENAI_BASE_URL", "http://127.0.0.1:9")
        .env("ANTHROPIC_BASE_URL", "http://127.0.0.1:9")
        .env("RUST_LOG", "parley=info")
        .env("LOG_OUTPUT", log_output)
        .env("LOG_FORMAT", log_format);

    if let Some(path) = log_file_path {
        cmd.env("LOG_FILE_PATH", path);
    } else {
        cmd.env_remove("LOG_FILE_PATH");
    }

    cmd.output().expect("failed to run parley binary")
}

fn unique_temp_dir(suffix: &str) -> PathBuf {
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock should be after unix epoch")
        .as_nanos();
    let dir = std::env::temp_dir().join(format!(
        "parley-logging-{suffix}-{stamp}-{}",
        std::process::id()
    ));
    fs::create_dir_all(&dir).expect("failed to create temp directory");
    dir
}

fn find_rotated_log_file(dir: &Path, base_file_name: &str) -> PathBuf {
    let expected_prefix = format!("{base_file_name}.");
    let mut matches: Vec<PathBuf> = fs::read_dir(dir)
        .expect("failed to read temp directory")
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .map(|name| name.starts_with(&expected_prefix))
                .unwrap_or(false)
        })
        .collect();

    matches.sort();
    matches
        .pop()
        .expect("expected a rotated log file to be created")
}

#[test]
fn json_format_emits_json_log_lines_on_stderr() {
    let output = run_with_logging_env("stderr", "json", None);
    assert!(output.status.success(), "closed stdin should exit cleanly");

    let stderr = String::from_utf8_lossy(&output.stderr);
    let parsed: Vec<Value> = stderr
        .lines()
        .filter(|line| line.trim_start().starts_with('{'))
        .map(|line| serde_json::from_str::<Value>(line).expect("line should be valid JSON"))
        .collect();
    assert!(
        !parsed.is_empty(),
        "expected at least one JSON log line, got stderr:\n{stderr}"
    );

    let messages: Vec<&str> = parsed
        .iter()
        .filter_map(|entry| entry.get("fields")?.get("message")?.as_str())
        .collect();
    assert!(
        messages.contains(&"loaded runtime configuration"),
        "expected startup log message in JSON output, got stderr:\n{stderr}"
    );
    assert!(
        messages.contains(&"session configured"),
        "expected setup log message in JSON output, got stderr:\n{stderr}"
    );
    assert!(
        !stderr.contains("test-key"),
        "API key must not be logged:\n{stderr}"
    );
}

#[test]
fn file_output_writes_logs_to_rotated_file() {
    let dir = unique_temp_dir("file");
    let log_path = dir.join("parley.log");
    let output = run_with_logging_env("file", "pretty", Some(&log_path));
    assert!(output.status.success(), "closed stdin should exit cleanly");

    let rotated = find_rotated_log_file(&dir, "parley.log");
    let file_contents = fs::read_to_string(&rotated).expect("failed to read rotated log file");
    assert!(
        file_contents.contains("loaded runtime configuration"),
        "expected startup log message in file, got:\n{file_contents}"
    );

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        !stderr.contains("loaded runtime configuration"),
        "did not expect logs on stderr for file-only mode:\n{stderr}"
    );

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn both_output_writes_logs_to_stderr_and_file() {
    let dir = unique_temp_dir("both");
    let log_path = dir.join("parley.log");
    let output = run_with_logging_env("both", "pretty", Some(&log_path));
    assert!(output.status.success(), "closed stdin should exit cleanly");

    let rotated = find_rotated_log_file(&dir, "parley.log");
    let file_contents = fs::read_to_string(&rotated).expect("failed to read rotated log file");
    assert!(
        file_contents.contains("chat session ended"),
        "expected shutdown log message in file, got:\n{file_contents}"
    );

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("loaded runtime configuration"),
        "expected startup log message on stderr, got:\n{stderr}"
    );

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn invalid_file_path_falls_back_to_stderr_logging() {
    let dir = unique_temp_dir("fallback");
    let blocking_file = dir.join("not-a-directory");
    fs::write(&blocking_file, "block").expect("failed to create blocking file");
    let log_path = blocking_file.join("parley.log");

    let output = run_with_logging_env("file", "pretty", Some(&log_path));
    assert!(output.status.success(), "closed stdin should exit cleanly");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("failed to initialize LOG_OUTPUT=file"),
        "expected fallback warning, got:\n{stderr}"
    );
    assert!(
        stderr.contains("using stderr instead"),
        "expected stderr fallback message, got:\n{stderr}"
    );
    assert!(
        stderr.contains("loaded runtime configuration"),
        "expected logs to continue on stderr after fallback, got:\n{stderr}"
    );

    let _ = fs::remove_dir_all(&dir);
}
