//! Exit status of the `stagerun` binary.

#![cfg(unix)]

use std::io::Write;
use std::process::{Command, Output};

fn run_with_stages(stages: &[(&str, &str)]) -> Output {
    let stages: Vec<_> = stages
        .iter()
        .map(|(name, program)| serde_json::json!({ "name": name, "program": program }))
        .collect();
    let config = serde_json::json!({
        "pipeline_name": "exit-status",
        "logging": { "format": "json", "log_dir": null },
        "stages": stages,
    });

    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{config}").unwrap();

    Command::new(env!("CARGO_BIN_EXE_stagerun"))
        .arg("--config")
        .arg(file.path())
        .arg("run")
        .env_remove("RUST_LOG")
        .env_remove("STAGERUN_LOG_LEVEL")
        .env_remove("STAGERUN_LOG_FORMAT")
        .env_remove("STAGERUN_LOG_DIR")
        .output()
        .unwrap()
}

fn error_lines(stdout: &str) -> usize {
    stdout
        .lines()
        .filter(|line| line.contains(r#""level":"ERROR""#))
        .count()
}

#[test]
fn test_successful_run_exits_zero() {
    let output = run_with_stages(&[("Data Ingestion", "true"), ("Model Training", "true")]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert_eq!(output.status.code(), Some(0));
    assert!(stdout.contains("stage Model Training completed"));
    assert_eq!(error_lines(&stdout), 0);
}

#[test]
fn test_failed_stage_exits_non_zero_and_logs_once() {
    let output = run_with_stages(&[
        ("Data Ingestion", "true"),
        ("Data Validation", "false"),
        ("Model Training", "true"),
    ]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout.contains("stage Data Validation started"));
    assert!(!stdout.contains("stage Model Training started"));
    assert_eq!(error_lines(&stdout), 1);
    assert!(!stderr.contains("Error:"));
}

#[test]
fn test_invalid_config_exits_non_zero() {
    let output = run_with_stages(&[("", "true")]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Error:"));
}
