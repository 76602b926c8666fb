// tests/integration/error_handling.rs

use std::io::Write;

use causal_stream::cli::CliArgs;
use causal_stream::run;
use clap::Parser;
use tempfile::NamedTempFile;

#[test]
fn test_generate_rejects_invalid_overrides() {
    let args = CliArgs::try_parse_from([
        "causal-stream",
        "generate",
        "-n",
        "2",
        "-u",
        "5",
    ])
    .unwrap();

    let err = run(args).unwrap_err();
    assert!(err.to_string().contains("total_ops"), "unexpected error: {err}");
}

#[test]
fn test_simulate_rejects_cyclic_stream() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"{{"operation":"create","dependencies":{{"write":["a:1"],"read":["b:1"]}}}}"#
    )
    .unwrap();
    writeln!(
        file,
        r#"{{"operation":"create","dependencies":{{"write":["b:1"],"read":["a:1"]}}}}"#
    )
    .unwrap();

    let args = CliArgs::try_parse_from([
        "causal-stream",
        "simulate",
        file.path().to_str().unwrap(),
    ])
    .unwrap();

    let err = run(args).unwrap_err();
    assert!(err.to_string().contains("Cycle detected"), "unexpected error: {err}");
}

#[test]
fn test_simulate_missing_input_reports_path() {
    let args =
        CliArgs::try_parse_from(["causal-stream", "simulate", "/nonexistent/stream.jsonl"]).unwrap();

    let err = run(args).unwrap_err();
    assert!(format!("{err:#}").contains("/nonexistent/stream.jsonl"));
}

#[test]
fn test_analyzer_count_below_minus_one_is_rejected() {
    let file = NamedTempFile::new().unwrap();
    let args = CliArgs::try_parse_from([
        "causal-stream",
        "simulate",
        file.path().to_str().unwrap(),
        "-c",
        "-5",
    ])
    .unwrap();

    let err = run(args).unwrap_err();
    assert!(err.to_string().contains("count"));
}
