// tests/integration/cli_pipeline.rs

use std::fs;
use std::io::Write;

use causal_stream::cli::{CliArgs, Command, LogLevel};
use causal_stream::config::{AnalyzerConfig, GeneratorConfig};
use causal_stream::run;
use causal_stream::source::ingest_path;
use clap::Parser;
use tempfile::NamedTempFile;

#[test]
fn test_generate_overrides_apply_on_top_of_config() {
    let args = CliArgs::try_parse_from([
        "causal-stream",
        "generate",
        "-n",
        "50",
        "-u",
        "5",
        "--coeff-friend-activity",
        "0.5",
        "--app",
        "demo",
        "--seed",
        "3",
        "--log-level",
        "debug",
    ])
    .unwrap();

    assert!(matches!(args.log_level, Some(LogLevel::Debug)));
    let Command::Generate(generate) = args.command else {
        panic!("expected generate subcommand");
    };

    let mut cfg = GeneratorConfig::default();
    generate.apply_to(&mut cfg);
    assert_eq!(cfg.total_ops, 50);
    assert_eq!(cfg.num_users, 5);
    assert_eq!(cfg.coeff_friend_activity, 0.5);
    assert_eq!(cfg.max_num_friends, 100);
    assert_eq!(cfg.app, "demo");
    assert_eq!(cfg.seed, Some(3));
}

#[test]
fn test_analyze_args_accept_negative_count() {
    let args =
        CliArgs::try_parse_from(["causal-stream", "simulate", "-", "-s", "10", "-c", "-1"]).unwrap();
    let Command::Simulate(analyze) = args.command else {
        panic!("expected simulate subcommand");
    };

    let mut cfg = AnalyzerConfig { skip: 0, count: 7 };
    analyze.apply_to(&mut cfg);
    assert_eq!(cfg, AnalyzerConfig { skip: 10, count: -1 });
}

#[test]
fn test_generate_then_show_and_simulate() {
    let dir = tempfile::tempdir().unwrap();
    let stream_path = dir.path().join("stream.jsonl");
    let dot_path = dir.path().join("dag.dot");

    let mut config = NamedTempFile::new().unwrap();
    write!(
        config,
        "[generator]\ntotal_ops = 80\nnum_users = 8\nmax_num_friends = 3\nseed = 17\n"
    )
    .unwrap();

    let generate = CliArgs::try_parse_from([
        "causal-stream",
        "generate",
        "--config",
        config.path().to_str().unwrap(),
        "-o",
        stream_path.to_str().unwrap(),
    ])
    .unwrap();
    run(generate).unwrap();

    let contents = fs::read_to_string(&stream_path).unwrap();
    assert_eq!(contents.lines().count(), 80);

    let graph = ingest_path(&stream_path, &AnalyzerConfig::default()).unwrap();
    assert_eq!(graph.compile().simulate().unwrap().wave_count(), 10);

    let show = CliArgs::try_parse_from([
        "causal-stream",
        "show",
        stream_path.to_str().unwrap(),
        "-c",
        "16",
        "-o",
        dot_path.to_str().unwrap(),
    ])
    .unwrap();
    run(show).unwrap();

    let dot = fs::read_to_string(&dot_path).unwrap();
    assert!(dot.starts_with("digraph"));
    assert!(dot.contains("create Post"));

    let simulate = CliArgs::try_parse_from([
        "causal-stream",
        "simulate",
        stream_path.to_str().unwrap(),
    ])
    .unwrap();
    run(simulate).unwrap();
}
