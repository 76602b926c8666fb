// tests/integration/source_window.rs

use std::io::{Cursor, Write};

use causal_stream::config::AnalyzerConfig;
use causal_stream::source::{ingest_path, ingest_reader, windowed};
use causal_stream_test_utils::builders::ChainStreamBuilder;
use causal_stream_test_utils::init_tracing;
use tempfile::NamedTempFile;

fn window(skip: usize, count: i64) -> AnalyzerConfig {
    AnalyzerConfig { skip, count }
}

#[test]
fn test_windowed_applies_skip_then_count() {
    let taken: Vec<_> = windowed(0..10, &window(2, 3)).collect();
    assert_eq!(taken, vec![2, 3, 4]);

    let all: Vec<_> = windowed(0..5, &window(1, -1)).collect();
    assert_eq!(all, vec![1, 2, 3, 4]);

    assert_eq!(windowed(0..5, &window(0, 0)).count(), 0);
    assert_eq!(windowed(0..5, &window(9, -1)).count(), 0);
}

#[test]
fn test_skipped_writers_become_placeholders() {
    init_tracing();
    let stream = ChainStreamBuilder::new(2, 3).observe((1, 1), (0, 0));
    let text = stream.build_lines().join("\n");

    let graph = ingest_reader(Cursor::new(text), &window(2, -1)).unwrap();
    assert_eq!(graph.ops().len(), 4);

    let dag = graph.compile();
    assert_eq!(dag.placeholder_count(), 1);
    assert!(dag.placeholder_vertex(&stream.post_dep(0, 0)).is_some());

    let schedule = dag.simulate().unwrap();
    assert_eq!(schedule.wave_sizes(), vec![2, 2, 1]);
    assert_eq!(schedule.real_op_sizes().iter().sum::<usize>(), 4);
}

#[test]
fn test_count_limits_lines_read() {
    let text = ChainStreamBuilder::new(2, 3).build_lines().join("\n");

    let graph = ingest_reader(Cursor::new(text.clone()), &window(0, 3)).unwrap();
    assert_eq!(graph.stats().ingested, 3);

    let graph = ingest_reader(Cursor::new(text), &window(0, 0)).unwrap();
    assert!(graph.ops().is_empty());
}

#[test]
fn test_blank_and_bad_lines_count_toward_window() {
    let lines = ChainStreamBuilder::new(1, 3).build_lines();
    let text = format!("{}\n\n{}\nnot json\n{}\n", lines[0], lines[1], lines[2]);

    let graph = ingest_reader(Cursor::new(text.clone()), &window(0, 3)).unwrap();
    assert_eq!(graph.stats().ingested, 2);

    let graph = ingest_reader(Cursor::new(text), &window(0, -1)).unwrap();
    assert_eq!(graph.stats().ingested, 3);
    assert_eq!(graph.stats().undecodable, 1);
}

#[test]
fn test_ingest_path_reads_file() {
    let mut file = NamedTempFile::new().unwrap();
    for line in ChainStreamBuilder::new(3, 2).build_lines() {
        writeln!(file, "{line}").unwrap();
    }

    let graph = ingest_path(file.path(), &AnalyzerConfig::default()).unwrap();
    assert_eq!(graph.ops().len(), 6);
    assert_eq!(graph.compile().simulate().unwrap().wave_sizes(), vec![3, 3]);
}

fn bytes_with_invalid_line(lines: &[String]) -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(lines[0].as_bytes());
    bytes.extend_from_slice(b"\n{\"bad\":\"\xff\xfe\"}\n");
    bytes.extend_from_slice(lines[1].as_bytes());
    bytes.push(b'\n');
    bytes
}

#[test]
fn test_invalid_utf8_line_is_skipped_and_counted() {
    init_tracing();
    let lines = ChainStreamBuilder::new(1, 2).build_lines();
    let bytes = bytes_with_invalid_line(&lines);

    let graph = ingest_reader(Cursor::new(bytes), &AnalyzerConfig::default()).unwrap();
    assert_eq!(graph.stats().ingested, 2);
    assert_eq!(graph.stats().undecodable, 1);
    assert_eq!(graph.compile().simulate().unwrap().wave_sizes(), vec![1, 1]);
}

#[test]
fn test_invalid_utf8_line_counts_toward_window() {
    let lines = ChainStreamBuilder::new(1, 2).build_lines();
    let bytes = bytes_with_invalid_line(&lines);

    let graph = ingest_reader(Cursor::new(bytes.clone()), &window(1, 1)).unwrap();
    assert_eq!(graph.stats().ingested, 0);
    assert_eq!(graph.stats().undecodable, 1);

    let graph = ingest_reader(Cursor::new(bytes), &window(0, 2)).unwrap();
    assert_eq!(graph.stats().ingested, 1);
    assert_eq!(graph.stats().undecodable, 1);
}

#[test]
fn test_skip_window_suppresses_leading_gap_warnings() {
    let text = ChainStreamBuilder::new(2, 3).build_lines().join("\n");

    let graph = ingest_reader(Cursor::new(text.clone()), &window(2, -1)).unwrap();
    assert!(graph.is_mid_stream());
    assert!(graph.compile().warnings().is_empty());

    let graph = ingest_reader(Cursor::new(text), &window(0, -1)).unwrap();
    assert!(!graph.is_mid_stream());
    assert!(graph.compile().warnings().is_empty());
}
