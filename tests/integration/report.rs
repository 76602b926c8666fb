// tests/integration/report.rs

use causal_stream::dag::DepGraph;
use causal_stream::write_report;
use causal_stream_test_utils::builders::{ChainStreamBuilder, RecordBuilder};

#[test]
fn test_report_lists_waves_and_total() {
    let graph = DepGraph::from_records(ChainStreamBuilder::new(2, 3).build());
    let schedule = graph.compile().simulate().unwrap();

    let mut out = Vec::new();
    write_report(&mut out, &schedule).unwrap();

    assert_eq!(
        String::from_utf8(out).unwrap(),
        "wave 1: 2 vertices (2 operations)\n\
         wave 2: 2 vertices (2 operations)\n\
         wave 3: 2 vertices (2 operations)\n\
         completed in 3 waves (max concurrency 2)\n"
    );
}

#[test]
fn test_report_separates_placeholders_from_operations() {
    let records = vec![RecordBuilder::new(0).reads("posts_id_1", 1).writes("x", 1).build()];
    let graph = DepGraph::from_records(records);
    let schedule = graph.compile().simulate().unwrap();

    let mut out = Vec::new();
    write_report(&mut out, &schedule).unwrap();
    let text = String::from_utf8(out).unwrap();

    assert!(text.contains("wave 1: 1 vertices (0 operations)"));
    assert!(text.contains("wave 2: 1 vertices (1 operations)"));
    assert!(text.ends_with("completed in 2 waves (max concurrency 1)\n"));
}
