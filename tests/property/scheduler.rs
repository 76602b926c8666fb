// tests/property/scheduler.rs

use proptest::prelude::*;

use causal_stream::dag::DepGraph;
use causal_stream::generator::GenerationSession;
use causal_stream::record::Record;
use causal_stream::types::parse_dep;
use causal_stream_test_utils::builders::{ChainStreamBuilder, GeneratorConfigBuilder};

// Observations always point to a strictly earlier chain index, as the
// generator guarantees, so the stream is acyclic.
fn chain_stream_strategy() -> impl Strategy<Value = ChainStreamBuilder> {
    (1..6usize, 1..6usize).prop_flat_map(|(users, ops)| {
        let pair = (0..users, 0..ops, 0..users, 0..ops);
        proptest::collection::vec(pair, 0..12).prop_map(move |raw| {
            let mut builder = ChainStreamBuilder::new(users, ops);
            for (observer, i, observed, j) in raw {
                if observer != observed && i != j {
                    let (late, early) = (i.max(j), i.min(j));
                    builder = builder.observe((observer, late), (observed, early));
                }
            }
            builder
        })
    })
}

proptest! {
    #[test]
    fn test_forward_observations_never_extend_chain_length(stream in chain_stream_strategy()) {
        let graph = DepGraph::from_records(stream.build());
        let dag = graph.compile();
        let schedule = dag.simulate().unwrap();

        prop_assert_eq!(schedule.wave_count(), stream.ops_per_user());
        prop_assert_eq!(schedule.wave_sizes()[0], stream.users());
        prop_assert_eq!(schedule.wave_sizes().iter().sum::<usize>(), dag.vertex_count());
        prop_assert_eq!(dag.placeholder_count(), 0);
    }

    #[test]
    fn test_every_edge_crosses_forward_in_waves(stream in chain_stream_strategy()) {
        let graph = DepGraph::from_records(stream.build());
        let dag = graph.compile();
        let schedule = dag.simulate().unwrap();

        for edge in dag.graph().raw_edges() {
            prop_assert!(schedule.wave_of(edge.source()) < schedule.wave_of(edge.target()));
        }
    }

    #[test]
    fn test_generated_streams_have_unique_writes(seed in any::<u64>(), users in 1..15usize, per_user in 1..8usize) {
        let cfg = GeneratorConfigBuilder::new()
            .num_users(users)
            .total_ops(users * per_user)
            .num_interactions_ratio(1.0)
            .seed(seed)
            .build();
        let session = GenerationSession::new(cfg).unwrap();
        let mut records: Vec<Record> = Vec::new();
        session.emit(&mut records).unwrap();

        let mut writes: Vec<_> = records
            .iter()
            .flat_map(|r| r.dependencies.write.iter().map(|d| parse_dep(d).unwrap()))
            .collect();
        let total = writes.len();
        writes.sort();
        writes.dedup();
        prop_assert_eq!(writes.len(), total);

        let schedule = DepGraph::from_records(records).compile().simulate().unwrap();
        prop_assert_eq!(schedule.wave_count(), per_user);
    }
}
