// src/dag/scheduler.rs

//! Wave scheduling: the optimal schedule under unbounded parallelism.
//!
//! Generalised Kahn's algorithm. Every vertex whose predecessors have all
//! completed runs in the current wave; the number of waves is the DAG's
//! critical-path length and the wave sizes are its concurrency profile.

use petgraph::Direction;
use petgraph::graph::NodeIndex;
use tracing::{debug, info};

use crate::dag::compile::CompiledDag;
use crate::errors::{CausalError, Result};

/// One layer of concurrently executable vertices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wave {
    /// Vertices of this wave, ascending by index.
    pub vertices: Vec<NodeIndex>,
    /// How many of them are real operations (not placeholders).
    pub real_ops: usize,
}

impl Wave {
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

/// Result of [`simulate`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Schedule {
    waves: Vec<Wave>,
}

impl Schedule {
    pub fn waves(&self) -> &[Wave] {
        &self.waves
    }

    /// Critical-path length.
    pub fn wave_count(&self) -> usize {
        self.waves.len()
    }

    pub fn wave_sizes(&self) -> Vec<usize> {
        self.waves.iter().map(Wave::len).collect()
    }

    /// Per-wave counts of real operations only.
    pub fn real_op_sizes(&self) -> Vec<usize> {
        self.waves.iter().map(|w| w.real_ops).collect()
    }

    /// Largest wave, i.e. peak concurrency.
    pub fn max_concurrency(&self) -> usize {
        self.waves.iter().map(Wave::len).max().unwrap_or(0)
    }

    /// 0-based wave in which `node` runs.
    pub fn wave_of(&self, node: NodeIndex) -> Option<usize> {
        self.waves
            .iter()
            .position(|w| w.vertices.binary_search(&node).is_ok())
    }
}

/// Layer `dag` into waves.
///
/// Fails with [`CausalError::CycleDetected`] if vertices remain but none has
/// zero in-degree. Runs in O(V + E) apart from sorting each wave.
pub fn simulate(dag: &CompiledDag<'_>) -> Result<Schedule> {
    let graph = dag.graph();

    let mut in_degree: Vec<usize> = graph
        .node_indices()
        .map(|n| graph.edges_directed(n, Direction::Incoming).count())
        .collect();

    let mut current: Vec<NodeIndex> = graph
        .node_indices()
        .filter(|n| in_degree[n.index()] == 0)
        .collect();
    let mut remaining = graph.node_count();
    let mut waves = Vec::new();

    while remaining > 0 {
        if current.is_empty() {
            return Err(cycle_error(dag, &in_degree, remaining));
        }
        remaining -= current.len();

        let mut next = Vec::new();
        for &node in &current {
            for succ in graph.neighbors_directed(node, Direction::Outgoing) {
                let deg = &mut in_degree[succ.index()];
                *deg -= 1;
                if *deg == 0 {
                    next.push(succ);
                }
            }
        }
        next.sort_unstable();

        let real_ops = current
            .iter()
            .filter(|&&n| graph[n].is_real())
            .count();
        debug!(wave = waves.len() + 1, size = current.len(), real_ops, "wave scheduled");
        waves.push(Wave {
            vertices: std::mem::replace(&mut current, next),
            real_ops,
        });
    }

    info!(waves = waves.len(), vertices = graph.node_count(), "simulation complete");
    Ok(Schedule { waves })
}

fn cycle_error(dag: &CompiledDag<'_>, in_degree: &[usize], remaining: usize) -> CausalError {
    let stuck = in_degree
        .iter()
        .position(|&d| d > 0)
        .map(|i| dag.label(NodeIndex::new(i)))
        .unwrap_or_default();
    CausalError::CycleDetected(format!(
        "{remaining} vertices remain and none has zero in-degree (e.g. {stuck})"
    ))
}
