// src/dag/compile.rs

//! Compilation of a [`DepGraph`] into an explicit DAG.
//!
//! Edges, per key and per known version `v` (ascending):
//! - `v` has no read children: `writer(v) -> writer(v+1)`.
//! - `v` has read children `R`: `writer(v) -> r` and `r -> writer(v+1)` for
//!   every `r` in `R`; the direct `v -> v+1` edge is omitted.
//!
//! `v+1` edges only exist when `v+1` is itself known. A missing interior
//! version is reported as an [`IntegrityWarning`] and breaks the chain there.
//! A key whose first known version is above 1 is reported too, unless the
//! graph was read from the middle of a capture.

use std::collections::{HashMap, HashSet};
use std::fmt;

use petgraph::Direction;
use petgraph::dot::{Config, Dot};
use petgraph::graph::{DiGraph, NodeIndex};
use tracing::{debug, info, warn};

use crate::dag::graph::{DepGraph, Slot};
use crate::dag::scheduler::{Schedule, simulate};
use crate::dag::vertex::Vertex;
use crate::errors::Result;
use crate::types::{DepRef, Key, Version};

const USER_PALETTE: [&str; 12] = [
    "#8dd3c7", "#ffffb3", "#bebada", "#fb8072", "#80b1d3", "#fdb462", "#b3de69", "#fccde5",
    "#d9d9d9", "#bc80bd", "#ccebc5", "#ffed6f",
];

/// Non-fatal fault found while compiling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntegrityWarning {
    /// Versions strictly between `after` and `before` were never observed.
    VersionGap {
        key: Key,
        after: Version,
        before: Version,
    },
    /// Versions below `first` were never observed.
    LeadingGap { key: Key, first: Version },
}

impl fmt::Display for IntegrityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntegrityWarning::VersionGap { key, after, before } => write!(
                f,
                "version gap on {key}: nothing between {after} and {before}"
            ),
            IntegrityWarning::LeadingGap { key, first } => {
                write!(f, "version gap on {key}: nothing before {first}")
            }
        }
    }
}

/// The causal DAG of an ingested stream.
///
/// Vertices are every ingested operation (in ingestion order) followed by the
/// placeholders created while compiling. Edges are deduplicated.
#[derive(Debug)]
pub struct CompiledDag<'g> {
    source: &'g DepGraph,
    graph: DiGraph<Vertex, ()>,
    placeholders: HashMap<DepRef, NodeIndex>,
    edges: HashSet<(NodeIndex, NodeIndex)>,
    warnings: Vec<IntegrityWarning>,
    self_loops: usize,
}

impl<'g> CompiledDag<'g> {
    pub(crate) fn build(source: &'g DepGraph) -> Self {
        let mut dag = Self {
            source,
            graph: DiGraph::with_capacity(source.ops().len(), source.ops().len()),
            placeholders: HashMap::new(),
            edges: HashSet::new(),
            warnings: Vec::new(),
            self_loops: 0,
        };

        for op in source.ops() {
            dag.graph.add_node(Vertex::Real(op.seq));
        }

        for (key, versions) in source.slots() {
            let leading = versions.keys().next().copied();
            if let Some(first) = leading.filter(|&v| v > 1 && !source.is_mid_stream()) {
                dag.warn(IntegrityWarning::LeadingGap {
                    key: key.clone(),
                    first,
                });
            }

            let mut iter = versions.iter().peekable();
            while let Some((&version, slot)) = iter.next() {
                let here = dag.writer_vertex(key, version, slot);

                let next = match iter.peek() {
                    Some(&(&next_version, next_slot)) if next_version == version + 1 => {
                        Some(dag.writer_vertex(key, next_version, next_slot))
                    }
                    Some(&(&next_version, _)) => {
                        dag.warn(IntegrityWarning::VersionGap {
                            key: key.clone(),
                            after: version,
                            before: next_version,
                        });
                        None
                    }
                    None => None,
                };

                if slot.read_children.is_empty() {
                    if let Some(next) = next {
                        dag.add_edge(here, next);
                    }
                } else {
                    for &child in &slot.read_children {
                        let child = NodeIndex::new(child);
                        dag.add_edge(here, child);
                        if let Some(next) = next {
                            dag.add_edge(child, next);
                        }
                    }
                }
            }
        }

        info!(
            vertices = dag.graph.node_count(),
            edges = dag.graph.edge_count(),
            placeholders = dag.placeholders.len(),
            warnings = dag.warnings.len(),
            "compiled DAG"
        );
        dag
    }

    /// Vertex that wrote `version` of `key`: the real writer, or a
    /// placeholder created on first reference.
    fn writer_vertex(&mut self, key: &Key, version: Version, slot: &Slot) -> NodeIndex {
        if let Some(seq) = slot.writer {
            return NodeIndex::new(seq);
        }
        let dep = DepRef::new(key.clone(), version);
        let graph = &mut self.graph;
        *self
            .placeholders
            .entry(dep)
            .or_insert_with_key(|dep| graph.add_node(Vertex::Placeholder(dep.clone())))
    }

    fn add_edge(&mut self, from: NodeIndex, to: NodeIndex) {
        // An operation that reads `v` and writes `v+1` is already ordered.
        if from == to {
            debug!(vertex = from.index(), "dropping self edge");
            self.self_loops += 1;
            return;
        }
        if self.edges.insert((from, to)) {
            self.graph.add_edge(from, to, ());
        }
    }

    fn warn(&mut self, warning: IntegrityWarning) {
        warn!(warning = %warning, "data integrity warning");
        self.warnings.push(warning);
    }

    pub fn source(&self) -> &'g DepGraph {
        self.source
    }

    pub fn graph(&self) -> &DiGraph<Vertex, ()> {
        &self.graph
    }

    pub fn vertex_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn placeholder_count(&self) -> usize {
        self.placeholders.len()
    }

    pub fn warnings(&self) -> &[IntegrityWarning] {
        &self.warnings
    }

    /// Self edges dropped while compiling.
    pub fn self_loops_dropped(&self) -> usize {
        self.self_loops
    }

    /// Vertex of the ingested operation `seq`.
    pub fn op_vertex(&self, seq: usize) -> Option<NodeIndex> {
        (seq < self.source.ops().len()).then(|| NodeIndex::new(seq))
    }

    pub fn placeholder_vertex(&self, dep: &DepRef) -> Option<NodeIndex> {
        self.placeholders.get(dep).copied()
    }

    /// Vertex standing for the writer of `dep`, real or placeholder.
    pub fn writer_vertex_of(&self, dep: &DepRef) -> Option<NodeIndex> {
        match self.source.writer_of(dep) {
            Some(op) => self.op_vertex(op.seq),
            None => self.placeholder_vertex(dep),
        }
    }

    pub fn vertex(&self, node: NodeIndex) -> Option<&Vertex> {
        self.graph.node_weight(node)
    }

    pub fn has_edge(&self, from: NodeIndex, to: NodeIndex) -> bool {
        self.graph.contains_edge(from, to)
    }

    pub fn in_degree(&self, node: NodeIndex) -> usize {
        self.graph.edges_directed(node, Direction::Incoming).count()
    }

    pub fn successors(&self, node: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.neighbors_directed(node, Direction::Outgoing)
    }

    /// Human-readable vertex label.
    pub fn label(&self, node: NodeIndex) -> String {
        match self.graph.node_weight(node) {
            Some(Vertex::Real(seq)) => self
                .source
                .op(*seq)
                .map_or_else(|| format!("op #{seq}"), |op| op.label()),
            Some(Vertex::Placeholder(dep)) => dep.to_string(),
            None => format!("<missing vertex {}>", node.index()),
        }
    }

    /// Graphviz DOT text of the DAG.
    ///
    /// Real operations are filled with one colour per user, assigned in order
    /// of first appearance; placeholders are left unfilled.
    pub fn to_dot(&self) -> String {
        let labelled = self.graph.map(|node, _| self.label(node), |_, _| "");

        let mut colours: HashMap<&str, &str> = HashMap::new();
        for op in self.source.ops() {
            if let Some(user) = op.user() {
                let next = USER_PALETTE[colours.len() % USER_PALETTE.len()];
                colours.entry(user).or_insert(next);
            }
        }

        format!(
            "{}",
            Dot::with_attr_getters(
                &labelled,
                &[Config::EdgeNoLabel],
                &|_, _| String::new(),
                &|_, (node, _)| self.fill_attrs(node, &colours),
            )
        )
    }

    fn fill_attrs(&self, node: NodeIndex, colours: &HashMap<&str, &str>) -> String {
        let colour = match self.graph.node_weight(node) {
            Some(Vertex::Real(seq)) => self
                .source
                .op(*seq)
                .and_then(|op| op.user())
                .and_then(|user| colours.get(user)),
            _ => None,
        };
        colour.map_or_else(String::new, |c| {
            format!("style = filled, fillcolor = \"{c}\" ")
        })
    }

    /// Layer the DAG into waves. See [`simulate`].
    pub fn simulate(&self) -> Result<Schedule> {
        simulate(self)
    }
}
