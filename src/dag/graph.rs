// src/dag/graph.rs

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::dag::compile::CompiledDag;
use crate::dag::vertex::ObservedOp;
use crate::errors::{CausalError, Result};
use crate::record::Record;
use crate::types::{DepRef, Key, Version};

/// Who wrote a `(key, version)` and who read it.
#[derive(Debug, Clone, Default)]
pub(crate) struct Slot {
    /// `seq` of the first operation that claimed this version.
    pub(crate) writer: Option<usize>,
    /// `seq`s of operations that read this version, in ingestion order.
    pub(crate) read_children: Vec<usize>,
}

/// Counters collected while ingesting a stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestStats {
    /// Records wired into the graph.
    pub ingested: usize,
    /// Records rejected for a malformed dependency string.
    pub malformed: usize,
    /// Lines that did not decode as a record.
    pub undecodable: usize,
    /// Write claims on an already-claimed `(key, version)`.
    pub duplicate_writes: usize,
}

impl IngestStats {
    pub fn rejected(&self) -> usize {
        self.malformed + self.undecodable
    }
}

/// Dependency graph reconstructed from captured operation records.
///
/// Mutated only while ingesting; [`DepGraph::compile`] borrows it immutably.
#[derive(Debug, Clone, Default)]
pub struct DepGraph {
    slots: BTreeMap<Key, BTreeMap<Version, Slot>>,
    ops: Vec<ObservedOp>,
    stats: IngestStats,
    mid_stream: bool,
}

impl DepGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ingest one decoded record and return its `seq`.
    ///
    /// Writes: the first claim on a `(key, version)` wins; later claims are
    /// ignored and counted in [`IngestStats::duplicate_writes`].
    /// Reads: the operation becomes a read child of the slot whether or not a
    /// writer is known yet.
    ///
    /// A malformed dependency string rejects the record without touching the
    /// graph.
    pub fn ingest(&mut self, record: Record) -> Result<usize> {
        let seq = self.ops.len();
        let op = match ObservedOp::from_record(seq, record) {
            Ok(op) => op,
            Err(e) => {
                self.stats.malformed += 1;
                return Err(e);
            }
        };

        for dep in &op.writes {
            let existing = *self.slot_mut(dep).writer.get_or_insert(seq);
            if existing != seq {
                debug!(dep = %dep, first = existing, ignored = seq, "duplicate write ignored");
                self.stats.duplicate_writes += 1;
            }
        }

        for dep in &op.reads {
            self.slot_mut(dep).read_children.push(seq);
        }

        self.ops.push(op);
        self.stats.ingested += 1;
        Ok(seq)
    }

    /// Count a line that could not be read as text at all.
    pub fn record_undecodable(&mut self) {
        self.stats.undecodable += 1;
    }

    /// Mark the input as starting partway through a capture, e.g. after a
    /// skip window. Keys may then legitimately begin above version 1.
    pub fn set_mid_stream(&mut self, mid_stream: bool) {
        self.mid_stream = mid_stream;
    }

    pub fn is_mid_stream(&self) -> bool {
        self.mid_stream
    }

    /// Decode one JSON line and ingest it.
    pub fn ingest_line(&mut self, line: &str) -> Result<usize> {
        let record = match Record::decode_line(line) {
            Ok(r) => r,
            Err(e) => {
                self.stats.undecodable += 1;
                return Err(e);
            }
        };
        self.ingest(record)
    }

    /// Ingest every line, skipping (and logging) the ones that are rejected.
    /// Blank lines are ignored.
    pub fn ingest_lines<I, S>(&mut self, lines: I) -> &IngestStats
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for (lineno, line) in lines.into_iter().enumerate() {
            let line = line.as_ref().trim();
            if line.is_empty() {
                continue;
            }
            if let Err(e) = self.ingest_line(line) {
                warn_rejected(lineno, &e);
            }
        }
        &self.stats
    }

    /// Build a graph from already-decoded records, skipping malformed ones.
    pub fn from_records<I: IntoIterator<Item = Record>>(records: I) -> Self {
        let mut graph = Self::new();
        for (n, record) in records.into_iter().enumerate() {
            if let Err(e) = graph.ingest(record) {
                warn_rejected(n, &e);
            }
        }
        graph
    }

    /// Every ingested operation, in ingestion order.
    pub fn ops(&self) -> &[ObservedOp] {
        &self.ops
    }

    pub fn op(&self, seq: usize) -> Option<&ObservedOp> {
        self.ops.get(seq)
    }

    pub fn stats(&self) -> &IngestStats {
        &self.stats
    }

    pub fn keys(&self) -> impl Iterator<Item = &Key> {
        self.slots.keys()
    }

    /// Known versions of `key`, ascending.
    pub fn versions_of(&self, key: &Key) -> Vec<Version> {
        self.slots
            .get(key)
            .map(|v| v.keys().copied().collect())
            .unwrap_or_default()
    }

    /// The operation registered as the writer of `dep`, if it was ingested.
    pub fn writer_of(&self, dep: &DepRef) -> Option<&ObservedOp> {
        self.slot(dep)
            .and_then(|s| s.writer)
            .and_then(|seq| self.ops.get(seq))
    }

    pub fn read_children_of(&self, dep: &DepRef) -> Vec<&ObservedOp> {
        self.slot(dep)
            .map(|s| s.read_children.iter().filter_map(|&seq| self.ops.get(seq)).collect())
            .unwrap_or_default()
    }

    /// Compile the write chains and read edges into a DAG.
    pub fn compile(&self) -> CompiledDag<'_> {
        CompiledDag::build(self)
    }

    pub(crate) fn slots(&self) -> &BTreeMap<Key, BTreeMap<Version, Slot>> {
        &self.slots
    }

    fn slot(&self, dep: &DepRef) -> Option<&Slot> {
        self.slots.get(&dep.key).and_then(|v| v.get(&dep.version))
    }

    fn slot_mut(&mut self, dep: &DepRef) -> &mut Slot {
        self.slots
            .entry(dep.key.clone())
            .or_default()
            .entry(dep.version)
            .or_default()
    }
}

fn warn_rejected(position: usize, err: &CausalError) {
    warn!(position, error = %err, "skipping record");
}
