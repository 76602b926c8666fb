// src/generator/stream.rs

//! Record emission.
//!
//! The serializer walks the chains round-robin by chain index and hands one
//! record at a time to a [`RecordSink`]. Nothing is buffered beyond the record
//! being emitted.

use std::io::Write;

use tracing::{debug, info};

use crate::errors::Result;
use crate::generator::chains::{Chains, Operation};
use crate::generator::inject::Adjacency;
use crate::record::Record;
use crate::types::{DepRef, EntityKind};

/// Destination for generated records.
///
/// Production code writes JSON Lines through [`JsonLinesSink`]; tests can
/// collect into a `Vec<Record>`.
pub trait RecordSink {
    fn emit(&mut self, record: &Record) -> Result<()>;
}

impl RecordSink for Vec<Record> {
    fn emit(&mut self, record: &Record) -> Result<()> {
        self.push(record.clone());
        Ok(())
    }
}

/// Writes one JSON object per line to any `Write`.
pub struct JsonLinesSink<W: Write> {
    writer: W,
    lines: usize,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, lines: 0 }
    }

    pub fn lines_written(&self) -> usize {
        self.lines
    }

    /// Flush and hand back the underlying writer.
    pub fn into_inner(mut self) -> Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

impl<W: Write> RecordSink for JsonLinesSink<W> {
    fn emit(&mut self, record: &Record) -> Result<()> {
        serde_json::to_writer(&mut self.writer, record)?;
        self.writer.write_all(b"\n")?;
        self.lines += 1;
        Ok(())
    }
}

/// Build the record for a single operation.
pub fn record_for(app: &str, op: &Operation, adjacency: &Adjacency) -> Record {
    let reads: Vec<DepRef> = adjacency
        .observed_by(op.id)
        .iter()
        .map(|&observed| DepRef::new(EntityKind::Post.key(observed), 1))
        .collect();

    Record::create(
        app,
        op.user,
        EntityKind::Post.type_name(),
        &op.writes(),
        &reads,
    )
}

/// Emit every operation in interleaved order. Returns the number of records.
pub fn serialize_stream<S: RecordSink + ?Sized>(
    app: &str,
    chains: &Chains,
    adjacency: &Adjacency,
    sink: &mut S,
) -> Result<usize> {
    let mut emitted = 0usize;

    for op in chains.interleaved() {
        let record = record_for(app, op, adjacency);
        debug!(
            op = op.id,
            user = op.user,
            index = op.index,
            reads = record.dependencies.read.len(),
            "emitting record"
        );
        sink.emit(&record)?;
        emitted += 1;
    }

    info!(records = emitted, "stream serialized");
    Ok(emitted)
}
