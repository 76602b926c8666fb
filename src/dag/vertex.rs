// src/dag/vertex.rs

//! Ingested operations and the vertices they become.

use crate::errors::Result;
use crate::record::Record;
use crate::types::{DepRef, parse_dep};

/// An operation as reconstructed from one captured record.
#[derive(Debug, Clone)]
pub struct ObservedOp {
    /// Position in the ingested record list (0-based).
    pub seq: usize,
    pub record: Record,
    pub writes: Vec<DepRef>,
    pub reads: Vec<DepRef>,
}

impl ObservedOp {
    /// Parse every dependency string of `record`.
    ///
    /// Any malformed string rejects the whole record, so a record is either
    /// fully wired into the graph or not at all.
    pub fn from_record(seq: usize, record: Record) -> Result<Self> {
        let writes = parse_all(&record.dependencies.write)?;
        let reads = parse_all(&record.dependencies.read)?;
        Ok(Self {
            seq,
            record,
            writes,
            reads,
        })
    }

    pub fn user(&self) -> Option<&str> {
        self.record.current_user_id.as_deref()
    }

    /// `"<operation> <type> <writes>"`, e.g. `create Post posts_id_3:1,users_id_0:2`.
    pub fn label(&self) -> String {
        let writes: Vec<String> = self.writes.iter().map(ToString::to_string).collect();
        format!(
            "{} {} {}",
            self.record.operation_name().unwrap_or("?"),
            self.record.entity_type().unwrap_or("?"),
            writes.join(",")
        )
    }
}

fn parse_all(raw: &[String]) -> Result<Vec<DepRef>> {
    raw.iter().map(|d| parse_dep(d)).collect()
}

/// A vertex of the compiled DAG.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Vertex {
    /// An ingested operation, by its `seq`.
    Real(usize),
    /// A `(key, version)` that was referenced but whose writer was never
    /// ingested (e.g. it fell outside the skip/count window).
    Placeholder(DepRef),
}

impl Vertex {
    pub fn is_real(&self) -> bool {
        matches!(self, Vertex::Real(_))
    }
}
