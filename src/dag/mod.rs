// src/dag/mod.rs

//! Causal DAG reconstruction and scheduling.
//!
//! - [`graph`] ingests captured records into per-key version slots.
//! - [`compile`] turns those slots into an explicit DAG.
//! - [`scheduler`] layers the DAG into waves.
//! - [`vertex`] holds the ingested operation type and the vertex enum.

pub mod compile;
pub mod graph;
pub mod scheduler;
pub mod vertex;

pub use compile::{CompiledDag, IntegrityWarning};
pub use graph::{DepGraph, IngestStats};
pub use scheduler::{Schedule, Wave, simulate};
pub use vertex::{ObservedOp, Vertex};
