// src/generator/mod.rs

//! Synthetic causally-consistent workload generator.
//!
//! Pipeline, in the order a [`GenerationSession`] runs it:
//! - [`sampler`]: power-law integer draws.
//! - [`social`]: random friendship graph.
//! - [`chains`]: one linear write chain per user.
//! - [`inject`]: cross-user read edges between chains.
//! - [`stream`]: interleaved JSON Lines emission.

pub mod chains;
pub mod inject;
pub mod sampler;
pub mod session;
pub mod social;
pub mod stream;

pub use chains::{Chains, IdAllocator, Operation};
pub use inject::{Adjacency, InjectionStats, Injector};
pub use sampler::SkewedSampler;
pub use session::{GenerationSession, GenerationStats};
pub use social::SocialGraph;
pub use stream::{JsonLinesSink, RecordSink, serialize_stream};
