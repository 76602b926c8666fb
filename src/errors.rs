// src/errors.rs

//! Crate-wide error type.
//!
//! Only fatal or per-record faults are errors. Integrity gaps, duplicate
//! writes and skipped pairings are reported as values and counters by the
//! modules that detect them.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CausalError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Malformed dependency: {0:?} (expected `<key>:<version>`)")]
    MalformedDependency(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Cycle detected in DAG: {0}")]
    CycleDetected(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, CausalError>;
