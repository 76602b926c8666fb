// src/config/mod.rs

//! Configuration loading and validation.
//!
//! - `model.rs`: the TOML-backed data model for `[generator]` and `[analyzer]`.
//! - `loader.rs`: reading a config file from disk.
//! - `validate.rs`: range checks, producing a validated [`ConfigFile`].

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_and_validate, load_from_path, load_or_default};
pub use model::{AnalyzerConfig, ConfigFile, GeneratorConfig, RawConfigFile};
pub use validate::{validate_analyzer, validate_generator};
