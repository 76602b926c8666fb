// src/config/validate.rs

use crate::config::model::{AnalyzerConfig, ConfigFile, GeneratorConfig, RawConfigFile};
use crate::errors::{CausalError, Result};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = CausalError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_generator(&raw.generator)?;
        validate_analyzer(&raw.analyzer)?;
        Ok(ConfigFile::new_unchecked(raw.generator, raw.analyzer))
    }
}

/// Check a generator config. Called on file load and again after CLI
/// overrides have been applied.
pub fn validate_generator(cfg: &GeneratorConfig) -> Result<()> {
    if cfg.num_users == 0 {
        return Err(config_error("[generator].num_users must be >= 1 (got 0)"));
    }

    if cfg.total_ops < cfg.num_users {
        return Err(config_error(format!(
            "[generator].total_ops ({}) must be >= num_users ({}) so every user gets at least one operation",
            cfg.total_ops, cfg.num_users
        )));
    }

    if cfg.max_num_friends == 0 {
        return Err(config_error(
            "[generator].max_num_friends must be >= 1 (got 0)",
        ));
    }

    ensure_coefficient("coeff_num_friends", cfg.coeff_num_friends)?;
    ensure_coefficient("coeff_interactions_ratio", cfg.coeff_interactions_ratio)?;
    ensure_coefficient("coeff_friend_activity", cfg.coeff_friend_activity)?;

    if !(0.0..=1.0).contains(&cfg.num_interactions_ratio) {
        return Err(config_error(format!(
            "[generator].num_interactions_ratio must be within 0..=1 (got {})",
            cfg.num_interactions_ratio
        )));
    }

    Ok(())
}

pub fn validate_analyzer(cfg: &AnalyzerConfig) -> Result<()> {
    if cfg.count < -1 {
        return Err(config_error(format!(
            "[analyzer].count must be -1 (unbounded) or >= 0 (got {})",
            cfg.count
        )));
    }
    Ok(())
}

fn ensure_coefficient(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(config_error(format!(
            "[generator].{name} must be a finite non-negative number (got {value})"
        )));
    }
    Ok(())
}

fn config_error(msg: impl Into<String>) -> CausalError {
    CausalError::Configuration(msg.into())
}
