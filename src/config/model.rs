// src/config/model.rs

use serde::Deserialize;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [generator]
/// total_ops = 10000
/// num_users = 1000
/// max_num_friends = 100
/// coeff_num_friends = 1.5
/// num_interactions_ratio = 0.3
/// coeff_interactions_ratio = 1.5
/// coeff_friend_activity = 1.0
/// app = "bench"
/// seed = 7
///
/// [analyzer]
/// skip = 0
/// count = -1
/// ```
///
/// Both sections are optional and every field has a default. This is the
/// unchecked form; convert it with `ConfigFile::try_from`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    #[serde(default)]
    pub generator: GeneratorConfig,

    #[serde(default)]
    pub analyzer: AnalyzerConfig,
}

/// Validated configuration.
///
/// Only obtainable through `TryFrom<RawConfigFile>`, so holders can rely on
/// the invariants checked in `config::validate`.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    generator: GeneratorConfig,
    analyzer: AnalyzerConfig,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(generator: GeneratorConfig, analyzer: AnalyzerConfig) -> Self {
        Self { generator, analyzer }
    }

    pub fn generator(&self) -> &GeneratorConfig {
        &self.generator
    }

    pub fn analyzer(&self) -> &AnalyzerConfig {
        &self.analyzer
    }
}

/// `[generator]` section: shape of the synthetic social workload.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Total number of operations; split evenly (integer division) across users.
    #[serde(default = "default_total_ops")]
    pub total_ops: usize,

    #[serde(default = "default_num_users")]
    pub num_users: usize,

    /// Upper bound of the friend-count distribution.
    #[serde(default = "default_max_num_friends")]
    pub max_num_friends: usize,

    /// Skew of the friend-count distribution (0 = uniform).
    #[serde(default = "default_coeff")]
    pub coeff_num_friends: f64,

    /// Fraction of a user's operations that notify friends, as the upper
    /// bound of the interaction-count distribution.
    #[serde(default = "default_num_interactions_ratio")]
    pub num_interactions_ratio: f64,

    #[serde(default = "default_coeff")]
    pub coeff_interactions_ratio: f64,

    /// Skew of the per-user "how many friends to notify" distribution.
    #[serde(default = "default_coeff_friend_activity")]
    pub coeff_friend_activity: f64,

    /// Value of the `app` field in every emitted record.
    #[serde(default = "default_app")]
    pub app: String,

    /// RNG seed. When absent a random seed is drawn and logged.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl GeneratorConfig {
    pub fn ops_per_user(&self) -> usize {
        if self.num_users == 0 {
            0
        } else {
            self.total_ops / self.num_users
        }
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            total_ops: default_total_ops(),
            num_users: default_num_users(),
            max_num_friends: default_max_num_friends(),
            coeff_num_friends: default_coeff(),
            num_interactions_ratio: default_num_interactions_ratio(),
            coeff_interactions_ratio: default_coeff(),
            coeff_friend_activity: default_coeff_friend_activity(),
            app: default_app(),
            seed: None,
        }
    }
}

fn default_total_ops() -> usize {
    10_000
}

fn default_num_users() -> usize {
    1_000
}

fn default_max_num_friends() -> usize {
    100
}

fn default_coeff() -> f64 {
    1.5
}

fn default_num_interactions_ratio() -> f64 {
    0.3
}

fn default_coeff_friend_activity() -> f64 {
    1.0
}

fn default_app() -> String {
    "bench".to_string()
}

/// `[analyzer]` section: the window of input lines fed to the compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnalyzerConfig {
    /// Number of leading lines to drop.
    #[serde(default)]
    pub skip: usize,

    /// Number of lines to read after the skip; `-1` reads everything.
    #[serde(default = "default_count")]
    pub count: i64,
}

impl AnalyzerConfig {
    /// `count` as an optional line limit.
    pub fn limit(&self) -> Option<usize> {
        usize::try_from(self.count).ok()
    }
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            skip: 0,
            count: default_count(),
        }
    }
}

fn default_count() -> i64 {
    -1
}
