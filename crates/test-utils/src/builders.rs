#![allow(dead_code)]

use causal_stream::config::{ConfigFile, GeneratorConfig, RawConfigFile};
use causal_stream::record::Record;
use causal_stream::types::{DepRef, EntityKind, Key};

/// Builder for a single captured `Record`.
pub struct RecordBuilder {
    user: String,
    type_name: String,
    writes: Vec<DepRef>,
    reads: Vec<DepRef>,
    raw_writes: Vec<String>,
    raw_reads: Vec<String>,
}

impl RecordBuilder {
    pub fn new(user: impl ToString) -> Self {
        Self {
            user: user.to_string(),
            type_name: "Post".to_string(),
            writes: Vec::new(),
            reads: Vec::new(),
            raw_writes: Vec::new(),
            raw_reads: Vec::new(),
        }
    }

    pub fn type_name(mut self, name: &str) -> Self {
        self.type_name = name.to_string();
        self
    }

    pub fn writes(mut self, key: &str, version: u64) -> Self {
        self.writes.push(DepRef::new(Key::new(key), version));
        self
    }

    pub fn reads(mut self, key: &str, version: u64) -> Self {
        self.reads.push(DepRef::new(Key::new(key), version));
        self
    }

    /// Append a write dependency verbatim, without going through `DepRef`.
    pub fn raw_write(mut self, dep: &str) -> Self {
        self.raw_writes.push(dep.to_string());
        self
    }

    pub fn raw_read(mut self, dep: &str) -> Self {
        self.raw_reads.push(dep.to_string());
        self
    }

    pub fn build(self) -> Record {
        let mut record = Record::create("test", self.user, &self.type_name, &self.writes, &self.reads);
        record.dependencies.write.extend(self.raw_writes);
        record.dependencies.read.extend(self.raw_reads);
        record
    }
}

/// Builds a stream shaped like the generator's output: `users` chains of
/// `ops_per_user` operations, emitted round-robin by chain index, plus any
/// cross-user observations added with [`ChainStreamBuilder::observe`].
#[derive(Debug, Clone)]
pub struct ChainStreamBuilder {
    users: usize,
    ops_per_user: usize,
    /// `(observer, observed)` as `(user, index)` pairs.
    observations: Vec<((usize, usize), (usize, usize))>,
}

impl ChainStreamBuilder {
    pub fn new(users: usize, ops_per_user: usize) -> Self {
        Self {
            users,
            ops_per_user,
            observations: Vec::new(),
        }
    }

    pub fn users(&self) -> usize {
        self.users
    }

    pub fn ops_per_user(&self) -> usize {
        self.ops_per_user
    }

    /// `observer` reads the post created by `observed`.
    pub fn observe(mut self, observer: (usize, usize), observed: (usize, usize)) -> Self {
        self.observations.push((observer, observed));
        self
    }

    /// Generator-style operation id of `(user, index)`.
    pub fn op_id(&self, user: usize, index: usize) -> u64 {
        (user * self.ops_per_user + index) as u64
    }

    /// Position of `(user, index)` in the built stream, i.e. its ingestion seq.
    pub fn seq_of(&self, user: usize, index: usize) -> usize {
        index * self.users + user
    }

    pub fn post_dep(&self, user: usize, index: usize) -> DepRef {
        DepRef::new(EntityKind::Post.key(self.op_id(user, index)), 1)
    }

    pub fn build(&self) -> Vec<Record> {
        let mut records = Vec::with_capacity(self.users * self.ops_per_user);
        for index in 0..self.ops_per_user {
            for user in 0..self.users {
                let writes = [
                    self.post_dep(user, index),
                    DepRef::new(EntityKind::User.key(user as u64), index as u64 + 1),
                ];
                let reads: Vec<DepRef> = self
                    .observations
                    .iter()
                    .filter(|(observer, _)| *observer == (user, index))
                    .map(|(_, (u, i))| self.post_dep(*u, *i))
                    .collect();
                records.push(Record::create("test", user, "Post", &writes, &reads));
            }
        }
        records
    }

    /// The built stream as JSON Lines text.
    pub fn build_lines(&self) -> Vec<String> {
        self.build()
            .iter()
            .map(|r| r.encode_line().expect("records encode"))
            .collect()
    }
}

/// Builder for `GeneratorConfig` with small, seeded defaults.
pub struct GeneratorConfigBuilder {
    config: GeneratorConfig,
}

impl GeneratorConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: GeneratorConfig {
                total_ops: 200,
                num_users: 20,
                max_num_friends: 5,
                seed: Some(42),
                ..GeneratorConfig::default()
            },
        }
    }

    pub fn total_ops(mut self, v: usize) -> Self {
        self.config.total_ops = v;
        self
    }

    pub fn num_users(mut self, v: usize) -> Self {
        self.config.num_users = v;
        self
    }

    pub fn max_num_friends(mut self, v: usize) -> Self {
        self.config.max_num_friends = v;
        self
    }

    pub fn coeff_num_friends(mut self, v: f64) -> Self {
        self.config.coeff_num_friends = v;
        self
    }

    pub fn num_interactions_ratio(mut self, v: f64) -> Self {
        self.config.num_interactions_ratio = v;
        self
    }

    pub fn coeff_interactions_ratio(mut self, v: f64) -> Self {
        self.config.coeff_interactions_ratio = v;
        self
    }

    pub fn coeff_friend_activity(mut self, v: f64) -> Self {
        self.config.coeff_friend_activity = v;
        self
    }

    pub fn seed(mut self, v: u64) -> Self {
        self.config.seed = Some(v);
        self
    }

    pub fn build(self) -> GeneratorConfig {
        self.config
    }

    /// Wrap into a validated `ConfigFile`.
    pub fn build_file(self) -> ConfigFile {
        ConfigFile::try_from(RawConfigFile {
            generator: self.config,
            ..RawConfigFile::default()
        })
        .expect("Failed to build valid config from builder")
    }
}

impl Default for GeneratorConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
