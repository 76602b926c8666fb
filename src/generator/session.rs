// src/generator/session.rs

//! One generation run.
//!
//! The session owns everything a run mutates (RNG, id allocator, read
//! adjacency), so several runs can coexist in one process and tests can build
//! them in isolation.

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;

use crate::config::{GeneratorConfig, validate_generator};
use crate::errors::Result;
use crate::generator::chains::{Chains, IdAllocator};
use crate::generator::inject::{Adjacency, InjectionStats, Injector};
use crate::generator::sampler::SkewedSampler;
use crate::generator::social::SocialGraph;
use crate::generator::stream::{RecordSink, serialize_stream};

/// Summary of a finished build pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationStats {
    pub seed: u64,
    pub users: usize,
    pub ops_per_user: usize,
    pub total_ops: usize,
    pub mean_degree: f64,
    pub injection: InjectionStats,
}

#[derive(Debug)]
pub struct GenerationSession {
    config: GeneratorConfig,
    seed: u64,
    ids: IdAllocator,
    social: SocialGraph,
    chains: Chains,
    adjacency: Adjacency,
    injection: InjectionStats,
}

impl GenerationSession {
    /// Validate `config` and run the whole build pass: social graph, chains,
    /// then cross-user edges.
    ///
    /// All samplers are constructed before the first draw, so a bad
    /// coefficient fails here without any partial work.
    pub fn new(config: GeneratorConfig) -> Result<Self> {
        validate_generator(&config)?;

        let ops_per_user = config.ops_per_user();
        // A zero ratio disables cross-user reads; any positive ratio allows at
        // least one interaction per user.
        let interaction_domain = if config.num_interactions_ratio == 0.0 {
            0
        } else {
            ((ops_per_user as f64) * config.num_interactions_ratio).round().max(1.0) as usize
        };

        let friend_count = SkewedSampler::new(config.max_num_friends, config.coeff_num_friends)?;
        let interactions = SkewedSampler::new(
            interaction_domain.max(1),
            config.coeff_interactions_ratio,
        )?;
        // Validates the activity coefficient up front; per-user samplers are
        // built once degrees are known.
        SkewedSampler::new(1, config.coeff_friend_activity)?;

        let seed = config.seed.unwrap_or_else(rand::random);
        let mut rng = StdRng::seed_from_u64(seed);
        info!(
            seed,
            users = config.num_users,
            ops_per_user,
            interaction_domain,
            "starting generation"
        );

        let social = SocialGraph::build(config.num_users, &friend_count, &mut rng);
        let activity = social.activity_samplers(config.coeff_friend_activity)?;

        let mut ids = IdAllocator::new();
        let chains = Chains::build(config.num_users, ops_per_user, &mut ids);

        let mut adjacency = Adjacency::new();
        let injection = if interaction_domain == 0 {
            info!("num_interactions_ratio is 0; no cross-user dependencies");
            InjectionStats::default()
        } else {
            Injector {
                chains: &chains,
                social: &social,
                activity: &activity,
                interactions: &interactions,
            }
            .inject(&mut adjacency, &mut rng)
        };

        Ok(Self {
            config,
            seed,
            ids,
            social,
            chains,
            adjacency,
            injection,
        })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn social(&self) -> &SocialGraph {
        &self.social
    }

    pub fn chains(&self) -> &Chains {
        &self.chains
    }

    pub fn adjacency(&self) -> &Adjacency {
        &self.adjacency
    }

    pub fn stats(&self) -> GenerationStats {
        GenerationStats {
            seed: self.seed,
            users: self.chains.num_users(),
            ops_per_user: self.chains.ops_per_user(),
            total_ops: self.ids.allocated() as usize,
            mean_degree: self.social.mean_degree(),
            injection: self.injection,
        }
    }

    /// Serialize the generated stream into `sink`.
    pub fn emit<S: RecordSink + ?Sized>(&self, sink: &mut S) -> Result<usize> {
        serialize_stream(&self.config.app, &self.chains, &self.adjacency, sink)
    }
}
