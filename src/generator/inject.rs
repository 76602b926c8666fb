// src/generator/inject.rs

//! Cross-user read edges.
//!
//! A user "notifies" some of their friends about a subset of their own
//! operations; each notified friend observes that operation from a strictly
//! later point of their own chain. Since the observer's index is always
//! greater than the observed one, the interleaved stream emits every observed
//! operation before its observers.

use std::collections::BTreeMap;

use rand::Rng;
use rand::distributions::Distribution;
use rand::seq::index;
use tracing::{debug, info};

use crate::generator::chains::Chains;
use crate::generator::sampler::SkewedSampler;
use crate::generator::social::SocialGraph;
use crate::types::OpId;

/// Dual adjacency over operation ids.
///
/// - `forward[a]` lists the operations that observe `a`.
/// - `reverse[b]` lists the operations `b` observes; it becomes `b`'s read-set
///   at serialization time.
#[derive(Debug, Clone, Default)]
pub struct Adjacency {
    forward: BTreeMap<OpId, Vec<OpId>>,
    reverse: BTreeMap<OpId, Vec<OpId>>,
    edges: usize,
}

impl Adjacency {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `observer` read what `observed` wrote.
    pub fn add_read_edge(&mut self, observed: OpId, observer: OpId) {
        self.forward.entry(observed).or_default().push(observer);
        self.reverse.entry(observer).or_default().push(observed);
        self.edges += 1;
    }

    pub fn observers_of(&self, observed: OpId) -> &[OpId] {
        self.forward.get(&observed).map_or(&[], Vec::as_slice)
    }

    pub fn observed_by(&self, observer: OpId) -> &[OpId] {
        self.reverse.get(&observer).map_or(&[], Vec::as_slice)
    }

    pub fn edge_count(&self) -> usize {
        self.edges
    }

    /// Iterate `(observed, observer)` pairs.
    pub fn edges(&self) -> impl Iterator<Item = (OpId, OpId)> + '_ {
        self.forward
            .iter()
            .flat_map(|(&observed, observers)| observers.iter().map(move |&o| (observed, o)))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InjectionStats {
    /// Operations picked as notifying operations.
    pub interactions: usize,
    pub read_edges: usize,
    /// Friend pairings dropped because the friend's chain had no operation
    /// after the notifying index.
    pub skipped_pairings: usize,
}

/// Everything the injector draws from, borrowed from the session.
pub struct Injector<'a> {
    pub chains: &'a Chains,
    pub social: &'a SocialGraph,
    /// Indexed by user; `None` for users without friends.
    pub activity: &'a [Option<SkewedSampler>],
    pub interactions: &'a SkewedSampler,
}

impl Injector<'_> {
    /// Add read edges for every user, in user order.
    pub fn inject<R: Rng + ?Sized>(&self, adjacency: &mut Adjacency, rng: &mut R) -> InjectionStats {
        let ops_per_user = self.chains.ops_per_user();
        let mut stats = InjectionStats::default();

        for user in 0..self.chains.num_users() {
            let count = self.interactions.sample(rng).min(ops_per_user);
            let picked = index::sample(rng, ops_per_user, count);

            let Some(activity) = self.activity.get(user).and_then(Option::as_ref) else {
                // No friends to notify.
                stats.interactions += count;
                continue;
            };
            let friends: Vec<_> = self.social.friends_of(user).iter().copied().collect();

            for op_index in picked.iter() {
                stats.interactions += 1;
                let observed = self.chains.chain(user)[op_index].id;

                let notify = activity.sample(rng).min(friends.len());
                for f in index::sample(rng, friends.len(), notify).iter() {
                    let friend = friends[f];
                    let later = op_index + 1..ops_per_user;
                    if later.is_empty() {
                        debug!(
                            user,
                            friend, op_index, "friend chain exhausted past index; skipping pairing"
                        );
                        stats.skipped_pairings += 1;
                        continue;
                    }

                    let observer = self.chains.chain(friend)[rng.gen_range(later)].id;
                    adjacency.add_read_edge(observed, observer);
                    stats.read_edges += 1;
                }
            }
        }

        info!(
            interactions = stats.interactions,
            read_edges = stats.read_edges,
            skipped_pairings = stats.skipped_pairings,
            "injected cross-user dependencies"
        );
        stats
    }
}
