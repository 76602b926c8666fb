// src/generator/social.rs

//! Random undirected friendship graph over the fake user base.

use std::collections::BTreeSet;

use rand::Rng;
use rand::distributions::Distribution;
use rand::seq::index;
use tracing::{debug, info};

use crate::errors::Result;
use crate::generator::sampler::SkewedSampler;
use crate::types::UserId;

/// Adjacency mapping user → friend set.
///
/// Sets are ordered so that iterating a user's friends is reproducible for a
/// given seed.
#[derive(Debug, Clone)]
pub struct SocialGraph {
    friends: Vec<BTreeSet<UserId>>,
}

impl SocialGraph {
    /// Build the graph user by user.
    ///
    /// Each user draws a target friend count and samples that many distinct
    /// users. Self draws and already-adjacent users are dropped without a
    /// retry, so realized degrees only approximate the drawn targets (and
    /// later users can push earlier users' degrees above theirs).
    pub fn build<R: Rng + ?Sized>(
        num_users: usize,
        friend_count: &SkewedSampler,
        rng: &mut R,
    ) -> Self {
        let mut friends = vec![BTreeSet::new(); num_users];

        for user in 0..num_users {
            let target = friend_count.sample(rng).min(num_users);
            let mut added = 0usize;

            for other in index::sample(rng, num_users, target).iter() {
                if other == user || friends[user].contains(&other) {
                    continue;
                }
                friends[user].insert(other);
                friends[other].insert(user);
                added += 1;
            }

            debug!(user, target, added, "sampled friends");
        }

        let graph = Self { friends };
        info!(
            users = num_users,
            mean_degree = graph.mean_degree(),
            "built social graph"
        );
        graph
    }

    /// Build directly from an adjacency list. Edges are symmetrised.
    pub fn from_edges(num_users: usize, edges: &[(UserId, UserId)]) -> Self {
        let mut friends = vec![BTreeSet::new(); num_users];
        for &(a, b) in edges {
            if a != b && a < num_users && b < num_users {
                friends[a].insert(b);
                friends[b].insert(a);
            }
        }
        Self { friends }
    }

    pub fn num_users(&self) -> usize {
        self.friends.len()
    }

    pub fn friends_of(&self, user: UserId) -> &BTreeSet<UserId> {
        &self.friends[user]
    }

    pub fn degree(&self, user: UserId) -> usize {
        self.friends.get(user).map_or(0, BTreeSet::len)
    }

    pub fn mean_degree(&self) -> f64 {
        if self.friends.is_empty() {
            return 0.0;
        }
        let total: usize = self.friends.iter().map(BTreeSet::len).sum();
        total as f64 / self.friends.len() as f64
    }

    /// One "how many friends to notify" sampler per user, over `1..=degree`.
    ///
    /// Users without friends get `None`; they never notify anyone.
    pub fn activity_samplers(&self, skew: f64) -> Result<Vec<Option<SkewedSampler>>> {
        self.friends
            .iter()
            .map(|f| match f.len() {
                0 => Ok(None),
                degree => SkewedSampler::new(degree, skew).map(Some),
            })
            .collect()
    }
}
