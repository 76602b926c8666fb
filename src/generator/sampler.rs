// src/generator/sampler.rs

//! Power-law ("Zipfian") integer sampler.
//!
//! Draws `k` in `1..=n` with `Pr(X = k) ∝ 1 / k^s`. The cumulative weights are
//! built once by [`WeightedIndex`]; each draw is a binary search over them.

use rand::Rng;
use rand::distributions::{Distribution, WeightedIndex};

use crate::errors::{CausalError, Result};

#[derive(Debug, Clone)]
pub struct SkewedSampler {
    domain: usize,
    skew: f64,
    /// Sum of the unnormalised weights, kept for [`SkewedSampler::probability`].
    norm: f64,
    index: WeightedIndex<f64>,
}

impl SkewedSampler {
    /// Build a sampler over `1..=domain` with skew coefficient `skew`.
    ///
    /// `skew = 0` is uniform. Fails before any sampling if the domain is empty
    /// or the coefficient is negative or not finite.
    pub fn new(domain: usize, skew: f64) -> Result<Self> {
        if domain == 0 {
            return Err(CausalError::Configuration(
                "skewed sampler domain must be >= 1 (got 0)".to_string(),
            ));
        }
        if !skew.is_finite() || skew < 0.0 {
            return Err(CausalError::Configuration(format!(
                "skewed sampler coefficient must be finite and >= 0 (got {skew})"
            )));
        }

        let weights: Vec<f64> = (1..=domain).map(|k| weight(k, skew)).collect();
        let norm = weights.iter().sum();
        let index = WeightedIndex::new(&weights).map_err(|e| {
            CausalError::Configuration(format!(
                "cannot build sampler over 1..={domain} with skew {skew}: {e}"
            ))
        })?;

        Ok(Self {
            domain,
            skew,
            norm,
            index,
        })
    }

    pub fn domain(&self) -> usize {
        self.domain
    }

    pub fn skew(&self) -> f64 {
        self.skew
    }

    /// Normalised probability of drawing `k`; zero outside the domain.
    pub fn probability(&self, k: usize) -> f64 {
        if k == 0 || k > self.domain {
            return 0.0;
        }
        weight(k, self.skew) / self.norm
    }
}

impl Distribution<usize> for SkewedSampler {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        self.index.sample(rng) + 1
    }
}

fn weight(k: usize, skew: f64) -> f64 {
    (k as f64).powf(-skew)
}
