//! Recommendation policies. The store hands a policy every recipe that is not
//! a favorite and keeps whatever subset comes back.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::models::Recipe;

/// Chooses recommendations out of the non-favorite recipes. Implementations
/// may be non-deterministic; callers must not assume two calls agree.
pub trait RecommendationPolicy {
    fn recommend(&mut self, candidates: &[Recipe]) -> Vec<Recipe>;
}

/// Default policy: every candidate is kept independently with a fixed
/// probability (one half unless configured otherwise).
#[derive(Debug, Clone)]
pub struct CoinFlip {
    rng: StdRng,
    probability: f64,
}

impl CoinFlip {
    pub const DEFAULT_PROBABILITY: f64 = 0.5;

    pub fn from_entropy() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Reproducible sequence of picks for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    pub fn with_rng(rng: StdRng) -> Self {
        Self {
            rng,
            probability: Self::DEFAULT_PROBABILITY,
        }
    }

    /// Override the inclusion probability. Values outside `[0, 1]` are clamped
    /// and NaN falls back to the default.
    pub fn with_probability(mut self, probability: f64) -> Self {
        self.probability = if probability.is_nan() {
            Self::DEFAULT_PROBABILITY
        } else {
            probability.clamp(0.0, 1.0)
        };
        self
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }
}

impl Default for CoinFlip {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl RecommendationPolicy for CoinFlip {
    fn recommend(&mut self, candidates: &[Recipe]) -> Vec<Recipe> {
        candidates
            .iter()
            .filter(|_| self.rng.gen_bool(self.probability))
            .cloned()
            .collect()
    }
}
