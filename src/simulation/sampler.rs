//! Weighted categorical draws
//!
//! Every stochastic outcome in the model (surgery results, follow-up
//! transitions, adverse events) is drawn through the tables here. The tables
//! hold only weights; all randomness comes from the caller's RNG.

use rand::distr::weighted::{Error as WeightError, WeightedIndex};
use rand::distr::Distribution;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::types::HealthStatus;

/// Post-surgery health outcome weights
pub const SURGERY_OUTCOME_WEIGHTS: [(HealthStatus, f64); 5] = [
    (HealthStatus::Minimal, 0.50),
    (HealthStatus::Moderate, 0.30),
    (HealthStatus::Severe, 0.10),
    (HealthStatus::Crippled, 0.05),
    (HealthStatus::Bedbound, 0.05),
];

/// Outcome of a follow-up visit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FollowUpTransition {
    Improved,
    Stable,
    Worse,
}

/// Follow-up transition weights
pub const FOLLOW_UP_WEIGHTS: [(FollowUpTransition, f64); 3] = [
    (FollowUpTransition::Improved, 0.33),
    (FollowUpTransition::Stable, 0.62),
    (FollowUpTransition::Worse, 0.05),
];

/// A categorical distribution over a fixed set of outcomes
#[derive(Debug, Clone)]
pub struct OutcomeTable<T> {
    outcomes: Vec<T>,
    index: WeightedIndex<f64>,
}

impl<T: Copy> OutcomeTable<T> {
    pub fn new(entries: &[(T, f64)]) -> Result<Self, WeightError> {
        let index = WeightedIndex::new(entries.iter().map(|(_, weight)| *weight))?;
        Ok(Self {
            outcomes: entries.iter().map(|(outcome, _)| *outcome).collect(),
            index,
        })
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> T {
        self.outcomes[self.index.sample(rng)]
    }
}

/// The two outcome tables providers draw from
#[derive(Debug, Clone)]
pub struct OutcomeSampler {
    pub surgery: OutcomeTable<HealthStatus>,
    pub follow_up: OutcomeTable<FollowUpTransition>,
}

impl OutcomeSampler {
    pub fn standard() -> Result<Self, WeightError> {
        Ok(Self {
            surgery: OutcomeTable::new(&SURGERY_OUTCOME_WEIGHTS)?,
            follow_up: OutcomeTable::new(&FOLLOW_UP_WEIGHTS)?,
        })
    }

    pub fn surgery_outcome<R: Rng + ?Sized>(&self, rng: &mut R) -> HealthStatus {
        self.surgery.sample(rng)
    }

    pub fn follow_up_transition<R: Rng + ?Sized>(&self, rng: &mut R) -> FollowUpTransition {
        self.follow_up.sample(rng)
    }
}

/// Bernoulli draw: true with the given probability.
/// `probability` must already be validated to lie in [0, 1].
pub fn chance<R: Rng + ?Sized>(rng: &mut R, probability: f64) -> bool {
    rng.random::<f64>() < probability
}
