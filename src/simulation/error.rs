//! Construction-time configuration errors

use rand::distr::weighted::Error as WeightError;
use thiserror::Error;

use super::types::ManufacturerKind;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("At least one healthcare provider is required")]
    NoProviders,

    #[error("Provider capacity must be at least 1")]
    ZeroCapacity,

    #[error("Simulation must run for at least one step")]
    ZeroSteps,

    #[error("Patient incidence must be at least 1, got {0}")]
    InvalidIncidence(u32),

    #[error("Probability '{name}' must lie in [0, 1], got {value}")]
    ProbabilityOutOfRange { name: &'static str, value: f64 },

    #[error("{kind} manufacturer: {field} must be positive, got {value}")]
    NonPositive {
        kind: ManufacturerKind,
        field: &'static str,
        value: f64,
    },

    #[error("{kind} manufacturer: profit margin must lie in (0, 1], got {value}")]
    InvalidProfitMargin { kind: ManufacturerKind, value: f64 },

    #[error("{0} manufacturer: initial inventory must be at least 1")]
    ZeroInventory(ManufacturerKind),

    #[error("Subtractive manufacturer needs a production lag of at least 1 step")]
    ZeroSubtractiveLag,

    #[error("Additive manufacturer produces same-step, lag must be 0, got {0}")]
    AdditiveLag(u64),

    #[error("Invalid outcome weights: {0}")]
    OutcomeWeights(#[from] WeightError),
}
