//! Model configuration
//!
//! All parameters are fixed inputs to a single run. `ModelConfig::validate`
//! rejects invalid values instead of clamping them.

use serde::{Deserialize, Serialize};

use super::error::ConfigError;
use super::types::{ManufacturerKind, DEFAULT_PROVIDER_CAPACITY};

/// How many new patients arrive each step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatientIncidence {
    /// Uniform draw from `0..=n`
    UpTo(u32),
    /// Exactly `n` every step
    Exactly(u32),
}

impl PatientIncidence {
    pub fn bound(&self) -> u32 {
        match self {
            PatientIncidence::UpTo(n) | PatientIncidence::Exactly(n) => *n,
        }
    }
}

/// Adverse-event probability applied when a follow-up turns out worse
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdverseEventRisk {
    pub additive: f64,
    pub subtractive: f64,
}

impl AdverseEventRisk {
    pub fn uniform(probability: f64) -> Self {
        Self {
            additive: probability,
            subtractive: probability,
        }
    }

    pub fn for_kind(&self, kind: ManufacturerKind) -> f64 {
        match kind {
            ManufacturerKind::Additive => self.additive,
            ManufacturerKind::Subtractive => self.subtractive,
        }
    }
}

impl Default for AdverseEventRisk {
    fn default() -> Self {
        Self::uniform(0.3)
    }
}

/// Economic and production parameters of one manufacturer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManufacturerConfig {
    pub cost_modifier: f64,
    pub base_production_cost: f64,
    pub profit_margin: f64,
    /// Inventory level the manufacturer restocks toward (also the starting stock).
    /// Must be at least 1: restocking only ever fills up to this level.
    pub initial_inventory: u32,
    /// Steps between scheduling production and receiving it
    pub production_lag: u64,
}

impl ManufacturerConfig {
    pub fn additive() -> Self {
        Self {
            cost_modifier: 1.0,
            base_production_cost: 10.0,
            profit_margin: 0.3,
            initial_inventory: 200,
            production_lag: 0,
        }
    }

    pub fn subtractive() -> Self {
        Self {
            cost_modifier: 0.5,
            production_lag: 2,
            ..Self::additive()
        }
    }

    fn validate(&self, kind: ManufacturerKind) -> Result<(), ConfigError> {
        for (field, value) in [
            ("cost modifier", self.cost_modifier),
            ("base production cost", self.base_production_cost),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NonPositive { kind, field, value });
            }
        }
        if !(self.profit_margin.is_finite() && self.profit_margin > 0.0 && self.profit_margin <= 1.0)
        {
            return Err(ConfigError::InvalidProfitMargin {
                kind,
                value: self.profit_margin,
            });
        }
        if self.initial_inventory == 0 {
            return Err(ConfigError::ZeroInventory(kind));
        }
        match kind {
            ManufacturerKind::Additive if self.production_lag != 0 => {
                Err(ConfigError::AdditiveLag(self.production_lag))
            }
            ManufacturerKind::Subtractive if self.production_lag == 0 => {
                Err(ConfigError::ZeroSubtractiveLag)
            }
            _ => Ok(()),
        }
    }
}

impl Default for ManufacturerConfig {
    fn default() -> Self {
        Self::additive()
    }
}

/// Parameters of a single simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub num_providers: usize,
    pub provider_capacity: usize,
    pub initial_patients: usize,
    pub incidence: PatientIncidence,
    pub steps: u64,
    pub additive_adoption_preference: f64,
    /// Reweight the preference by the provider's observed additive improvement rate
    pub adaptive_preference: bool,
    pub ae_probability: AdverseEventRisk,
    pub additive: ManufacturerConfig,
    pub subtractive: ManufacturerConfig,
    /// RNG seed; a random one is drawn (and logged) when absent
    pub seed: Option<u64>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            num_providers: 3,
            provider_capacity: DEFAULT_PROVIDER_CAPACITY,
            initial_patients: 1000,
            incidence: PatientIncidence::UpTo(48),
            steps: 365,
            additive_adoption_preference: 0.5,
            adaptive_preference: false,
            ae_probability: AdverseEventRisk::default(),
            additive: ManufacturerConfig::additive(),
            subtractive: ManufacturerConfig::subtractive(),
            seed: None,
        }
    }
}

impl ModelConfig {
    pub fn manufacturer(&self, kind: ManufacturerKind) -> &ManufacturerConfig {
        match kind {
            ManufacturerKind::Additive => &self.additive,
            ManufacturerKind::Subtractive => &self.subtractive,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_providers == 0 {
            return Err(ConfigError::NoProviders);
        }
        if self.provider_capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if self.steps == 0 {
            return Err(ConfigError::ZeroSteps);
        }
        if self.incidence.bound() == 0 {
            return Err(ConfigError::InvalidIncidence(self.incidence.bound()));
        }
        check_probability("additive adoption preference", self.additive_adoption_preference)?;
        check_probability("additive adverse-event probability", self.ae_probability.additive)?;
        check_probability(
            "subtractive adverse-event probability",
            self.ae_probability.subtractive,
        )?;
        for kind in ManufacturerKind::ALL {
            self.manufacturer(kind).validate(kind)?;
        }
        Ok(())
    }
}

fn check_probability(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::ProbabilityOutOfRange { name, value })
    }
}
