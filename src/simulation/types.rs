//! Core types for the implant market simulation
//!
//! Identifiers, health categories and the constants shared by the agents.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A wrapper type for manufacturer IDs (index into the model's manufacturer arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ManufacturerId(pub usize);

/// A wrapper type for provider IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProviderId(pub usize);

/// A wrapper type for patient IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PatientId(pub usize);

impl fmt::Display for ManufacturerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "manufacturer_{}", self.0)
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "provider_{}", self.0)
    }
}

impl fmt::Display for PatientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "patient_{}", self.0)
    }
}

/// Manufacturing strategy of a manufacturer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ManufacturerKind {
    /// 3D printing, restocks in the same step
    Additive,
    /// Traditional machining, restocks after a fixed lag
    Subtractive,
}

impl ManufacturerKind {
    pub const ALL: [ManufacturerKind; 2] = [ManufacturerKind::Additive, ManufacturerKind::Subtractive];

    pub fn as_str(&self) -> &'static str {
        match self {
            ManufacturerKind::Additive => "additive",
            ManufacturerKind::Subtractive => "subtractive",
        }
    }
}

impl fmt::Display for ManufacturerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Patient condition, ordered from best to worst
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Minimal,
    Moderate,
    Severe,
    Crippled,
    Bedbound,
}

impl HealthStatus {
    pub const ALL: [HealthStatus; 5] = [
        HealthStatus::Minimal,
        HealthStatus::Moderate,
        HealthStatus::Severe,
        HealthStatus::Crippled,
        HealthStatus::Bedbound,
    ];

    /// Statuses a newly injured patient can present with
    pub const INJURED: [HealthStatus; 3] = [
        HealthStatus::Severe,
        HealthStatus::Crippled,
        HealthStatus::Bedbound,
    ];

    /// Position in the best-to-worst ordering (lower is healthier)
    pub fn ordinal(&self) -> usize {
        *self as usize
    }

    /// Utility weight used when averaging health across patients
    pub fn utility(&self) -> f64 {
        match self {
            HealthStatus::Minimal => 0.84,
            HealthStatus::Moderate => 0.61,
            HealthStatus::Severe => 0.55,
            HealthStatus::Crippled => 0.51,
            HealthStatus::Bedbound => 0.5,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HealthStatus::Minimal => "minimal",
            HealthStatus::Moderate => "moderate",
            HealthStatus::Severe => "severe",
            HealthStatus::Crippled => "crippled",
            HealthStatus::Bedbound => "bedbound",
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Label of an entry in a patient's health history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HistoryEvent {
    PreSurgery,
    PostSurgery,
    FollowUp { step: u64 },
}

impl fmt::Display for HistoryEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HistoryEvent::PreSurgery => f.write_str("pre-surgery"),
            HistoryEvent::PostSurgery => f.write_str("post-surgery"),
            HistoryEvent::FollowUp { step } => write!(f, "follow-up at step {}", step),
        }
    }
}

/// Direction of a health change between two history entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthChange {
    Improved,
    Same,
    Worsened,
}

impl HealthChange {
    pub fn between(before: HealthStatus, after: HealthStatus) -> Self {
        match before.ordinal().cmp(&after.ordinal()) {
            std::cmp::Ordering::Greater => HealthChange::Improved,
            std::cmp::Ordering::Equal => HealthChange::Same,
            std::cmp::Ordering::Less => HealthChange::Worsened,
        }
    }
}

/// Lifecycle state of a patient, derived from its flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatientState {
    AwaitingAssignment,
    QueuedForSurgery,
    UrgentRelapse,
    RecoveringAwaitingFollowUp,
    Stable,
}

/// Key of an agent in the per-step activation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgentKey {
    Manufacturer(ManufacturerId),
    Provider(ProviderId),
    Patient(PatientId),
}

/// Follow-up offsets in days after surgery: 6 weeks, 3 months, 6 months, 1 year, 2 years
pub const FOLLOW_UP_OFFSETS: [u64; 5] = [6 * 7, 3 * 30, 6 * 30, 365, 2 * 365];

/// Default number of concurrent surgery patients per provider
pub const DEFAULT_PROVIDER_CAPACITY: usize = 15;
