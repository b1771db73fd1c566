//! Standalone implant market simulation
//!
//! This module contains the discrete-time agent engine: manufacturers,
//! healthcare providers and patients, wired together by `Model`. It has no
//! presentation dependencies; callers read the record streams it produces.

mod config;
mod error;
mod manufacturer;
mod model;
mod patient;
mod provider;
mod records;
mod report;
mod sampler;
mod scheduler;
mod types;

// Re-export public types for external use
pub use config::{AdverseEventRisk, ManufacturerConfig, ModelConfig, PatientIncidence};
pub use error::ConfigError;
pub use manufacturer::Manufacturer;
pub use model::Model;
pub use patient::Patient;
pub use provider::{CareContext, OutcomeRates, Provider};
pub use records::{ManufacturerRecord, PatientRecord, ProviderRecord, RunHistory};
pub use report::{HealthCounts, ManufacturerSummary, ProviderSummary, RunSummary};
pub use sampler::{
    chance, FollowUpTransition, OutcomeSampler, OutcomeTable, FOLLOW_UP_WEIGHTS,
    SURGERY_OUTCOME_WEIGHTS,
};
pub use scheduler::{FollowUpEvent, StepEvents, SurgeryEvent, TurnOrder};
pub use types::{
    AgentKey, HealthChange, HealthStatus, HistoryEvent, ManufacturerId, ManufacturerKind,
    PatientId, PatientState, ProviderId, DEFAULT_PROVIDER_CAPACITY, FOLLOW_UP_OFFSETS,
};
