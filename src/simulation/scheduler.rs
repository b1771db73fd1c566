//! Turn order and per-step event buffer
//!
//! Agents are activated once per step in a shuffled order. The shuffle draws
//! from its own seeded generator so the activation sequence is a pure
//! function of the run seed.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Serialize;

use super::sampler::FollowUpTransition;
use super::types::{
    AgentKey, HealthChange, HealthStatus, ManufacturerId, PatientId, ProviderId,
};

/// Mixed into the run seed so turn order and outcome draws use separate streams
const TURN_ORDER_STREAM: u64 = 0x9E37_79B9_7F4A_7C15;

/// Deterministic permutation generator for agent activation
#[derive(Debug, Clone)]
pub struct TurnOrder {
    rng: StdRng,
}

impl TurnOrder {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed ^ TURN_ORDER_STREAM),
        }
    }

    /// Shuffle `agents` in place into this step's activation order
    pub fn permute(&mut self, agents: &mut [AgentKey]) {
        agents.shuffle(&mut self.rng);
    }
}

/// A surgery that went ahead this step
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SurgeryEvent {
    pub provider_id: ProviderId,
    pub patient_id: PatientId,
    pub manufacturer_id: ManufacturerId,
    pub outcome: HealthStatus,
    pub urgent: bool,
}

/// A follow-up visit performed this step
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FollowUpEvent {
    pub provider_id: ProviderId,
    pub patient_id: PatientId,
    pub manufacturer_id: Option<ManufacturerId>,
    pub transition: FollowUpTransition,
    pub change: HealthChange,
    pub status: HealthStatus,
    pub adverse_event: bool,
}

/// Transient record of what happened during one step.
/// Cleared by the model at the start of every step.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StepEvents {
    pub spawned: usize,
    pub assigned: usize,
    pub surgeries: Vec<SurgeryEvent>,
    pub follow_ups: Vec<FollowUpEvent>,
    /// Surgeries postponed because the manufacturer had no stock
    pub stock_outs: Vec<(ProviderId, PatientId, ManufacturerId)>,
    /// Urgent relapses that could not re-enter a full provider queue
    pub displaced: Vec<PatientId>,
}

impl StepEvents {
    pub fn clear(&mut self) {
        self.spawned = 0;
        self.assigned = 0;
        self.surgeries.clear();
        self.follow_ups.clear();
        self.stock_outs.clear();
        self.displaced.clear();
    }

    pub fn adverse_events(&self) -> usize {
        self.follow_ups.iter().filter(|f| f.adverse_event).count()
    }

    /// Follow-up counts by resulting change (improved, same, worsened)
    pub fn change_counts(&self) -> (usize, usize, usize) {
        self.follow_ups
            .iter()
            .fold((0, 0, 0), |(improved, same, worsened), f| match f.change {
                HealthChange::Improved => (improved + 1, same, worsened),
                HealthChange::Same => (improved, same + 1, worsened),
                HealthChange::Worsened => (improved, same, worsened + 1),
            })
    }
}
