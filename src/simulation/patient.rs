//! Patient agents
//!
//! Patients own their health history and the surgery / follow-up lifecycle.
//! Providers drive the transitions; the patient itself only counts days and
//! keeps its follow-up schedule populated.

use std::collections::VecDeque;

use super::types::{
    HealthStatus, HistoryEvent, ManufacturerId, PatientId, PatientState, ProviderId,
};

/// A patient in the simulation
#[derive(Debug, Clone)]
pub struct Patient {
    pub id: PatientId,
    pub step_spawned: u64,
    pub health_status: HealthStatus,
    /// Append-only record of (event, status) pairs
    pub health_status_history: Vec<(HistoryEvent, HealthStatus)>,
    /// Routed to a provider
    pub assigned: bool,
    pub provider_id: Option<ProviderId>,
    /// Manufacturer whose implant the patient receives, set once
    pub manufacturer_id: Option<ManufacturerId>,
    pub received_surgery: bool,
    pub needs_urgent_surgery: bool,
    pub days_waiting_for_surgery: u64,
    pub days_since_surgery: u64,
    pub step_received_treatment: Option<u64>,
    pub step_followup_treatment: Option<u64>,
    /// Absolute steps of the remaining follow-ups
    pub follow_up_steps: VecDeque<u64>,
    pub next_follow_up: Option<u64>,
}

impl Patient {
    pub fn new(id: PatientId, step_spawned: u64, health_status: HealthStatus) -> Self {
        Self {
            id,
            step_spawned,
            health_status,
            health_status_history: Vec::new(),
            assigned: false,
            provider_id: None,
            manufacturer_id: None,
            received_surgery: false,
            needs_urgent_surgery: false,
            days_waiting_for_surgery: 0,
            days_since_surgery: 0,
            step_received_treatment: None,
            step_followup_treatment: None,
            follow_up_steps: VecDeque::new(),
            next_follow_up: None,
        }
    }

    pub fn state(&self) -> PatientState {
        if !self.assigned {
            PatientState::AwaitingAssignment
        } else if self.needs_urgent_surgery {
            PatientState::UrgentRelapse
        } else if !self.received_surgery {
            PatientState::QueuedForSurgery
        } else if self.next_follow_up.is_some() || !self.follow_up_steps.is_empty() {
            PatientState::RecoveringAwaitingFollowUp
        } else {
            PatientState::Stable
        }
    }

    pub fn record(&mut self, event: HistoryEvent) {
        self.health_status_history.push((event, self.health_status));
    }

    /// Routed to a provider; the manufacturer is only set the first time
    pub fn admit(&mut self, provider: ProviderId, manufacturer: ManufacturerId) {
        self.assigned = true;
        self.provider_id = Some(provider);
        if self.manufacturer_id.is_none() {
            self.manufacturer_id = Some(manufacturer);
        }
        self.record(HistoryEvent::PreSurgery);
    }

    /// Apply a surgery outcome and lay out the follow-up schedule
    pub fn receive_surgery(&mut self, step: u64, outcome: HealthStatus, offsets: &[u64]) {
        self.health_status = outcome;
        self.step_received_treatment = Some(step);
        self.received_surgery = true;
        self.needs_urgent_surgery = false;
        self.days_since_surgery = 0;
        self.record(HistoryEvent::PostSurgery);
        self.follow_up_steps = offsets.iter().map(|offset| step + offset).collect();
        self.next_follow_up = self.follow_up_steps.pop_front();
    }

    pub fn is_follow_up_due(&self, step: u64) -> bool {
        self.received_surgery && self.next_follow_up.is_some_and(|due| due <= step)
    }

    /// Record a follow-up visit and move on to the next scheduled one
    pub fn complete_follow_up(&mut self, step: u64, status: HealthStatus) {
        self.health_status = status;
        self.step_followup_treatment = Some(step);
        self.record(HistoryEvent::FollowUp { step });
        self.next_follow_up = self.follow_up_steps.pop_front();
    }

    /// Adverse event after a follow-up: back to the surgery queue
    pub fn relapse(&mut self) {
        self.needs_urgent_surgery = true;
        self.received_surgery = false;
        self.follow_up_steps.clear();
        self.next_follow_up = None;
    }

    /// The last two recorded statuses, oldest first
    pub fn last_two_statuses(&self) -> Option<(HealthStatus, HealthStatus)> {
        match self.health_status_history.as_slice() {
            [.., (_, before), (_, after)] => Some((*before, *after)),
            _ => None,
        }
    }

    /// Per-step bookkeeping
    pub fn advance(&mut self) {
        if self.needs_urgent_surgery || !self.received_surgery {
            self.days_waiting_for_surgery += 1;
            return;
        }

        self.days_since_surgery += 1;
        if self.next_follow_up.is_none() {
            self.next_follow_up = self.follow_up_steps.pop_front();
        }
    }
}
