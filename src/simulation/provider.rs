//! Healthcare provider agents
//!
//! A provider admits patients up to its capacity, sources an implant for each
//! from a manufacturer, operates when the implant is in stock and runs the
//! post-surgery follow-up schedule for everyone it has treated.

use log::{debug, warn};
use rand::rngs::StdRng;
use rand::Rng;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use super::config::AdverseEventRisk;
use super::manufacturer::Manufacturer;
use super::patient::Patient;
use super::sampler::{chance, FollowUpTransition, OutcomeSampler};
use super::scheduler::{FollowUpEvent, StepEvents, SurgeryEvent};
use super::types::{
    HealthChange, HealthStatus, ManufacturerId, ManufacturerKind, PatientId, ProviderId,
    FOLLOW_UP_OFFSETS,
};

/// Everything a provider touches while admitting or treating patients
pub struct CareContext<'a> {
    pub step: u64,
    pub manufacturers: &'a mut [Manufacturer],
    pub patients: &'a mut [Patient],
    pub sampler: &'a OutcomeSampler,
    pub ae_probability: AdverseEventRisk,
    pub rng: &'a mut StdRng,
    pub events: &'a mut StepEvents,
}

/// Fractions of a manufacturer's treated patients by their latest change
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct OutcomeRates {
    pub improved: f64,
    pub same: f64,
    pub worsened: f64,
}

/// A healthcare provider in the simulation
#[derive(Debug, Clone)]
pub struct Provider {
    pub id: ProviderId,
    pub max_capacity: usize,
    /// Spare admission slots, recomputed at the end of each step
    pub patient_capacity: usize,
    /// Patients waiting for surgery, in admission order
    pub surgery_patients: Vec<PatientId>,
    /// Every patient this provider has operated on. Follow-ups only go to
    /// those still under its care (see `is_under_care`).
    pub all_patients: BTreeSet<PatientId>,
    pub surgeries_performed: u64,
    pub surgeries_this_step: u32,
}

impl Provider {
    pub fn new(id: ProviderId, max_capacity: usize) -> Self {
        Self {
            id,
            max_capacity,
            patient_capacity: max_capacity,
            surgery_patients: Vec::new(),
            all_patients: BTreeSet::new(),
            surgeries_performed: 0,
            surgeries_this_step: 0,
        }
    }

    pub fn has_capacity(&self) -> bool {
        self.surgery_patients.len() < self.max_capacity
    }

    fn update_capacity(&mut self) {
        self.patient_capacity = self.max_capacity.saturating_sub(self.surgery_patients.len());
    }

    /// A displaced relapse re-admitted elsewhere belongs to its new provider
    pub fn is_under_care(&self, patient: &Patient) -> bool {
        patient.provider_id == Some(self.id)
    }

    /// Per manufacturer, how the last two recorded statuses of the patients
    /// under this provider's care compare
    pub fn health_outcome_rates(&self, patients: &[Patient]) -> BTreeMap<ManufacturerId, OutcomeRates> {
        let mut counts: BTreeMap<ManufacturerId, [u32; 3]> = BTreeMap::new();
        for patient in self
            .all_patients
            .iter()
            .filter_map(|id| patients.get(id.0))
            .filter(|p| self.is_under_care(p))
        {
            let (Some(manufacturer_id), Some((before, after))) =
                (patient.manufacturer_id, patient.last_two_statuses())
            else {
                continue;
            };
            let slot = match HealthChange::between(before, after) {
                HealthChange::Improved => 0,
                HealthChange::Same => 1,
                HealthChange::Worsened => 2,
            };
            counts.entry(manufacturer_id).or_default()[slot] += 1;
        }

        counts
            .into_iter()
            .map(|(id, [improved, same, worsened])| {
                let total = f64::from(improved + same + worsened);
                (
                    id,
                    OutcomeRates {
                        improved: f64::from(improved) / total,
                        same: f64::from(same) / total,
                        worsened: f64::from(worsened) / total,
                    },
                )
            })
            .collect()
    }

    /// Probability of sourcing from the additive manufacturer.
    /// The adaptive variant scales the base preference by the additive
    /// improvement rate, treating a zero rate as 1.
    pub fn adoption_preference(
        &self,
        base: f64,
        adaptive: bool,
        patients: &[Patient],
        manufacturers: &[Manufacturer],
    ) -> f64 {
        if !adaptive {
            return base;
        }
        let additive_rate = manufacturers
            .iter()
            .find(|m| m.kind == ManufacturerKind::Additive)
            .and_then(|m| self.health_outcome_rates(patients).get(&m.id).map(|r| r.improved))
            .unwrap_or(0.0);
        let multiplier = if additive_rate == 0.0 { 1.0 } else { additive_rate };
        base * multiplier
    }

    /// Take a patient into the surgery queue and order its implant.
    /// Returns false when the provider is full.
    pub fn admit(
        &mut self,
        patient_id: PatientId,
        preference: f64,
        ctx: &mut CareContext<'_>,
    ) -> bool {
        if !self.has_capacity() {
            return false;
        }
        let Some(patient) = ctx.patients.get_mut(patient_id.0) else {
            warn!("{} asked to admit unknown {}", self.id, patient_id);
            return false;
        };

        let manufacturer_id = match patient.manufacturer_id {
            // Re-admitted relapse: keep the original implant source
            Some(id) => id,
            None => {
                let kind = if ctx.rng.random::<f64>() < preference {
                    ManufacturerKind::Additive
                } else {
                    ManufacturerKind::Subtractive
                };
                let Some(manufacturer) = ctx.manufacturers.iter_mut().find(|m| m.kind == kind)
                else {
                    warn!("No {} manufacturer available for {}", kind, patient_id);
                    return false;
                };
                manufacturer.order(1);
                manufacturer.id
            }
        };

        patient.admit(self.id, manufacturer_id);
        self.surgery_patients.push(patient_id);
        self.update_capacity();
        ctx.events.assigned += 1;
        debug!("{} admitted {} ({})", self.id, patient_id, manufacturer_id);
        true
    }

    /// Operate if the patient's manufacturer has stock. Returns whether the
    /// surgery went ahead; otherwise the patient stays queued.
    pub fn perform_surgery(&mut self, patient_id: PatientId, ctx: &mut CareContext<'_>) -> bool {
        let Some(patient) = ctx.patients.get_mut(patient_id.0) else {
            return false;
        };
        let Some(manufacturer_id) = patient.manufacturer_id else {
            warn!("{} is queued at {} without a manufacturer", patient_id, self.id);
            return false;
        };
        let Some(manufacturer) = ctx.manufacturers.get_mut(manufacturer_id.0) else {
            return false;
        };

        if !manufacturer.deliver(1) {
            debug!(
                "{} postponed surgery for {}: {} out of stock",
                self.id, patient_id, manufacturer_id
            );
            ctx.events.stock_outs.push((self.id, patient_id, manufacturer_id));
            return false;
        }

        let urgent = patient.needs_urgent_surgery;
        let outcome = ctx.sampler.surgery_outcome(&mut *ctx.rng);
        patient.receive_surgery(ctx.step, outcome, &FOLLOW_UP_OFFSETS);

        self.surgery_patients.retain(|id| *id != patient_id);
        self.all_patients.insert(patient_id);
        self.surgeries_performed += 1;
        self.surgeries_this_step += 1;
        ctx.events.surgeries.push(SurgeryEvent {
            provider_id: self.id,
            patient_id,
            manufacturer_id,
            outcome,
            urgent,
        });
        true
    }

    /// Reassess a treated patient; a worse outcome may trigger urgent re-surgery
    pub fn perform_follow_up(&mut self, patient_id: PatientId, ctx: &mut CareContext<'_>) {
        let Some(patient) = ctx.patients.get_mut(patient_id.0) else {
            return;
        };
        let before = patient.health_status;
        let transition = ctx.sampler.follow_up_transition(&mut *ctx.rng);
        let status = match transition {
            FollowUpTransition::Improved => HealthStatus::Minimal,
            FollowUpTransition::Stable => before,
            FollowUpTransition::Worse => HealthStatus::Bedbound,
        };
        patient.complete_follow_up(ctx.step, status);

        let mut adverse_event = false;
        if transition == FollowUpTransition::Worse {
            let kind = patient
                .manufacturer_id
                .and_then(|id| ctx.manufacturers.get(id.0))
                .map(|m| m.kind);
            let probability = kind.map_or(0.0, |k| ctx.ae_probability.for_kind(k));
            adverse_event = chance(&mut *ctx.rng, probability);
        }

        if adverse_event {
            patient.relapse();
            if self.has_capacity() {
                self.surgery_patients.push(patient_id);
            } else {
                // Full queue: the next assignment pass finds the patient a slot
                patient.assigned = false;
                patient.provider_id = None;
                ctx.events.displaced.push(patient_id);
            }
            debug!("{} flagged {} for urgent surgery", self.id, patient_id);
        }

        ctx.events.follow_ups.push(FollowUpEvent {
            provider_id: self.id,
            patient_id,
            manufacturer_id: patient.manufacturer_id,
            transition,
            change: HealthChange::between(before, status),
            status,
            adverse_event,
        });
    }

    /// Operate on the queue (urgent first, then routine, each in admission
    /// order), run due follow-ups and recompute capacity.
    pub fn advance(&mut self, ctx: &mut CareContext<'_>) {
        self.surgeries_this_step = 0;

        let (urgent, routine): (Vec<PatientId>, Vec<PatientId>) = self
            .surgery_patients
            .iter()
            .copied()
            .partition(|id| ctx.patients.get(id.0).is_some_and(|p| p.needs_urgent_surgery));
        for patient_id in urgent.into_iter().chain(routine) {
            self.perform_surgery(patient_id, ctx);
        }

        let due: Vec<PatientId> = self
            .all_patients
            .iter()
            .copied()
            .filter(|id| {
                ctx.patients
                    .get(id.0)
                    .is_some_and(|p| self.is_under_care(p) && p.is_follow_up_due(ctx.step))
            })
            .collect();
        for patient_id in due {
            self.perform_follow_up(patient_id, ctx);
        }

        self.update_capacity();
    }
}
