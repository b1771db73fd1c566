//! Flat per-step record streams
//!
//! One row per manufacturer, provider and patient is appended after every
//! step. Presentation layers read these; the engine never reads them back.

use serde::Serialize;

use super::manufacturer::Manufacturer;
use super::patient::Patient;
use super::provider::Provider;
use super::types::{
    HealthStatus, ManufacturerId, ManufacturerKind, PatientId, PatientState, ProviderId,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ManufacturerRecord {
    pub step: u64,
    pub manufacturer_id: ManufacturerId,
    pub kind: ManufacturerKind,
    pub revenue: f64,
    pub costs: f64,
    pub profit: f64,
    pub inventory: u32,
    pub implants_produced: u32,
    pub in_flight: u32,
    pub total_orders: u64,
    pub backlog: u64,
}

impl ManufacturerRecord {
    pub fn capture(step: u64, manufacturer: &Manufacturer) -> Self {
        Self {
            step,
            manufacturer_id: manufacturer.id,
            kind: manufacturer.kind,
            revenue: manufacturer.sales_revenue,
            costs: manufacturer.costs(),
            profit: manufacturer.profit(),
            inventory: manufacturer.inventory,
            implants_produced: manufacturer.units_produced,
            in_flight: manufacturer.in_flight(),
            total_orders: manufacturer.total_orders,
            backlog: manufacturer.backlog,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderRecord {
    pub step: u64,
    pub provider_id: ProviderId,
    /// Cumulative
    pub surgeries_performed: u64,
    pub surgeries_this_step: u32,
    pub queue_length: usize,
    pub patient_capacity: usize,
    pub cumulative_patients_treated: usize,
}

impl ProviderRecord {
    pub fn capture(step: u64, provider: &Provider) -> Self {
        Self {
            step,
            provider_id: provider.id,
            surgeries_performed: provider.surgeries_performed,
            surgeries_this_step: provider.surgeries_this_step,
            queue_length: provider.surgery_patients.len(),
            patient_capacity: provider.patient_capacity,
            cumulative_patients_treated: provider.all_patients.len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatientRecord {
    pub step: u64,
    pub patient_id: PatientId,
    pub health_status: HealthStatus,
    pub state: PatientState,
    pub received_surgery: bool,
    pub days_waiting_for_surgery: u64,
    pub step_received_treatment: Option<u64>,
    pub manufacturer_id: Option<ManufacturerId>,
    pub next_follow_up: Option<u64>,
    pub needs_urgent_surgery: bool,
    pub step_followup_treatment: Option<u64>,
}

impl PatientRecord {
    pub fn capture(step: u64, patient: &Patient) -> Self {
        Self {
            step,
            patient_id: patient.id,
            health_status: patient.health_status,
            state: patient.state(),
            received_surgery: patient.received_surgery,
            days_waiting_for_surgery: patient.days_waiting_for_surgery,
            step_received_treatment: patient.step_received_treatment,
            manufacturer_id: patient.manufacturer_id,
            next_follow_up: patient.next_follow_up,
            needs_urgent_surgery: patient.needs_urgent_surgery,
            step_followup_treatment: patient.step_followup_treatment,
        }
    }
}

/// Every record captured over a run, in capture order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunHistory {
    pub manufacturer_rows: Vec<ManufacturerRecord>,
    pub provider_rows: Vec<ProviderRecord>,
    pub patient_rows: Vec<PatientRecord>,
}

impl RunHistory {
    pub fn last_step(&self) -> Option<u64> {
        self.manufacturer_rows.last().map(|row| row.step)
    }

    pub fn patient_rows_at(&self, step: u64) -> impl Iterator<Item = &PatientRecord> {
        self.patient_rows.iter().filter(move |row| row.step == step)
    }

    pub fn manufacturer_rows_for(
        &self,
        id: ManufacturerId,
    ) -> impl Iterator<Item = &ManufacturerRecord> {
        self.manufacturer_rows
            .iter()
            .filter(move |row| row.manufacturer_id == id)
    }

    pub fn provider_rows_for(&self, id: ProviderId) -> impl Iterator<Item = &ProviderRecord> {
        self.provider_rows.iter().filter(move |row| row.provider_id == id)
    }
}
