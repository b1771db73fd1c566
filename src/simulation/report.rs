//! Run summaries computed from the record streams
//!
//! These read finished records only: per-manufacturer totals, provider
//! surgery counts and utility-weighted patient outcomes at the final step.

use log::info;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use super::records::RunHistory;
use super::types::{HealthStatus, ManufacturerId, ManufacturerKind, ProviderId};

/// Patient counts per health status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HealthCounts {
    pub minimal: u64,
    pub moderate: u64,
    pub severe: u64,
    pub crippled: u64,
    pub bedbound: u64,
}

impl HealthCounts {
    fn slot(&mut self, status: HealthStatus) -> &mut u64 {
        match status {
            HealthStatus::Minimal => &mut self.minimal,
            HealthStatus::Moderate => &mut self.moderate,
            HealthStatus::Severe => &mut self.severe,
            HealthStatus::Crippled => &mut self.crippled,
            HealthStatus::Bedbound => &mut self.bedbound,
        }
    }

    pub fn add(&mut self, status: HealthStatus) {
        *self.slot(status) += 1;
    }

    pub fn get(&self, status: HealthStatus) -> u64 {
        match status {
            HealthStatus::Minimal => self.minimal,
            HealthStatus::Moderate => self.moderate,
            HealthStatus::Severe => self.severe,
            HealthStatus::Crippled => self.crippled,
            HealthStatus::Bedbound => self.bedbound,
        }
    }

    pub fn merge(&mut self, other: &HealthCounts) {
        for status in HealthStatus::ALL {
            *self.slot(status) += other.get(status);
        }
    }

    pub fn total(&self) -> u64 {
        HealthStatus::ALL.iter().map(|s| self.get(*s)).sum()
    }

    /// Mean utility of the counted patients, `None` when empty
    pub fn average_utility(&self) -> Option<f64> {
        let total = self.total();
        if total == 0 {
            return None;
        }
        let weighted: f64 = HealthStatus::ALL
            .iter()
            .map(|s| s.utility() * self.get(*s) as f64)
            .sum();
        Some(weighted / total as f64)
    }
}

impl fmt::Display for HealthCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "minimal={}, moderate={}, severe={}, crippled={}, bedbound={}",
            self.minimal, self.moderate, self.severe, self.crippled, self.bedbound
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ManufacturerSummary {
    pub manufacturer_id: ManufacturerId,
    pub kind: ManufacturerKind,
    /// Sums over every recorded step
    pub revenue_sum: f64,
    pub costs_sum: f64,
    pub profit_sum: f64,
    pub implants_produced: u64,
    pub final_revenue: f64,
    pub final_profit: f64,
    pub final_inventory: u32,
    /// Health of this manufacturer's patients at the final step
    pub final_health: HealthCounts,
    pub average_utility: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderSummary {
    pub provider_id: ProviderId,
    pub surgeries_performed: u64,
    pub patients_treated: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub steps: u64,
    pub final_step: Option<u64>,
    pub patients: usize,
    pub manufacturers: Vec<ManufacturerSummary>,
    pub providers: Vec<ProviderSummary>,
    /// Final-step health of patients who have received surgery
    pub treated: HealthCounts,
    /// Final-step health of patients still waiting
    pub awaiting: HealthCounts,
    pub average_utility: Option<f64>,
}

impl RunSummary {
    pub fn from_history(history: &RunHistory) -> Self {
        let final_step = history.last_step();

        let mut treated = HealthCounts::default();
        let mut awaiting = HealthCounts::default();
        let mut by_manufacturer: BTreeMap<ManufacturerId, HealthCounts> = BTreeMap::new();
        let mut patients = 0;
        if let Some(step) = final_step {
            for row in history.patient_rows_at(step) {
                patients += 1;
                if row.received_surgery {
                    treated.add(row.health_status);
                } else {
                    awaiting.add(row.health_status);
                }
                if let Some(id) = row.manufacturer_id {
                    by_manufacturer.entry(id).or_default().add(row.health_status);
                }
            }
        }

        let mut manufacturers: BTreeMap<ManufacturerId, ManufacturerSummary> = BTreeMap::new();
        for row in &history.manufacturer_rows {
            let summary = manufacturers
                .entry(row.manufacturer_id)
                .or_insert_with(|| ManufacturerSummary {
                    manufacturer_id: row.manufacturer_id,
                    kind: row.kind,
                    revenue_sum: 0.0,
                    costs_sum: 0.0,
                    profit_sum: 0.0,
                    implants_produced: 0,
                    final_revenue: 0.0,
                    final_profit: 0.0,
                    final_inventory: 0,
                    final_health: HealthCounts::default(),
                    average_utility: None,
                });
            summary.revenue_sum += row.revenue;
            summary.costs_sum += row.costs;
            summary.profit_sum += row.profit;
            summary.implants_produced += u64::from(row.implants_produced);
            summary.final_revenue = row.revenue;
            summary.final_profit = row.profit;
            summary.final_inventory = row.inventory;
        }
        for summary in manufacturers.values_mut() {
            if let Some(counts) = by_manufacturer.get(&summary.manufacturer_id) {
                summary.final_health = *counts;
                summary.average_utility = counts.average_utility();
            }
        }

        let mut providers: BTreeMap<ProviderId, ProviderSummary> = BTreeMap::new();
        for row in &history.provider_rows {
            let summary = providers.entry(row.provider_id).or_insert(ProviderSummary {
                provider_id: row.provider_id,
                surgeries_performed: 0,
                patients_treated: 0,
            });
            summary.surgeries_performed = summary.surgeries_performed.max(row.surgeries_performed);
            summary.patients_treated = summary.patients_treated.max(row.cumulative_patients_treated);
        }

        let mut everyone = treated;
        everyone.merge(&awaiting);

        Self {
            steps: final_step.map_or(0, |step| step + 1),
            final_step,
            patients,
            manufacturers: manufacturers.into_values().collect(),
            providers: providers.into_values().collect(),
            treated,
            awaiting,
            average_utility: everyone.average_utility(),
        }
    }

    pub fn log(&self) {
        info!("=== SIMULATION COMPLETE ===");
        info!("Steps simulated: {}", self.steps);
        info!("Total patients: {}", self.patients);
        for m in &self.manufacturers {
            info!(
                "Manufacturer {} ({}): revenue={:.2}, profit={:.2}, implants produced={}, inventory={}",
                m.manufacturer_id.0, m.kind, m.final_revenue, m.final_profit, m.implants_produced, m.final_inventory
            );
            info!("  Final patient health: {}", m.final_health);
            if let Some(utility) = m.average_utility {
                info!("  Average utility: {:.3}", utility);
            }
        }
        for p in &self.providers {
            info!(
                "Provider {}: surgeries performed={}, patients treated={}",
                p.provider_id.0, p.surgeries_performed, p.patients_treated
            );
        }
        info!("Treated patients: {}", self.treated);
        info!("Awaiting patients: {}", self.awaiting);
        if let Some(utility) = self.average_utility {
            info!("Average health utility: {:.3}", utility);
        }
    }
}
