//! Main simulation model that ties the agents together
//!
//! Each call to `step` advances one simulated day: spawn patients, route
//! unassigned patients to providers, activate every agent once in a shuffled
//! order, then snapshot one record per agent.

use log::{debug, info};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::Rng;
use rand::SeedableRng;
use std::collections::BTreeMap;

use super::config::{ModelConfig, PatientIncidence};
use super::error::ConfigError;
use super::manufacturer::Manufacturer;
use super::patient::Patient;
use super::provider::{CareContext, Provider};
use super::records::{ManufacturerRecord, PatientRecord, ProviderRecord, RunHistory};
use super::report::HealthCounts;
use super::sampler::OutcomeSampler;
use super::scheduler::{StepEvents, TurnOrder};
use super::types::{
    AgentKey, HealthStatus, ManufacturerId, ManufacturerKind, PatientId, ProviderId,
};

/// The implant market model
pub struct Model {
    config: ModelConfig,

    /// Indexed by `ManufacturerId`
    pub manufacturers: Vec<Manufacturer>,

    /// Indexed by `ProviderId`
    pub providers: Vec<Provider>,

    /// Indexed by `PatientId`; patients are never removed
    pub patients: Vec<Patient>,

    /// Number of completed steps (also the index of the next step)
    steps: u64,

    seed: u64,

    /// Outcome, spawn and assignment draws
    rng: StdRng,

    turn_order: TurnOrder,

    sampler: OutcomeSampler,

    /// What happened during the most recent step
    events: StepEvents,

    /// Post-surgery outcomes per manufacturer over the whole run
    cumulative_outcomes: BTreeMap<ManufacturerId, HealthCounts>,

    history: RunHistory,
}

impl Model {
    pub fn new(config: ModelConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let sampler = OutcomeSampler::standard()?;

        let seed = config.seed.unwrap_or_else(|| rand::rng().random());
        info!("Model seed: {}", seed);

        let manufacturers: Vec<Manufacturer> = ManufacturerKind::ALL
            .iter()
            .enumerate()
            .map(|(index, kind)| {
                Manufacturer::new(ManufacturerId(index), *kind, config.manufacturer(*kind))
            })
            .collect();

        let providers = (0..config.num_providers)
            .map(|index| Provider::new(ProviderId(index), config.provider_capacity))
            .collect();

        let cumulative_outcomes = manufacturers
            .iter()
            .map(|m| (m.id, HealthCounts::default()))
            .collect();

        let mut model = Self {
            manufacturers,
            providers,
            patients: Vec::new(),
            steps: 0,
            seed,
            rng: StdRng::seed_from_u64(seed),
            turn_order: TurnOrder::new(seed),
            sampler,
            events: StepEvents::default(),
            cumulative_outcomes,
            history: RunHistory::default(),
            config,
        };

        for _ in 0..model.config.initial_patients {
            model.spawn_patient(0);
        }
        Ok(model)
    }

    /// Create a model with a fixed seed, overriding any seed in the config
    pub fn new_with_seed(config: ModelConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::new(ModelConfig {
            seed: Some(seed),
            ..config
        })
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Steps completed so far
    pub fn current_step(&self) -> u64 {
        self.steps
    }

    pub fn is_finished(&self) -> bool {
        self.steps >= self.config.steps
    }

    pub fn history(&self) -> &RunHistory {
        &self.history
    }

    pub fn into_history(self) -> RunHistory {
        self.history
    }

    /// Events of the most recent step
    pub fn last_events(&self) -> &StepEvents {
        &self.events
    }

    pub fn cumulative_outcomes(&self) -> &BTreeMap<ManufacturerId, HealthCounts> {
        &self.cumulative_outcomes
    }

    pub fn manufacturer(&self, kind: ManufacturerKind) -> Option<&Manufacturer> {
        self.manufacturers.iter().find(|m| m.kind == kind)
    }

    /// Mean utility over every patient in the population
    pub fn average_health_status(&self) -> f64 {
        if self.patients.is_empty() {
            return 0.0;
        }
        let total: f64 = self.patients.iter().map(|p| p.health_status.utility()).sum();
        total / self.patients.len() as f64
    }

    fn spawn_patient(&mut self, step: u64) -> PatientId {
        let id = PatientId(self.patients.len());
        let status = HealthStatus::INJURED[self.rng.random_range(0..HealthStatus::INJURED.len())];
        self.patients.push(Patient::new(id, step, status));
        id
    }

    fn spawn_patients(&mut self, step: u64) {
        let count = match self.config.incidence {
            PatientIncidence::UpTo(bound) => self.rng.random_range(0..=bound),
            PatientIncidence::Exactly(count) => count,
        };
        for _ in 0..count {
            self.spawn_patient(step);
        }
        self.events.spawned = count as usize;
        if count > 0 {
            debug!("{} new patients spawned at step {}", count, step);
        }
    }

    /// Route every unassigned patient to a random provider with spare capacity
    fn assign_patients(&mut self, step: u64) {
        let unassigned: Vec<PatientId> = self
            .patients
            .iter()
            .filter(|p| !p.assigned)
            .map(|p| p.id)
            .collect();
        if unassigned.is_empty() {
            return;
        }

        // One preference per provider, fixed for the whole pass
        let preferences: Vec<f64> = self
            .providers
            .iter()
            .map(|provider| {
                provider.adoption_preference(
                    self.config.additive_adoption_preference,
                    self.config.adaptive_preference,
                    &self.patients,
                    &self.manufacturers,
                )
            })
            .collect();

        for patient_id in unassigned {
            let open: Vec<ProviderId> = self
                .providers
                .iter()
                .filter(|p| p.has_capacity())
                .map(|p| p.id)
                .collect();
            let Some(&provider_id) = open.choose(&mut self.rng) else {
                // Everyone is full; the rest retry next step
                break;
            };
            let (Some(provider), Some(&preference)) = (
                self.providers.get_mut(provider_id.0),
                preferences.get(provider_id.0),
            ) else {
                continue;
            };

            let mut ctx = CareContext {
                step,
                manufacturers: &mut self.manufacturers,
                patients: &mut self.patients,
                sampler: &self.sampler,
                ae_probability: self.config.ae_probability,
                rng: &mut self.rng,
                events: &mut self.events,
            };
            provider.admit(patient_id, preference, &mut ctx);
        }
    }

    /// Activate every agent once, in this step's turn order
    fn activate_agents(&mut self, step: u64) {
        let mut order: Vec<AgentKey> = self
            .manufacturers
            .iter()
            .map(|m| AgentKey::Manufacturer(m.id))
            .chain(self.providers.iter().map(|p| AgentKey::Provider(p.id)))
            .chain(self.patients.iter().map(|p| AgentKey::Patient(p.id)))
            .collect();
        self.turn_order.permute(&mut order);

        for key in order {
            match key {
                AgentKey::Manufacturer(id) => {
                    if let Some(manufacturer) = self.manufacturers.get_mut(id.0) {
                        manufacturer.advance_production(step);
                    }
                }
                AgentKey::Provider(id) => {
                    let Some(provider) = self.providers.get_mut(id.0) else {
                        continue;
                    };
                    let mut ctx = CareContext {
                        step,
                        manufacturers: &mut self.manufacturers,
                        patients: &mut self.patients,
                        sampler: &self.sampler,
                        ae_probability: self.config.ae_probability,
                        rng: &mut self.rng,
                        events: &mut self.events,
                    };
                    provider.advance(&mut ctx);
                }
                AgentKey::Patient(id) => {
                    if let Some(patient) = self.patients.get_mut(id.0) {
                        patient.advance();
                    }
                }
            }
        }
    }

    fn tally_outcomes(&mut self) {
        for surgery in &self.events.surgeries {
            self.cumulative_outcomes
                .entry(surgery.manufacturer_id)
                .or_default()
                .add(surgery.outcome);
        }
    }

    fn collect_records(&mut self, step: u64) {
        self.history.manufacturer_rows.extend(
            self.manufacturers
                .iter()
                .map(|m| ManufacturerRecord::capture(step, m)),
        );
        self.history
            .provider_rows
            .extend(self.providers.iter().map(|p| ProviderRecord::capture(step, p)));
        self.history
            .patient_rows
            .extend(self.patients.iter().map(|p| PatientRecord::capture(step, p)));
    }

    /// Advance one simulated day
    pub fn step(&mut self) {
        let step = self.steps;
        self.events.clear();

        self.spawn_patients(step);
        self.assign_patients(step);
        self.activate_agents(step);
        self.tally_outcomes();
        self.collect_records(step);
        self.log_step(step);

        self.steps += 1;
    }

    /// Run the remaining configured steps
    pub fn run(&mut self) {
        while !self.is_finished() {
            self.step();
        }
    }

    fn log_step(&self, step: u64) {
        let (improved, same, worsened) = self.events.change_counts();
        debug!(
            "Step {}: spawned={}, assigned={}, surgeries={}, stock_outs={}, follow_ups={} (improved={}, same={}, worsened={}), adverse_events={}",
            step,
            self.events.spawned,
            self.events.assigned,
            self.events.surgeries.len(),
            self.events.stock_outs.len(),
            self.events.follow_ups.len(),
            improved,
            same,
            worsened,
            self.events.adverse_events()
        );
    }

    /// Log a summary of the current model state
    pub fn log_summary(&self) {
        info!("=== Implant Market Summary (step {}) ===", self.steps);
        info!(
            "Patients: {}, Providers: {}, Average health utility: {:.3}",
            self.patients.len(),
            self.providers.len(),
            self.average_health_status()
        );
        for manufacturer in &self.manufacturers {
            info!(
                "  {} ({}): inventory={}, in_flight={}, revenue={:.2}, profit={:.2}, costs={:.2}",
                manufacturer.id,
                manufacturer.kind,
                manufacturer.inventory,
                manufacturer.in_flight(),
                manufacturer.sales_revenue,
                manufacturer.profit(),
                manufacturer.costs()
            );
        }
        for provider in &self.providers {
            info!(
                "  {}: queue={}/{}, surgeries={}, treated={}",
                provider.id,
                provider.surgery_patients.len(),
                provider.max_capacity,
                provider.surgeries_performed,
                provider.all_patients.len()
            );
        }
        for (id, counts) in &self.cumulative_outcomes {
            info!("  Cumulative outcomes {}: {}", id, counts);
        }
    }
}
