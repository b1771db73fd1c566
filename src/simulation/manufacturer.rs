//! Manufacturer agents
//!
//! A manufacturer holds implant inventory, recognizes revenue when a provider
//! orders, and restocks toward its target inventory once per step. Additive
//! manufacturers restock in the same step; subtractive ones schedule the
//! deficit `production_lag` steps ahead.

use log::debug;
use std::collections::BTreeMap;

use super::config::ManufacturerConfig;
use super::types::{ManufacturerId, ManufacturerKind};

/// A manufacturer in the simulation
#[derive(Debug, Clone)]
pub struct Manufacturer {
    pub id: ManufacturerId,
    pub kind: ManufacturerKind,
    /// Implants on hand
    pub inventory: u32,
    /// Level the manufacturer restocks toward
    pub initial_inventory: u32,
    pub base_production_cost: f64,
    pub cost_modifier: f64,
    pub profit_margin: f64,
    /// Accumulated revenue, never decreases
    pub sales_revenue: f64,
    /// Future step -> quantity arriving at that step
    pub pending_production: BTreeMap<u64, u32>,
    pub production_lag: u64,
    /// Implants ordered over the whole run
    pub total_orders: u64,
    /// Implants ordered but not yet delivered
    pub backlog: u64,
    /// Implants added to inventory during the current step
    pub units_produced: u32,
}

impl Manufacturer {
    pub fn new(id: ManufacturerId, kind: ManufacturerKind, config: &ManufacturerConfig) -> Self {
        Self {
            id,
            kind,
            inventory: config.initial_inventory,
            initial_inventory: config.initial_inventory,
            base_production_cost: config.base_production_cost,
            cost_modifier: config.cost_modifier,
            profit_margin: config.profit_margin,
            sales_revenue: 0.0,
            pending_production: BTreeMap::new(),
            production_lag: match kind {
                ManufacturerKind::Additive => 0,
                ManufacturerKind::Subtractive => config.production_lag,
            },
            total_orders: 0,
            backlog: 0,
            units_produced: 0,
        }
    }

    pub fn adjusted_production_cost(&self) -> f64 {
        self.base_production_cost * self.cost_modifier
    }

    /// Price charged per implant
    pub fn unit_price(&self) -> f64 {
        self.adjusted_production_cost() / self.profit_margin
    }

    /// Reserve implants; revenue is recognized immediately
    pub fn order(&mut self, quantity: u32) {
        self.total_orders += u64::from(quantity);
        self.backlog += u64::from(quantity);
        self.sales_revenue += f64::from(quantity) * self.unit_price();
    }

    /// Hand implants to a provider. Returns false, leaving state untouched,
    /// when inventory cannot cover the quantity.
    pub fn deliver(&mut self, quantity: u32) -> bool {
        if quantity == 0 || self.inventory < quantity {
            return false;
        }
        self.inventory -= quantity;
        self.backlog = self.backlog.saturating_sub(u64::from(quantity));
        true
    }

    /// Implants scheduled but not yet received
    pub fn in_flight(&self) -> u32 {
        self.pending_production.values().sum()
    }

    /// Restock toward `initial_inventory` for the given step.
    /// Returns the number of units added to inventory this step.
    pub fn advance_production(&mut self, step: u64) -> u32 {
        self.units_produced = 0;

        // Batches due now (or overdue) land in inventory first
        let later = self.pending_production.split_off(&(step + 1));
        let arrived: u32 = self.pending_production.values().sum();
        self.pending_production = later;
        if arrived > 0 {
            self.receive(arrived);
        }

        let deficit = self
            .initial_inventory
            .saturating_sub(self.inventory)
            .saturating_sub(self.in_flight());
        if deficit == 0 {
            return self.units_produced;
        }

        match self.kind {
            ManufacturerKind::Additive => self.receive(deficit),
            ManufacturerKind::Subtractive => self.schedule(step + self.production_lag, deficit),
        }
        self.units_produced
    }

    /// Add a batch due at `due_step`; batches for the same step accumulate
    pub fn schedule(&mut self, due_step: u64, quantity: u32) {
        *self.pending_production.entry(due_step).or_insert(0) += quantity;
        debug!(
            "{} ({}) scheduled {} implants for step {}",
            self.id, self.kind, quantity, due_step
        );
    }

    fn receive(&mut self, quantity: u32) {
        self.inventory += quantity;
        self.units_produced += quantity;
    }

    /// Carrying cost of the stock currently held
    pub fn costs(&self) -> f64 {
        f64::from(self.inventory) * self.adjusted_production_cost()
    }

    pub fn profit(&self) -> f64 {
        self.sales_revenue * self.profit_margin
    }
}
