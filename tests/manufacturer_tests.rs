//! Manufacturer inventory, production and revenue tests

use implant_market::simulation::{Manufacturer, ManufacturerConfig, ManufacturerId, ManufacturerKind};

fn additive(initial_inventory: u32) -> Manufacturer {
    Manufacturer::new(
        ManufacturerId(0),
        ManufacturerKind::Additive,
        &ManufacturerConfig {
            initial_inventory,
            ..ManufacturerConfig::additive()
        },
    )
}

fn subtractive(initial_inventory: u32, lag: u64) -> Manufacturer {
    Manufacturer::new(
        ManufacturerId(1),
        ManufacturerKind::Subtractive,
        &ManufacturerConfig {
            initial_inventory,
            production_lag: lag,
            ..ManufacturerConfig::subtractive()
        },
    )
}

#[test]
fn test_order_recognizes_revenue_immediately() {
    let mut manufacturer = additive(200);
    manufacturer.order(3);

    let expected = 3.0 * (10.0 * 1.0 / 0.3);
    assert!((manufacturer.sales_revenue - expected).abs() < 1e-9);
    assert_eq!(manufacturer.total_orders, 3);
    assert_eq!(manufacturer.backlog, 3);
    // Ordering does not touch stock
    assert_eq!(manufacturer.inventory, 200);
}

#[test]
fn test_subtractive_is_cheaper_per_unit() {
    let a = additive(200);
    let s = subtractive(200, 2);
    assert!(s.unit_price() < a.unit_price());
    assert!((s.adjusted_production_cost() - 5.0).abs() < 1e-9);
}

#[test]
fn test_deliver_reduces_inventory_and_backlog() {
    let mut manufacturer = additive(2);
    manufacturer.order(1);
    assert!(manufacturer.deliver(1));
    assert_eq!(manufacturer.inventory, 1);
    assert_eq!(manufacturer.backlog, 0);
}

#[test]
fn test_deliver_without_stock_is_a_no_op() {
    let mut manufacturer = additive(1);
    assert!(manufacturer.deliver(1));
    assert!(!manufacturer.deliver(1));
    assert_eq!(manufacturer.inventory, 0);

    let mut short = additive(2);
    assert!(!short.deliver(3));
    assert_eq!(short.inventory, 2);
}

#[test]
fn test_additive_restocks_in_the_same_step() {
    let mut manufacturer = additive(200);
    for _ in 0..50 {
        assert!(manufacturer.deliver(1));
    }
    assert_eq!(manufacturer.inventory, 150);

    let produced = manufacturer.advance_production(4);
    assert_eq!(produced, 50);
    assert_eq!(manufacturer.inventory, 200);
    assert_eq!(manufacturer.units_produced, 50);
    assert!(manufacturer.pending_production.is_empty());
}

#[test]
fn test_no_production_at_target_inventory() {
    let mut manufacturer = subtractive(200, 1);
    assert_eq!(manufacturer.advance_production(0), 0);
    assert!(manufacturer.pending_production.is_empty());

    let mut manufacturer = additive(200);
    assert_eq!(manufacturer.advance_production(0), 0);
    assert_eq!(manufacturer.inventory, 200);
}

#[test]
fn test_subtractive_production_lag() {
    let mut manufacturer = subtractive(200, 1);
    for _ in 0..50 {
        manufacturer.deliver(1);
    }
    let t = 10;

    // Deficit is scheduled, not produced
    assert_eq!(manufacturer.advance_production(t), 0);
    assert_eq!(manufacturer.inventory, 150);
    assert_eq!(manufacturer.pending_production.get(&(t + 1)), Some(&50));

    // Arrives one step later
    assert_eq!(manufacturer.advance_production(t + 1), 50);
    assert!(manufacturer.inventory >= 200);
    assert!(manufacturer.pending_production.is_empty());
}

#[test]
fn test_subtractive_does_not_reorder_what_is_in_flight() {
    let mut manufacturer = subtractive(200, 2);
    for _ in 0..20 {
        manufacturer.deliver(1);
    }
    manufacturer.advance_production(0);
    assert_eq!(manufacturer.in_flight(), 20);

    // Still short at step 1, but the batch is already on its way
    manufacturer.advance_production(1);
    assert_eq!(manufacturer.in_flight(), 20);
    assert_eq!(manufacturer.inventory, 180);

    manufacturer.advance_production(2);
    assert_eq!(manufacturer.inventory, 200);
    assert_eq!(manufacturer.in_flight(), 0);
}

#[test]
fn test_batches_for_the_same_step_accumulate() {
    let mut manufacturer = subtractive(200, 2);
    manufacturer.schedule(7, 5);
    manufacturer.schedule(7, 8);
    assert_eq!(manufacturer.pending_production.get(&7), Some(&13));
    assert_eq!(manufacturer.in_flight(), 13);
}

#[test]
fn test_overdue_batches_still_arrive() {
    let mut manufacturer = subtractive(10, 1);
    for _ in 0..10 {
        manufacturer.deliver(1);
    }
    manufacturer.advance_production(0);
    // Step 1 is skipped; the batch lands on the next call
    assert_eq!(manufacturer.advance_production(3), 10);
    assert_eq!(manufacturer.inventory, 10);
}

#[test]
fn test_costs_and_profit() {
    let mut manufacturer = subtractive(100, 2);
    assert!((manufacturer.costs() - 500.0).abs() < 1e-9);

    manufacturer.order(6);
    let revenue = 6.0 * 5.0 / 0.3;
    assert!((manufacturer.profit() - revenue * 0.3).abs() < 1e-9);
}
