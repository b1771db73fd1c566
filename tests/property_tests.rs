//! Property tests over seeds and market configurations

use implant_market::simulation::{
    AdverseEventRisk, HealthStatus, Manufacturer, ManufacturerConfig, ManufacturerId,
    ManufacturerKind, Model, ModelConfig, OutcomeSampler, PatientIncidence,
};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn queues_stay_within_capacity(
        seed in any::<u64>(),
        providers in 1usize..4,
        capacity in 1usize..20,
        preference in 0.0f64..=1.0,
        ae in 0.0f64..=1.0,
    ) {
        let config = ModelConfig {
            num_providers: providers,
            provider_capacity: capacity,
            initial_patients: 60,
            incidence: PatientIncidence::UpTo(20),
            steps: 50,
            additive_adoption_preference: preference,
            ae_probability: AdverseEventRisk::uniform(ae),
            ..ModelConfig::default()
        };
        let mut model = Model::new_with_seed(config, seed).unwrap();
        let mut last_revenue = [0.0f64; 2];

        while !model.is_finished() {
            model.step();
            for provider in &model.providers {
                prop_assert!(provider.surgery_patients.len() <= provider.max_capacity);
            }
            for manufacturer in &model.manufacturers {
                let slot = &mut last_revenue[manufacturer.id.0];
                prop_assert!(manufacturer.sales_revenue >= *slot);
                *slot = manufacturer.sales_revenue;
                prop_assert!(manufacturer.inventory <= manufacturer.initial_inventory);
            }
            for patient in &model.patients {
                if patient.assigned {
                    prop_assert!(patient.manufacturer_id.is_some());
                }
                prop_assert!(patient.health_status_history.len() >= usize::from(patient.received_surgery) * 2);
            }
        }
    }

    #[test]
    fn exact_incidence_grows_population_linearly(
        seed in any::<u64>(),
        initial in 0usize..50,
        daily in 1u32..10,
        steps in 1u64..15,
    ) {
        let config = ModelConfig {
            initial_patients: initial,
            incidence: PatientIncidence::Exactly(daily),
            steps,
            ..ModelConfig::default()
        };
        let mut model = Model::new_with_seed(config, seed).unwrap();
        model.run();
        prop_assert_eq!(model.patients.len(), initial + daily as usize * steps as usize);
        prop_assert_eq!(model.current_step(), steps);
    }

    #[test]
    fn subtractive_restock_lands_after_lag(
        lag in 1u64..6,
        demand in 1u32..50,
        start in 0u64..100,
    ) {
        let mut manufacturer = Manufacturer::new(
            ManufacturerId(1),
            ManufacturerKind::Subtractive,
            &ManufacturerConfig { production_lag: lag, ..ManufacturerConfig::subtractive() },
        );
        manufacturer.order(demand);
        for _ in 0..demand {
            prop_assert!(manufacturer.deliver(1));
        }
        manufacturer.advance_production(start);
        prop_assert_eq!(manufacturer.in_flight(), demand);

        for step in start + 1..start + lag {
            prop_assert_eq!(manufacturer.advance_production(step), 0);
        }
        prop_assert_eq!(manufacturer.advance_production(start + lag), demand);
        prop_assert_eq!(manufacturer.inventory, manufacturer.initial_inventory);
        prop_assert_eq!(manufacturer.in_flight(), 0);
    }

    #[test]
    fn fixed_seed_replays_identically(seed in any::<u64>(), preference in 0.0f64..=1.0) {
        let config = ModelConfig {
            initial_patients: 40,
            steps: 30,
            additive_adoption_preference: preference,
            ..ModelConfig::default()
        };
        let mut first = Model::new_with_seed(config.clone(), seed).unwrap();
        let mut second = Model::new_with_seed(config, seed).unwrap();
        first.run();
        second.run();
        prop_assert_eq!(
            serde_json::to_string(first.history()).unwrap(),
            serde_json::to_string(second.history()).unwrap()
        );
    }

    #[test]
    fn surgery_outcomes_are_valid_statuses(seed in any::<u64>()) {
        let sampler = OutcomeSampler::standard().unwrap();
        let mut rng = StdRng::seed_from_u64(seed);
        for _ in 0..50 {
            let outcome = sampler.surgery_outcome(&mut rng);
            prop_assert!(HealthStatus::ALL.contains(&outcome));
        }
    }
}
