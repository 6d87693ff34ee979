//! Truth world integration tests

use chrono::Days;
use proptest::prelude::*;
use sidero_valley::core::config::SimulationConfig;
use sidero_valley::disclosure::line_list::{cases_by_village, hospital_view, spot_map, HospitalView};
use sidero_valley::truth::generation::generate_world;

#[test]
fn test_same_seed_same_world() {
    let config = SimulationConfig::with_seed(2024);
    let a = generate_world(&config).unwrap();
    let b = generate_world(&config).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_disclosed_views_agree_with_truth() {
    let world = generate_world(&SimulationConfig::default()).unwrap();
    let total: usize = cases_by_village(&world).values().sum();
    assert_eq!(total, world.case_count());
    assert_eq!(spot_map(&world).iter().map(|v| v.total()).sum::<usize>(), world.case_count());

    let severe = world.cases().filter(|p| p.severe_neuro()).count();
    match hospital_view(&world) {
        HospitalView::NoCases => assert_eq!(severe, 0),
        HospitalView::Cases(entries) => {
            assert_eq!(entries.len(), severe);
            assert!(entries.iter().all(|e| e.severe_neuro));
            assert!(entries.windows(2).all(|w| w[0].onset_date <= w[1].onset_date));
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn prop_symptomatic_implies_infected(seed in any::<u64>()) {
        let config = SimulationConfig::with_seed(seed);
        let world = generate_world(&config).unwrap();
        for person in &world.individuals {
            if person.symptomatic() {
                prop_assert!(person.infected);
            }
            if person.infected {
                prop_assert!(person.infection_risk > 0.0);
            }
            prop_assert!(person.infection_risk <= config.infection.max_risk);
            if let Some(onset) = person.onset_date() {
                let village = world.village(person.village_id).unwrap();
                let [lo, hi] = village.onset_window_days;
                let earliest = config.epidemic_start.checked_add_days(Days::new(lo as u64)).unwrap();
                let latest = config.epidemic_start.checked_add_days(Days::new(hi as u64)).unwrap();
                prop_assert!(onset >= earliest && onset <= latest);
            }
        }
        prop_assert!(world.case_count() <= world.infected_count());
    }

    #[test]
    fn prop_more_baseline_risk_never_fewer_cases(seed in 0u64..10_000, factor in 1.0f64..4.0) {
        let low = SimulationConfig::with_seed(seed);
        let mut high = low.clone();
        for village in &mut high.villages {
            village.baseline_risk = (village.baseline_risk * factor).min(1.0);
        }
        let low_world = generate_world(&low).unwrap();
        let high_world = generate_world(&high).unwrap();
        prop_assert!(high_world.case_count() >= low_world.case_count());
        prop_assert!(high_world.infected_count() >= low_world.infected_count());
    }
}
