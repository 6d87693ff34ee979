//! Household generation

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::core::config::HouseholdConfig;
use crate::core::error::{Result, SimError};
use crate::core::types::{ChildVaccination, HouseholdId, VillageId};
use crate::truth::village::Village;

/// A household with its exposure attributes (read-only truth)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Household {
    pub id: HouseholdId,
    pub village_id: VillageId,
    pub pig_count: u32,
    /// Distance from the house to the pig pen, only when pigs are kept
    pub pig_pen_distance_m: Option<u32>,
    pub uses_mosquito_nets: bool,
    pub rice_field_distance_m: u32,
    pub child_count: u32,
    pub child_vaccination: ChildVaccination,
}

impl Household {
    pub fn keeps_pigs(&self) -> bool {
        self.pig_count > 0
    }

    pub fn pigs_within(&self, metres: u32) -> bool {
        self.pig_pen_distance_m.is_some_and(|d| d < metres)
    }
}

/// Generate households for every village, in village order
///
/// Fails if any village would end up with zero households.
pub fn generate_households(
    villages: &[Village],
    config: &HouseholdConfig,
    rng: &mut ChaCha8Rng,
) -> Result<Vec<Household>> {
    let mut households = Vec::new();
    let mut next_id = 1;

    for village in villages {
        let target = village.household_target(config.mean_size);
        if target == 0 {
            return Err(SimError::EmptyVillage(village.id));
        }

        for _ in 0..target {
            households.push(generate_household(HouseholdId(next_id), village, config, rng));
            next_id += 1;
        }
    }

    Ok(households)
}

fn generate_household(
    id: HouseholdId,
    village: &Village,
    config: &HouseholdConfig,
    rng: &mut ChaCha8Rng,
) -> Household {
    let density = village.pig_density;
    let keeps_pigs = density.max_herd() > 0 && rng.gen_bool(density.ownership_rate());
    let pig_count = if keeps_pigs { rng.gen_range(1..=density.max_herd()) } else { 0 };
    let pig_pen_distance_m = keeps_pigs.then(|| rng.gen_range(5..=80));

    let uses_mosquito_nets = rng.gen_bool(config.net_use_rate);

    let rice_field_distance_m = if village.has_rice_paddies {
        rng.gen_range(20..=400)
    } else {
        rng.gen_range(500..=2500)
    };

    let child_count = rng.gen_range(0..=config.max_children);
    let child_vaccination = draw_child_vaccination(village.vaccination_coverage, rng);

    Household {
        id,
        village_id: village.id,
        pig_count,
        pig_pen_distance_m,
        uses_mosquito_nets,
        rice_field_distance_m,
        child_count,
        child_vaccination,
    }
}

/// Full with probability `coverage`; of the rest, roughly a third are partial
fn draw_child_vaccination(coverage: f64, rng: &mut ChaCha8Rng) -> ChildVaccination {
    let roll: f64 = rng.gen();
    if roll < coverage {
        ChildVaccination::Full
    } else if roll < coverage + (1.0 - coverage) * 0.3 {
        ChildVaccination::Partial
    } else {
        ChildVaccination::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::SimulationConfig;
    use crate::core::types::PigDensity;
    use rand::SeedableRng;

    fn villages() -> Vec<Village> {
        SimulationConfig::default().villages.iter().map(Village::from).collect()
    }

    #[test]
    fn test_household_counts_match_targets() {
        let villages = villages();
        let config = HouseholdConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let households = generate_households(&villages, &config, &mut rng).unwrap();

        for village in &villages {
            let n = households.iter().filter(|h| h.village_id == village.id).count() as u32;
            assert_eq!(n, village.household_target(config.mean_size));
        }
    }

    #[test]
    fn test_pig_pen_distance_only_with_pigs() {
        let villages = villages();
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let households =
            generate_households(&villages, &HouseholdConfig::default(), &mut rng).unwrap();
        for h in &households {
            assert_eq!(h.keeps_pigs(), h.pig_pen_distance_m.is_some());
        }
    }

    #[test]
    fn test_no_pigs_without_density() {
        let mut villages = villages();
        villages.truncate(1);
        villages[0].pig_density = PigDensity::None;
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let households =
            generate_households(&villages, &HouseholdConfig::default(), &mut rng).unwrap();
        assert!(households.iter().all(|h| h.pig_count == 0));
    }

    #[test]
    fn test_empty_village_is_an_error() {
        let mut villages = villages();
        villages[1].population_size = 0;
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let result = generate_households(&villages, &HouseholdConfig::default(), &mut rng);
        assert!(matches!(result, Err(SimError::EmptyVillage(id)) if id == VillageId(2)));
    }

    #[test]
    fn test_rice_distance_reflects_paddies() {
        let villages = villages();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let households =
            generate_households(&villages, &HouseholdConfig::default(), &mut rng).unwrap();
        // Tamu (V3) has no paddies
        assert!(households
            .iter()
            .filter(|h| h.village_id == VillageId(3))
            .all(|h| h.rice_field_distance_m >= 500));
    }
}
