//! Individuals: demographics, exposures and latent disease status

use chrono::NaiveDate;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::core::config::HouseholdConfig;
use crate::core::types::{
    ChildVaccination, HouseholdId, Occupation, Outcome, PersonId, Sex, VillageId,
};
use crate::truth::household::Household;
use crate::truth::village::Village;

/// Exposure attributes that feed the risk score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exposures {
    pub evening_outdoor: bool,
    pub pigs_near_home: bool,
    pub uses_net: bool,
    pub rice_field_nearby: bool,
}

/// Clinical details, present only for symptomatic people
///
/// Keeping onset and outcome inside this struct makes "onset and outcome
/// exist iff symptomatic" hold by construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClinicalCourse {
    pub severe_neuro: bool,
    pub onset_date: NaiveDate,
    pub outcome: Outcome,
    pub symptoms: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Individual {
    pub id: PersonId,
    pub household_id: HouseholdId,
    pub village_id: VillageId,
    pub age: u32,
    pub sex: Sex,
    pub occupation: Occupation,
    pub vaccinated: bool,
    pub exposures: Exposures,
    /// Infection probability after bonuses, vaccination and clamping
    pub infection_risk: f64,
    pub infected: bool,
    pub clinical: Option<ClinicalCourse>,
}

impl Individual {
    pub fn symptomatic(&self) -> bool {
        self.clinical.is_some()
    }

    pub fn severe_neuro(&self) -> bool {
        self.clinical.as_ref().is_some_and(|c| c.severe_neuro)
    }

    pub fn onset_date(&self) -> Option<NaiveDate> {
        self.clinical.as_ref().map(|c| c.onset_date)
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.clinical.as_ref().map(|c| c.outcome)
    }

    pub fn symptoms(&self) -> &str {
        self.clinical.as_ref().map(|c| c.symptoms.as_str()).unwrap_or("none")
    }

    pub fn is_child(&self, cutoff: u32) -> bool {
        self.age < cutoff
    }
}

/// Demographic and exposure draws for one resident, before disease assignment
#[derive(Debug, Clone)]
pub struct Resident {
    pub household_id: HouseholdId,
    pub village_id: VillageId,
    pub age: u32,
    pub sex: Sex,
    pub occupation: Occupation,
    pub vaccinated: bool,
    pub exposures: Exposures,
}

/// Draw the adults and children of a household
pub fn generate_residents(
    household: &Household,
    village: &Village,
    config: &HouseholdConfig,
    rng: &mut ChaCha8Rng,
) -> Vec<Resident> {
    let adults = rng.gen_range(1..=config.max_adults);
    let mut residents = Vec::with_capacity((adults + household.child_count) as usize);

    for _ in 0..adults {
        let age = rng.gen_range(18..=70);
        let occupation = adult_occupation(household, village, rng);
        let vaccinated = rng.gen_bool((village.vaccination_coverage * 0.1).min(1.0));
        residents.push(resident(household, village, config, age, occupation, vaccinated, rng));
    }

    for _ in 0..household.child_count {
        let age = rng.gen_range(0..=14);
        let occupation = if age < 5 { Occupation::Child } else { Occupation::Student };
        let vaccinated = match household.child_vaccination {
            ChildVaccination::Full => true,
            ChildVaccination::Partial => rng.gen_bool(0.5),
            ChildVaccination::None => false,
        };
        residents.push(resident(household, village, config, age, occupation, vaccinated, rng));
    }

    residents
}

fn resident(
    household: &Household,
    village: &Village,
    config: &HouseholdConfig,
    age: u32,
    occupation: Occupation,
    vaccinated: bool,
    rng: &mut ChaCha8Rng,
) -> Resident {
    let sex = if rng.gen_bool(0.5) { Sex::Female } else { Sex::Male };

    let evening_rate = match occupation {
        Occupation::RiceFarmer | Occupation::PigFarmer => 0.75,
        Occupation::Student => 0.5,
        Occupation::Child => 0.3,
        _ => 0.35,
    };

    let exposures = Exposures {
        evening_outdoor: rng.gen_bool(evening_rate),
        pigs_near_home: household.pigs_within(config.pig_pen_near_m),
        uses_net: household.uses_mosquito_nets,
        rice_field_nearby: household.rice_field_distance_m < config.rice_field_near_m,
    };

    Resident {
        household_id: household.id,
        village_id: village.id,
        age,
        sex,
        occupation,
        vaccinated,
        exposures,
    }
}

fn adult_occupation(household: &Household, village: &Village, rng: &mut ChaCha8Rng) -> Occupation {
    if household.keeps_pigs() && rng.gen_bool(0.5) {
        return Occupation::PigFarmer;
    }
    if village.has_rice_paddies && rng.gen_bool(0.6) {
        return Occupation::RiceFarmer;
    }
    match rng.gen_range(0..10) {
        0..=3 => Occupation::Trader,
        4..=8 => Occupation::Homemaker,
        _ => Occupation::Teacher,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::SimulationConfig;
    use rand::SeedableRng;

    fn household(child_count: u32, vaccination: ChildVaccination) -> Household {
        Household {
            id: HouseholdId(1),
            village_id: VillageId(1),
            pig_count: 3,
            pig_pen_distance_m: Some(10),
            uses_mosquito_nets: false,
            rice_field_distance_m: 50,
            child_count,
            child_vaccination: vaccination,
        }
    }

    #[test]
    fn test_residents_include_all_children() {
        let config = SimulationConfig::default();
        let village = Village::from(&config.villages[0]);
        let hh = household(3, ChildVaccination::Full);
        let mut rng = ChaCha8Rng::seed_from_u64(9);

        let residents = generate_residents(&hh, &village, &config.households, &mut rng);
        let children: Vec<_> = residents.iter().filter(|r| r.age < 15).collect();
        assert_eq!(children.len(), 3);
        assert!(children.iter().all(|c| c.vaccinated));
        assert!(residents.len() >= 4);
    }

    #[test]
    fn test_household_exposures_propagate() {
        let config = SimulationConfig::default();
        let village = Village::from(&config.villages[0]);
        let hh = household(1, ChildVaccination::None);
        let mut rng = ChaCha8Rng::seed_from_u64(10);

        for r in generate_residents(&hh, &village, &config.households, &mut rng) {
            assert!(r.exposures.pigs_near_home);
            assert!(r.exposures.rice_field_nearby);
            assert!(!r.exposures.uses_net);
        }
    }

    #[test]
    fn test_young_children_are_not_students() {
        let config = SimulationConfig::default();
        let village = Village::from(&config.villages[0]);
        let hh = household(4, ChildVaccination::None);
        let mut rng = ChaCha8Rng::seed_from_u64(11);

        for r in generate_residents(&hh, &village, &config.households, &mut rng) {
            if r.age < 5 {
                assert_eq!(r.occupation, Occupation::Child);
            }
        }
    }
}
