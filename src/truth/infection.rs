//! Risk scoring and infection assignment
//!
//! Every person consumes exactly five draws from the infection stream,
//! whatever the outcome. With a fixed seed the uniform for person N is the
//! same across runs, so raising a risk parameter can only turn uninfected
//! people into infected ones (and never the reverse).

use chrono::{Days, NaiveDate};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::core::config::{InfectionConfig, OutcomeWeights};
use crate::core::types::{Outcome, PersonId};
use crate::truth::individual::{ClinicalCourse, Exposures, Individual, Resident};
use crate::truth::village::Village;

/// `baseline + Σ bonuses`, reduced by vaccination, clamped to `max_risk`
pub fn infection_risk(
    village: &Village,
    exposures: &Exposures,
    vaccinated: bool,
    params: &InfectionConfig,
) -> f64 {
    let mut risk = village.baseline_risk;

    if exposures.evening_outdoor {
        risk += params.evening_outdoor_bonus;
    }
    if exposures.pigs_near_home {
        risk += params.pigs_near_home_bonus;
    }
    if !exposures.uses_net {
        risk += params.no_net_bonus;
    }
    if exposures.rice_field_nearby {
        risk += params.rice_field_bonus;
    }

    if vaccinated {
        risk *= 1.0 - params.vaccine_efficacy;
    }

    risk.clamp(0.0, params.max_risk)
}

/// The five uniforms drawn for every person
struct Draws {
    infect: f64,
    symptomatic: f64,
    severe: f64,
    outcome: f64,
    onset_offset: u32,
}

impl Draws {
    fn take(village: &Village, rng: &mut ChaCha8Rng) -> Self {
        let [lo, hi] = village.onset_window_days;
        Self {
            infect: rng.gen(),
            symptomatic: rng.gen(),
            severe: rng.gen(),
            outcome: rng.gen(),
            onset_offset: rng.gen_range(lo..=hi),
        }
    }
}

/// Turn a resident into a full individual with latent disease status
pub fn assign_infection(
    id: PersonId,
    resident: Resident,
    village: &Village,
    epidemic_start: NaiveDate,
    params: &InfectionConfig,
    rng: &mut ChaCha8Rng,
) -> Individual {
    let draws = Draws::take(village, rng);
    let risk = infection_risk(village, &resident.exposures, resident.vaccinated, params);

    let infected = draws.infect < risk;
    let p_symptomatic = if resident.age < params.child_age_cutoff {
        params.symptomatic_child
    } else {
        params.symptomatic_adult
    };
    let symptomatic = infected && draws.symptomatic < p_symptomatic;

    let clinical = symptomatic.then(|| {
        let severe_neuro = draws.severe < params.severe_given_symptomatic;
        let weights = if severe_neuro { params.outcome_severe } else { params.outcome_mild };
        ClinicalCourse {
            severe_neuro,
            onset_date: epidemic_start + Days::new(draws.onset_offset as u64),
            outcome: draw_outcome(draws.outcome, weights),
            symptoms: symptom_text(severe_neuro).to_string(),
        }
    });

    Individual {
        id,
        household_id: resident.household_id,
        village_id: resident.village_id,
        age: resident.age,
        sex: resident.sex,
        occupation: resident.occupation,
        vaccinated: resident.vaccinated,
        exposures: resident.exposures,
        infection_risk: risk,
        infected,
        clinical,
    }
}

fn draw_outcome(roll: f64, weights: OutcomeWeights) -> Outcome {
    if roll < weights.died {
        Outcome::Died
    } else if roll < weights.died + weights.sequelae {
        Outcome::RecoveredSequelae
    } else {
        Outcome::RecoveredFull
    }
}

fn symptom_text(severe_neuro: bool) -> &'static str {
    if severe_neuro {
        "fever, headache, seizures, altered consciousness"
    } else {
        "fever, headache, vomiting"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::SimulationConfig;
    use crate::core::types::{HouseholdId, Occupation, Sex, VillageId};
    use rand::SeedableRng;

    fn village() -> Village {
        Village::from(&SimulationConfig::default().villages[0])
    }

    fn exposures(all: bool) -> Exposures {
        Exposures {
            evening_outdoor: all,
            pigs_near_home: all,
            uses_net: !all,
            rice_field_nearby: all,
        }
    }

    fn resident(age: u32, vaccinated: bool) -> Resident {
        Resident {
            household_id: HouseholdId(1),
            village_id: VillageId(1),
            age,
            sex: Sex::Female,
            occupation: Occupation::Student,
            vaccinated,
            exposures: exposures(true),
        }
    }

    #[test]
    fn test_risk_adds_bonuses() {
        let params = InfectionConfig::default();
        let v = village();
        let none = infection_risk(&v, &exposures(false), false, &params);
        let all = infection_risk(&v, &exposures(true), false, &params);
        assert!((none - v.baseline_risk).abs() < 1e-12);
        let expected = v.baseline_risk
            + params.evening_outdoor_bonus
            + params.pigs_near_home_bonus
            + params.no_net_bonus
            + params.rice_field_bonus;
        assert!((all - expected).abs() < 1e-12);
    }

    #[test]
    fn test_vaccination_reduces_risk() {
        let params = InfectionConfig::default();
        let v = village();
        let unvax = infection_risk(&v, &exposures(true), false, &params);
        let vax = infection_risk(&v, &exposures(true), true, &params);
        assert!((vax - unvax * (1.0 - params.vaccine_efficacy)).abs() < 1e-12);
    }

    #[test]
    fn test_risk_is_clamped() {
        let params = InfectionConfig::default();
        let mut v = village();
        v.baseline_risk = 0.9;
        let risk = infection_risk(&v, &exposures(true), false, &params);
        assert!((risk - params.max_risk).abs() < 1e-12);
    }

    #[test]
    fn test_clinical_course_only_when_symptomatic() {
        let params = InfectionConfig::default();
        let v = village();
        let start = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        for i in 0..2000 {
            let ind = assign_infection(PersonId(i), resident(6, false), &v, start, &params, &mut rng);
            assert_eq!(ind.symptomatic(), ind.onset_date().is_some());
            assert_eq!(ind.symptomatic(), ind.outcome().is_some());
            if ind.severe_neuro() {
                assert!(ind.symptomatic());
            }
            if ind.symptomatic() {
                assert!(ind.infected);
            }
        }
    }

    #[test]
    fn test_onset_within_village_window() {
        let mut params = InfectionConfig::default();
        params.max_risk = 1.0;
        params.symptomatic_child = 1.0;
        let mut v = village();
        v.baseline_risk = 1.0;
        let start = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(4);

        for i in 0..200 {
            let ind = assign_infection(PersonId(i), resident(3, false), &v, start, &params, &mut rng);
            let onset = ind.onset_date().unwrap();
            let offset = (onset - start).num_days() as u32;
            assert!(offset >= v.onset_window_days[0] && offset <= v.onset_window_days[1]);
        }
    }

    #[test]
    fn test_draw_outcome_boundaries() {
        let weights = OutcomeWeights { died: 0.2, sequelae: 0.3 };
        assert_eq!(draw_outcome(0.1, weights), Outcome::Died);
        assert_eq!(draw_outcome(0.3, weights), Outcome::RecoveredSequelae);
        assert_eq!(draw_outcome(0.9, weights), Outcome::RecoveredFull);
    }
}
