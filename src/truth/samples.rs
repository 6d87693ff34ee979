//! Lab sample and environmental site truth tables

use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::core::types::{BreedingIndex, PigDensity, SampleId, SampleType, SiteId, VillageId};
use crate::truth::individual::Individual;
use crate::truth::village::Village;

/// Ground truth behind simulated test results; never shown to the player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabSample {
    pub id: SampleId,
    pub sample_type: SampleType,
    pub village_id: VillageId,
    pub true_positive: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SiteType {
    RicePaddy,
    IrrigationCanal,
    PigPen,
    HouseholdContainers,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentalSite {
    pub id: SiteId,
    pub site_type: SiteType,
    pub village_id: VillageId,
    pub breeding_index: BreedingIndex,
    pub vector_present: bool,
    pub virus_positive: bool,
}

/// Community sera drawn per village in addition to case sera
const COMMUNITY_SERA: usize = 3;
const PIG_SAMPLES: usize = 5;
const MOSQUITO_POOLS: usize = 3;

fn mosquito_positivity(village: &Village) -> f64 {
    if !village.has_rice_paddies {
        return 0.05;
    }
    match village.pig_density {
        PigDensity::High => 0.6,
        PigDensity::Moderate => 0.4,
        PigDensity::Low => 0.15,
        PigDensity::None => 0.05,
    }
}

/// Generate the lab truth table
///
/// Human CSF comes from severe cases (a suspected-case negative stands in
/// when a village has none), serum from every case plus a few residents,
/// pig serum by seroprevalence and mosquito pools by habitat.
pub fn generate_lab_samples(
    villages: &[Village],
    individuals: &[Individual],
    rng: &mut ChaCha8Rng,
) -> Vec<LabSample> {
    let mut samples = Vec::new();
    let mut push = |sample_type: SampleType, village_id: VillageId, true_positive: bool| {
        let id = SampleId(format!("LS-{:03}", samples.len() + 1));
        samples.push(LabSample { id, sample_type, village_id, true_positive });
    };

    for village in villages {
        let residents: Vec<&Individual> =
            individuals.iter().filter(|i| i.village_id == village.id).collect();

        let severe = residents.iter().filter(|i| i.severe_neuro()).count();
        if severe == 0 {
            push(SampleType::HumanCsf, village.id, false);
        }
        for _ in 0..severe {
            push(SampleType::HumanCsf, village.id, true);
        }

        for _ in residents.iter().filter(|i| i.symptomatic()) {
            push(SampleType::HumanSerum, village.id, true);
        }
        for person in residents.choose_multiple(rng, COMMUNITY_SERA) {
            push(SampleType::HumanSerum, village.id, person.infected);
        }

        if village.pig_density != PigDensity::None {
            let p = village.pig_density.pig_seroprevalence();
            for _ in 0..PIG_SAMPLES {
                push(SampleType::PigSerum, village.id, rng.gen_bool(p));
            }
        }

        let p = mosquito_positivity(village);
        for _ in 0..MOSQUITO_POOLS {
            push(SampleType::MosquitoPool, village.id, rng.gen_bool(p));
        }
    }

    samples
}

/// Static environmental survey derived from village attributes
pub fn environmental_sites(villages: &[Village]) -> Vec<EnvironmentalSite> {
    let mut sites = Vec::new();

    for village in villages {
        let mut add = |site_type, breeding_index, vector_present, virus_positive| {
            let n = sites.iter().filter(|s: &&EnvironmentalSite| s.village_id == village.id).count();
            sites.push(EnvironmentalSite {
                id: SiteId(format!("ES-{}-{:02}", village.id, n + 1)),
                site_type,
                village_id: village.id,
                breeding_index,
                vector_present,
                virus_positive,
            });
        };

        let amplified = village.pig_density >= PigDensity::Moderate;

        if village.has_rice_paddies {
            add(SiteType::RicePaddy, BreedingIndex::High, true, amplified);
            add(SiteType::IrrigationCanal, BreedingIndex::Medium, true, false);
        }

        if village.pig_density != PigDensity::None {
            let breeding = if village.has_rice_paddies {
                BreedingIndex::Medium
            } else {
                BreedingIndex::Low
            };
            add(
                SiteType::PigPen,
                breeding,
                village.has_rice_paddies,
                village.has_rice_paddies && village.pig_density == PigDensity::High,
            );
        }

        add(SiteType::HouseholdContainers, BreedingIndex::Low, false, false);
    }

    sites
}
