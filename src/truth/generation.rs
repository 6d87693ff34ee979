//! World generation
//!
//! Each stage draws from its own ChaCha8 stream of the configured seed, so the
//! infection draws for a given person do not shift when an earlier stage
//! changes how many numbers it consumes.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::core::config::SimulationConfig;
use crate::core::error::Result;
use crate::core::types::PersonId;
use crate::truth::household::generate_households;
use crate::truth::individual::{generate_residents, Individual};
use crate::truth::infection::assign_infection;
use crate::truth::samples::{environmental_sites, generate_lab_samples};
use crate::truth::village::Village;
use crate::truth::world::TruthWorld;

const HOUSEHOLD_STREAM: u64 = 1;
const RESIDENT_STREAM: u64 = 2;
const INFECTION_STREAM: u64 = 3;
const LAB_STREAM: u64 = 4;

fn stream(seed: u64, stream: u64) -> ChaCha8Rng {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rng.set_stream(stream);
    rng
}

/// Generate the complete truth world for a configuration
pub fn generate_world(config: &SimulationConfig) -> Result<TruthWorld> {
    config.validate()?;

    let villages: Vec<Village> = config.villages.iter().map(Village::from).collect();

    let mut rng = stream(config.seed, HOUSEHOLD_STREAM);
    let households = generate_households(&villages, &config.households, &mut rng)?;

    let mut resident_rng = stream(config.seed, RESIDENT_STREAM);
    let mut infection_rng = stream(config.seed, INFECTION_STREAM);
    let mut individuals: Vec<Individual> = Vec::new();

    for household in &households {
        // households only reference villages from the list above
        let Some(village) = villages.iter().find(|v| v.id == household.village_id) else {
            continue;
        };
        for resident in generate_residents(household, village, &config.households, &mut resident_rng) {
            let id = PersonId(individuals.len() as u32 + 1);
            individuals.push(assign_infection(
                id,
                resident,
                village,
                config.epidemic_start,
                &config.infection,
                &mut infection_rng,
            ));
        }
    }

    let mut rng = stream(config.seed, LAB_STREAM);
    let lab_samples = generate_lab_samples(&villages, &individuals, &mut rng);
    let environment_sites = environmental_sites(&villages);

    let world = TruthWorld {
        seed: config.seed,
        villages,
        households,
        individuals,
        lab_samples,
        environment_sites,
    };

    tracing::info!(
        "Generated world (seed {}): {} households, {} people, {} infected, {} symptomatic",
        world.seed,
        world.households.len(),
        world.individuals.len(),
        world.infected_count(),
        world.case_count(),
    );

    Ok(world)
}
