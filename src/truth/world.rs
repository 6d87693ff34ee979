//! TruthWorld - the hidden ground-truth container

use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use crate::core::config::config;
use crate::core::error::Result;
use crate::core::types::{HouseholdId, PersonId, VillageId};
use crate::truth::generation::generate_world;
use crate::truth::household::Household;
use crate::truth::individual::Individual;
use crate::truth::samples::{EnvironmentalSite, LabSample};
use crate::truth::village::Village;

/// The full synthetic outbreak, built once and never mutated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TruthWorld {
    pub seed: u64,
    pub villages: Vec<Village>,
    pub households: Vec<Household>,
    pub individuals: Vec<Individual>,
    pub lab_samples: Vec<LabSample>,
    pub environment_sites: Vec<EnvironmentalSite>,
}

impl TruthWorld {
    pub fn village(&self, id: VillageId) -> Option<&Village> {
        self.villages.iter().find(|v| v.id == id)
    }

    /// Look up by full or short name, case-insensitive ("nalu", "Nalu Village")
    pub fn village_by_name(&self, name: &str) -> Option<&Village> {
        let name = name.trim().to_lowercase();
        self.villages
            .iter()
            .find(|v| v.name.to_lowercase() == name || v.short_name().to_lowercase() == name)
    }

    /// Resolve `V1`, `1` or a village name
    pub fn resolve_village(&self, key: &str) -> Option<&Village> {
        VillageId::parse(key)
            .and_then(|id| self.village(id))
            .or_else(|| self.village_by_name(key))
    }

    pub fn village_name(&self, id: VillageId) -> &str {
        self.village(id).map(|v| v.name.as_str()).unwrap_or("Unknown")
    }

    pub fn household(&self, id: HouseholdId) -> Option<&Household> {
        self.households.iter().find(|h| h.id == id)
    }

    pub fn individual(&self, id: PersonId) -> Option<&Individual> {
        self.individuals.iter().find(|i| i.id == id)
    }

    /// All symptomatic AES cases
    pub fn cases(&self) -> impl Iterator<Item = &Individual> {
        self.individuals.iter().filter(|i| i.symptomatic())
    }

    pub fn case_count(&self) -> usize {
        self.cases().count()
    }

    pub fn infected_count(&self) -> usize {
        self.individuals.iter().filter(|i| i.infected).count()
    }

    pub fn residents_of(&self, village: VillageId) -> impl Iterator<Item = &Individual> {
        self.individuals.iter().filter(move |i| i.village_id == village)
    }
}

static WORLD: OnceLock<TruthWorld> = OnceLock::new();

/// The process-wide truth world, generated from the global config on first use
pub fn shared_world() -> Result<&'static TruthWorld> {
    if let Some(world) = WORLD.get() {
        return Ok(world);
    }
    let world = generate_world(config())?;
    Ok(WORLD.get_or_init(|| world))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::SimulationConfig;

    #[test]
    fn test_resolve_village_by_id_or_name() {
        let world = generate_world(&SimulationConfig::default()).unwrap();
        assert_eq!(world.resolve_village("V2").unwrap().short_name(), "Kabwe");
        assert_eq!(world.resolve_village("tamu").unwrap().id, VillageId(3));
        assert_eq!(world.resolve_village("Nalu Village").unwrap().id, VillageId(1));
        assert!(world.resolve_village("V9").is_none());
    }

    #[test]
    fn test_shared_world_is_memoized() {
        let a = shared_world().unwrap();
        let b = shared_world().unwrap();
        assert!(std::ptr::eq(a, b));
    }

    #[test]
    fn test_residents_belong_to_their_households() {
        let world = generate_world(&SimulationConfig::default()).unwrap();
        for person in &world.individuals {
            let hh = world.household(person.household_id).unwrap();
            assert_eq!(hh.village_id, person.village_id);
        }
    }
}
