//! Geography table

use serde::{Deserialize, Serialize};

use crate::core::config::VillageSpec;
use crate::core::types::{PigDensity, VillageId};

/// A village in Sidero Valley. Immutable once the world is generated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Village {
    pub id: VillageId,
    pub name: String,
    pub has_rice_paddies: bool,
    pub pig_density: PigDensity,
    pub vaccination_coverage: f64,
    pub population_size: u32,
    pub baseline_risk: f64,
    /// Inclusive onset offset range in days after the epidemic start
    pub onset_window_days: [u32; 2],
}

impl Village {
    /// Short name without the "Village" suffix ("Nalu Village" -> "Nalu")
    pub fn short_name(&self) -> &str {
        self.name.strip_suffix(" Village").unwrap_or(&self.name)
    }

    /// Number of households needed to house `population_size` residents
    pub fn household_target(&self, mean_size: u32) -> u32 {
        self.population_size.div_ceil(mean_size.max(1))
    }
}

impl From<&VillageSpec> for Village {
    fn from(spec: &VillageSpec) -> Self {
        Self {
            id: VillageId(spec.id),
            name: spec.name.clone(),
            has_rice_paddies: spec.has_rice_paddies,
            pig_density: spec.pig_density,
            vaccination_coverage: spec.vaccination_coverage,
            population_size: spec.population_size,
            baseline_risk: spec.baseline_risk,
            onset_window_days: spec.onset_window_days,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::SimulationConfig;

    #[test]
    fn test_village_from_spec() {
        let config = SimulationConfig::default();
        let village = Village::from(&config.villages[0]);
        assert_eq!(village.id, VillageId(1));
        assert_eq!(village.short_name(), "Nalu");
        assert!(village.has_rice_paddies);
    }

    #[test]
    fn test_household_target_rounds_up() {
        let config = SimulationConfig::default();
        let mut village = Village::from(&config.villages[0]);
        village.population_size = 11;
        assert_eq!(village.household_target(5), 3);
        village.population_size = 1;
        assert_eq!(village.household_target(5), 1);
        village.population_size = 0;
        assert_eq!(village.household_target(5), 0);
    }
}
