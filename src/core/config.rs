//! Simulation configuration with documented constants
//!
//! All magic numbers are collected here with explanations of their purpose
//! and how they interact with each other. The numbers are teaching defaults,
//! tuned so a classroom run produces a few dozen AES cases concentrated in the
//! rice-growing, pig-keeping villages.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::core::error::{Result, SimError};
use crate::core::types::{LabTest, PigDensity};

/// Configuration for the whole simulation run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Seed for the truth population. Same seed, same outbreak.
    pub seed: u64,

    /// Day zero of the epidemic; onset dates are offsets from here
    pub epidemic_start: NaiveDate,

    /// Geography table (one entry per village)
    pub villages: Vec<VillageSpec>,

    pub households: HouseholdConfig,
    pub infection: InfectionConfig,

    /// Sensitivity, specificity, turnaround and cost per assay
    pub lab_tests: Vec<TestCharacteristics>,

    pub resources: ResourceConfig,
    pub study: StudyConfig,
    pub llm: LlmSettings,
}

/// One row of the geography table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VillageSpec {
    pub id: u32,
    pub name: String,
    pub has_rice_paddies: bool,
    pub pig_density: PigDensity,
    /// Fraction of children with complete JE vaccination
    pub vaccination_coverage: f64,
    /// Target number of residents
    pub population_size: u32,
    /// Infection probability before exposure bonuses
    pub baseline_risk: f64,
    /// Inclusive range of onset offsets (days after `epidemic_start`)
    ///
    /// The index village gets the earliest, narrowest window; outlying
    /// villages start later and spread wider.
    pub onset_window_days: [u32; 2],
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HouseholdConfig {
    /// Average residents per household; determines household count per village
    pub mean_size: u32,
    /// Adults per household are drawn from 1..=max_adults
    pub max_adults: u32,
    /// Children per household are drawn from 0..=max_children
    pub max_children: u32,
    /// Probability a household sleeps under mosquito nets
    pub net_use_rate: f64,
    /// Pig pens closer than this (metres) count as "pigs near home"
    pub pig_pen_near_m: u32,
    /// Rice fields closer than this (metres) count as "rice field nearby"
    pub rice_field_near_m: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InfectionConfig {
    // === RISK SCORE ===
    /// Added when the person is outdoors in the evening (peak Culex biting)
    pub evening_outdoor_bonus: f64,
    /// Added when pigs (amplifying hosts) are penned near the home
    pub pigs_near_home_bonus: f64,
    /// Added when the household does not use nets
    pub no_net_bonus: f64,
    /// Added when a rice field (vector breeding habitat) is nearby
    pub rice_field_bonus: f64,
    /// Relative risk reduction for vaccinated people
    pub vaccine_efficacy: f64,
    /// Upper clamp on the per-person infection probability
    pub max_risk: f64,

    // === CLINICAL COURSE ===
    /// People younger than this are "children" for the symptomatic draw
    pub child_age_cutoff: u32,
    /// P(symptomatic | infected) for children
    pub symptomatic_child: f64,
    /// P(symptomatic | infected) for adults
    pub symptomatic_adult: f64,
    /// P(severe neurological disease | symptomatic)
    pub severe_given_symptomatic: f64,
    /// Outcome weights for severe cases
    pub outcome_severe: OutcomeWeights,
    /// Outcome weights for mild cases
    pub outcome_mild: OutcomeWeights,
}

/// Probabilities of death and sequelae; full recovery takes the remainder
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OutcomeWeights {
    pub died: f64,
    pub sequelae: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestCharacteristics {
    pub test: LabTest,
    pub sensitivity: f64,
    pub specificity: f64,
    pub turnaround_days: u32,
    /// Cost in lab credits
    pub cost: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceConfig {
    pub starting_budget: u32,
    pub starting_lab_credits: u32,
    /// Number of investigation days; the last one cannot be advanced past
    pub investigation_days: u32,
    /// Interviews required before leaving day 1
    pub min_interviews_day1: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StudyConfig {
    pub default_cases: usize,
    pub default_controls_per_case: usize,
    /// Fraction of exposure cells left blank in generated datasets
    ///
    /// Feeds the data-cleaning exercise; 0.0 produces a clean dataset.
    pub missing_value_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    /// Reply length cap for NPC dialogue
    pub max_tokens: u32,
    /// Cap for structured helper calls (column matching)
    pub helper_max_tokens: u32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            epidemic_start: NaiveDate::from_ymd_opt(2024, 7, 1).unwrap_or(NaiveDate::MIN),
            villages: default_villages(),
            households: HouseholdConfig::default(),
            infection: InfectionConfig::default(),
            lab_tests: default_lab_tests(),
            resources: ResourceConfig::default(),
            study: StudyConfig::default(),
            llm: LlmSettings::default(),
        }
    }
}

/// Sidero Valley: Nalu is the index village (paddies, many pigs, low coverage)
fn default_villages() -> Vec<VillageSpec> {
    vec![
        VillageSpec {
            id: 1,
            name: "Nalu Village".into(),
            has_rice_paddies: true,
            pig_density: PigDensity::High,
            vaccination_coverage: 0.25,
            population_size: 420,
            baseline_risk: 0.05,
            onset_window_days: [0, 12],
        },
        VillageSpec {
            id: 2,
            name: "Kabwe Village".into(),
            has_rice_paddies: true,
            pig_density: PigDensity::Moderate,
            vaccination_coverage: 0.40,
            population_size: 380,
            baseline_risk: 0.03,
            onset_window_days: [5, 22],
        },
        VillageSpec {
            id: 3,
            name: "Tamu Village".into(),
            has_rice_paddies: false,
            pig_density: PigDensity::Low,
            vaccination_coverage: 0.60,
            population_size: 300,
            baseline_risk: 0.005,
            onset_window_days: [10, 30],
        },
    ]
}

fn default_lab_tests() -> Vec<TestCharacteristics> {
    vec![
        TestCharacteristics {
            test: LabTest::JeIgmCsf,
            sensitivity: 0.85,
            specificity: 0.98,
            turnaround_days: 3,
            cost: 3,
        },
        TestCharacteristics {
            test: LabTest::JeIgmSerum,
            sensitivity: 0.75,
            specificity: 0.95,
            turnaround_days: 3,
            cost: 2,
        },
        TestCharacteristics {
            test: LabTest::JePcrMosquito,
            sensitivity: 0.90,
            specificity: 0.99,
            turnaround_days: 5,
            cost: 4,
        },
        TestCharacteristics {
            test: LabTest::JeAbPig,
            sensitivity: 0.80,
            specificity: 0.90,
            turnaround_days: 4,
            cost: 2,
        },
    ]
}

impl Default for HouseholdConfig {
    fn default() -> Self {
        Self {
            mean_size: 5,
            max_adults: 3,
            max_children: 4,
            net_use_rate: 0.45,
            pig_pen_near_m: 30,
            rice_field_near_m: 200,
        }
    }
}

impl Default for InfectionConfig {
    fn default() -> Self {
        Self {
            evening_outdoor_bonus: 0.03,
            pigs_near_home_bonus: 0.05,
            no_net_bonus: 0.02,
            rice_field_bonus: 0.03,
            vaccine_efficacy: 0.9,
            max_risk: 0.4,

            child_age_cutoff: 15,
            symptomatic_child: 0.35,
            symptomatic_adult: 0.08,
            severe_given_symptomatic: 0.65,
            outcome_severe: OutcomeWeights { died: 0.25, sequelae: 0.35 },
            outcome_mild: OutcomeWeights { died: 0.02, sequelae: 0.08 },
        }
    }
}

impl Default for ResourceConfig {
    fn default() -> Self {
        Self {
            starting_budget: 1000,
            starting_lab_credits: 20,
            investigation_days: 5,
            min_interviews_day1: 2,
        }
    }
}

impl Default for StudyConfig {
    fn default() -> Self {
        Self {
            default_cases: 15,
            default_controls_per_case: 2,
            missing_value_rate: 0.03,
        }
    }
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            max_tokens: 400,
            helper_max_tokens: 200,
        }
    }
}

fn is_probability(p: f64) -> bool {
    (0.0..=1.0).contains(&p)
}

impl SimulationConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Default config with a different seed
    pub fn with_seed(seed: u64) -> Self {
        Self { seed, ..Self::default() }
    }

    /// Parse a (possibly partial) TOML config; missing sections take defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: SimulationConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Characteristics for an assay, if configured
    pub fn test_characteristics(&self, test: LabTest) -> Option<&TestCharacteristics> {
        self.lab_tests.iter().find(|t| t.test == test)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.villages.is_empty() {
            return Err(SimError::NoVillages);
        }

        let mut ids = HashSet::new();
        for v in &self.villages {
            if !ids.insert(v.id) {
                return Err(SimError::InvalidConfig(format!("duplicate village id {}", v.id)));
            }
            if !is_probability(v.vaccination_coverage) || !is_probability(v.baseline_risk) {
                return Err(SimError::InvalidConfig(format!(
                    "{}: coverage and baseline risk must be within [0, 1]",
                    v.name
                )));
            }
            if v.onset_window_days[0] > v.onset_window_days[1] {
                return Err(SimError::InvalidConfig(format!(
                    "{}: onset window {:?} is reversed",
                    v.name, v.onset_window_days
                )));
            }
        }

        let inf = &self.infection;
        let probabilities = [
            inf.vaccine_efficacy,
            inf.max_risk,
            inf.symptomatic_child,
            inf.symptomatic_adult,
            inf.severe_given_symptomatic,
            self.households.net_use_rate,
            self.study.missing_value_rate,
        ];
        if probabilities.iter().any(|p| !is_probability(*p)) {
            return Err(SimError::InvalidConfig("probabilities must be within [0, 1]".into()));
        }

        for weights in [inf.outcome_severe, inf.outcome_mild] {
            if weights.died < 0.0 || weights.sequelae < 0.0 || weights.died + weights.sequelae > 1.0 {
                return Err(SimError::InvalidConfig(format!(
                    "outcome weights {:?} must be non-negative and sum to at most 1",
                    weights
                )));
            }
        }

        if self.households.mean_size == 0 || self.households.max_adults == 0 {
            return Err(SimError::InvalidConfig("households need at least one adult".into()));
        }

        for test in LabTest::ALL {
            match self.test_characteristics(test) {
                Some(t) if is_probability(t.sensitivity) && is_probability(t.specificity) => {}
                Some(_) => {
                    return Err(SimError::InvalidConfig(format!(
                        "{}: sensitivity and specificity must be within [0, 1]",
                        test
                    )))
                }
                None => {
                    return Err(SimError::InvalidConfig(format!("no characteristics for {}", test)))
                }
            }
        }

        if self.resources.investigation_days == 0 {
            return Err(SimError::InvalidConfig("investigation needs at least one day".into()));
        }

        Ok(())
    }
}

// === GLOBAL CONFIG ACCESS ===

use std::sync::OnceLock;

static CONFIG: OnceLock<SimulationConfig> = OnceLock::new();

/// Get the global simulation config (initializes with defaults if not set)
pub fn config() -> &'static SimulationConfig {
    CONFIG.get_or_init(SimulationConfig::default)
}

/// Set the global simulation config (can only be called once)
///
/// Returns Err if config was already set.
pub fn set_config(config: SimulationConfig) -> std::result::Result<(), SimulationConfig> {
    CONFIG.set(config)
}
