//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use std::fmt;

/// Village identifier, displayed as `V1`, `V2`, ...
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VillageId(pub u32);

impl VillageId {
    /// Parse either `V2` or a bare `2`
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        let digits = s.strip_prefix('V').or_else(|| s.strip_prefix('v')).unwrap_or(s);
        digits.parse().ok().map(VillageId)
    }
}

impl fmt::Display for VillageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "V{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HouseholdId(pub u32);

impl fmt::Display for HouseholdId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HH{:04}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PersonId(pub u32);

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{:05}", self.0)
    }
}

/// Identifier for truth-table lab samples and for submitted lab orders
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SampleId(pub String);

impl fmt::Display for SampleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SiteId(pub String);

impl fmt::Display for SiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Categorical pig density for a village
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PigDensity {
    None,
    Low,
    Moderate,
    High,
}

impl PigDensity {
    /// Fraction of households that keep pigs
    pub fn ownership_rate(&self) -> f64 {
        match self {
            PigDensity::None => 0.0,
            PigDensity::Low => 0.1,
            PigDensity::Moderate => 0.35,
            PigDensity::High => 0.6,
        }
    }

    /// Upper bound on pigs per owning household
    pub fn max_herd(&self) -> u32 {
        match self {
            PigDensity::None => 0,
            PigDensity::Low => 2,
            PigDensity::Moderate => 4,
            PigDensity::High => 8,
        }
    }

    /// Probability a pig serum sample from this village carries JEV antibodies
    pub fn pig_seroprevalence(&self) -> f64 {
        match self {
            PigDensity::None => 0.0,
            PigDensity::Low => 0.1,
            PigDensity::Moderate => 0.45,
            PigDensity::High => 0.75,
        }
    }
}

impl fmt::Display for PigDensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PigDensity::None => "none",
            PigDensity::Low => "low",
            PigDensity::Moderate => "moderate",
            PigDensity::High => "high",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    Female,
    Male,
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Sex::Female => "F",
            Sex::Male => "M",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Occupation {
    Child,
    Student,
    RiceFarmer,
    PigFarmer,
    Trader,
    Homemaker,
    Teacher,
}

impl fmt::Display for Occupation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Occupation::Child => "child",
            Occupation::Student => "student",
            Occupation::RiceFarmer => "rice farmer",
            Occupation::PigFarmer => "pig farmer",
            Occupation::Trader => "trader",
            Occupation::Homemaker => "homemaker",
            Occupation::Teacher => "teacher",
        };
        f.write_str(s)
    }
}

/// Vaccination status of a household's children
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChildVaccination {
    None,
    Partial,
    Full,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    RecoveredFull,
    RecoveredSequelae,
    Died,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Outcome::RecoveredFull => "recovered",
            Outcome::RecoveredSequelae => "recovered with sequelae",
            Outcome::Died => "died",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleType {
    HumanCsf,
    HumanSerum,
    PigSerum,
    MosquitoPool,
}

impl SampleType {
    pub const ALL: [SampleType; 4] = [
        SampleType::HumanCsf,
        SampleType::HumanSerum,
        SampleType::PigSerum,
        SampleType::MosquitoPool,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            SampleType::HumanCsf => "human_CSF",
            SampleType::HumanSerum => "human_serum",
            SampleType::PigSerum => "pig_serum",
            SampleType::MosquitoPool => "mosquito_pool",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let lower = s.trim().to_lowercase();
        SampleType::ALL.into_iter().find(|t| t.key().to_lowercase() == lower)
    }

    pub fn is_animal(&self) -> bool {
        matches!(self, SampleType::PigSerum)
    }

    pub fn is_vector(&self) -> bool {
        matches!(self, SampleType::MosquitoPool)
    }
}

impl fmt::Display for SampleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Laboratory assays available to the investigation team
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LabTest {
    #[serde(rename = "JE_IgM_CSF")]
    JeIgmCsf,
    #[serde(rename = "JE_IgM_serum")]
    JeIgmSerum,
    #[serde(rename = "JE_PCR_mosquito")]
    JePcrMosquito,
    #[serde(rename = "JE_Ab_pig")]
    JeAbPig,
}

impl LabTest {
    pub const ALL: [LabTest; 4] = [
        LabTest::JeIgmCsf,
        LabTest::JeIgmSerum,
        LabTest::JePcrMosquito,
        LabTest::JeAbPig,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            LabTest::JeIgmCsf => "JE_IgM_CSF",
            LabTest::JeIgmSerum => "JE_IgM_serum",
            LabTest::JePcrMosquito => "JE_PCR_mosquito",
            LabTest::JeAbPig => "JE_Ab_pig",
        }
    }

    /// The only specimen this assay accepts
    pub fn sample_type(&self) -> SampleType {
        match self {
            LabTest::JeIgmCsf => SampleType::HumanCsf,
            LabTest::JeIgmSerum => SampleType::HumanSerum,
            LabTest::JePcrMosquito => SampleType::MosquitoPool,
            LabTest::JeAbPig => SampleType::PigSerum,
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let lower = s.trim().to_lowercase();
        LabTest::ALL.into_iter().find(|t| t.key().to_lowercase() == lower)
    }
}

impl fmt::Display for LabTest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreedingIndex {
    Low,
    Medium,
    High,
}

impl fmt::Display for BreedingIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BreedingIndex::Low => "low",
            BreedingIndex::Medium => "medium",
            BreedingIndex::High => "high",
        })
    }
}
