//! Role-scoped knowledge: what each kind of informant can know

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::types::{BreedingIndex, SampleType, VillageId};
use crate::disclosure::line_list::cases_by_village;
use crate::truth::world::TruthWorld;

/// Data scope an informant draws on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataAccess {
    HospitalCases,
    TriageLogs,
    PrivateClinic,
    SchoolAttendance,
    VetSurveillance,
    EnvironmentalData,
    General,
}

impl DataAccess {
    /// Unknown keys fall back to the general outbreak summary
    pub fn from_key(key: &str) -> Self {
        match key.trim() {
            "hospital_cases" => DataAccess::HospitalCases,
            "triage_logs" => DataAccess::TriageLogs,
            "private_clinic" => DataAccess::PrivateClinic,
            "school_attendance" => DataAccess::SchoolAttendance,
            "vet_surveillance" => DataAccess::VetSurveillance,
            "environmental_data" => DataAccess::EnvironmentalData,
            _ => DataAccess::General,
        }
    }
}

/// Village whose private healer sees the earliest cases
const INDEX_VILLAGE: VillageId = VillageId(1);
const SCHOOL_AGES: std::ops::RangeInclusive<u32> = 5..=18;

fn age_group(age: u32) -> &'static str {
    match age {
        0..=4 => "0-4",
        5..=14 => "5-14",
        15..=49 => "15-49",
        _ => "50+",
    }
}

/// `Nalu Village: 12, Kabwe Village: 4`
fn format_counts<K: Ord>(counts: &BTreeMap<K, usize>, label: impl Fn(&K) -> String) -> String {
    if counts.is_empty() {
        return "none".into();
    }
    counts
        .iter()
        .map(|(k, n)| format!("{}: {}", label(k), n))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Short district-wide summary of the outbreak
pub fn epidemiologic_context(world: &TruthWorld) -> String {
    let total = world.case_count();
    if total == 0 {
        return "No symptomatic AES cases have been assigned in the truth model.".into();
    }

    let by_village: BTreeMap<VillageId, usize> =
        cases_by_village(world).into_iter().filter(|(_, n)| *n > 0).collect();

    // Age groups in ascending order, not alphabetical
    let mut by_age: Vec<(&str, usize)> =
        ["0-4", "5-14", "15-49", "50+"].into_iter().map(|g| (g, 0)).collect();
    for person in world.cases() {
        let group = age_group(person.age);
        if let Some(slot) = by_age.iter_mut().find(|(g, _)| *g == group) {
            slot.1 += 1;
        }
    }
    let by_age = by_age
        .iter()
        .map(|(g, n)| format!("{}: {}", g, n))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "There are currently about {} symptomatic AES cases in the district. \
         Cases by village: {}. Cases by age group: {}. \
         Most cases are children and come from villages with rice paddies and pigs.",
        total,
        format_counts(&by_village, |id| world.village_name(*id).to_string()),
        by_age,
    )
}

/// Role-specific knowledge, layered on top of the district summary
pub fn role_view(access: DataAccess, world: &TruthWorld) -> String {
    let epi = epidemiologic_context(world);
    match access {
        DataAccess::HospitalCases => hospital_cases(&epi, world),
        DataAccess::TriageLogs => triage_logs(&epi, world),
        DataAccess::PrivateClinic => private_clinic(&epi, world),
        DataAccess::SchoolAttendance => school_attendance(&epi, world),
        DataAccess::VetSurveillance => vet_surveillance(&epi, world),
        DataAccess::EnvironmentalData => environmental_data(&epi, world),
        DataAccess::General => epi,
    }
}

fn hospital_cases(epi: &str, world: &TruthWorld) -> String {
    let counts: BTreeMap<VillageId, usize> =
        cases_by_village(world).into_iter().filter(|(_, n)| *n > 0).collect();
    format!(
        "{} As hospital director, you mainly see hospitalized AES cases. \
         You know current hospitalized cases come from these villages: {}.",
        epi,
        format_counts(&counts, |id| world.village_name(*id).to_string()),
    )
}

fn triage_logs(epi: &str, world: &TruthWorld) -> String {
    let earliest = world.cases().filter_map(|p| p.onset_date()).min();
    let latest = world.cases().filter_map(|p| p.onset_date()).max();
    match (earliest, latest) {
        (Some(earliest), Some(latest)) => format!(
            "{} As triage nurse, you mostly notice who walks in first. \
             You saw the first AES cases between {} and {}.",
            epi, earliest, latest
        ),
        _ => format!(
            "{} As triage nurse, you have not seen anyone walk in with AES symptoms.",
            epi
        ),
    }
}

fn private_clinic(epi: &str, world: &TruthWorld) -> String {
    let n = world.cases().filter(|p| p.village_id == INDEX_VILLAGE).count();
    let village = world
        .village(INDEX_VILLAGE)
        .map(|v| v.short_name())
        .unwrap_or("the index village");
    format!(
        "{} As a private healer, you have personally seen around {} early AES-like illnesses \
         from households near pig farms and rice paddies in {}.",
        epi, n, village
    )
}

fn school_attendance(epi: &str, world: &TruthWorld) -> String {
    let mut by_village: BTreeMap<VillageId, usize> = BTreeMap::new();
    for person in world.cases().filter(|p| SCHOOL_AGES.contains(&p.age)) {
        *by_village.entry(person.village_id).or_insert(0) += 1;
    }
    let total: usize = by_village.values().sum();
    format!(
        "{} As school principal, you mostly know about school-age children. \
         You know of AES cases among your students: {} total, by village: {}.",
        epi,
        total,
        format_counts(&by_village, |id| world.village_name(*id).to_string()),
    )
}

fn vet_surveillance(epi: &str, world: &TruthWorld) -> String {
    let mut by_village: BTreeMap<VillageId, usize> = BTreeMap::new();
    for sample in world
        .lab_samples
        .iter()
        .filter(|s| s.sample_type == SampleType::PigSerum && s.true_positive)
    {
        *by_village.entry(sample.village_id).or_insert(0) += 1;
    }
    format!(
        "{} As the district veterinary officer, you track pig health. \
         Recent pig tests suggest JEV circulation in villages: {}.",
        epi,
        format_counts(&by_village, |id| id.to_string()),
    )
}

fn environmental_data(epi: &str, world: &TruthWorld) -> String {
    let sites: Vec<String> = world
        .environment_sites
        .iter()
        .filter(|s| s.breeding_index == BreedingIndex::High)
        .map(|s| s.id.to_string())
        .collect();
    let sites = if sites.is_empty() { "none".to_string() } else { sites.join(", ") };
    format!(
        "{} As environmental health officer, you survey breeding sites. \
         You know of high mosquito breeding around these sites: {}.",
        epi, sites
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::SimulationConfig;
    use crate::truth::generation::generate_world;

    #[test]
    fn test_unknown_key_is_general() {
        assert_eq!(DataAccess::from_key("vet_surveillance"), DataAccess::VetSurveillance);
        assert_eq!(DataAccess::from_key("astrology"), DataAccess::General);
    }

    #[test]
    fn test_general_view_is_epi_context() {
        let world = generate_world(&SimulationConfig::default()).unwrap();
        assert_eq!(role_view(DataAccess::General, &world), epidemiologic_context(&world));
    }

    #[test]
    fn test_role_views_extend_context() {
        let world = generate_world(&SimulationConfig::default()).unwrap();
        let epi = epidemiologic_context(&world);
        assert!(role_view(DataAccess::TriageLogs, &world).contains("triage nurse"));
        assert!(role_view(DataAccess::PrivateClinic, &world).contains("Nalu"));
        let env = role_view(DataAccess::EnvironmentalData, &world);
        assert!(env.starts_with(&epi));
        assert!(env.contains("ES-V1-01"));
    }

    #[test]
    fn test_no_case_context() {
        let mut config = SimulationConfig::default();
        config.infection.max_risk = 0.0;
        let world = generate_world(&config).unwrap();
        let epi = epidemiologic_context(&world);
        assert!(epi.starts_with("No symptomatic AES cases"));
        assert!(role_view(DataAccess::TriageLogs, &world).contains("not seen anyone"));
    }

    #[test]
    fn test_age_groups() {
        assert_eq!(age_group(0), "0-4");
        assert_eq!(age_group(14), "5-14");
        assert_eq!(age_group(15), "15-49");
        assert_eq!(age_group(70), "50+");
    }
}
