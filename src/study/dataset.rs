//! Study dataset generation from the truth population

use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::core::error::{Result, SimError};
use crate::core::types::VillageId;
use crate::study::questionnaire::StudyColumn;
use crate::study::table::{Cell, Table};
use crate::truth::individual::Individual;
use crate::truth::world::TruthWorld;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StudyDesign {
    CaseControl,
    Cohort,
}

impl StudyDesign {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "case_control" | "cc" => Some(StudyDesign::CaseControl),
            "cohort" | "retrospective_cohort" => Some(StudyDesign::Cohort),
            _ => None,
        }
    }
}

impl fmt::Display for StudyDesign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StudyDesign::CaseControl => "case-control",
            StudyDesign::Cohort => "retrospective cohort",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleSize {
    pub cases: usize,
    pub controls_per_case: usize,
}

/// Identifier and outcome columns present in every dataset
pub const ID_COLUMN: &str = "person_id";
pub const HOUSEHOLD_COLUMN: &str = "household_id";
pub const CASE_COLUMN: &str = "case_status";

fn column_value(column: StudyColumn, person: &Individual, world: &TruthWorld) -> Cell {
    match column {
        StudyColumn::Age => Cell::Int(person.age as i64),
        StudyColumn::Sex => Cell::Text(person.sex.to_string()),
        StudyColumn::Occupation => Cell::Text(person.occupation.to_string()),
        StudyColumn::Village => Cell::Text(world.village_name(person.village_id).to_string()),
        StudyColumn::EveningOutdoor => Cell::Bool(person.exposures.evening_outdoor),
        StudyColumn::PigsNearHome => Cell::Bool(person.exposures.pigs_near_home),
        StudyColumn::UsesNet => Cell::Bool(person.exposures.uses_net),
        StudyColumn::RiceFieldNearby => Cell::Bool(person.exposures.rice_field_nearby),
        StudyColumn::Vaccinated => Cell::Bool(person.vaccinated),
    }
}

/// Pick the study participants
fn participants<'a>(
    world: &'a TruthWorld,
    design: StudyDesign,
    size: SampleSize,
    rng: &mut ChaCha8Rng,
) -> Result<Vec<&'a Individual>> {
    let mut cases: Vec<&Individual> = world.cases().collect();
    if cases.is_empty() {
        return Err(SimError::InvalidStudy("no AES cases are available to study".into()));
    }
    cases.sort_by_key(|p| (p.onset_date(), p.id));

    let affected: BTreeSet<VillageId> = cases.iter().map(|p| p.village_id).collect();

    match design {
        StudyDesign::CaseControl => {
            if size.cases == 0 {
                return Err(SimError::InvalidStudy("sample size must include at least one case".into()));
            }
            cases.truncate(size.cases);
            let mut pool: Vec<&Individual> = world
                .individuals
                .iter()
                .filter(|p| !p.symptomatic() && affected.contains(&p.village_id))
                .collect();
            pool.shuffle(rng);
            pool.truncate(cases.len() * size.controls_per_case);
            cases.extend(pool);
            Ok(cases)
        }
        StudyDesign::Cohort => Ok(world
            .individuals
            .iter()
            .filter(|p| affected.contains(&p.village_id))
            .collect()),
    }
}

/// Build the analysis dataset for a study design
///
/// Columns are identifiers, case status and the mapped questionnaire
/// columns. Each questionnaire cell is blanked with probability
/// `missing_rate`; identifiers and case status are always present.
pub fn generate_study_dataset(
    world: &TruthWorld,
    design: StudyDesign,
    size: SampleSize,
    columns: &[StudyColumn],
    missing_rate: f64,
    rng: &mut ChaCha8Rng,
) -> Result<Table> {
    if !(0.0..=1.0).contains(&missing_rate) {
        return Err(SimError::InvalidStudy(format!("missing rate {} is not a probability", missing_rate)));
    }

    let people = participants(world, design, size, rng)?;

    let mut names = vec![ID_COLUMN.to_string(), HOUSEHOLD_COLUMN.to_string(), CASE_COLUMN.to_string()];
    names.extend(columns.iter().map(|c| c.key().to_string()));
    let mut table = Table::new(names);

    for person in &people {
        let mut row = vec![
            Cell::Text(person.id.to_string()),
            Cell::Text(person.household_id.to_string()),
            Cell::Bool(person.symptomatic()),
        ];
        for &column in columns {
            if rng.gen_bool(missing_rate) {
                row.push(Cell::Null);
            } else {
                row.push(column_value(column, person, world));
            }
        }
        table.push_row(row)?;
    }

    tracing::info!(
        "Generated {} dataset: {} rows, {} columns",
        design,
        table.len(),
        table.columns().len()
    );
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::SimulationConfig;
    use crate::truth::generation::generate_world;
    use rand::SeedableRng;

    fn world() -> TruthWorld {
        generate_world(&SimulationConfig::default()).unwrap()
    }

    fn size() -> SampleSize {
        SampleSize { cases: 10, controls_per_case: 2 }
    }

    #[test]
    fn test_case_control_proportions() {
        let world = world();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let table = generate_study_dataset(
            &world,
            StudyDesign::CaseControl,
            size(),
            &[StudyColumn::PigsNearHome],
            0.0,
            &mut rng,
        )
        .unwrap();
        let cases = table.column(CASE_COLUMN).unwrap().filter(|c| **c == Cell::Bool(true)).count();
        let n_cases = world.case_count().min(10);
        assert_eq!(cases, n_cases);
        assert_eq!(table.len(), n_cases * 3);
        assert_eq!(table.columns().len(), 4);
        assert_eq!(table.null_count(), 0);
    }

    #[test]
    fn test_cohort_covers_affected_villages() {
        let world = world();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let table = generate_study_dataset(&world, StudyDesign::Cohort, size(), &[], 0.0, &mut rng).unwrap();
        let cases = table.column(CASE_COLUMN).unwrap().filter(|c| **c == Cell::Bool(true)).count();
        assert_eq!(cases, world.case_count());
    }

    #[test]
    fn test_missing_values_only_in_questionnaire_columns() {
        let world = world();
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let table = generate_study_dataset(
            &world,
            StudyDesign::Cohort,
            size(),
            &[StudyColumn::UsesNet, StudyColumn::Age],
            0.5,
            &mut rng,
        )
        .unwrap();
        assert!(table.null_count() > 0);
        assert!(table.column(ID_COLUMN).unwrap().all(|c| !c.is_null()));
        assert!(table.column(CASE_COLUMN).unwrap().all(|c| !c.is_null()));
    }

    #[test]
    fn test_no_cases_is_an_error() {
        let mut config = SimulationConfig::default();
        config.infection.max_risk = 0.0;
        let world = generate_world(&config).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let result = generate_study_dataset(&world, StudyDesign::CaseControl, size(), &[], 0.0, &mut rng);
        assert!(matches!(result, Err(SimError::InvalidStudy(_))));
    }

    #[test]
    fn test_design_parse() {
        assert_eq!(StudyDesign::parse("Case-control"), Some(StudyDesign::CaseControl));
        assert_eq!(StudyDesign::parse("retrospective cohort"), Some(StudyDesign::Cohort));
        assert_eq!(StudyDesign::parse("ecological"), None);
    }
}
