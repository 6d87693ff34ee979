//! Always-visible case views: hospital line list, epi curve, spot map

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::types::{Outcome, PersonId, Sex, VillageId};
use crate::truth::individual::Individual;
use crate::truth::world::TruthWorld;

/// One row of a line list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineListEntry {
    pub person_id: PersonId,
    pub age: u32,
    pub sex: Sex,
    pub village_id: VillageId,
    pub village_name: String,
    pub onset_date: NaiveDate,
    pub severe_neuro: bool,
    pub outcome: Outcome,
}

impl LineListEntry {
    /// `None` for anyone without a clinical course
    fn from_case(person: &Individual, world: &TruthWorld) -> Option<Self> {
        let clinical = person.clinical.as_ref()?;
        Some(Self {
            person_id: person.id,
            age: person.age,
            sex: person.sex,
            village_id: person.village_id,
            village_name: world.village_name(person.village_id).to_string(),
            onset_date: clinical.onset_date,
            severe_neuro: clinical.severe_neuro,
            outcome: clinical.outcome,
        })
    }
}

/// What the district hospital can see
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HospitalView {
    NoCases,
    Cases(Vec<LineListEntry>),
}

impl HospitalView {
    pub fn len(&self) -> usize {
        match self {
            HospitalView::NoCases => 0,
            HospitalView::Cases(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn sorted_line_list<'a>(
    world: &TruthWorld,
    people: impl Iterator<Item = &'a Individual>,
) -> Vec<LineListEntry> {
    let mut rows: Vec<LineListEntry> =
        people.filter_map(|p| LineListEntry::from_case(p, world)).collect();
    rows.sort_by_key(|r| (r.onset_date, r.person_id));
    rows
}

/// Severe symptomatic cases, earliest onset first
pub fn hospital_view(world: &TruthWorld) -> HospitalView {
    let rows = sorted_line_list(world, world.cases().filter(|p| p.severe_neuro()));
    if rows.is_empty() {
        HospitalView::NoCases
    } else {
        HospitalView::Cases(rows)
    }
}

/// The first `n` symptomatic cases by onset (the briefing line list)
pub fn initial_line_list(world: &TruthWorld, n: usize) -> Vec<LineListEntry> {
    let mut rows = sorted_line_list(world, world.cases());
    rows.truncate(n);
    rows
}

/// Symptomatic case counts per onset date
pub fn epi_curve(world: &TruthWorld) -> BTreeMap<NaiveDate, usize> {
    let mut curve = BTreeMap::new();
    for date in world.cases().filter_map(|p| p.onset_date()) {
        *curve.entry(date).or_insert(0) += 1;
    }
    curve
}

/// Symptomatic cases per village; every village appears, even with zero
pub fn cases_by_village(world: &TruthWorld) -> BTreeMap<VillageId, usize> {
    let mut counts: BTreeMap<VillageId, usize> =
        world.villages.iter().map(|v| (v.id, 0)).collect();
    for person in world.cases() {
        *counts.entry(person.village_id).or_insert(0) += 1;
    }
    counts
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VillageCaseSummary {
    pub village_id: VillageId,
    pub village_name: String,
    pub severe: usize,
    pub mild: usize,
}

impl VillageCaseSummary {
    pub fn total(&self) -> usize {
        self.severe + self.mild
    }
}

/// Spot-map summary: cases per village split by severity
pub fn spot_map(world: &TruthWorld) -> Vec<VillageCaseSummary> {
    world
        .villages
        .iter()
        .map(|v| {
            let (severe, mild) = world
                .cases()
                .filter(|p| p.village_id == v.id)
                .fold((0, 0), |(s, m), p| if p.severe_neuro() { (s + 1, m) } else { (s, m + 1) });
            VillageCaseSummary {
                village_id: v.id,
                village_name: v.name.clone(),
                severe,
                mild,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::SimulationConfig;
    use crate::truth::generation::generate_world;

    fn world() -> TruthWorld {
        generate_world(&SimulationConfig::default()).unwrap()
    }

    fn no_case_world() -> TruthWorld {
        let mut config = SimulationConfig::default();
        for v in &mut config.villages {
            v.baseline_risk = 0.0;
        }
        config.infection.max_risk = 0.0;
        generate_world(&config).unwrap()
    }

    #[test]
    fn test_hospital_view_is_severe_and_sorted() {
        let world = world();
        let HospitalView::Cases(rows) = hospital_view(&world) else {
            panic!("default world should have severe cases");
        };
        assert!(rows.iter().all(|r| r.severe_neuro));
        assert!(rows.windows(2).all(|w| w[0].onset_date <= w[1].onset_date));
    }

    #[test]
    fn test_no_cases_is_explicit() {
        let world = no_case_world();
        assert_eq!(hospital_view(&world), HospitalView::NoCases);
        assert!(initial_line_list(&world, 12).is_empty());
        assert!(epi_curve(&world).is_empty());
        assert!(cases_by_village(&world).values().all(|&n| n == 0));
    }

    #[test]
    fn test_initial_line_list_truncates() {
        let world = world();
        let rows = initial_line_list(&world, 5);
        assert!(rows.len() <= 5);
        let all = initial_line_list(&world, usize::MAX);
        assert_eq!(all.len(), world.case_count());
    }

    #[test]
    fn test_epi_curve_and_spot_map_totals_agree() {
        let world = world();
        let curve_total: usize = epi_curve(&world).values().sum();
        let map_total: usize = spot_map(&world).iter().map(|s| s.total()).sum();
        assert_eq!(curve_total, world.case_count());
        assert_eq!(map_total, world.case_count());
    }
}
