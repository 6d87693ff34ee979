//! Descriptive analysis of a study dataset

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, SimError};
use crate::study::dataset::CASE_COLUMN;
use crate::study::questionnaire::StudyColumn;
use crate::study::table::Table;

/// Exposure by case status
///
/// ```text
///              case   non-case
/// exposed        a       b
/// unexposed      c       d
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TwoByTwo {
    pub exposure: StudyColumn,
    pub a: u32,
    pub b: u32,
    pub c: u32,
    pub d: u32,
    /// Rows skipped because the exposure cell was blank
    pub missing: u32,
}

impl TwoByTwo {
    /// `None` when a cell in the denominator is zero
    pub fn odds_ratio(&self) -> Option<f64> {
        if self.b == 0 || self.c == 0 {
            return None;
        }
        Some((self.a as f64 * self.d as f64) / (self.b as f64 * self.c as f64))
    }

    pub fn attack_rate_exposed(&self) -> Option<f64> {
        ratio(self.a, self.a + self.b)
    }

    pub fn attack_rate_unexposed(&self) -> Option<f64> {
        ratio(self.c, self.c + self.d)
    }

    pub fn risk_ratio(&self) -> Option<f64> {
        match (self.attack_rate_exposed(), self.attack_rate_unexposed()) {
            (Some(e), Some(u)) if u > 0.0 => Some(e / u),
            _ => None,
        }
    }

    pub fn total(&self) -> u32 {
        self.a + self.b + self.c + self.d
    }

    pub fn render(&self) -> String {
        let fmt_opt = |x: Option<f64>| x.map_or("n/a".to_string(), |v| format!("{:.2}", v));
        format!(
            "Exposure: {}\n\
             \x20            case  non-case\n\
             exposed     {:>4}  {:>8}\n\
             unexposed   {:>4}  {:>8}\n\
             missing: {}\n\
             attack rate exposed: {}  unexposed: {}\n\
             odds ratio: {}  risk ratio: {}",
            self.exposure,
            self.a,
            self.b,
            self.c,
            self.d,
            self.missing,
            fmt_opt(self.attack_rate_exposed()),
            fmt_opt(self.attack_rate_unexposed()),
            fmt_opt(self.odds_ratio()),
            fmt_opt(self.risk_ratio()),
        )
    }
}

fn ratio(num: u32, den: u32) -> Option<f64> {
    (den > 0).then(|| num as f64 / den as f64)
}

/// Cross-tabulate a yes/no exposure column against case status
pub fn two_by_two(table: &Table, exposure: StudyColumn) -> Result<TwoByTwo> {
    if !exposure.is_exposure() {
        return Err(SimError::InvalidStudy(format!("{} is not a yes/no exposure", exposure)));
    }
    let exp_idx = table.column_index(exposure.key()).ok_or_else(|| {
        SimError::InvalidStudy(format!("{} was not collected in this dataset", exposure))
    })?;
    let case_idx = table
        .column_index(CASE_COLUMN)
        .ok_or_else(|| SimError::InvalidStudy("dataset has no case status".into()))?;

    let mut t = TwoByTwo { exposure, a: 0, b: 0, c: 0, d: 0, missing: 0 };
    for row in table.rows() {
        match (row[exp_idx].as_bool(), row[case_idx].as_bool()) {
            (Some(true), Some(true)) => t.a += 1,
            (Some(true), Some(false)) => t.b += 1,
            (Some(false), Some(true)) => t.c += 1,
            (Some(false), Some(false)) => t.d += 1,
            _ => t.missing += 1,
        }
    }
    Ok(t)
}

/// Headline counts for the descriptive step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub rows: usize,
    pub cases: usize,
    pub non_cases: usize,
    pub missing_cells: usize,
}

pub fn summarize(table: &Table) -> DatasetSummary {
    let cases = table
        .column(CASE_COLUMN)
        .map(|col| col.filter(|c| c.as_bool() == Some(true)).count())
        .unwrap_or(0);
    DatasetSummary {
        rows: table.len(),
        cases,
        non_cases: table.len() - cases,
        missing_cells: table.null_count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::study::table::Cell;

    fn table(rows: &[(Option<bool>, bool)]) -> Table {
        let mut t = Table::new(vec![CASE_COLUMN.into(), "pigs_near_home".into()]);
        for (exp, case) in rows {
            let exp = exp.map_or(Cell::Null, Cell::Bool);
            t.push_row(vec![Cell::Bool(*case), exp]).unwrap();
        }
        t
    }

    #[test]
    fn test_counts_and_odds_ratio() {
        let mut rows = Vec::new();
        rows.extend(std::iter::repeat((Some(true), true)).take(8));
        rows.extend(std::iter::repeat((Some(true), false)).take(4));
        rows.extend(std::iter::repeat((Some(false), true)).take(2));
        rows.extend(std::iter::repeat((Some(false), false)).take(16));
        rows.push((None, true));
        let t = two_by_two(&table(&rows), StudyColumn::PigsNearHome).unwrap();
        assert_eq!((t.a, t.b, t.c, t.d, t.missing), (8, 4, 2, 16, 1));
        assert!((t.odds_ratio().unwrap() - 16.0).abs() < 1e-9);
        assert!((t.attack_rate_exposed().unwrap() - 8.0 / 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_cell_has_no_odds_ratio() {
        let t = two_by_two(&table(&[(Some(true), true), (Some(false), false)]), StudyColumn::PigsNearHome).unwrap();
        assert_eq!(t.odds_ratio(), None);
    }

    #[test]
    fn test_column_must_be_collected_exposure() {
        let t = table(&[]);
        assert!(two_by_two(&t, StudyColumn::UsesNet).is_err());
        assert!(two_by_two(&t, StudyColumn::Age).is_err());
    }

    #[test]
    fn test_summary() {
        let s = summarize(&table(&[(Some(true), true), (None, false)]));
        assert_eq!(s, DatasetSummary { rows: 2, cases: 1, non_cases: 1, missing_cells: 1 });
    }
}
