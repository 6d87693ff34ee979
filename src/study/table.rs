//! Minimal tabular dataset for generated study data

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::error::{Result, SimError};

/// One cell of a study dataset; `Null` marks a missing value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Cell {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Cell {
    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Cell::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Null => f.write_str("NA"),
            Cell::Bool(b) => write!(f, "{}", if *b { "yes" } else { "no" }),
            Cell::Int(n) => write!(f, "{}", n),
            Cell::Float(x) => write!(f, "{:.2}", x),
            Cell::Text(s) => f.write_str(s),
        }
    }
}

impl From<bool> for Cell {
    fn from(b: bool) -> Self {
        Cell::Bool(b)
    }
}

impl From<i64> for Cell {
    fn from(n: i64) -> Self {
        Cell::Int(n)
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

/// Column names plus row-major cells
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Self { columns, rows: Vec::new() }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn push_row(&mut self, row: Vec<Cell>) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(SimError::InvalidStudy(format!(
                "row has {} cells, table has {} columns",
                row.len(),
                self.columns.len()
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    /// All cells of one column, top to bottom
    pub fn column(&self, name: &str) -> Option<impl Iterator<Item = &Cell>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(move |r| &r[idx]))
    }

    pub fn null_count(&self) -> usize {
        self.rows.iter().flatten().filter(|c| c.is_null()).count()
    }

    /// First `n` rows as aligned text
    pub fn preview(&self, n: usize) -> String {
        let shown: Vec<Vec<String>> = self
            .rows
            .iter()
            .take(n)
            .map(|r| r.iter().map(Cell::to_string).collect())
            .collect();

        let widths: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, c)| shown.iter().map(|r| r[i].len()).chain([c.len()]).max().unwrap_or(0))
            .collect();

        let line = |cells: Vec<&str>| {
            cells
                .iter()
                .zip(&widths)
                .map(|(c, w)| format!("{:<w$}", c, w = *w))
                .collect::<Vec<_>>()
                .join("  ")
        };

        let mut out = line(self.columns.iter().map(String::as_str).collect());
        for row in &shown {
            out.push('\n');
            out.push_str(&line(row.iter().map(String::as_str).collect()));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> Table {
        let mut t = Table::new(vec!["person_id".into(), "case".into(), "age".into()]);
        t.push_row(vec!["P00001".into(), true.into(), Cell::Int(6)]).unwrap();
        t.push_row(vec!["P00002".into(), false.into(), Cell::Null]).unwrap();
        t
    }

    #[test]
    fn test_push_row_checks_width() {
        let mut t = table();
        assert!(t.push_row(vec![Cell::Null]).is_err());
        assert_eq!(t.len(), 2);
    }

    #[test]
    fn test_column_access() {
        let t = table();
        let cases: Vec<_> = t.column("case").unwrap().filter_map(Cell::as_bool).collect();
        assert_eq!(cases, vec![true, false]);
        assert!(t.column("missing").is_none());
        assert_eq!(t.null_count(), 1);
    }

    #[test]
    fn test_preview_has_header() {
        let preview = table().preview(1);
        assert!(preview.starts_with("person_id"));
        assert_eq!(preview.lines().count(), 2);
        assert!(preview.contains("yes"));
    }

    #[test]
    fn test_json_round_trip() {
        let t = table();
        let json = serde_json::to_string(&t).unwrap();
        let back: Table = serde_json::from_str(&json).unwrap();
        assert_eq!(back, t);
    }
}
