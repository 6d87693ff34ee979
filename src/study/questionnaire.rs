//! Questionnaire items to dataset columns

use serde::{Deserialize, Serialize};
use std::fmt;

/// A variable the study dataset can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StudyColumn {
    Age,
    Sex,
    Occupation,
    Village,
    EveningOutdoor,
    PigsNearHome,
    UsesNet,
    RiceFieldNearby,
    Vaccinated,
}

impl StudyColumn {
    pub const ALL: [StudyColumn; 9] = [
        StudyColumn::Age,
        StudyColumn::Sex,
        StudyColumn::Occupation,
        StudyColumn::Village,
        StudyColumn::EveningOutdoor,
        StudyColumn::PigsNearHome,
        StudyColumn::UsesNet,
        StudyColumn::RiceFieldNearby,
        StudyColumn::Vaccinated,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            StudyColumn::Age => "age",
            StudyColumn::Sex => "sex",
            StudyColumn::Occupation => "occupation",
            StudyColumn::Village => "village",
            StudyColumn::EveningOutdoor => "evening_outdoor",
            StudyColumn::PigsNearHome => "pigs_near_home",
            StudyColumn::UsesNet => "uses_net",
            StudyColumn::RiceFieldNearby => "rice_field_nearby",
            StudyColumn::Vaccinated => "vaccinated",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();
        Self::ALL.into_iter().find(|c| c.key() == s)
    }

    /// Yes/no exposure columns usable in a 2x2 table
    pub fn is_exposure(&self) -> bool {
        matches!(
            self,
            StudyColumn::EveningOutdoor
                | StudyColumn::PigsNearHome
                | StudyColumn::UsesNet
                | StudyColumn::RiceFieldNearby
                | StudyColumn::Vaccinated
        )
    }

    /// Substrings that map a free-text questionnaire item to this column
    fn keywords(&self) -> &'static [&'static str] {
        match self {
            StudyColumn::Age => &["age", "how old", "birth"],
            StudyColumn::Sex => &["sex", "gender", "male", "female"],
            StudyColumn::Occupation => &["occupation", "job", "work", "farmer"],
            StudyColumn::Village => &["village", "residence", "where do you live", "live"],
            StudyColumn::EveningOutdoor => &["evening", "outdoor", "outside", "dusk", "night"],
            StudyColumn::PigsNearHome => &["pig", "swine", "livestock", "animal"],
            StudyColumn::UsesNet => &["net", "bednet"],
            StudyColumn::RiceFieldNearby => &["rice", "paddy", "paddies", "field", "irrigation"],
            StudyColumn::Vaccinated => &["vaccin", "immuni", "shot"],
        }
    }
}

impl fmt::Display for StudyColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Keyword mapping, in first-mention order without duplicates
///
/// An item may map to several columns ("pigs or rice fields near home?").
pub fn map_questionnaire(items: &[String]) -> Vec<StudyColumn> {
    let mut mapped = Vec::new();
    for item in items {
        let text = item.to_lowercase();
        for column in StudyColumn::ALL {
            if column.keywords().iter().any(|k| text.contains(k)) && !mapped.contains(&column) {
                mapped.push(column);
            }
        }
    }
    mapped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_keyword_mapping() {
        let mapped = map_questionnaire(&items(&[
            "How old is the child?",
            "Do you keep pigs near the house?",
            "Does the child sleep under a bed net?",
        ]));
        assert_eq!(
            mapped,
            vec![StudyColumn::Age, StudyColumn::PigsNearHome, StudyColumn::UsesNet]
        );
    }

    #[test]
    fn test_duplicates_collapsed() {
        let mapped = map_questionnaire(&items(&["pigs?", "any swine?"]));
        assert_eq!(mapped, vec![StudyColumn::PigsNearHome]);
    }

    #[test]
    fn test_unmatched_items_ignored() {
        assert!(map_questionnaire(&items(&["Favourite colour?"])).is_empty());
    }

    #[test]
    fn test_parse_keys() {
        for column in StudyColumn::ALL {
            assert_eq!(StudyColumn::parse(column.key()), Some(column));
        }
        assert_eq!(StudyColumn::parse("shoe_size"), None);
    }
}
