//! Final scoring of the investigation's diagnosis and recommendations

use serde::{Deserialize, Serialize};

use crate::session::state::Decisions;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    Controlled,
    PartiallyControlled,
    Continues,
}

impl std::fmt::Display for OutcomeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            OutcomeStatus::Controlled => "Outbreak controlled",
            OutcomeStatus::PartiallyControlled => "Outbreak partially controlled",
            OutcomeStatus::Continues => "Outbreak continues",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterventionOutcome {
    pub status: OutcomeStatus,
    pub narrative: String,
    /// One line per factor considered
    pub outcomes: Vec<String>,
    pub score: u32,
    /// Estimated further cases over the next month
    pub new_cases: u32,
}

const DIAGNOSIS_POINTS: u32 = 3;
pub const MAX_SCORE: u32 = DIAGNOSIS_POINTS + RECOMMENDATIONS.len() as u32 + ONE_HEALTH_CONTACTS.len() as u32;
/// Further cases expected per missing point
const CASES_PER_POINT: u32 = 3;

/// How a recommendation word is matched
#[derive(Debug, Clone, Copy)]
enum Term {
    /// The whole word
    Word(&'static str),
    /// The start of a word; multi-word stems must match consecutive words
    Stem(&'static str),
}

use Term::{Stem, Word};

/// Recommendation area and the words that count as addressing it
const RECOMMENDATIONS: [(&str, &[Term]); 5] = [
    ("JE vaccination campaign for children", &[Stem("vaccin"), Stem("immuni")]),
    (
        "Vector control",
        &[
            Stem("mosquito"),
            Word("net"),
            Word("nets"),
            Word("netting"),
            Stem("larvi"),
            Stem("spray"),
            Stem("vector"),
            Stem("drain"),
        ],
    ),
    (
        "Pig management",
        &[Word("pig"), Word("pigs"), Stem("piglet"), Stem("swine"), Word("pen"), Word("pens"), Stem("relocat")],
    ),
    (
        "Community education",
        &[Stem("educat"), Stem("awareness"), Stem("communicat"), Stem("communit")],
    ),
    (
        "Enhanced surveillance",
        &[Stem("surveillance"), Stem("monitor"), Stem("report"), Stem("case finding")],
    ),
];

fn words(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}

impl Term {
    fn matches(&self, words: &[String]) -> bool {
        match *self {
            Word(w) => words.iter().any(|x| x == w),
            Stem(stem) => {
                let parts: Vec<&str> = stem.split(' ').collect();
                let Some((last, leading)) = parts.split_last() else {
                    return false;
                };
                words.windows(parts.len()).any(|window| {
                    window[..leading.len()].iter().zip(leading).all(|(x, p)| x == p)
                        && window[leading.len()].starts_with(last)
                })
            }
        }
    }
}

/// Contacts whose perspective makes the response One Health
const ONE_HEALTH_CONTACTS: [(&str, &str); 2] = [
    ("vet_amina", "Veterinary perspective consulted"),
    ("mr_osei", "Environmental perspective consulted"),
];

fn names_japanese_encephalitis(diagnosis: &str) -> bool {
    let text = diagnosis.to_lowercase();
    text.contains("japanese encephalitis")
        || text.contains("jev")
        || text.split(|c: char| !c.is_alphanumeric()).any(|w| w == "je")
}

/// Score the final diagnosis, recommendations and breadth of interviews
pub fn evaluate_interventions<'a>(
    decisions: &Decisions,
    interviewed: impl IntoIterator<Item = &'a str>,
) -> InterventionOutcome {
    let interviewed: Vec<&str> = interviewed.into_iter().collect();
    let mut score = 0;
    let mut outcomes = Vec::new();

    if names_japanese_encephalitis(&decisions.final_diagnosis) {
        score += DIAGNOSIS_POINTS;
        outcomes.push("✓ Diagnosis identifies Japanese encephalitis".to_string());
    } else {
        outcomes.push("✗ Diagnosis does not identify Japanese encephalitis".to_string());
    }

    let recs: Vec<Vec<String>> = decisions.recommendations.iter().map(|r| words(r)).collect();
    for (area, terms) in RECOMMENDATIONS {
        if recs.iter().any(|r| terms.iter().any(|t| t.matches(r))) {
            score += 1;
            outcomes.push(format!("✓ {}", area));
        } else {
            outcomes.push(format!("✗ Missing: {}", area));
        }
    }

    for (key, label) in ONE_HEALTH_CONTACTS {
        if interviewed.contains(&key) {
            score += 1;
            outcomes.push(format!("✓ {}", label));
        } else {
            outcomes.push(format!("✗ Not consulted: {}", key));
        }
    }

    let status = if score >= 8 {
        OutcomeStatus::Controlled
    } else if score >= 5 {
        OutcomeStatus::PartiallyControlled
    } else {
        OutcomeStatus::Continues
    };

    let narrative = match status {
        OutcomeStatus::Controlled => {
            "Vaccination and vector control reached the villages in time. \
             New AES admissions fell within two weeks and the district praised the team's One Health approach."
        }
        OutcomeStatus::PartiallyControlled => {
            "Some of your measures took hold, but gaps in the response let transmission continue \
             in the most exposed households for several more weeks."
        }
        OutcomeStatus::Continues => {
            "Without a clear diagnosis and targeted measures, children kept arriving at the hospital \
             with encephalitis through the rest of the rainy season."
        }
    }
    .to_string();

    InterventionOutcome {
        status,
        narrative,
        outcomes,
        score,
        new_cases: (MAX_SCORE - score) * CASES_PER_POINT,
    }
}
