//! Day progression: fixed checklist per investigation day

use serde::{Deserialize, Serialize};

/// Completion flags the day gate looks at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    pub line_list_viewed: bool,
    pub case_definition_written: bool,
    pub hypotheses_documented: bool,
    pub interviews_completed: usize,
    pub study_design_chosen: bool,
    pub questionnaire_submitted: bool,
    pub dataset_generated: bool,
    pub descriptive_analysis_done: bool,
    pub lab_samples_submitted: usize,
    pub final_diagnosis_entered: bool,
    pub recommendations_recorded: bool,
    /// Interviews needed to leave day 1
    pub min_interviews: usize,
    /// Last investigation day; it cannot be advanced past
    pub final_day: u32,
}

/// A checklist item and whether it is done
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayTask {
    pub label: String,
    pub done: bool,
    /// Required to advance (some tasks are only encouraged)
    pub required: bool,
}

fn task(label: impl Into<String>, done: bool, required: bool) -> DayTask {
    DayTask { label: label.into(), done, required }
}

/// The checklist shown for a day
pub fn day_tasks(day: u32, p: &ProgressSnapshot) -> Vec<DayTask> {
    if day == 0 || day > p.final_day {
        return Vec::new();
    }
    if day == p.final_day {
        return vec![
            task("Enter final diagnosis", p.final_diagnosis_entered, false),
            task("Record main recommendations", p.recommendations_recorded, false),
        ];
    }
    match day {
        1 => vec![
            task("Review line list and epi curve", p.line_list_viewed, true),
            task("Write a working case definition", p.case_definition_written, true),
            task("Document initial hypotheses", p.hypotheses_documented, false),
            task(
                format!("Complete at least {} interviews", p.min_interviews),
                p.interviews_completed >= p.min_interviews,
                true,
            ),
        ],
        2 => vec![
            task("Choose a study design", p.study_design_chosen, true),
            task("Submit questionnaire", p.questionnaire_submitted, true),
            task("Generate study dataset", p.dataset_generated, true),
        ],
        3 => vec![task("Complete descriptive analysis", p.descriptive_analysis_done, true)],
        4 => vec![task("Submit at least one lab sample", p.lab_samples_submitted > 0, true)],
        _ => Vec::new(),
    }
}

/// Whether the player may leave `day`, and what is still missing
///
/// Pure: the answer depends only on the arguments.
pub fn check_day_prerequisites(day: u32, progress: &ProgressSnapshot) -> (bool, Vec<String>) {
    if day == 0 || day > progress.final_day {
        return (false, vec![format!("Day {} is not part of the investigation", day)]);
    }
    if day == progress.final_day {
        return (false, vec!["This is the final day of the investigation".to_string()]);
    }

    let missing: Vec<String> = day_tasks(day, progress)
        .into_iter()
        .filter(|t| t.required && !t.done)
        .map(|t| t.label)
        .collect();
    (missing.is_empty(), missing)
}

pub fn day_briefing(day: u32) -> &'static str {
    match day {
        1 => "Day 1 focuses on detection and initial description of the outbreak. \
              Understand the basic pattern (time, place, person), draft a working case definition, \
              and begin hypothesis-generating interviews.",
        2 => "Day 2 focuses on hypothesis generation and study design. \
              Design an analytic study and develop a questionnaire to collect data.",
        3 => "Day 3 is dedicated to data cleaning and analysis. \
              Work with your generated dataset to describe the outbreak and identify risk factors.",
        4 => "Day 4 focuses on laboratory and environmental investigations. \
              Decide which human, animal and environmental samples to collect and how to test them.",
        _ => "The final day focuses on recommendations and communication. \
              Integrate all evidence and present your findings and interventions to leadership.",
    }
}
