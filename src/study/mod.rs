//! Analytic study: questionnaire, dataset, analysis and final outcome

pub mod analysis;
pub mod dataset;
pub mod outcome;
pub mod questionnaire;
pub mod table;

pub use analysis::{summarize, two_by_two, DatasetSummary, TwoByTwo};
pub use dataset::{generate_study_dataset, SampleSize, StudyDesign};
pub use outcome::{evaluate_interventions, InterventionOutcome, OutcomeStatus};
pub use questionnaire::{map_questionnaire, StudyColumn};
pub use table::{Cell, Table};
