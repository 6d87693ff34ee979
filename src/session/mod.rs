//! Player session: state transitions, day gates and save files

pub mod persistence;
pub mod progression;
pub mod state;

pub use persistence::{load_from_path, restore, save_to_path, snapshot, SaveSnapshot, SAVE_VERSION};
pub use progression::{check_day_prerequisites, day_briefing, day_tasks, DayTask, ProgressSnapshot};
pub use state::{CaseDefinition, Decisions, NotebookEntry, OneHealthProgress, SessionState};
