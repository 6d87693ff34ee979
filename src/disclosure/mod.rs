//! Disclosure layer
//!
//! Projects the hidden truth world into the partial views the player is
//! allowed to see: the hospital line list, role-scoped NPC knowledge, lab
//! results with realistic test error, gated clues and contact unlocks.

pub mod clues;
pub mod lab;
pub mod line_list;
pub mod roles;
pub mod triggers;

pub use clues::{ClueLedger, ConditionalClue};
pub use lab::{process_lab_order, LabOrder, LabResult, TestResult};
pub use line_list::{
    cases_by_village, epi_curve, hospital_view, initial_line_list, spot_map, HospitalView,
    LineListEntry, VillageCaseSummary,
};
pub use roles::{epidemiologic_context, role_view, DataAccess};
pub use triggers::{matching_triggers, UnlockTrigger, UNLOCK_TRIGGERS};
