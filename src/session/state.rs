//! Per-player session state
//!
//! One `SessionState` per player. It is passed by reference to whatever
//! needs it and changes only through the named transitions below; the truth
//! world is never touched.

use chrono::{DateTime, Utc};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use uuid::Uuid;

use crate::core::config::SimulationConfig;
use crate::core::error::{Result, SimError};
use crate::disclosure::clues::ClueLedger;
use crate::disclosure::lab::{process_lab_order, LabOrder, LabResult};
use crate::disclosure::line_list::{initial_line_list, LineListEntry};
use crate::disclosure::triggers::matching_triggers;
use crate::llm::client::ChatMessage;
use crate::npc::emotion::NpcMood;
use crate::npc::roster::{find_npc, starting_contacts};
use crate::session::progression::{check_day_prerequisites, ProgressSnapshot};
use crate::study::analysis::{two_by_two, TwoByTwo};
use crate::study::dataset::{generate_study_dataset, SampleSize, StudyDesign};
use crate::study::outcome::{evaluate_interventions, InterventionOutcome};
use crate::study::questionnaire::{map_questionnaire, StudyColumn};
use crate::study::table::Table;
use crate::truth::world::TruthWorld;

/// RNG stream offsets for session-side draws (world generation uses 1-4)
const LAB_STREAM_BASE: u64 = 1_000;
const DATASET_STREAM_BASE: u64 = 2_000;

/// Person / place / time case definition
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseDefinition {
    pub clinical: String,
    pub person: String,
    pub place: String,
    pub time: String,
}

impl CaseDefinition {
    pub fn text(&self) -> String {
        format!(
            "Clinical: {}\nPerson: {}\nPlace: {}\nTime: {}",
            self.clinical, self.person, self.place, self.time
        )
    }
}

/// The player's recorded choices
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decisions {
    pub case_definition: Option<CaseDefinition>,
    pub hypotheses: Vec<String>,
    pub study_design: Option<StudyDesign>,
    pub sample_size: SampleSize,
    pub questionnaire_raw: Vec<String>,
    pub mapped_columns: Vec<StudyColumn>,
    pub final_diagnosis: String,
    pub recommendations: Vec<String>,
}

impl Default for Decisions {
    fn default() -> Self {
        Self {
            case_definition: None,
            hypotheses: Vec::new(),
            study_design: None,
            sample_size: SampleSize { cases: 15, controls_per_case: 2 },
            questionnaire_raw: Vec::new(),
            mapped_columns: Vec::new(),
            final_diagnosis: String::new(),
            recommendations: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotebookEntry {
    pub day: u32,
    pub timestamp: DateTime<Utc>,
    pub note: String,
}

/// One Health checklist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OneHealthProgress {
    pub veterinary_perspective: bool,
    pub environmental_perspective: bool,
    pub animal_samples: bool,
    pub vector_samples: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub(crate) session_id: Uuid,
    pub(crate) seed: u64,
    pub(crate) alert_acknowledged: bool,
    pub(crate) current_day: u32,
    pub(crate) final_day: u32,
    pub(crate) min_interviews: usize,
    pub(crate) budget: u32,
    pub(crate) lab_credits: u32,
    pub(crate) decisions: Decisions,
    pub(crate) generated_dataset: Option<Table>,
    pub(crate) datasets_generated: u32,
    pub(crate) lab_orders: Vec<LabOrder>,
    pub(crate) lab_results: Vec<LabResult>,
    pub(crate) interview_history: BTreeMap<String, Vec<ChatMessage>>,
    pub(crate) current_npc: Option<String>,
    pub(crate) clues: ClueLedger,
    pub(crate) npc_moods: BTreeMap<String, NpcMood>,
    pub(crate) unlocked_npcs: BTreeSet<String>,
    pub(crate) unlock_flags: BTreeMap<String, bool>,
    pub(crate) one_health_triggered: bool,
    pub(crate) questions_asked_about: BTreeSet<String>,
    pub(crate) line_list_viewed: bool,
    pub(crate) questionnaire_submitted: bool,
    pub(crate) descriptive_analysis_done: bool,
    pub(crate) advance_missing_tasks: Vec<String>,
    pub(crate) notebook: Vec<NotebookEntry>,
}

impl SessionState {
    pub fn new(config: &SimulationConfig) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            seed: config.seed,
            alert_acknowledged: false,
            current_day: 1,
            final_day: config.resources.investigation_days,
            min_interviews: config.resources.min_interviews_day1,
            budget: config.resources.starting_budget,
            lab_credits: config.resources.starting_lab_credits,
            decisions: Decisions {
                sample_size: SampleSize {
                    cases: config.study.default_cases,
                    controls_per_case: config.study.default_controls_per_case,
                },
                ..Decisions::default()
            },
            generated_dataset: None,
            datasets_generated: 0,
            lab_orders: Vec::new(),
            lab_results: Vec::new(),
            interview_history: BTreeMap::new(),
            current_npc: None,
            clues: ClueLedger::new(),
            npc_moods: BTreeMap::new(),
            unlocked_npcs: starting_contacts().map(String::from).collect(),
            unlock_flags: BTreeMap::new(),
            one_health_triggered: false,
            questions_asked_about: BTreeSet::new(),
            line_list_viewed: false,
            questionnaire_submitted: false,
            descriptive_analysis_done: false,
            advance_missing_tasks: Vec::new(),
            notebook: Vec::new(),
        }
    }

    fn rng(&self, stream: u64) -> ChaCha8Rng {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        rng.set_stream(stream);
        rng
    }

    // === READ ACCESS ===

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn alert_acknowledged(&self) -> bool {
        self.alert_acknowledged
    }

    pub fn current_day(&self) -> u32 {
        self.current_day
    }

    pub fn final_day(&self) -> u32 {
        self.final_day
    }

    pub fn budget(&self) -> u32 {
        self.budget
    }

    pub fn lab_credits(&self) -> u32 {
        self.lab_credits
    }

    pub fn decisions(&self) -> &Decisions {
        &self.decisions
    }

    pub fn dataset(&self) -> Option<&Table> {
        self.generated_dataset.as_ref()
    }

    pub fn lab_orders(&self) -> &[LabOrder] {
        &self.lab_orders
    }

    pub fn lab_results(&self) -> &[LabResult] {
        &self.lab_results
    }

    pub fn history(&self, npc: &str) -> &[ChatMessage] {
        self.interview_history.get(npc).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn current_npc(&self) -> Option<&str> {
        self.current_npc.as_deref()
    }

    pub fn clues(&self) -> &ClueLedger {
        &self.clues
    }

    pub fn mood(&self, npc: &str) -> NpcMood {
        self.npc_moods.get(npc).cloned().unwrap_or_default()
    }

    pub fn is_unlocked(&self, npc: &str) -> bool {
        self.unlocked_npcs.contains(npc)
    }

    pub fn unlocked_npcs(&self) -> &BTreeSet<String> {
        &self.unlocked_npcs
    }

    pub fn unlock_flag(&self, flag: &str) -> bool {
        self.unlock_flags.get(flag).copied().unwrap_or(false)
    }

    pub fn one_health_triggered(&self) -> bool {
        self.one_health_triggered
    }

    pub fn questions_asked_about(&self) -> &BTreeSet<String> {
        &self.questions_asked_about
    }

    pub fn advance_missing_tasks(&self) -> &[String] {
        &self.advance_missing_tasks
    }

    pub fn notebook(&self) -> &[NotebookEntry] {
        &self.notebook
    }

    /// NPCs the player has actually questioned
    pub fn interviewed(&self) -> impl Iterator<Item = &str> {
        self.interview_history
            .iter()
            .filter(|(_, h)| !h.is_empty())
            .map(|(k, _)| k.as_str())
    }

    pub fn progress(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            line_list_viewed: self.line_list_viewed,
            case_definition_written: self.decisions.case_definition.is_some(),
            hypotheses_documented: !self.decisions.hypotheses.is_empty(),
            interviews_completed: self.interviewed().count(),
            study_design_chosen: self.decisions.study_design.is_some(),
            questionnaire_submitted: self.questionnaire_submitted,
            dataset_generated: self.generated_dataset.is_some(),
            descriptive_analysis_done: self.descriptive_analysis_done,
            lab_samples_submitted: self.lab_orders.len(),
            final_diagnosis_entered: !self.decisions.final_diagnosis.trim().is_empty(),
            recommendations_recorded: !self.decisions.recommendations.is_empty(),
            min_interviews: self.min_interviews,
            final_day: self.final_day,
        }
    }

    pub fn one_health_progress(&self) -> OneHealthProgress {
        OneHealthProgress {
            veterinary_perspective: self.is_unlocked("vet_amina"),
            environmental_perspective: self.is_unlocked("mr_osei"),
            animal_samples: self.lab_orders.iter().any(|o| o.sample_type.is_animal()),
            vector_samples: self.lab_orders.iter().any(|o| o.sample_type.is_vector()),
        }
    }

    // === TRANSITIONS ===

    pub fn acknowledge_alert(&mut self) {
        self.alert_acknowledged = true;
        self.current_day = self.current_day.max(1);
    }

    /// Show the briefing line list and mark it reviewed
    pub fn review_line_list(&mut self, world: &TruthWorld, n: usize) -> Vec<LineListEntry> {
        self.line_list_viewed = true;
        initial_line_list(world, n)
    }

    pub fn record_case_definition(&mut self, definition: CaseDefinition) {
        self.decisions.case_definition = Some(definition);
    }

    /// Blank entries are dropped; returns how many were kept
    pub fn record_hypotheses(&mut self, hypotheses: Vec<String>) -> usize {
        self.decisions.hypotheses = hypotheses
            .into_iter()
            .map(|h| h.trim().to_string())
            .filter(|h| !h.is_empty())
            .collect();
        self.decisions.hypotheses.len()
    }

    pub fn choose_study_design(&mut self, design: StudyDesign) {
        self.decisions.study_design = Some(design);
    }

    pub fn set_sample_size(&mut self, size: SampleSize) {
        self.decisions.sample_size = size;
    }

    /// Save the questionnaire and map it to columns by keyword
    pub fn submit_questionnaire(&mut self, items: Vec<String>) -> &[StudyColumn] {
        self.submit_questionnaire_mapped(items, Vec::new())
    }

    /// Save the questionnaire with columns matched elsewhere (e.g. by the model)
    ///
    /// An empty match falls back to keyword mapping.
    pub fn submit_questionnaire_mapped(
        &mut self,
        items: Vec<String>,
        matched: Vec<StudyColumn>,
    ) -> &[StudyColumn] {
        let items: Vec<String> = items
            .into_iter()
            .map(|i| i.trim().to_string())
            .filter(|i| !i.is_empty())
            .collect();
        let columns = if matched.is_empty() { map_questionnaire(&items) } else { matched };
        self.decisions.questionnaire_raw = items;
        self.decisions.mapped_columns = columns;
        self.questionnaire_submitted = true;
        &self.decisions.mapped_columns
    }

    pub fn generate_dataset(&mut self, world: &TruthWorld, config: &SimulationConfig) -> Result<&Table> {
        let design = self
            .decisions
            .study_design
            .ok_or_else(|| SimError::InvalidStudy("choose a study design first".into()))?;
        let mut rng = self.rng(DATASET_STREAM_BASE + self.datasets_generated as u64);
        let table = generate_study_dataset(
            world,
            design,
            self.decisions.sample_size,
            &self.decisions.mapped_columns,
            config.study.missing_value_rate,
            &mut rng,
        )?;
        self.datasets_generated += 1;
        Ok(&*self.generated_dataset.insert(table))
    }

    pub fn run_descriptive_analysis(&mut self, exposure: StudyColumn) -> Result<TwoByTwo> {
        let table = self
            .generated_dataset
            .as_ref()
            .ok_or_else(|| SimError::InvalidStudy("generate a study dataset first".into()))?;
        let result = two_by_two(table, exposure)?;
        self.descriptive_analysis_done = true;
        Ok(result)
    }

    /// Begin (or resume) an interview; the fee is charged only the first time
    ///
    /// Returns the amount charged.
    pub fn start_interview(&mut self, npc: &str) -> Result<u32> {
        let profile = find_npc(npc).ok_or_else(|| SimError::UnknownNpc(npc.to_string()))?;
        if !self.is_unlocked(npc) {
            return Err(SimError::NpcLocked(profile.name.to_string()));
        }

        let cost = if self.interview_history.contains_key(npc) { 0 } else { profile.cost };
        if self.budget < cost {
            return Err(SimError::InsufficientBudget { needed: cost, available: self.budget });
        }

        self.budget -= cost;
        self.interview_history.entry(npc.to_string()).or_default();
        self.current_npc = Some(npc.to_string());
        tracing::debug!("Interview with {} started (charged ${})", npc, cost);
        Ok(cost)
    }

    pub fn end_interview(&mut self) {
        self.current_npc = None;
    }

    /// Evaluate the unlock table against one player input
    ///
    /// Every matching trigger records its topic; a notification is returned
    /// only the first time a trigger unlocks its contact.
    pub fn apply_unlock_triggers(&mut self, input: &str) -> Vec<String> {
        let mut notifications = Vec::new();
        for trigger in matching_triggers(input) {
            self.questions_asked_about.insert(trigger.topic.to_string());
            if self.unlocked_npcs.insert(trigger.unlocks.to_string()) {
                if trigger.one_health {
                    self.one_health_triggered = true;
                }
                tracing::info!("Unlocked contact {} via {}", trigger.unlocks, trigger.topic);
                notifications.push(trigger.notification.to_string());
            }
        }
        notifications
    }

    pub(crate) fn mood_mut(&mut self, npc: &str) -> &mut NpcMood {
        self.npc_moods.entry(npc.to_string()).or_default()
    }

    pub(crate) fn clues_mut(&mut self) -> &mut ClueLedger {
        &mut self.clues
    }

    pub(crate) fn record_exchange(&mut self, npc: &str, question: &str, reply: &str) {
        let history = self.interview_history.entry(npc.to_string()).or_default();
        history.push(ChatMessage::user(question));
        history.push(ChatMessage::assistant(reply));
    }

    pub(crate) fn set_unlock_flag(&mut self, flag: &str) {
        self.unlock_flags.insert(flag.to_string(), true);
    }

    /// Send a sample to the lab
    ///
    /// Rejected orders (unknown village, wrong specimen, too few credits)
    /// leave the session unchanged.
    pub fn submit_lab_order(
        &mut self,
        order: LabOrder,
        world: &TruthWorld,
        config: &SimulationConfig,
    ) -> Result<LabResult> {
        if world.village(order.village_id).is_none() {
            return Err(SimError::UnknownVillage(order.village_id.to_string()));
        }
        let characteristics = config
            .test_characteristics(order.test)
            .ok_or_else(|| SimError::InvalidLabOrder(format!("{} is not offered", order.test)))?;
        if self.lab_credits < characteristics.cost {
            return Err(SimError::InsufficientLabCredits {
                needed: characteristics.cost,
                available: self.lab_credits,
            });
        }

        let number = self.lab_results.len() + 1;
        let mut rng = self.rng(LAB_STREAM_BASE + number as u64);
        let result = process_lab_order(&order, number, &world.lab_samples, characteristics, &mut rng)?;

        self.lab_credits -= result.cost;
        self.lab_orders.push(order);
        self.lab_results.push(result.clone());
        Ok(result)
    }

    /// Empty notes are ignored; returns whether the note was saved
    pub fn add_note(&mut self, note: &str) -> bool {
        let note = note.trim();
        if note.is_empty() {
            return false;
        }
        self.notebook.push(NotebookEntry {
            day: self.current_day,
            timestamp: Utc::now(),
            note: note.to_string(),
        });
        true
    }

    pub fn set_final_diagnosis(&mut self, diagnosis: &str) {
        self.decisions.final_diagnosis = diagnosis.trim().to_string();
    }

    pub fn add_recommendation(&mut self, recommendation: &str) {
        let rec = recommendation.trim();
        if !rec.is_empty() {
            self.decisions.recommendations.push(rec.to_string());
        }
    }

    pub fn evaluate_outcome(&self) -> InterventionOutcome {
        evaluate_interventions(&self.decisions, self.interviewed())
    }

    /// Move to the next day if today's checklist is complete
    ///
    /// On refusal the day is unchanged and the missing items are kept for
    /// display.
    pub fn advance_day(&mut self) -> Result<u32> {
        let (ok, missing) = check_day_prerequisites(self.current_day, &self.progress());
        if !ok {
            self.advance_missing_tasks = missing.clone();
            return Err(SimError::PrerequisitesUnmet(missing));
        }
        self.current_day += 1;
        self.advance_missing_tasks.clear();
        tracing::info!("Advanced to day {}", self.current_day);
        Ok(self.current_day)
    }
}
