//! Session flow integration tests

use sidero_valley::core::config::{LlmSettings, SimulationConfig};
use sidero_valley::core::error::SimError;
use sidero_valley::disclosure::clues::ClueLedger;
use sidero_valley::npc::interview::conduct_interview;
use sidero_valley::npc::roster::find_npc;
use sidero_valley::npc::scope::QuestionScope;
use sidero_valley::session::persistence::{load_from_path, save_to_path};
use sidero_valley::session::state::{CaseDefinition, SessionState};
use sidero_valley::study::dataset::StudyDesign;
use sidero_valley::truth::generation::generate_world;
use sidero_valley::truth::world::TruthWorld;

fn setup() -> (SimulationConfig, TruthWorld, SessionState) {
    let config = SimulationConfig::default();
    let world = generate_world(&config).unwrap();
    let state = SessionState::new(&config);
    (config, world, state)
}

fn case_definition() -> CaseDefinition {
    CaseDefinition {
        clinical: "Acute fever with altered mental status or seizures".into(),
        person: "Any resident".into(),
        place: "Sidero Valley".into(),
        time: "Onset since 1 July".into(),
    }
}

async fn interview(state: &mut SessionState, world: &TruthWorld, npc: &str, question: &str) {
    state.start_interview(npc).unwrap();
    conduct_interview(None, state, world, npc, question, &LlmSettings::default())
        .await
        .unwrap();
    state.end_interview();
}

#[tokio::test]
async fn test_day_one_gate() {
    let (_, world, mut state) = setup();

    match state.advance_day() {
        Err(SimError::PrerequisitesUnmet(missing)) => assert_eq!(
            missing,
            vec![
                "Review line list and epi curve",
                "Write a working case definition",
                "Complete at least 2 interviews",
            ]
        ),
        other => panic!("expected refusal, got {:?}", other),
    }
    assert_eq!(state.current_day(), 1);
    assert_eq!(state.advance_missing_tasks().len(), 3);

    state.review_line_list(&world, 10);
    state.record_case_definition(case_definition());
    interview(&mut state, &world, "dr_chen", "How many children were admitted?").await;

    match state.advance_day() {
        Err(SimError::PrerequisitesUnmet(missing)) => {
            assert_eq!(missing, vec!["Complete at least 2 interviews"])
        }
        other => panic!("expected refusal, got {:?}", other),
    }

    interview(&mut state, &world, "nurse_joy", "When did the first cases arrive?").await;
    assert_eq!(state.advance_day().unwrap(), 2);
    assert!(state.advance_missing_tasks().is_empty());
}

#[test]
fn test_clue_surfaced_once() {
    let profile = find_npc("dr_chen").unwrap();
    let mut ledger = ClueLedger::new();
    let question = "What did the CSF show?";
    let first = ledger.reveal(profile.key, profile.conditional_clues, question, QuestionScope::Narrow);
    assert_eq!(first.len(), 1);
    let second = ledger.reveal(profile.key, profile.conditional_clues, question, QuestionScope::Narrow);
    assert!(second.is_empty());
    assert_eq!(ledger.revealed(profile.key), first.as_slice());
}

#[test]
fn test_budget_rejection_leaves_state_untouched() {
    let mut config = SimulationConfig::default();
    config.resources.starting_budget = 120;
    let mut state = SessionState::new(&config);

    assert_eq!(state.start_interview("dr_chen").unwrap(), 100);
    state.end_interview();
    let before = state.clone();
    match state.start_interview("nurse_joy") {
        Err(SimError::InsufficientBudget { needed, available }) => {
            assert_eq!(needed, 50);
            assert_eq!(available, 20);
        }
        other => panic!("expected budget refusal, got {:?}", other),
    }
    assert_eq!(state, before);
}

#[test]
fn test_unlocking_contacts_through_questions() {
    let (_, _, mut state) = setup();
    assert!(!state.is_unlocked("mr_osei"));
    let notes = state.apply_unlock_triggers("Where do mosquitoes breed around here?");
    assert_eq!(notes.len(), 1);
    assert!(state.is_unlocked("mr_osei"));
    assert!(state.start_interview("mr_osei").is_ok());
}

#[tokio::test]
async fn test_save_and_load_round_trip() {
    let (config, world, mut state) = setup();
    state.acknowledge_alert();
    state.review_line_list(&world, 5);
    state.record_case_definition(case_definition());
    state.record_hypotheses(vec!["Mosquito-borne".into(), "Pig exposure".into()]);
    state.apply_unlock_triggers("Do you keep pigs near the house?");
    interview(&mut state, &world, "mama_kofi", "Please, do the children play outside in the evening?").await;
    state.choose_study_design(StudyDesign::CaseControl);
    state.submit_questionnaire(vec!["Do you use a bed net?".into(), "Any pigs near home?".into()]);
    state.generate_dataset(&world, &config).unwrap();
    state.add_note("Cases cluster in Nalu");

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    save_to_path(&state, &path).unwrap();
    let loaded = load_from_path(&path, &config).unwrap();

    assert_eq!(loaded, state);
    assert!(loaded.questions_asked_about().contains("animals"));
    assert!(loaded.dataset().is_some());
}
