//! Sidero Valley - Entry Point
//!
//! Console driver: loads configuration, builds the shared truth world and
//! runs a line-oriented command loop over one player session. The tokio
//! runtime drives the language-model calls.

use clap::Parser;
use sidero_valley::core::config::{config, set_config, SimulationConfig};
use sidero_valley::core::error::{Result, SimError};
use sidero_valley::core::types::{LabTest, SampleType};
use sidero_valley::disclosure::lab::LabOrder;
use sidero_valley::disclosure::line_list::{epi_curve, spot_map};
use sidero_valley::llm::client::LlmClient;
use sidero_valley::llm::parser::match_questionnaire_columns;
use sidero_valley::npc::interview::conduct_interview;
use sidero_valley::npc::roster::roster;
use sidero_valley::session::persistence::{load_from_path, save_to_path};
use sidero_valley::session::progression::{day_briefing, day_tasks};
use sidero_valley::session::state::{CaseDefinition, SessionState};
use sidero_valley::study::analysis::summarize;
use sidero_valley::study::dataset::{SampleSize, StudyDesign};
use sidero_valley::study::questionnaire::StudyColumn;
use sidero_valley::truth::world::{shared_world, TruthWorld};

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tokio::runtime::Runtime;

#[derive(Parser, Debug)]
#[command(name = "sidero_valley")]
#[command(about = "Investigate an encephalitis outbreak in Sidero Valley")]
struct Args {
    /// Override the world seed
    #[arg(long)]
    seed: Option<u64>,

    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("sidero_valley=info")),
        )
        .init();

    let args = Args::parse();
    let mut cfg = match &args.config {
        Some(path) => SimulationConfig::load(path)?,
        None => SimulationConfig::default(),
    };
    if let Some(seed) = args.seed {
        cfg.seed = seed;
    }
    cfg.validate()?;
    if set_config(cfg).is_err() {
        tracing::warn!("Configuration was already set; keeping the existing one");
    }

    let rt = Runtime::new()?;
    let world = shared_world()?;
    let mut state = SessionState::new(config());

    let llm_client = LlmClient::from_env().ok();
    if llm_client.is_none() {
        tracing::warn!("LLM_API_KEY not set - villagers cannot answer questions");
    }

    println!("\n=== FETP SIM: SIDERO VALLEY ===");
    println!("An outbreak investigation in a rice-farming district");
    println!("Type 'begin' to read the alert, 'help' for commands.");
    println!();

    let mut pending_questions: Vec<String> = Vec::new();

    loop {
        match state.current_npc() {
            Some(npc) => print!("[Day {} | {}] > ", state.current_day(), npc),
            None => print!("[Day {}] > ", state.current_day()),
        }
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        let (command, rest) = match input.split_once(' ') {
            Some((c, r)) => (c, r.trim()),
            None => (input, ""),
        };

        let outcome = match command {
            "quit" | "q" => break,
            "help" | "h" => {
                print_help();
                Ok(())
            }
            "begin" => {
                state.acknowledge_alert();
                println!("ALERT: The district hospital reports a cluster of children with acute");
                println!("encephalitis syndrome. You lead the field team.");
                println!("{}", day_briefing(state.current_day()));
                Ok(())
            }
            "status" | "s" => {
                print_status(&state);
                Ok(())
            }
            "linelist" => {
                let n = rest.parse().unwrap_or(10);
                for e in state.review_line_list(world, n) {
                    println!(
                        "  {} {:>3} {} {:<16} onset {} {} {}",
                        e.person_id,
                        e.age,
                        e.sex,
                        e.village_name,
                        e.onset_date,
                        if e.severe_neuro { "severe" } else { "mild" },
                        e.outcome
                    );
                }
                Ok(())
            }
            "curve" => {
                for (date, n) in epi_curve(world) {
                    println!("  {} {:>3} {}", date, n, "#".repeat(n));
                }
                Ok(())
            }
            "spotmap" => {
                for v in spot_map(world) {
                    println!("  {:<16} severe {:>3}  mild {:>3}", v.village_name, v.severe, v.mild);
                }
                Ok(())
            }
            "npcs" => {
                for npc in roster() {
                    let status = if state.is_unlocked(npc.key) { "available" } else { "locked" };
                    println!("  {:<14} {:<20} ${:<4} {}", npc.key, npc.name, npc.cost, status);
                }
                Ok(())
            }
            "talk" => state.start_interview(rest).map(|cost| {
                if cost > 0 {
                    println!("Interview started (${} spent, ${} left).", cost, state.budget());
                } else {
                    println!("Resuming interview.");
                }
            }),
            "end" => {
                state.end_interview();
                Ok(())
            }
            "casedef" => record_case_definition(&mut state, rest),
            "hypotheses" => {
                let n = state.record_hypotheses(rest.split('|').map(String::from).collect());
                println!("{} hypotheses recorded.", n);
                Ok(())
            }
            "design" => choose_design(&mut state, rest),
            "question" => {
                pending_questions.push(rest.to_string());
                println!("{} questions drafted.", pending_questions.len());
                Ok(())
            }
            "submitq" => {
                let items = std::mem::take(&mut pending_questions);
                let matched = match &llm_client {
                    Some(client) => rt.block_on(match_questionnaire_columns(client, &items, &config().llm)),
                    None => Vec::new(),
                };
                let columns = state.submit_questionnaire_mapped(items, matched);
                let keys: Vec<&str> = columns.iter().map(StudyColumn::key).collect();
                println!("Questionnaire covers: {}", keys.join(", "));
                Ok(())
            }
            "dataset" => state.generate_dataset(world, config()).map(|table| {
                let summary = summarize(table);
                println!(
                    "{} rows ({} cases, {} non-cases), {} blank cells",
                    summary.rows, summary.cases, summary.non_cases, summary.missing_cells
                );
                println!("{}", table.preview(5));
            }),
            "analyze" => match StudyColumn::parse(rest) {
                Some(column) => state.run_descriptive_analysis(column).map(|t| println!("{}", t.render())),
                None => Err(SimError::InvalidStudy(format!("unknown column '{}'", rest))),
            },
            "lab" => order_lab(&mut state, world, rest),
            "results" => {
                for r in state.lab_results() {
                    println!(
                        "  {} {} {} {} -> {} ({} days)",
                        r.sample_id.0, r.test, r.sample_type, r.village_id, r.result, r.turnaround_days
                    );
                }
                Ok(())
            }
            "note" => {
                if state.add_note(rest) {
                    println!("Noted.");
                }
                Ok(())
            }
            "notes" => {
                for entry in state.notebook() {
                    println!("  Day {} [{}] {}", entry.day, entry.timestamp.format("%H:%M"), entry.note);
                }
                Ok(())
            }
            "onehealth" => {
                let p = state.one_health_progress();
                println!("  Veterinary perspective: {}", p.veterinary_perspective);
                println!("  Environmental perspective: {}", p.environmental_perspective);
                println!("  Animal samples: {}", p.animal_samples);
                println!("  Vector samples: {}", p.vector_samples);
                Ok(())
            }
            "advance" => state.advance_day().map(|day| {
                println!("=== Day {} ===", day);
                println!("{}", day_briefing(day));
            }),
            "diagnose" => {
                state.set_final_diagnosis(rest);
                Ok(())
            }
            "recommend" => {
                state.add_recommendation(rest);
                Ok(())
            }
            "evaluate" => {
                let outcome = state.evaluate_outcome();
                println!("{} (score {})", outcome.status, outcome.score);
                println!("{}", outcome.narrative);
                for line in &outcome.outcomes {
                    println!("  {}", line);
                }
                Ok(())
            }
            "save" => save_to_path(&state, Path::new(rest)),
            "load" => load_from_path(Path::new(rest), config()).map(|loaded| {
                state = loaded;
                println!("Session restored (day {}).", state.current_day());
            }),
            _ => match state.current_npc().map(String::from) {
                Some(npc) => rt
                    .block_on(conduct_interview(
                        llm_client.as_ref(),
                        &mut state,
                        world,
                        &npc,
                        input,
                        &config().llm,
                    ))
                    .map(|reply| {
                        for note in &reply.notifications {
                            println!("** {}", note);
                        }
                        println!("{}", reply.reply);
                    }),
                None => {
                    println!("Unknown command. Type 'help' for a list, or 'talk <npc>' to start an interview.");
                    Ok(())
                }
            },
        };

        if let Err(e) = outcome {
            println!("{}", e);
        }
    }

    println!("\nGoodbye! Investigation ended on day {}.", state.current_day());
    Ok(())
}

fn print_help() {
    println!("Commands:");
    println!("  begin                      - Read the outbreak alert");
    println!("  status / s                 - Day, resources and today's checklist");
    println!("  linelist [n] / curve / spotmap");
    println!("  npcs                       - List contacts");
    println!("  talk <npc> / end           - Start or end an interview; other text is asked");
    println!("  casedef c | person | place | time");
    println!("  hypotheses h1 | h2 | ...");
    println!("  design <case-control|cohort> [cases] [controls per case]");
    println!("  question <text> / submitq  - Draft and submit the questionnaire");
    println!("  dataset / analyze <column>");
    println!("  lab <sample_type> <village> <test> [description]");
    println!("  results / onehealth");
    println!("  note <text> / notes");
    println!("  advance                    - Move to the next day");
    println!("  diagnose <text> / recommend <text> / evaluate");
    println!("  save <path> / load <path>");
    println!("  quit / q");
}

fn print_status(state: &SessionState) {
    println!();
    println!(
        "--- Day {} of {} | Budget ${} | Lab credits {} ---",
        state.current_day(),
        state.final_day(),
        state.budget(),
        state.lab_credits()
    );
    for task in day_tasks(state.current_day(), &state.progress()) {
        let mark = if task.done { "x" } else { " " };
        let optional = if task.required { "" } else { " (optional)" };
        println!("  [{}] {}{}", mark, task.label, optional);
    }
    if !state.advance_missing_tasks().is_empty() {
        println!("  Still missing: {}", state.advance_missing_tasks().join(", "));
    }
    println!();
}

fn record_case_definition(state: &mut SessionState, rest: &str) -> Result<()> {
    let parts: Vec<&str> = rest.split('|').map(str::trim).collect();
    if parts.len() != 4 || parts.iter().any(|p| p.is_empty()) {
        println!("Usage: casedef clinical | person | place | time");
        return Ok(());
    }
    state.record_case_definition(CaseDefinition {
        clinical: parts[0].to_string(),
        person: parts[1].to_string(),
        place: parts[2].to_string(),
        time: parts[3].to_string(),
    });
    println!("Case definition recorded.");
    Ok(())
}

fn choose_design(state: &mut SessionState, rest: &str) -> Result<()> {
    let mut words = rest.split_whitespace();
    let design = words
        .next()
        .and_then(StudyDesign::parse)
        .ok_or_else(|| SimError::InvalidStudy("design must be case-control or cohort".into()))?;
    state.choose_study_design(design);

    let current = state.decisions().sample_size;
    let cases = words.next().and_then(|w| w.parse().ok()).unwrap_or(current.cases);
    let controls_per_case = words
        .next()
        .and_then(|w| w.parse().ok())
        .unwrap_or(current.controls_per_case);
    state.set_sample_size(SampleSize { cases, controls_per_case });
    println!("Study design: {} ({} cases, {} controls per case)", design, cases, controls_per_case);
    Ok(())
}

fn order_lab(state: &mut SessionState, world: &TruthWorld, rest: &str) -> Result<()> {
    let mut words = rest.split_whitespace();
    let usage = || SimError::InvalidLabOrder("usage: lab <sample_type> <village> <test> [description]".into());
    let sample_type = words.next().and_then(SampleType::parse).ok_or_else(usage)?;
    let village_key = words.next().ok_or_else(usage)?;
    let village_id = world
        .resolve_village(village_key)
        .map(|v| v.id)
        .ok_or_else(|| SimError::UnknownVillage(village_key.to_string()))?;
    let test = words.next().and_then(LabTest::parse).ok_or_else(usage)?;
    let source_description = words.collect::<Vec<_>>().join(" ");

    let result = state.submit_lab_order(
        LabOrder { sample_type, village_id, test, source_description },
        world,
        config(),
    )?;
    println!(
        "Submitted {} ({} credits, result in {} days). {} credits left.",
        result.sample_id.0,
        result.cost,
        result.turnaround_days,
        state.lab_credits()
    );
    Ok(())
}
