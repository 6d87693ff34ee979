//! One interview turn
//!
//! Unlock triggers run first, then the NPC's mood reacts to the tone of the
//! question, then clue gating decides what may be surfaced. The clues are
//! recorded only once a reply has actually been produced.

use crate::core::config::LlmSettings;
use crate::core::error::{Result, SimError};
use crate::llm::client::{ChatMessage, LlmClient, Role};
use crate::llm::context::InterviewContext;
use crate::npc::emotion::analyze_tone;
use crate::npc::roster::{find_npc, NpcProfile};
use crate::npc::scope::classify_question_scope;
use crate::session::state::SessionState;
use crate::truth::world::TruthWorld;

pub const MISSING_KEY_WARNING: &str =
    "⚠️ Language model API key missing. Set LLM_API_KEY to talk to villagers.";

/// Prompt and history for one completion call
#[derive(Debug, Clone)]
pub struct InterviewTurn {
    pub system_prompt: String,
    pub messages: Vec<ChatMessage>,
    pub new_clues: Vec<String>,
}

/// What the player sees after a turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterviewReply {
    pub reply: String,
    /// Contacts unlocked by this question
    pub notifications: Vec<String>,
    /// Clues surfaced in this reply
    pub new_clues: Vec<String>,
}

/// Update mood and assemble the prompt for `input`
///
/// Clues are selected but not recorded.
pub fn prepare_turn(
    state: &mut SessionState,
    world: &TruthWorld,
    profile: &NpcProfile,
    input: &str,
) -> InterviewTurn {
    let mood = {
        let mood = state.mood_mut(profile.key);
        mood.update(analyze_tone(input));
        mood.clone()
    };

    let scope = classify_question_scope(input);
    let new_clues = state
        .clues()
        .select(profile.key, profile.conditional_clues, input, scope);

    let history = state.history(profile.key);
    let asked = history.iter().filter(|m| m.role == Role::User).count();

    let context = InterviewContext::new(profile, &mood, world, asked, scope, new_clues.clone());
    let mut messages = history.to_vec();
    messages.push(ChatMessage::user(input));

    InterviewTurn {
        system_prompt: context.system_prompt(),
        messages,
        new_clues,
    }
}

/// Ask the active NPC a question
///
/// Only an unknown NPC or an interview that is not active is an error.
/// A missing client or a failed call becomes the reply text.
pub async fn conduct_interview(
    client: Option<&LlmClient>,
    state: &mut SessionState,
    world: &TruthWorld,
    npc_key: &str,
    input: &str,
    settings: &LlmSettings,
) -> Result<InterviewReply> {
    let profile = find_npc(npc_key).ok_or_else(|| SimError::UnknownNpc(npc_key.to_string()))?;
    if state.current_npc() != Some(npc_key) {
        return Err(SimError::NoActiveInterview);
    }

    let notifications = state.apply_unlock_triggers(input);
    let turn = prepare_turn(state, world, profile, input);

    let (reply, surfaced) = match client {
        None => {
            tracing::warn!("No language model credential; {} cannot answer", profile.name);
            (MISSING_KEY_WARNING.to_string(), Vec::new())
        }
        Some(client) => {
            match client
                .complete(&turn.system_prompt, &turn.messages, settings.max_tokens)
                .await
            {
                Ok(text) => (text, turn.new_clues),
                Err(e) => {
                    tracing::warn!("Interview call for {} failed: {}", npc_key, e);
                    (format!("⚠️ {}", e), Vec::new())
                }
            }
        }
    };

    if !surfaced.is_empty() {
        state.clues_mut().record(npc_key, &surfaced);
    }
    if let Some(flag) = profile.unlocks {
        state.set_unlock_flag(flag);
    }
    state.record_exchange(npc_key, input, &reply);
    tracing::debug!("{} answered ({} new clues)", npc_key, surfaced.len());

    Ok(InterviewReply {
        reply,
        notifications,
        new_clues: surfaced,
    })
}
