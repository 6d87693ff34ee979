//! Build the NPC system prompt
//!
//! Everything the model may say about the outbreak is assembled here from
//! the NPC profile, its current mood and the role-scoped view of the truth
//! world. Newly gated clues are appended last so the model works them in.

use crate::disclosure::roles::role_view;
use crate::npc::emotion::NpcMood;
use crate::npc::roster::NpcProfile;
use crate::npc::scope::QuestionScope;
use crate::truth::world::TruthWorld;

/// Prompt inputs for one interview turn
pub struct InterviewContext {
    pub name: String,
    pub role: String,
    pub personality: String,
    /// Mood description from the emotional model
    pub emotional_state: String,
    /// User questions asked before this one
    pub questions_so_far: usize,
    /// Role-scoped outbreak knowledge
    pub data_context: String,
    pub scope: QuestionScope,
    pub always_reveal: Vec<String>,
    /// `(keyword, clue)` pairs
    pub conditional_clues: Vec<(String, String)>,
    pub red_herrings: Vec<String>,
    pub unknowns: Vec<String>,
    /// Clues cleared for this answer
    pub new_clues: Vec<String>,
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn bullets(items: &[String]) -> String {
    if items.is_empty() {
        return "- (none)".into();
    }
    items.iter().map(|i| format!("- {}", i)).collect::<Vec<_>>().join("\n")
}

impl InterviewContext {
    pub fn new(
        profile: &NpcProfile,
        mood: &NpcMood,
        world: &TruthWorld,
        questions_so_far: usize,
        scope: QuestionScope,
        new_clues: Vec<String>,
    ) -> Self {
        Self {
            name: profile.name.into(),
            role: profile.role.into(),
            personality: profile.personality.into(),
            emotional_state: mood.describe(),
            questions_so_far,
            data_context: role_view(profile.data_access, world),
            scope,
            always_reveal: owned(profile.always_reveal),
            conditional_clues: profile
                .conditional_clues
                .iter()
                .map(|c| (c.keyword.to_string(), c.clue.to_string()))
                .collect(),
            red_herrings: owned(profile.red_herrings),
            unknowns: owned(profile.unknowns),
            new_clues,
        }
    }

    fn scope_hint(&self) -> &'static str {
        match self.scope {
            QuestionScope::Greeting => {
                "This message is a greeting. Greet them back and ask how you can help. Do NOT share outbreak facts yet."
            }
            QuestionScope::Narrow => "This is a narrow, specific question. Answer in 1-3 sentences.",
            QuestionScope::Broad => {
                "This is a broad request for an overview. You may answer in more detail (up to about 5-7 sentences)."
            }
        }
    }

    /// The full system prompt for the completion call
    pub fn system_prompt(&self) -> String {
        let clues: Vec<String> = self
            .conditional_clues
            .iter()
            .map(|(k, c)| format!("[{}] {}", k, c))
            .collect();

        let mut s = format!(
            "You are {name}, the {role} in Sidero Valley.\n\n\
             Personality:\n{personality}\n\n\
             Your current emotional state toward the investigation team:\n{emotion}\n\n\
             The investigator has asked about {questions} meaningful questions so far in this conversation.\n\n\
             Outbreak context (for your awareness; DO NOT recite this unless directly asked about those details):\n{context}\n\n",
            name = self.name,
            role = self.role,
            personality = self.personality,
            emotion = self.emotional_state,
            questions = self.questions_so_far,
            context = self.data_context,
        );

        s.push_str(DISCLOSURE_RULES);
        s.push_str(&format!("\n\nQUESTION SCOPE:\n{}\n", self.scope_hint()));
        s.push_str(&format!(
            "\nALWAYS REVEAL (gradually, not all at once):\n{}\n",
            bullets(&self.always_reveal)
        ));
        s.push_str(&format!(
            "\nCONDITIONAL CLUES:\n\
             - Reveal a conditional clue ONLY when the user's question clearly relates to that topic.\n\
             - Work clues into natural speech; do NOT list them as bullet points.\n{}\n",
            bullets(&clues)
        ));
        s.push_str(&format!(
            "\nRED HERRINGS (mention occasionally, never contradicting the core truth):\n{}\n",
            bullets(&self.red_herrings)
        ));
        s.push_str(&format!(
            "\nUNKNOWN (if asked about these, say you do not know):\n{}\n",
            bullets(&self.unknowns)
        ));
        s.push_str(
            "\nINFORMATION RULES:\n\
             - Never invent new outbreak details (case counts, test results, locations) beyond what is implied in the context.\n\
             - If you are unsure, say you are not certain.\n",
        );

        if !self.new_clues.is_empty() {
            s.push_str(
                "\nThe user has just asked about topics that connect to some NEW ideas you can reveal. \
                 Work the following ideas naturally into your answer if they fit the question:\n",
            );
            s.push_str(&bullets(&self.new_clues));
            s.push('\n');
        }

        s
    }
}

const DISCLOSURE_RULES: &str = "EARLY CONVERSATION RULE:
- If the investigator has asked fewer than 2 meaningful questions so far, do NOT share multiple outbreak facts at once.
- Keep early answers short and focused until they show clear, professional inquiry.

INFORMATION DISCLOSURE RULES BASED ON EMOTION:
- COOPERATIVE: you may volunteer small helpful context when appropriate.
- NEUTRAL: answer normally but do NOT volunteer extra details.
- WARY: be cautious; give minimal direct answers and avoid side details.
- ANNOYED: give short answers and avoid volunteering information unless explicitly asked.
- OFFENDED: respond very briefly and share only essential facts needed for public health.

CONVERSATION BEHAVIOR:
- Speak like a real person from this district: natural, informal, sometimes imperfect.
- You remember what has already been discussed with this investigator and may refer back to it.
- Polite, respectful questions make you warmer; rude or demanding ones make you guarded.
- Never dump all your knowledge at once unless clearly asked for everything you know.";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::SimulationConfig;
    use crate::npc::roster::find_npc;
    use crate::truth::generation::generate_world;

    fn context(new_clues: Vec<String>) -> InterviewContext {
        let world = generate_world(&SimulationConfig::default()).unwrap();
        let profile = find_npc("nurse_joy").unwrap();
        InterviewContext::new(profile, &NpcMood::default(), &world, 1, QuestionScope::Narrow, new_clues)
    }

    #[test]
    fn test_prompt_contains_persona_and_context() {
        let prompt = context(vec![]).system_prompt();
        assert!(prompt.starts_with("You are Nurse Joy, the Triage Nurse"));
        assert!(prompt.contains("As triage nurse"));
        assert!(prompt.contains("You feel neutral"));
        assert!(prompt.contains("1 meaningful questions"));
        assert!(!prompt.contains("NEW ideas"));
    }

    #[test]
    fn test_new_clues_appended() {
        let prompt = context(vec!["Most patients were under fifteen.".into()]).system_prompt();
        assert!(prompt.contains("NEW ideas"));
        assert!(prompt.trim_end().ends_with("- Most patients were under fifteen."));
    }
}
