//! Village contacts: roster, mood, question scope and the interview turn

pub mod emotion;
pub mod interview;
pub mod roster;
pub mod scope;

pub use emotion::{analyze_tone, Emotion, NpcMood, Tone};
pub use interview::{conduct_interview, prepare_turn, InterviewReply, InterviewTurn, MISSING_KEY_WARNING};
pub use roster::{find_npc, roster, starting_contacts, NpcProfile, ROSTER};
pub use scope::{classify_question_scope, QuestionScope};
