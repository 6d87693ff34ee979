//! Question scope classification

use serde::{Deserialize, Serialize};

/// How much an NPC should say in reply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionScope {
    /// Small talk; no outbreak facts
    Greeting,
    /// Explicit request for an overview
    Broad,
    /// A direct, specific question
    Narrow,
}

const GREETINGS: &[&str] = &["hi", "hello", "good morning", "good afternoon", "good evening"];

const BROAD_PHRASES: &[&str] = &[
    "tell me everything",
    "tell me what you know",
    "explain the whole situation",
    "give me an overview",
    "summarize everything",
    "what do you know about this outbreak",
];

const VAGUE_PHRASES: &[&str] = &[
    "how are things",
    "how is everything",
    "what's going on",
    "what is going on",
    "what is happening",
    "how have you been",
    "how's your day",
];

/// Broad only for an exact overview request; vague small talk counts as a greeting
pub fn classify_question_scope(input: &str) -> QuestionScope {
    let text = input.trim().to_lowercase();
    let bare = text.trim_end_matches(['?', '!', '.']);

    if GREETINGS.contains(&bare) || text.starts_with("hi ") || text.starts_with("hello ") {
        return QuestionScope::Greeting;
    }
    if BROAD_PHRASES.contains(&bare) {
        return QuestionScope::Broad;
    }
    if VAGUE_PHRASES.iter().any(|p| text.contains(p)) {
        return QuestionScope::Greeting;
    }
    QuestionScope::Narrow
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_greetings() {
        assert_eq!(classify_question_scope("Hello"), QuestionScope::Greeting);
        assert_eq!(classify_question_scope("hi there"), QuestionScope::Greeting);
        assert_eq!(classify_question_scope("How are things today?"), QuestionScope::Greeting);
    }

    #[test]
    fn test_broad_requires_exact_phrase() {
        assert_eq!(classify_question_scope("Tell me everything"), QuestionScope::Broad);
        assert_eq!(classify_question_scope("tell me everything?"), QuestionScope::Broad);
        assert_eq!(
            classify_question_scope("tell me everything about the pigs"),
            QuestionScope::Narrow
        );
    }

    #[test]
    fn test_specific_question_is_narrow() {
        assert_eq!(
            classify_question_scope("When did the first child get sick?"),
            QuestionScope::Narrow
        );
    }
}
