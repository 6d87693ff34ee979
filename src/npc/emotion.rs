//! NPC tone analysis and emotional state

use serde::{Deserialize, Serialize};
use std::fmt;

/// Tone of a single player message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Polite,
    Rude,
    Neutral,
}

const POLITE_WORDS: &[&str] = &["please", "thank you", "thanks", "appreciate", "grateful"];

const RUDE_WORDS: &[&str] = &[
    "stupid",
    "idiot",
    "useless",
    "incompetent",
    "what's wrong with you",
    "you people",
    "this is your fault",
    "do your job",
    "now!",
    "right now",
];

/// Rude wins over polite; shouting (all caps, more than 5 chars) is rude
pub fn analyze_tone(input: &str) -> Tone {
    let text = input.to_lowercase();

    if RUDE_WORDS.iter().any(|w| text.contains(w)) {
        return Tone::Rude;
    }
    if POLITE_WORDS.iter().any(|w| text.contains(w)) {
        return Tone::Polite;
    }

    let trimmed = input.trim();
    let has_letters = trimmed.chars().any(char::is_alphabetic);
    let shouting = has_letters && !trimmed.chars().any(char::is_lowercase);
    if shouting && trimmed.chars().count() > 5 {
        return Tone::Rude;
    }
    Tone::Neutral
}

/// Emotion ladder, friendliest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Emotion {
    Cooperative,
    Neutral,
    Wary,
    Annoyed,
    Offended,
}

impl Emotion {
    const LADDER: [Emotion; 5] = [
        Emotion::Cooperative,
        Emotion::Neutral,
        Emotion::Wary,
        Emotion::Annoyed,
        Emotion::Offended,
    ];

    /// Move along the ladder, saturating at both ends
    pub fn shift(self, steps: i32) -> Self {
        let idx = Self::LADDER.iter().position(|e| *e == self).unwrap_or(1) as i32;
        let idx = (idx + steps).clamp(0, Self::LADDER.len() as i32 - 1);
        Self::LADDER[idx as usize]
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Emotion::Cooperative => "cooperative",
            Emotion::Neutral => "neutral",
            Emotion::Wary => "wary",
            Emotion::Annoyed => "annoyed",
            Emotion::Offended => "offended",
        })
    }
}

/// How one NPC currently feels about the investigation team
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NpcMood {
    pub emotion: Emotion,
    pub interaction_count: u32,
    pub rude_count: u32,
    pub polite_count: u32,
}

impl Default for NpcMood {
    fn default() -> Self {
        Self {
            emotion: Emotion::Neutral,
            interaction_count: 0,
            rude_count: 0,
            polite_count: 0,
        }
    }
}

/// Neutral messages calm an annoyed NPC only every this many interactions
const RECOVERY_INTERVAL: u32 = 4;

impl NpcMood {
    /// Polite softens one step, rude hardens two
    pub fn update(&mut self, tone: Tone) {
        self.interaction_count += 1;
        match tone {
            Tone::Polite => {
                self.polite_count += 1;
                self.emotion = self.emotion.shift(-1);
            }
            Tone::Rude => {
                self.rude_count += 1;
                self.emotion = self.emotion.shift(2);
            }
            Tone::Neutral => {
                if self.emotion >= Emotion::Annoyed
                    && self.interaction_count % RECOVERY_INTERVAL == 0
                {
                    self.emotion = self.emotion.shift(-1);
                }
            }
        }
    }

    /// Prompt text describing the current feeling toward the team
    pub fn describe(&self) -> String {
        let mut text = match self.emotion {
            Emotion::Cooperative => {
                "You currently feel friendly and cooperative toward the investigation team.".to_string()
            }
            Emotion::Neutral => "You feel neutral toward the investigation team.".to_string(),
            Emotion::Wary => {
                "You feel cautious and slightly guarded. You will answer but watch your words.".to_string()
            }
            Emotion::Annoyed => "You feel irritated and impatient with the team. \
                 You give shorter answers and avoid volunteering extra information unless they ask clearly."
                .to_string(),
            Emotion::Offended => "You feel offended by how the team has treated you. \
                 You answer briefly and share only what seems necessary for public health."
                .to_string(),
        };

        if self.rude_count >= 2 && self.emotion >= Emotion::Annoyed {
            text.push_str(" You remember previous rude or disrespectful questions.");
        }
        if self.polite_count >= 2 && matches!(self.emotion, Emotion::Neutral | Emotion::Wary) {
            text.push_str(" They've also been respectful at times, which softens you a little.");
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tone_detection() {
        assert_eq!(analyze_tone("Could you please help?"), Tone::Polite);
        assert_eq!(analyze_tone("Thanks, but do your job"), Tone::Rude);
        assert_eq!(analyze_tone("WHERE ARE THE RECORDS"), Tone::Rude);
        assert_eq!(analyze_tone("OK"), Tone::Neutral);
        assert_eq!(analyze_tone("When did it start?"), Tone::Neutral);
    }

    #[test]
    fn test_rude_escalates_two_steps() {
        let mut mood = NpcMood::default();
        mood.update(Tone::Rude);
        assert_eq!(mood.emotion, Emotion::Annoyed);
        mood.update(Tone::Rude);
        assert_eq!(mood.emotion, Emotion::Offended);
        assert_eq!(mood.rude_count, 2);
    }

    #[test]
    fn test_polite_softens_and_saturates() {
        let mut mood = NpcMood::default();
        mood.update(Tone::Polite);
        mood.update(Tone::Polite);
        assert_eq!(mood.emotion, Emotion::Cooperative);
    }

    #[test]
    fn test_neutral_recovery_every_fourth_interaction() {
        let mut mood = NpcMood::default();
        mood.update(Tone::Rude); // 1: annoyed
        mood.update(Tone::Neutral); // 2
        mood.update(Tone::Neutral); // 3
        assert_eq!(mood.emotion, Emotion::Annoyed);
        mood.update(Tone::Neutral); // 4: recovers
        assert_eq!(mood.emotion, Emotion::Wary);
    }

    #[test]
    fn test_description_mentions_rudeness_history() {
        let mood = NpcMood {
            emotion: Emotion::Offended,
            interaction_count: 3,
            rude_count: 2,
            polite_count: 0,
        };
        assert!(mood.describe().contains("remember previous rude"));
    }

    #[test]
    fn test_shift_saturates() {
        assert_eq!(Emotion::Offended.shift(2), Emotion::Offended);
        assert_eq!(Emotion::Cooperative.shift(-1), Emotion::Cooperative);
    }
}
