//! Unlock triggers: keyword sets that open up new contacts

/// One row of the trigger table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnlockTrigger {
    /// Topic recorded in the session's "asked about" set
    pub topic: &'static str,
    pub keywords: &'static [&'static str],
    /// NPC key added to the available contacts
    pub unlocks: &'static str,
    /// Whether firing marks the investigation as One Health
    pub one_health: bool,
    pub notification: &'static str,
}

pub const UNLOCK_TRIGGERS: [UnlockTrigger; 3] = [
    UnlockTrigger {
        topic: "animals",
        keywords: &["animal", "pig", "livestock", "pigs", "swine", "cattle", "farm animal", "piglet"],
        unlocks: "vet_amina",
        one_health: true,
        notification: "New contact unlocked: Vet Amina (District Veterinary Officer). \
                       Your question about animals opened a One Health perspective.",
    },
    UnlockTrigger {
        topic: "environment",
        keywords: &[
            "mosquito",
            "mosquitoes",
            "vector",
            "breeding",
            "standing water",
            "environment",
            "rice paddy",
            "irrigation",
            "wetland",
        ],
        unlocks: "mr_osei",
        one_health: true,
        notification: "New contact unlocked: Mr. Osei (Environmental Health Officer). \
                       Your question about environmental factors opened a new perspective.",
    },
    UnlockTrigger {
        topic: "traditional",
        keywords: &["traditional", "healer", "clinic", "private", "early case", "first case", "before hospital"],
        unlocks: "healer_marcus",
        one_health: false,
        notification: "New contact unlocked: Healer Marcus (Private Clinic). \
                       You discovered there may be unreported cases.",
    },
];

impl UnlockTrigger {
    pub fn matches(&self, input: &str) -> bool {
        let text = input.to_lowercase();
        self.keywords.iter().any(|k| text.contains(k))
    }
}

/// Triggers whose keywords occur in the input, in table order
pub fn matching_triggers(input: &str) -> Vec<&'static UnlockTrigger> {
    UNLOCK_TRIGGERS.iter().filter(|t| t.matches(input)).collect()
}
