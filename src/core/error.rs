use thiserror::Error;

use crate::core::types::VillageId;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Village list is empty")]
    NoVillages,

    #[error("Village {0} has no households (population size must be at least 1)")]
    EmptyVillage(VillageId),

    #[error("Unknown village: {0}")]
    UnknownVillage(String),

    #[error("Unknown contact: {0}")]
    UnknownNpc(String),

    #[error("{0} is not available for interview yet")]
    NpcLocked(String),

    #[error("No interview in progress")]
    NoActiveInterview,

    #[error("Insufficient budget: need ${needed}, have ${available}")]
    InsufficientBudget { needed: u32, available: u32 },

    #[error("Insufficient lab credits: need {needed}, have {available}")]
    InsufficientLabCredits { needed: u32, available: u32 },

    #[error("Invalid lab order: {0}")]
    InvalidLabOrder(String),

    #[error("Cannot advance yet: {}", .0.join("; "))]
    PrerequisitesUnmet(Vec<String>),

    #[error("Invalid study request: {0}")]
    InvalidStudy(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Unsupported save version {found} (expected {expected})")]
    SaveVersion { found: u32, expected: u32 },

    #[error("LLM error: {0}")]
    LlmError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    TomlError(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, SimError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prerequisites_message_lists_items() {
        let err = SimError::PrerequisitesUnmet(vec![
            "Write a working case definition".into(),
            "Complete at least 2 interviews".into(),
        ]);
        let msg = err.to_string();
        assert!(msg.contains("case definition"));
        assert!(msg.contains("2 interviews"));
    }

    #[test]
    fn test_budget_message() {
        let err = SimError::InsufficientBudget { needed: 150, available: 100 };
        assert_eq!(err.to_string(), "Insufficient budget: need $150, have $100");
    }
}
