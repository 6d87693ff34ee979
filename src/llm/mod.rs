//! Language-model boundary: HTTP client, prompt assembly, structured output

pub mod client;
pub mod context;
pub mod parser;

pub use client::{ChatMessage, LlmClient, Role};
pub use context::InterviewContext;
pub use parser::{match_questionnaire_columns, parse_column_matches};
