//! Structured output from the model: questionnaire column matching
//!
//! The model is asked for a JSON list of column keys. Anything it returns
//! that is not such a list degrades to an empty match, and the caller falls
//! back to keyword mapping.

use crate::core::config::LlmSettings;
use crate::core::error::{Result, SimError};
use crate::llm::client::{ChatMessage, LlmClient};
use crate::study::questionnaire::StudyColumn;

/// Extract a JSON array from a response (handles surrounding text)
fn extract_json_array(response: &str) -> Result<&str> {
    let start = response
        .find('[')
        .ok_or_else(|| SimError::LlmError("No JSON list found in response".into()))?;
    let end = response
        .rfind(']')
        .ok_or_else(|| SimError::LlmError("No closing bracket found in response".into()))?;
    if end < start {
        return Err(SimError::LlmError("Malformed JSON list in response".into()));
    }
    Ok(&response[start..=end])
}

/// Known columns named in the response, in order; malformed output yields `[]`
pub fn parse_column_matches(response: &str) -> Vec<StudyColumn> {
    let keys: Vec<String> = match extract_json_array(response)
        .and_then(|json| serde_json::from_str(json).map_err(SimError::from))
    {
        Ok(keys) => keys,
        Err(e) => {
            tracing::warn!("Discarding column match output: {}", e);
            return Vec::new();
        }
    };

    let mut columns = Vec::new();
    for column in keys.iter().filter_map(|k| StudyColumn::parse(k)) {
        if !columns.contains(&column) {
            columns.push(column);
        }
    }
    columns
}

/// Ask the model which dataset columns the questionnaire covers
///
/// Call failures are logged and treated like malformed output.
pub async fn match_questionnaire_columns(
    client: &LlmClient,
    items: &[String],
    settings: &LlmSettings,
) -> Vec<StudyColumn> {
    let available: Vec<&str> = StudyColumn::ALL.iter().map(|c| c.key()).collect();
    let user_prompt = format!(
        "AVAILABLE COLUMNS:\n{}\n\nQUESTIONNAIRE:\n{}\n\nReturn the JSON list:",
        available.join(", "),
        items.iter().map(|i| format!("- {}", i)).collect::<Vec<_>>().join("\n"),
    );

    match client
        .complete(MATCH_SYSTEM_PROMPT, &[ChatMessage::user(user_prompt)], settings.helper_max_tokens)
        .await
    {
        Ok(response) => parse_column_matches(&response),
        Err(e) => {
            tracing::warn!("Column matching call failed: {}", e);
            Vec::new()
        }
    }
}

/// System prompt for column matching
const MATCH_SYSTEM_PROMPT: &str = r#"You map outbreak questionnaire items to dataset columns.
Given a list of available columns and the investigator's questionnaire, return
the columns that the questionnaire would collect.

OUTPUT FORMAT (JSON list only, no explanation):
["column_key", "column_key"]

Examples:
"Does the child sleep under a net?" -> ["uses_net"]
"Age and sex of the child" -> ["age", "sex"]
"Favourite food" -> []
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_json_array_with_surrounding_text() {
        let response = "Here you go:\n[\"age\", \"uses_net\"]\nAnything else?";
        assert_eq!(extract_json_array(response).unwrap(), "[\"age\", \"uses_net\"]");
    }

    #[test]
    fn test_parse_known_columns() {
        let cols = parse_column_matches(r#"["pigs_near_home", "age", "pigs_near_home"]"#);
        assert_eq!(cols, vec![StudyColumn::PigsNearHome, StudyColumn::Age]);
    }

    #[test]
    fn test_unknown_keys_dropped() {
        let cols = parse_column_matches(r#"["shoe_size", "vaccinated"]"#);
        assert_eq!(cols, vec![StudyColumn::Vaccinated]);
    }

    #[test]
    fn test_malformed_output_is_empty() {
        assert!(parse_column_matches("I think age and nets matter").is_empty());
        assert!(parse_column_matches("[age, nets").is_empty());
        assert!(parse_column_matches("] oops [").is_empty());
        assert!(parse_column_matches(r#"[1, 2, 3]"#).is_empty());
    }
}
