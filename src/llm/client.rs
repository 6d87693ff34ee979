//! Async LLM client for NPC dialogue
//!
//! A model-agnostic HTTP client for chat completions. Supports both
//! Anthropic and OpenAI-compatible APIs. The model only ever produces the
//! NPC's words; everything it is allowed to know is decided beforehand by
//! the disclosure layer and handed over in the system prompt.

use crate::core::error::{Result, SimError};
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// API format type
#[derive(Debug, Clone, PartialEq)]
pub enum ApiFormat {
    Anthropic,
    OpenAI,
}

/// Speaker of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One turn of interview history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into() }
    }
}

/// Async LLM client for making API calls
pub struct LlmClient {
    client: Client,
    api_key: String,
    api_url: String,
    model: String,
    api_format: ApiFormat,
}

impl LlmClient {
    /// Create a new LLM client with explicit configuration
    pub fn new(api_key: String, api_url: String, model: String) -> Self {
        let api_format = Self::detect_api_format(&api_url);
        Self {
            client: Client::new(),
            api_key,
            api_url,
            model,
            api_format,
        }
    }

    /// Detect API format from URL
    fn detect_api_format(url: &str) -> ApiFormat {
        if url.contains("anthropic.com") {
            ApiFormat::Anthropic
        } else {
            ApiFormat::OpenAI
        }
    }

    /// Create a client from environment variables
    ///
    /// Required: LLM_API_KEY
    /// Optional: LLM_API_URL (defaults to Anthropic API)
    /// Optional: LLM_MODEL (defaults to claude-3-haiku-20240307)
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("LLM_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| SimError::LlmError("LLM_API_KEY not set".into()))?;
        let api_url = std::env::var("LLM_API_URL")
            .unwrap_or_else(|_| "https://api.anthropic.com/v1/messages".into());
        let model = std::env::var("LLM_MODEL").unwrap_or_else(|_| "claude-3-haiku-20240307".into());

        Ok(Self::new(api_key, api_url, model))
    }

    /// Send a chat completion request
    ///
    /// # Arguments
    /// * `system` - System prompt (persona, emotional state, disclosure rules)
    /// * `messages` - Conversation so far, ending with the newest user turn
    /// * `max_tokens` - Reply length cap
    pub async fn complete(&self, system: &str, messages: &[ChatMessage], max_tokens: u32) -> Result<String> {
        match self.api_format {
            ApiFormat::Anthropic => self.complete_anthropic(system, messages, max_tokens).await,
            ApiFormat::OpenAI => self.complete_openai(system, messages, max_tokens).await,
        }
    }

    async fn complete_anthropic(&self, system: &str, messages: &[ChatMessage], max_tokens: u32) -> Result<String> {
        let request = AnthropicRequest {
            model: self.model.clone(),
            max_tokens,
            system: system.into(),
            messages: messages.iter().map(Message::from).collect(),
        };

        let response = self
            .client
            .post(&self.api_url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| SimError::LlmError(e.to_string()))?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(SimError::LlmError(format!("API error: {}", error_text)));
        }

        let completion: AnthropicResponse = response
            .json()
            .await
            .map_err(|e| SimError::LlmError(e.to_string()))?;

        completion
            .content
            .first()
            .map(|c| c.text.clone())
            .ok_or_else(|| SimError::LlmError("Empty response".into()))
    }

    async fn complete_openai(&self, system: &str, messages: &[ChatMessage], max_tokens: u32) -> Result<String> {
        let mut all = Vec::with_capacity(messages.len() + 1);
        all.push(Message {
            role: "system".into(),
            content: system.into(),
        });
        all.extend(messages.iter().map(Message::from));

        let request = OpenAIRequest {
            model: self.model.clone(),
            max_tokens,
            messages: all,
        };

        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| SimError::LlmError(e.to_string()))?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(SimError::LlmError(format!("API error: {}", error_text)));
        }

        let completion: OpenAIResponse = response
            .json()
            .await
            .map_err(|e| SimError::LlmError(e.to_string()))?;

        completion
            .choices
            .first()
            .map(|c| c.message.content.clone())
            .ok_or_else(|| SimError::LlmError("Empty response".into()))
    }
}

// Anthropic API format
#[derive(Serialize)]
struct AnthropicRequest {
    model: String,
    max_tokens: u32,
    system: String,
    messages: Vec<Message>,
}

#[derive(Deserialize)]
struct AnthropicResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    text: String,
}

// OpenAI-compatible API format
#[derive(Serialize)]
struct OpenAIRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<Message>,
}

#[derive(Deserialize)]
struct OpenAIResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: String,
}

// Shared wire message
#[derive(Serialize)]
struct Message {
    role: String,
    content: String,
}

impl From<&ChatMessage> for Message {
    fn from(m: &ChatMessage) -> Self {
        let role = match m.role {
            Role::User => "user",
            Role::Assistant => "assistant",
        };
        Self {
            role: role.into(),
            content: m.content.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = LlmClient::new(
            "test-key".into(),
            "https://api.example.com".into(),
            "test-model".into(),
        );
        assert_eq!(client.api_key, "test-key");
        assert_eq!(client.api_url, "https://api.example.com");
        assert_eq!(client.model, "test-model");
        assert_eq!(client.api_format, ApiFormat::OpenAI);
    }

    #[test]
    fn test_detect_anthropic() {
        assert_eq!(
            LlmClient::detect_api_format("https://api.anthropic.com/v1/messages"),
            ApiFormat::Anthropic
        );
    }

    #[test]
    fn test_from_env_missing_key() {
        let result = LlmClient::from_env();
        if std::env::var("LLM_API_KEY").map_or(true, |k| k.trim().is_empty()) {
            assert!(result.is_err());
        }
    }

    #[test]
    fn test_chat_message_serialization() {
        let json = serde_json::to_string(&ChatMessage::assistant("Hello")).unwrap();
        assert_eq!(json, r#"{"role":"assistant","content":"Hello"}"#);
        let wire = Message::from(&ChatMessage::user("Hi"));
        assert_eq!(wire.role, "user");
    }
}
