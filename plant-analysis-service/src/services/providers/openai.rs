//! OpenAI chat-completion client for narrative elaboration.

use super::{NarrativeProvider, ProviderError};
use crate::config::OpenAiConfig;
use crate::models::{HealthResult, IdentificationResult};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

const CHAT_COMPLETIONS_PATH: &str = "/v1/chat/completions";

const SYSTEM_PROMPT: &str = "You are a helpful plant analysis assistant.";

pub struct OpenAiNarrativeProvider {
    config: OpenAiConfig,
    client: Client,
}

impl OpenAiNarrativeProvider {
    pub fn new(config: OpenAiConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }
}

/// Fixed prompt template interpolating the four extracted fields.
pub fn build_prompt(identification: &IdentificationResult, health: &HealthResult) -> String {
    format!(
        "\nYou are a botanist and plant expert.\n\
         Analyze the given plant information and return a structured report in JSON format with these exact fields:\n\
         plant_name, botanical_name, uses, health_status, disease_name, solution.\n\n\
         Information:\n\
         Plant Name: {}\n\
         Botanical Name: {}\n\
         Health Status: {}\n\
         Disease Name: {}\n\n\
         Write one detailed paragraph for each field's content.\n",
        identification.common_name,
        identification.scientific_name,
        health.status,
        health.disease_name,
    )
}

#[async_trait]
impl NarrativeProvider for OpenAiNarrativeProvider {
    async fn elaborate(
        &self,
        identification: &IdentificationResult,
        health: &HealthResult,
    ) -> Result<Option<String>, ProviderError> {
        let request = ChatCompletionRequest {
            model: self.config.model.clone(),
            response_format: ResponseFormat {
                format_type: "json_object".to_string(),
            },
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: build_prompt(identification, health),
                },
            ],
            max_tokens: self.config.max_tokens,
        };

        let url = format!("{}{}", self.config.base_url, CHAT_COMPLETIONS_PATH);

        tracing::debug!(model = %self.config.model, "Sending chat completion request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        if body.is_empty() {
            return Err(ProviderError::EmptyResponse);
        }

        // A body that fails to decode, or decodes without content, is not
        // terminal: the merger synthesizes a fallback report instead.
        let content = serde_json::from_str::<ChatCompletionResponse>(&body)
            .ok()
            .and_then(|r| r.choices.into_iter().next())
            .and_then(|c| c.message.content);

        Ok(content)
    }
}

// ============================================================================
// OpenAI API Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    response_format: ResponseFormat,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: String,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}
