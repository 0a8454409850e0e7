//! Plant.id client implementation.
//!
//! One client serves both the `/v2/identify` and `/v2/health_assessment`
//! endpoints; they share the base URL and the `Api-Key` header.

use super::{HealthAssessor, PlantIdentifier, ProviderError};
use crate::config::PlantIdConfig;
use crate::models::{HealthResult, IdentificationResult, UNKNOWN};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

const API_KEY_HEADER: &str = "Api-Key";

/// Suggestion detail sections requested alongside identification.
const PLANT_DETAILS: [&str; 4] = ["common_names", "scientific_name", "url", "wiki_description"];

pub struct PlantIdClient {
    config: PlantIdConfig,
    client: Client,
}

impl PlantIdClient {
    pub fn new(config: PlantIdConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }

    async fn post_json<Req, Resp>(&self, path: &str, body: &Req) -> Result<Resp, ProviderError>
    where
        Req: Serialize,
        Resp: for<'de> Deserialize<'de>,
    {
        let url = format!("{}{}", self.config.base_url, path);

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, &self.config.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api(format!(
                "Plant.id API error {}: {}",
                status, error_text
            )));
        }

        response
            .json()
            .await
            .map_err(|e| ProviderError::Api(format!("Failed to parse response: {}", e)))
    }
}

#[async_trait]
impl PlantIdentifier for PlantIdClient {
    async fn identify(&self, image_b64: &str) -> Result<IdentificationResult, ProviderError> {
        let request = IdentifyRequest {
            images: vec![image_b64.to_string()],
            plant_details: PLANT_DETAILS.iter().map(|s| s.to_string()).collect(),
        };

        tracing::debug!(image_len = image_b64.len(), "Sending identify request");

        let response: IdentifyResponse = self.post_json("/v2/identify", &request).await?;
        Ok(IdentificationResult::from(response))
    }
}

#[async_trait]
impl HealthAssessor for PlantIdClient {
    async fn assess(&self, image_b64: &str) -> Result<HealthResult, ProviderError> {
        let request = HealthRequest {
            images: vec![image_b64.to_string()],
        };

        tracing::debug!(image_len = image_b64.len(), "Sending health assessment request");

        let response: HealthResponse = self.post_json("/v2/health_assessment", &request).await?;
        Ok(HealthResult::from(response))
    }
}

// ============================================================================
// Plant.id API Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
struct IdentifyRequest {
    images: Vec<String>,
    plant_details: Vec<String>,
}

#[derive(Debug, Serialize)]
struct HealthRequest {
    images: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct IdentifyResponse {
    #[serde(default)]
    suggestions: Vec<Suggestion>,
}

#[derive(Debug, Deserialize)]
struct Suggestion {
    #[serde(default)]
    plant_name: Option<String>,
    #[serde(default)]
    plant_details: Option<SuggestionDetails>,
}

#[derive(Debug, Deserialize)]
struct SuggestionDetails {
    #[serde(default)]
    scientific_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct HealthResponse {
    #[serde(default)]
    health_assessment: Option<HealthAssessment>,
}

#[derive(Debug, Deserialize)]
struct HealthAssessment {
    #[serde(default)]
    diseases: Vec<Disease>,
}

#[derive(Debug, Deserialize)]
struct Disease {
    #[serde(default)]
    name: Option<String>,
}

// Optional-to-default coercion happens here, at the parse boundary.
impl From<IdentifyResponse> for IdentificationResult {
    fn from(response: IdentifyResponse) -> Self {
        let best = response.suggestions.into_iter().next();
        match best {
            Some(suggestion) => IdentificationResult {
                common_name: suggestion
                    .plant_name
                    .unwrap_or_else(|| UNKNOWN.to_string()),
                scientific_name: suggestion
                    .plant_details
                    .and_then(|d| d.scientific_name)
                    .unwrap_or_else(|| UNKNOWN.to_string()),
            },
            None => IdentificationResult::default(),
        }
    }
}

impl From<HealthResponse> for HealthResult {
    fn from(response: HealthResponse) -> Self {
        let disease_name = response
            .health_assessment
            .and_then(|a| a.diseases.into_iter().next())
            .and_then(|d| d.name);
        HealthResult::from_disease_name(disease_name)
    }
}
