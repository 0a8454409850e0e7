//! Upstream API abstractions and implementations.
//!
//! Trait seams over the three remote services (identification, health
//! assessment, narrative elaboration) so handlers and tests can swap in
//! mocks for the real HTTP clients.

pub mod mock;
pub mod openai;
pub mod plant_id;

use crate::models::{HealthResult, IdentificationResult};
use async_trait::async_trait;
use thiserror::Error;

/// Error type for provider operations.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Empty response body")]
    EmptyResponse,
}

/// Species identification from an image.
#[async_trait]
pub trait PlantIdentifier: Send + Sync {
    /// Identify the plant in the base64-encoded image.
    async fn identify(&self, image_b64: &str) -> Result<IdentificationResult, ProviderError>;
}

/// Disease detection from an image.
#[async_trait]
pub trait HealthAssessor: Send + Sync {
    /// Assess the health of the plant in the base64-encoded image.
    async fn assess(&self, image_b64: &str) -> Result<HealthResult, ProviderError>;
}

/// Narrative elaboration of the extracted facts.
///
/// `Ok(Some(content))` is raw model output for the merger, `Ok(None)` means
/// the upstream answered but produced no content (the merger falls back),
/// and `Err` means the transport yielded nothing at all (terminal).
#[async_trait]
pub trait NarrativeProvider: Send + Sync {
    async fn elaborate(
        &self,
        identification: &IdentificationResult,
        health: &HealthResult,
    ) -> Result<Option<String>, ProviderError>;
}
