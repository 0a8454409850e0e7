//! Mock provider implementations for testing.

use super::{HealthAssessor, NarrativeProvider, PlantIdentifier, ProviderError};
use crate::models::{HealthResult, IdentificationResult};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Mock identifier returning a fixed result, or degrading like a transport
/// failure when `fail` is set. Counts calls so tests can assert the
/// no-outbound-call paths.
pub struct MockIdentifier {
    pub result: IdentificationResult,
    pub fail: bool,
    pub calls: Arc<AtomicUsize>,
}

impl MockIdentifier {
    pub fn returning(result: IdentificationResult) -> Self {
        Self {
            result,
            fail: false,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing() -> Self {
        Self {
            result: IdentificationResult::default(),
            fail: true,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

#[async_trait]
impl PlantIdentifier for MockIdentifier {
    async fn identify(&self, _image_b64: &str) -> Result<IdentificationResult, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(ProviderError::Network("connection refused".to_string()));
        }
        Ok(self.result.clone())
    }
}

pub struct MockAssessor {
    pub result: HealthResult,
    pub fail: bool,
    pub calls: Arc<AtomicUsize>,
}

impl MockAssessor {
    pub fn returning(result: HealthResult) -> Self {
        Self {
            result,
            fail: false,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing() -> Self {
        Self {
            result: HealthResult::default(),
            fail: true,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

#[async_trait]
impl HealthAssessor for MockAssessor {
    async fn assess(&self, _image_b64: &str) -> Result<HealthResult, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(ProviderError::Network("connection refused".to_string()));
        }
        Ok(self.result.clone())
    }
}

/// Mock narrative provider scripted with one of the three outcomes the real
/// client can produce.
pub enum MockNarrative {
    /// Transport answered with content.
    Content(String),
    /// Transport answered but produced no content object.
    NoContent,
    /// Transport yielded nothing at all.
    Empty,
}

#[async_trait]
impl NarrativeProvider for MockNarrative {
    async fn elaborate(
        &self,
        _identification: &IdentificationResult,
        _health: &HealthResult,
    ) -> Result<Option<String>, ProviderError> {
        match self {
            MockNarrative::Content(text) => Ok(Some(text.clone())),
            MockNarrative::NoContent => Ok(None),
            MockNarrative::Empty => Err(ProviderError::EmptyResponse),
        }
    }
}
