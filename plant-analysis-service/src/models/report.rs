use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentinel used when the health assessment reports no disease.
pub const NO_DISEASE: &str = "None";

/// Default used when identification yields no usable suggestion.
pub const UNKNOWN: &str = "Unknown";

/// Best-guess species names extracted from the identification service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentificationResult {
    pub common_name: String,
    pub scientific_name: String,
}

impl Default for IdentificationResult {
    fn default() -> Self {
        Self {
            common_name: UNKNOWN.to_string(),
            scientific_name: UNKNOWN.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthStatus {
    Healthy,
    Diseased,
}

impl HealthStatus {
    /// Diseased iff the disease name differs from the sentinel.
    pub fn from_disease(disease_name: &str) -> Self {
        if disease_name == NO_DISEASE {
            HealthStatus::Healthy
        } else {
            HealthStatus::Diseased
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HealthStatus::Healthy => write!(f, "Healthy"),
            HealthStatus::Diseased => write!(f, "Diseased"),
        }
    }
}

/// First reported disease plus the status derived from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthResult {
    pub disease_name: String,
    pub status: HealthStatus,
}

impl HealthResult {
    pub fn from_disease_name(disease_name: Option<String>) -> Self {
        let disease_name = disease_name.unwrap_or_else(|| NO_DISEASE.to_string());
        let status = HealthStatus::from_disease(&disease_name);
        Self {
            disease_name,
            status,
        }
    }
}

impl Default for HealthResult {
    fn default() -> Self {
        Self::from_disease_name(None)
    }
}

/// The six-field report emitted to the client on every success path.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NarrativeReport {
    pub plant_name: String,
    pub botanical_name: String,
    pub uses: String,
    pub health_status: String,
    pub disease_name: String,
    pub solution: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_is_healthy_for_sentinel_disease() {
        assert_eq!(HealthStatus::from_disease(NO_DISEASE), HealthStatus::Healthy);
    }

    #[test]
    fn status_is_diseased_for_named_disease() {
        assert_eq!(
            HealthStatus::from_disease("Leaf spot"),
            HealthStatus::Diseased
        );
    }

    #[test]
    fn health_result_defaults_to_sentinel_and_healthy() {
        let result = HealthResult::from_disease_name(None);
        assert_eq!(result.disease_name, NO_DISEASE);
        assert_eq!(result.status, HealthStatus::Healthy);
    }

    #[test]
    fn health_result_derives_status_from_name() {
        let result = HealthResult::from_disease_name(Some("Powdery mildew".to_string()));
        assert_eq!(result.status, HealthStatus::Diseased);
    }

    #[test]
    fn identification_defaults_to_unknown() {
        let result = IdentificationResult::default();
        assert_eq!(result.common_name, UNKNOWN);
        assert_eq!(result.scientific_name, UNKNOWN);
    }
}
