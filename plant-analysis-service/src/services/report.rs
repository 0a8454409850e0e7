//! Report merging: narrative passthrough with local fallback synthesis.

use crate::models::{HealthResult, IdentificationResult, NarrativeReport};
use serde_json::Value;

const NOT_AVAILABLE: &str = "Not available";

/// The six keys every emitted report carries.
const REPORT_KEYS: [&str; 6] = [
    "plant_name",
    "botanical_name",
    "uses",
    "health_status",
    "disease_name",
    "solution",
];

/// Merge the narrative content with the locally extracted facts.
///
/// Content that parses to a JSON object carrying all six report keys as
/// strings is re-emitted verbatim. Anything else (absent content, a parse
/// error, or an object missing expected keys) yields the fallback report
/// synthesized from the identification and health results.
pub fn merge_report(
    content: Option<&str>,
    identification: &IdentificationResult,
    health: &HealthResult,
) -> Value {
    if let Some(text) = content {
        if let Ok(value) = serde_json::from_str::<Value>(text) {
            if conforms_to_report_shape(&value) {
                return value;
            }
            tracing::warn!("Narrative output missing expected report keys, using fallback");
        } else {
            tracing::warn!("Narrative output is not valid JSON, using fallback");
        }
    }

    fallback_value(identification, health)
}

/// The value is an object with all six report keys present as strings.
fn conforms_to_report_shape(value: &Value) -> bool {
    match value.as_object() {
        Some(map) => REPORT_KEYS
            .iter()
            .all(|key| map.get(*key).map(Value::is_string).unwrap_or(false)),
        None => false,
    }
}

/// The locally synthesized report; AI-only fields are marked unavailable.
pub fn fallback_report(
    identification: &IdentificationResult,
    health: &HealthResult,
) -> NarrativeReport {
    NarrativeReport {
        plant_name: identification.common_name.clone(),
        botanical_name: identification.scientific_name.clone(),
        uses: NOT_AVAILABLE.to_string(),
        health_status: health.status.to_string(),
        disease_name: health.disease_name.clone(),
        solution: NOT_AVAILABLE.to_string(),
    }
}

fn fallback_value(identification: &IdentificationResult, health: &HealthResult) -> Value {
    serde_json::to_value(fallback_report(identification, health))
        .unwrap_or_else(|_| Value::Object(Default::default()))
}
