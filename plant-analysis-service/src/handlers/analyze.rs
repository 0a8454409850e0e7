use crate::models::{HealthResult, IdentificationResult};
use crate::services::merge_report;
use crate::startup::AppState;
use axum::{
    extract::{Multipart, State},
    response::IntoResponse,
    Json,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use service_core::error::AppError;

/// Multipart field carrying the uploaded image.
const IMAGE_FIELD: &str = "plantImage";

const MISSING_KEYS_ERROR: &str =
    "API keys not set. Please create a .env file with your API keys.";
const NO_IMAGE_ERROR: &str = "No image uploaded.";
const NO_NARRATIVE_ERROR: &str = "No response from OpenAI.";

/// Run the full analysis pipeline for one uploaded plant image.
///
/// Sequential: identify, assess health, elaborate, merge. Identification and
/// health failures degrade to default fields; a narrative transport failure
/// is terminal.
pub async fn analyze_plant(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    if !state.config.has_api_keys() {
        return Err(AppError::ConfigError(anyhow::anyhow!(MISSING_KEYS_ERROR)));
    }

    let image = read_image_field(multipart).await?;
    let image_b64 = BASE64.encode(&image);

    let identification = state
        .identifier
        .identify(&image_b64)
        .await
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Identification failed, defaulting fields");
            IdentificationResult::default()
        });

    let health = state.assessor.assess(&image_b64).await.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Health assessment failed, defaulting fields");
        HealthResult::default()
    });

    let content = state
        .narrative
        .elaborate(&identification, &health)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Narrative service yielded no response");
            AppError::BadGateway(NO_NARRATIVE_ERROR.to_string())
        })?;

    let report = merge_report(content.as_deref(), &identification, &health);

    Ok(Json(report))
}

/// Pull the `plantImage` field out of the multipart body.
async fn read_image_field(mut multipart: Multipart) -> Result<Vec<u8>, AppError> {
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        AppError::BadRequest(anyhow::anyhow!("Failed to read multipart field: {}", e))
    })? {
        if field.name() == Some(IMAGE_FIELD) {
            let data = field.bytes().await.map_err(|e| {
                AppError::BadRequest(anyhow::anyhow!("Failed to read file bytes: {}", e))
            })?;
            if data.is_empty() {
                break;
            }
            return Ok(data.to_vec());
        }
    }

    Err(AppError::BadRequest(anyhow::anyhow!(NO_IMAGE_ERROR)))
}
