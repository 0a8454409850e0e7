//! Integration tests for the analysis pipeline.
//!
//! The app is spawned on a random port with mock providers standing in for
//! Plant.id and OpenAI; requests go through the real HTTP stack.

use plant_analysis_service::config::{OpenAiConfig, PlantConfig, PlantIdConfig};
use plant_analysis_service::models::{HealthResult, HealthStatus, IdentificationResult};
use plant_analysis_service::services::providers::mock::{
    MockAssessor, MockIdentifier, MockNarrative,
};
use plant_analysis_service::startup::{AppState, Application};
use reqwest::multipart::{Form, Part};
use serde_json::json;
use service_core::config as core_config;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn test_config(with_keys: bool) -> PlantConfig {
    let key = if with_keys { "test-key" } else { "" };
    PlantConfig {
        common: core_config::Config { port: 0 },
        plant_id: PlantIdConfig {
            api_key: key.to_string(),
            base_url: "http://127.0.0.1:9".to_string(),
        },
        openai: OpenAiConfig {
            api_key: key.to_string(),
            base_url: "http://127.0.0.1:9".to_string(),
            model: "gpt-4o-mini".to_string(),
            max_tokens: 900,
        },
    }
}

async fn spawn_app(state: AppState) -> u16 {
    let app = Application::with_state(state)
        .await
        .expect("Failed to build application");
    let port = app.port();

    tokio::spawn(async move {
        let _ = app.run_until_stopped().await;
    });

    port
}

fn rose_identification() -> IdentificationResult {
    IdentificationResult {
        common_name: "Rose".to_string(),
        scientific_name: "Rosa".to_string(),
    }
}

fn leaf_spot_health() -> HealthResult {
    HealthResult {
        disease_name: "Leaf spot".to_string(),
        status: HealthStatus::Diseased,
    }
}

fn image_form() -> Form {
    Form::new().part(
        "plantImage",
        Part::bytes(vec![0xFF, 0xD8, 0xFF, 0xE0])
            .file_name("rose.jpg")
            .mime_str("image/jpeg")
            .unwrap(),
    )
}

async fn post_analyze(port: u16, form: Form) -> reqwest::Response {
    reqwest::Client::new()
        .post(format!("http://localhost:{}/analyze", port))
        .multipart(form)
        .send()
        .await
        .expect("Failed to send request")
}

#[tokio::test]
async fn missing_api_keys_is_terminal_and_makes_no_upstream_calls() {
    let identifier = MockIdentifier::returning(rose_identification());
    let assessor = MockAssessor::returning(leaf_spot_health());
    let identify_calls: Arc<AtomicUsize> = identifier.calls.clone();
    let assess_calls: Arc<AtomicUsize> = assessor.calls.clone();

    let state = AppState {
        config: test_config(false),
        identifier: Arc::new(identifier),
        assessor: Arc::new(assessor),
        narrative: Arc::new(MockNarrative::NoContent),
    };
    let port = spawn_app(state).await;

    let response = post_analyze(port, image_form()).await;
    assert_eq!(response.status().as_u16(), 500);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(
        body,
        json!({ "error": "API keys not set. Please create a .env file with your API keys." })
    );
    assert_eq!(identify_calls.load(Ordering::SeqCst), 0);
    assert_eq!(assess_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn missing_upload_returns_no_image_error() {
    let state = AppState {
        config: test_config(true),
        identifier: Arc::new(MockIdentifier::returning(rose_identification())),
        assessor: Arc::new(MockAssessor::returning(leaf_spot_health())),
        narrative: Arc::new(MockNarrative::NoContent),
    };
    let port = spawn_app(state).await;

    let form = Form::new().text("note", "no image field here");
    let response = post_analyze(port, form).await;
    assert_eq!(response.status().as_u16(), 400);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "error": "No image uploaded." }));
}

#[tokio::test]
async fn valid_narrative_json_passes_through_unchanged() {
    let narrative = json!({
        "plant_name": "Rose",
        "botanical_name": "Rosa",
        "uses": "Ornamental gardens and perfumery.",
        "health_status": "Diseased",
        "disease_name": "Leaf spot",
        "solution": "Prune affected foliage and apply fungicide."
    });

    let state = AppState {
        config: test_config(true),
        identifier: Arc::new(MockIdentifier::returning(rose_identification())),
        assessor: Arc::new(MockAssessor::returning(leaf_spot_health())),
        narrative: Arc::new(MockNarrative::Content(narrative.to_string())),
    };
    let port = spawn_app(state).await;

    let response = post_analyze(port, image_form()).await;
    assert_eq!(response.status().as_u16(), 200);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body, narrative);
}

#[tokio::test]
async fn invalid_narrative_json_falls_back_to_extracted_fields() {
    let state = AppState {
        config: test_config(true),
        identifier: Arc::new(MockIdentifier::returning(rose_identification())),
        assessor: Arc::new(MockAssessor::returning(leaf_spot_health())),
        narrative: Arc::new(MockNarrative::Content("this is not JSON".to_string())),
    };
    let port = spawn_app(state).await;

    let response = post_analyze(port, image_form()).await;
    assert_eq!(response.status().as_u16(), 200);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(
        body,
        json!({
            "plant_name": "Rose",
            "botanical_name": "Rosa",
            "uses": "Not available",
            "health_status": "Diseased",
            "disease_name": "Leaf spot",
            "solution": "Not available"
        })
    );
}

#[tokio::test]
async fn narrative_without_content_falls_back() {
    let state = AppState {
        config: test_config(true),
        identifier: Arc::new(MockIdentifier::returning(rose_identification())),
        assessor: Arc::new(MockAssessor::returning(leaf_spot_health())),
        narrative: Arc::new(MockNarrative::NoContent),
    };
    let port = spawn_app(state).await;

    let response = post_analyze(port, image_form()).await;
    assert_eq!(response.status().as_u16(), 200);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["uses"], "Not available");
    assert_eq!(body["solution"], "Not available");
    assert_eq!(body["plant_name"], "Rose");
}

#[tokio::test]
async fn empty_narrative_response_is_terminal() {
    let state = AppState {
        config: test_config(true),
        identifier: Arc::new(MockIdentifier::returning(rose_identification())),
        assessor: Arc::new(MockAssessor::returning(leaf_spot_health())),
        narrative: Arc::new(MockNarrative::Empty),
    };
    let port = spawn_app(state).await;

    let response = post_analyze(port, image_form()).await;
    assert_eq!(response.status().as_u16(), 502);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "error": "No response from OpenAI." }));
}

#[tokio::test]
async fn upstream_failures_degrade_to_default_fields() {
    let state = AppState {
        config: test_config(true),
        identifier: Arc::new(MockIdentifier::failing()),
        assessor: Arc::new(MockAssessor::failing()),
        narrative: Arc::new(MockNarrative::NoContent),
    };
    let port = spawn_app(state).await;

    let response = post_analyze(port, image_form()).await;
    assert_eq!(response.status().as_u16(), 200);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(
        body,
        json!({
            "plant_name": "Unknown",
            "botanical_name": "Unknown",
            "uses": "Not available",
            "health_status": "Healthy",
            "disease_name": "None",
            "solution": "Not available"
        })
    );
}
