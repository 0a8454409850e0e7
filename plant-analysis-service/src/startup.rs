//! Application startup and lifecycle management.

use crate::config::PlantConfig;
use crate::handlers::{analyze_plant, health_check, readiness_check};
use crate::services::providers::openai::OpenAiNarrativeProvider;
use crate::services::providers::plant_id::PlantIdClient;
use crate::services::providers::{HealthAssessor, NarrativeProvider, PlantIdentifier};
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::request_id_middleware;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Uploads larger than this are rejected by the extractor.
const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: PlantConfig,
    pub identifier: Arc<dyn PlantIdentifier>,
    pub assessor: Arc<dyn HealthAssessor>,
    pub narrative: Arc<dyn NarrativeProvider>,
}

impl AppState {
    /// Wire the real Plant.id and OpenAI clients from configuration.
    pub fn from_config(config: PlantConfig) -> Self {
        let plant_id = Arc::new(PlantIdClient::new(config.plant_id.clone()));
        let narrative: Arc<dyn NarrativeProvider> =
            Arc::new(OpenAiNarrativeProvider::new(config.openai.clone()));

        tracing::info!(
            plant_id_endpoint = %config.plant_id.base_url,
            openai_endpoint = %config.openai.base_url,
            model = %config.openai.model,
            "Initialized upstream providers"
        );

        Self {
            config,
            identifier: plant_id.clone(),
            assessor: plant_id,
            narrative,
        }
    }
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/analyze", post(analyze_plant))
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Build the application with the given configuration.
    pub async fn build(config: PlantConfig) -> Result<Self, AppError> {
        let state = AppState::from_config(config);
        Self::with_state(state).await
    }

    /// Build the application around pre-wired state (tests inject mocks here).
    pub async fn with_state(state: AppState) -> Result<Self, AppError> {
        // port 0 = random port for testing
        let addr = SocketAddr::from(([0, 0, 0, 0], state.config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Plant analysis service listening on port {}", port);

        Ok(Self {
            port,
            listener,
            state,
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Run the application until stopped.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(self.listener, router(self.state))
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}
