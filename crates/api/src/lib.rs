//! Shelf-Life Prediction API Server
//!
//! REST API serving shelf-life predictions from a trained forest model.

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

mod routes;
mod settings;

pub use settings::Settings;

use feature_engine::FeatureEngineer;
use regressor::ShelfLifeModel;
use storage::Repository;

/// Application state shared across handlers
pub struct AppState {
    /// Prediction history
    pub repository: Repository,
    /// Feature engineer for incoming readings
    pub engineer: FeatureEngineer,
    /// Trained model, absent until an artifact is available
    pub model: Option<ShelfLifeModel>,
    /// Version string
    pub version: String,
    /// Start time
    pub start_time: std::time::Instant,
}

impl AppState {
    /// Create application state, loading the model artifact if present
    pub fn new(settings: &Settings) -> Self {
        let model = match ShelfLifeModel::load(&settings.model_path) {
            Ok(model) => Some(model),
            Err(e) => {
                warn!(
                    "No model loaded from {} ({}); predict endpoint disabled",
                    settings.model_path, e
                );
                None
            }
        };

        Self {
            repository: Repository::new(),
            engineer: FeatureEngineer::new(),
            model,
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: std::time::Instant::now(),
        }
    }
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: u64,
    pub version: String,
    pub uptime_seconds: u64,
    pub model_loaded: bool,
    pub prediction_count: usize,
}

/// Create the application router
pub fn create_router(state: Arc<RwLock<AppState>>) -> Router {
    Router::new()
        .route("/api/v1/health", get(health_handler))
        .route("/api/v1/predict", post(routes::predict::predict))
        .route("/api/v1/predictions", get(routes::predictions::get_predictions))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// Health check handler
async fn health_handler(State(state): State<Arc<RwLock<AppState>>>) -> impl IntoResponse {
    let state = state.read().await;

    let response = HealthResponse {
        status: "healthy".to_string(),
        timestamp: epoch_ms() / 1000,
        version: state.version.clone(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        model_loaded: state.model.is_some(),
        prediction_count: state.repository.count(),
    };

    Json(response)
}

/// Error body returned by failing handlers
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub(crate) fn error_response(status: StatusCode, message: impl Into<String>) -> axum::response::Response {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
        .into_response()
}

/// Milliseconds since the Unix epoch
pub fn epoch_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Initialize logging
pub fn init_logging() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");
}

/// Run the server
pub async fn run_server(settings: Settings) -> anyhow::Result<()> {
    let state = Arc::new(RwLock::new(AppState::new(&settings)));
    let app = create_router(state);

    info!("Starting API server on {}", settings.bind_addr);

    let listener = tokio::net::TcpListener::bind(&settings.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
