//! Prediction History Routes

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::AppState;
use storage::PredictionRecord;

/// Query parameters for the history endpoint
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    /// Maximum number of records
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    50
}

/// Response for the history endpoint
#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub data: Vec<PredictionRecord>,
    pub count: usize,
}

/// Get recent predictions
pub async fn get_predictions(
    State(state): State<Arc<RwLock<AppState>>>,
    Query(params): Query<HistoryQuery>,
) -> Json<HistoryResponse> {
    let state = state.read().await;
    let limit = params.limit.min(500);

    let data = state.repository.recent(limit).unwrap_or_default();

    Json(HistoryResponse {
        count: data.len(),
        data,
    })
}
