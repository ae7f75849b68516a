//! Prediction Route

use axum::{extract::State, http::StatusCode, response::Response, Json};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

use crate::{epoch_ms, error_response, AppState};
use feature_engine::{FoodKind, ShelfRecord, StorageKind};
use storage::PredictionRecord;

/// Response for a served prediction
#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub id: i64,
    /// Predicted remaining shelf life (days)
    pub predicted_days: f64,
    /// Resolved food category
    pub food_type: String,
    /// Resolved storage category
    pub storage_type: String,
    /// Engineered spoilage-risk composite
    pub degradation_factor: f64,
    /// Nominal shelf life from the reference table
    pub base_shelf_life: f64,
    pub is_extreme_temp: bool,
    pub is_extreme_humidity: bool,
}

/// Predict remaining shelf life for one raw reading
pub async fn predict(
    State(state): State<Arc<RwLock<AppState>>>,
    Json(record): Json<ShelfRecord>,
) -> Result<Json<PredictResponse>, Response> {
    let mut guard = state.write().await;
    let state = &mut *guard;

    let Some(model) = state.model.as_ref() else {
        return Err(error_response(
            StatusCode::SERVICE_UNAVAILABLE,
            "no model loaded",
        ));
    };

    let rows = state.engineer.transform(std::slice::from_ref(&record));
    let row = &rows[0];

    let predictions = model.predict_rows(&rows).map_err(|e| {
        error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;
    let predicted_days = predictions[0];

    let food = FoodKind::resolve(record.food_type.as_ref());
    let storage = StorageKind::resolve(record.storage_type.as_ref());

    let id = state
        .repository
        .insert(PredictionRecord {
            id: 0,
            timestamp_ms: epoch_ms() as i64,
            food_type: food.as_str().to_string(),
            storage_type: storage.as_str().to_string(),
            temperature: record.temperature,
            humidity: record.humidity,
            days_stored: record.days_stored,
            predicted_days,
            degradation_factor: row.degradation_factor,
        })
        .map_err(|e| error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    info!(
        "Prediction {}: {} in {} -> {:.2} days remaining",
        id,
        food.as_str(),
        storage.as_str(),
        predicted_days
    );

    Ok(Json(PredictResponse {
        id,
        predicted_days,
        food_type: food.as_str().to_string(),
        storage_type: storage.as_str().to_string(),
        degradation_factor: row.degradation_factor,
        base_shelf_life: row.base_shelf_life,
        is_extreme_temp: row.is_extreme_temp > 0.0,
        is_extreme_humidity: row.is_extreme_humidity > 0.0,
    }))
}
