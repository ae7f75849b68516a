//! Repository Implementation

use crate::StorageError;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Mutex;
use tracing::debug;

/// One served shelf-life prediction
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PredictionRecord {
    pub id: i64,
    pub timestamp_ms: i64,
    pub food_type: String,
    pub storage_type: String,
    pub temperature: f64,
    pub humidity: f64,
    pub days_stored: f64,
    /// Predicted remaining shelf life (days)
    pub predicted_days: f64,
    /// Engineered spoilage-risk composite returned with the prediction
    pub degradation_factor: f64,
}

/// In-memory prediction log with a retention cap
pub struct Repository {
    predictions: Mutex<VecDeque<PredictionRecord>>,
    max_records: usize,
    next_id: Mutex<i64>,
}

impl Repository {
    /// Create a repository with the default retention cap
    pub fn new() -> Self {
        Self::with_capacity(10_000)
    }

    /// Create a repository retaining at most `max_records` predictions
    pub fn with_capacity(max_records: usize) -> Self {
        Self {
            predictions: Mutex::new(VecDeque::with_capacity(max_records.min(1024))),
            max_records,
            next_id: Mutex::new(1),
        }
    }

    /// Insert a prediction, returning its assigned id
    pub fn insert(&self, mut record: PredictionRecord) -> Result<i64, StorageError> {
        let mut id = self
            .next_id
            .lock()
            .map_err(|e| StorageError::LockPoisoned(e.to_string()))?;
        record.id = *id;
        *id += 1;

        let mut predictions = self
            .predictions
            .lock()
            .map_err(|e| StorageError::LockPoisoned(e.to_string()))?;

        // Enforce retention
        while predictions.len() >= self.max_records {
            predictions.pop_front();
        }

        let assigned = record.id;
        predictions.push_back(record);
        debug!("Stored prediction {}", assigned);
        Ok(assigned)
    }

    /// Most recent predictions, newest first
    pub fn recent(&self, limit: usize) -> Result<Vec<PredictionRecord>, StorageError> {
        let predictions = self
            .predictions
            .lock()
            .map_err(|e| StorageError::LockPoisoned(e.to_string()))?;
        Ok(predictions.iter().rev().take(limit).cloned().collect())
    }

    /// Number of retained predictions
    pub fn count(&self) -> usize {
        self.predictions.lock().map(|p| p.len()).unwrap_or(0)
    }

    /// Drop all records
    pub fn clear(&self) {
        if let Ok(mut predictions) = self.predictions.lock() {
            predictions.clear();
        }
    }
}

impl Default for Repository {
    fn default() -> Self {
        Self::new()
    }
}
