//! CSV Loader and Label Encoding

use crate::error::DatasetError;
use feature_engine::{FoodKind, ShelfRecord, StorageKind};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// One labeled row of the source CSV
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShelfSample {
    /// Food category label
    pub food_type: String,
    /// Storage category label
    pub storage_type: String,
    /// Temperature reading (°C)
    pub temperature: f64,
    /// Relative humidity reading (%)
    pub humidity: f64,
    /// Days in the current storage condition
    pub days_stored: f64,
    /// Regression target
    pub remaining_shelf_life: f64,
}

/// Encoded dataset ready for feature engineering
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    /// Encoded input records
    pub records: Vec<ShelfRecord>,
    /// Regression targets, aligned with `records`
    pub targets: Vec<f64>,
}

impl Dataset {
    /// Load samples from a CSV file and encode categorical labels to their
    /// fixed integer codes. Unknown labels take the default category code,
    /// matching the engine's silent-fallback policy.
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self, DatasetError> {
        let path_str = path.as_ref().display().to_string();
        let mut reader = csv::Reader::from_path(&path).map_err(|source| DatasetError::Read {
            path: path_str.clone(),
            source,
        })?;

        let mut records = Vec::new();
        let mut targets = Vec::new();

        for result in reader.deserialize() {
            let sample: ShelfSample = result.map_err(|source| DatasetError::Read {
                path: path_str.clone(),
                source,
            })?;
            targets.push(sample.remaining_shelf_life);
            records.push(encode(&sample));
        }

        if records.is_empty() {
            return Err(DatasetError::Empty);
        }

        info!("Loaded {} samples from {}", records.len(), path_str);
        Ok(Self { records, targets })
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset holds no samples
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn encode(sample: &ShelfSample) -> ShelfRecord {
    ShelfRecord::with_codes(
        FoodKind::from_label(&sample.food_type).code(),
        StorageKind::from_label(&sample.storage_type).code(),
        sample.temperature,
        sample.humidity,
        sample.days_stored,
    )
}
