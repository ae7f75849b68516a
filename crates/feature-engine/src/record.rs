//! Raw Storage Record

use crate::category::CategoryValue;
use serde::{Deserialize, Serialize};

/// One cleaned observation from the upstream preprocessor. Categorical
/// fields may be absent when the batch carried no such column; the engine
/// then runs in degraded mode with default categories.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShelfRecord {
    /// Food category, as label or encoder code
    #[serde(default)]
    pub food_type: Option<CategoryValue>,
    /// Storage category, as label or encoder code
    #[serde(default)]
    pub storage_type: Option<CategoryValue>,
    /// Temperature reading (°C)
    pub temperature: f64,
    /// Relative humidity reading (%)
    pub humidity: f64,
    /// Days elapsed in the current storage condition
    pub days_stored: f64,
}

impl ShelfRecord {
    /// Build a record from string labels
    pub fn with_labels(
        food: &str,
        storage: &str,
        temperature: f64,
        humidity: f64,
        days_stored: f64,
    ) -> Self {
        Self {
            food_type: Some(CategoryValue::Label(food.to_string())),
            storage_type: Some(CategoryValue::Label(storage.to_string())),
            temperature,
            humidity,
            days_stored,
        }
    }

    /// Build a record from encoder codes
    pub fn with_codes(
        food_code: i64,
        storage_code: i64,
        temperature: f64,
        humidity: f64,
        days_stored: f64,
    ) -> Self {
        Self {
            food_type: Some(CategoryValue::Code(food_code)),
            storage_type: Some(CategoryValue::Code(storage_code)),
            temperature,
            humidity,
            days_stored,
        }
    }
}
