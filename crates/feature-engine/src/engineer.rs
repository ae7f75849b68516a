//! Feature Row Assembly

use crate::category::{CategoryValue, FoodKind, StorageKind};
use crate::record::ShelfRecord;
use crate::table::{base_shelf_life, ideal_temperature, IDEAL_HUMIDITY};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Number of columns a downstream model should expect
pub const FEATURE_DIMENSION: usize = 18;

/// Column names in model input order
const FEATURE_NAMES: [&str; FEATURE_DIMENSION] = [
    "food_type",
    "storage_type",
    "temperature",
    "humidity",
    "days_stored",
    "base_shelf_life",
    "temp_deviation",
    "humidity_deviation",
    "storage_progress",
    "degradation_factor",
    "temp_humidity_interaction",
    "is_extreme_temp",
    "is_extreme_humidity",
    "days_remaining_ratio",
    "temp_squared",
    "humidity_squared",
    "temp_humidity_product",
    "storage_days_ratio",
];

/// One engineered observation: the raw columns plus the derived predictors,
/// all numeric and ready for a regression model.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeatureRow {
    /// Food category code (passthrough)
    pub food_type: f64,
    /// Storage category code (passthrough)
    pub storage_type: f64,
    /// Temperature reading (passthrough)
    pub temperature: f64,
    /// Humidity reading (passthrough)
    pub humidity: f64,
    /// Days in storage (passthrough)
    pub days_stored: f64,
    /// Nominal shelf life from the reference table
    pub base_shelf_life: f64,
    /// Absolute distance from the storage type's ideal temperature
    pub temp_deviation: f64,
    /// Absolute distance from ideal humidity
    pub humidity_deviation: f64,
    /// Fraction of base shelf life elapsed, clamped to [0, 2]
    pub storage_progress: f64,
    /// Fixed-weight spoilage-risk composite
    pub degradation_factor: f64,
    /// temperature × humidity / 100
    pub temp_humidity_interaction: f64,
    /// 1 when the reading is outside the acceptable band for its storage
    pub is_extreme_temp: f64,
    /// 1 when humidity exceeds 90%
    pub is_extreme_humidity: f64,
    /// Fraction of shelf life remaining, unclamped (negative past expiry)
    pub days_remaining_ratio: f64,
    pub temp_squared: f64,
    pub humidity_squared: f64,
    pub temp_humidity_product: f64,
    /// Unclamped counterpart of storage_progress
    pub storage_days_ratio: f64,
}

impl FeatureRow {
    /// Values in `feature_names()` order
    pub fn as_vector(&self) -> [f64; FEATURE_DIMENSION] {
        [
            self.food_type,
            self.storage_type,
            self.temperature,
            self.humidity,
            self.days_stored,
            self.base_shelf_life,
            self.temp_deviation,
            self.humidity_deviation,
            self.storage_progress,
            self.degradation_factor,
            self.temp_humidity_interaction,
            self.is_extreme_temp,
            self.is_extreme_humidity,
            self.days_remaining_ratio,
            self.temp_squared,
            self.humidity_squared,
            self.temp_humidity_product,
            self.storage_days_ratio,
        ]
    }
}

/// Feature engineer mapping cleaned records to enriched rows. Holds only the
/// static reference table (compiled in) and a fitted flag; `transform` is a
/// pure function of its input apart from flipping that flag.
#[derive(Debug, Default)]
pub struct FeatureEngineer {
    is_fitted: bool,
}

impl FeatureEngineer {
    /// Create a new feature engineer
    pub fn new() -> Self {
        Self { is_fitted: false }
    }

    /// Engineer features for a batch. The input is never mutated; each
    /// row's output depends only on that row.
    pub fn transform(&mut self, records: &[ShelfRecord]) -> Vec<FeatureRow> {
        debug!("Engineering features for {} records", records.len());
        let rows = records.iter().map(Self::engineer_row).collect();
        self.is_fitted = true;
        rows
    }

    /// Column names a downstream model should expect, in order
    pub fn feature_names() -> [&'static str; FEATURE_DIMENSION] {
        FEATURE_NAMES
    }

    /// Whether `transform` has run at least once
    pub fn is_fitted(&self) -> bool {
        self.is_fitted
    }

    fn engineer_row(record: &ShelfRecord) -> FeatureRow {
        let food = FoodKind::resolve(record.food_type.as_ref());
        let storage = StorageKind::resolve(record.storage_type.as_ref());

        let base = f64::from(base_shelf_life(food, storage));
        let temperature = record.temperature;
        let humidity = record.humidity;
        let days_stored = record.days_stored;

        let temp_deviation = (temperature - ideal_temperature(storage)).abs();
        let humidity_deviation = (humidity - IDEAL_HUMIDITY).abs();

        let storage_progress = if base > 0.0 {
            (days_stored / base).clamp(0.0, 2.0)
        } else {
            1.0
        };

        // Weights are domain assumptions, not fitted
        let degradation_factor = 0.5 * (temp_deviation / 10.0)
            + 0.3 * (humidity_deviation / 20.0)
            + 0.2 * storage_progress;

        let days_remaining_ratio = if base > 0.0 {
            (base - days_stored) / base
        } else {
            0.0
        };

        let storage_days_ratio = if base > 0.0 { days_stored / base } else { 1.0 };

        FeatureRow {
            food_type: passthrough_code(record.food_type.as_ref(), food.code()),
            storage_type: passthrough_code(record.storage_type.as_ref(), storage.code()),
            temperature,
            humidity,
            days_stored,
            base_shelf_life: base,
            temp_deviation,
            humidity_deviation,
            storage_progress,
            degradation_factor,
            temp_humidity_interaction: temperature * humidity / 100.0,
            is_extreme_temp: if is_extreme_temperature(storage, temperature) {
                1.0
            } else {
                0.0
            },
            is_extreme_humidity: if humidity > 90.0 { 1.0 } else { 0.0 },
            days_remaining_ratio,
            temp_squared: temperature * temperature,
            humidity_squared: humidity * humidity,
            temp_humidity_product: temperature * humidity,
            storage_days_ratio,
        }
    }
}

/// Numeric value for a categorical passthrough column: encoder codes pass
/// through verbatim, labels (and absent fields) carry the resolved code.
fn passthrough_code(value: Option<&CategoryValue>, resolved: i64) -> f64 {
    match value {
        Some(CategoryValue::Code(c)) => *c as f64,
        _ => resolved as f64,
    }
}

/// Whether a temperature reading is outside the acceptable band for its
/// storage condition.
fn is_extreme_temperature(storage: StorageKind, temperature: f64) -> bool {
    match storage {
        StorageKind::Refrigerator => temperature > 10.0 || temperature < 0.0,
        StorageKind::Freezer => temperature > -5.0,
        StorageKind::Pantry => temperature > 30.0,
    }
}
