//! Feature Engineering Engine
//!
//! Derives domain-informed predictors from raw storage telemetry before
//! model training or inference.

mod category;
mod engineer;
mod record;
mod table;

pub use category::{CategoryValue, FoodKind, StorageKind};
pub use engineer::{FeatureEngineer, FeatureRow, FEATURE_DIMENSION};
pub use record::ShelfRecord;
pub use table::{base_shelf_life, ideal_temperature, FALLBACK_SHELF_LIFE_DAYS, IDEAL_HUMIDITY};
