//! Food and Storage Categories

use serde::{Deserialize, Serialize};

/// Categorical field as emitted by the upstream preprocessor: either a raw
/// string label or the encoder's integer code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CategoryValue {
    /// Integer code from the label encoder
    Code(i64),
    /// Raw string label
    Label(String),
}

/// Food category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FoodKind {
    Bakery,
    Dairy,
    Fruits,
    Meat,
    Seafood,
    Vegetables,
}

impl FoodKind {
    /// Encoder code (alphabetical label order)
    pub const fn code(self) -> i64 {
        match self {
            FoodKind::Bakery => 0,
            FoodKind::Dairy => 1,
            FoodKind::Fruits => 2,
            FoodKind::Meat => 3,
            FoodKind::Seafood => 4,
            FoodKind::Vegetables => 5,
        }
    }

    /// Decode an encoder code. Out-of-range codes fall back to dairy.
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => FoodKind::Bakery,
            1 => FoodKind::Dairy,
            2 => FoodKind::Fruits,
            3 => FoodKind::Meat,
            4 => FoodKind::Seafood,
            5 => FoodKind::Vegetables,
            _ => FoodKind::Dairy,
        }
    }

    /// Decode a string label. Unknown labels fall back to dairy.
    pub fn from_label(label: &str) -> Self {
        match label {
            "bakery" => FoodKind::Bakery,
            "dairy" => FoodKind::Dairy,
            "fruits" => FoodKind::Fruits,
            "meat" => FoodKind::Meat,
            "seafood" => FoodKind::Seafood,
            "vegetables" => FoodKind::Vegetables,
            _ => FoodKind::Dairy,
        }
    }

    /// Resolve from an optional categorical field. Absent fields mean the
    /// upstream batch carried no food column; default to dairy.
    pub fn resolve(value: Option<&CategoryValue>) -> Self {
        match value {
            Some(CategoryValue::Code(c)) => Self::from_code(*c),
            Some(CategoryValue::Label(l)) => Self::from_label(l),
            None => FoodKind::Dairy,
        }
    }

    /// Get string representation
    pub fn as_str(self) -> &'static str {
        match self {
            FoodKind::Bakery => "bakery",
            FoodKind::Dairy => "dairy",
            FoodKind::Fruits => "fruits",
            FoodKind::Meat => "meat",
            FoodKind::Seafood => "seafood",
            FoodKind::Vegetables => "vegetables",
        }
    }
}

/// Storage condition category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorageKind {
    Freezer,
    Pantry,
    Refrigerator,
}

impl StorageKind {
    /// Encoder code (alphabetical label order)
    pub const fn code(self) -> i64 {
        match self {
            StorageKind::Freezer => 0,
            StorageKind::Pantry => 1,
            StorageKind::Refrigerator => 2,
        }
    }

    /// Decode an encoder code. Out-of-range codes fall back to refrigerator.
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => StorageKind::Freezer,
            1 => StorageKind::Pantry,
            2 => StorageKind::Refrigerator,
            _ => StorageKind::Refrigerator,
        }
    }

    /// Decode a string label. Unknown labels fall back to refrigerator.
    pub fn from_label(label: &str) -> Self {
        match label {
            "freezer" => StorageKind::Freezer,
            "pantry" => StorageKind::Pantry,
            "refrigerator" => StorageKind::Refrigerator,
            _ => StorageKind::Refrigerator,
        }
    }

    /// Resolve from an optional categorical field, defaulting to refrigerator.
    pub fn resolve(value: Option<&CategoryValue>) -> Self {
        match value {
            Some(CategoryValue::Code(c)) => Self::from_code(*c),
            Some(CategoryValue::Label(l)) => Self::from_label(l),
            None => StorageKind::Refrigerator,
        }
    }

    /// Get string representation
    pub fn as_str(self) -> &'static str {
        match self {
            StorageKind::Freezer => "freezer",
            StorageKind::Pantry => "pantry",
            StorageKind::Refrigerator => "refrigerator",
        }
    }
}
