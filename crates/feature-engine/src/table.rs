//! Base Shelf-Life Reference Table
//!
//! Immutable domain knowledge, not learned from data.

use crate::category::{FoodKind, StorageKind};

/// Base used when a (food, storage) pair cannot be resolved. The enum pairs
/// are exhaustive so this only documents the degraded-mode contract.
pub const FALLBACK_SHELF_LIFE_DAYS: u32 = 7;

/// Assumed ideal ambient humidity (%) for every storage type.
pub const IDEAL_HUMIDITY: f64 = 65.0;

/// Nominal shelf life in days for a food under a storage condition.
/// Zero means the food is not viable in that storage.
pub fn base_shelf_life(food: FoodKind, storage: StorageKind) -> u32 {
    use FoodKind::*;
    use StorageKind::*;

    match (food, storage) {
        (Dairy, Refrigerator) => 7,
        (Dairy, Freezer) => 90,
        (Dairy, Pantry) => 0,
        (Meat, Refrigerator) => 6,
        (Meat, Freezer) => 180,
        (Meat, Pantry) => 0,
        (Vegetables, Refrigerator) => 7,
        (Vegetables, Freezer) => 365,
        (Vegetables, Pantry) => 7,
        (Fruits, Refrigerator) => 10,
        (Fruits, Freezer) => 365,
        (Fruits, Pantry) => 7,
        (Bakery, Refrigerator) => 10,
        (Bakery, Freezer) => 180,
        (Bakery, Pantry) => 7,
        (Seafood, Refrigerator) => 2,
        (Seafood, Freezer) => 180,
        (Seafood, Pantry) => 0,
    }
}

/// Ideal holding temperature (°C) for a storage condition.
pub fn ideal_temperature(storage: StorageKind) -> f64 {
    match storage {
        StorageKind::Refrigerator => 4.0,
        StorageKind::Freezer => -18.0,
        StorageKind::Pantry => 20.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_values() {
        assert_eq!(base_shelf_life(FoodKind::Dairy, StorageKind::Refrigerator), 7);
        assert_eq!(base_shelf_life(FoodKind::Seafood, StorageKind::Refrigerator), 2);
        assert_eq!(base_shelf_life(FoodKind::Vegetables, StorageKind::Freezer), 365);
        assert_eq!(base_shelf_life(FoodKind::Bakery, StorageKind::Pantry), 7);
    }

    #[test]
    fn test_non_viable_pantry_pairs() {
        for food in [FoodKind::Dairy, FoodKind::Meat, FoodKind::Seafood] {
            assert_eq!(base_shelf_life(food, StorageKind::Pantry), 0);
        }
    }

    #[test]
    fn test_all_values_in_known_set() {
        let known = [0u32, 2, 6, 7, 10, 90, 180, 365];
        for food in [
            FoodKind::Bakery,
            FoodKind::Dairy,
            FoodKind::Fruits,
            FoodKind::Meat,
            FoodKind::Seafood,
            FoodKind::Vegetables,
        ] {
            for storage in [
                StorageKind::Freezer,
                StorageKind::Pantry,
                StorageKind::Refrigerator,
            ] {
                assert!(known.contains(&base_shelf_life(food, storage)));
            }
        }
    }

    #[test]
    fn test_ideal_temperatures() {
        assert_eq!(ideal_temperature(StorageKind::Refrigerator), 4.0);
        assert_eq!(ideal_temperature(StorageKind::Freezer), -18.0);
        assert_eq!(ideal_temperature(StorageKind::Pantry), 20.0);
    }
}
