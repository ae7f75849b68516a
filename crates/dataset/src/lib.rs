//! Shelf-Life Dataset Loading
//!
//! Loads labeled storage observations from CSV, encodes categorical labels
//! to their fixed integer codes, and produces train/test splits.

mod error;
mod loader;
mod split;

pub use error::DatasetError;
pub use loader::{Dataset, ShelfSample};
