//! Storage Layer
//!
//! In-memory repository of served predictions with retention limits.

mod repository;

pub use repository::{PredictionRecord, Repository};

use thiserror::Error;

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Repository lock poisoned: {0}")]
    LockPoisoned(String),
}
