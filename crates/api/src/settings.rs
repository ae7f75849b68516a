//! Server Settings

use serde::Deserialize;

/// Runtime configuration, overridable through `SHELF_*` environment
/// variables (e.g. `SHELF_BIND_ADDR`, `SHELF_MODEL_PATH`).
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Socket address the server binds to
    pub bind_addr: String,
    /// Path of the trained model artifact
    pub model_path: String,
}

impl Settings {
    /// Load settings from defaults and the environment
    pub fn load() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .set_default("bind_addr", "0.0.0.0:8080")?
            .set_default("model_path", "models/shelf_life.model")?
            .add_source(config::Environment::with_prefix("SHELF"))
            .build()?
            .try_deserialize()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
            model_path: "models/shelf_life.model".to_string(),
        }
    }
}
