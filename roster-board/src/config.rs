//! Board configuration.
//!
//! Every field has a default, so an empty JSON object is a valid config.
//!
//! ```json
//! {
//!   "drag": { "activation_distance": 5.0, "keyboard_step": 25.0 },
//!   "member_order": "roster",
//!   "sync": { "discard_stale_responses": false }
//! }
//! ```

use std::path::{Path, PathBuf};

use roster_core::MemberOrder;
use roster_drag::DragConfig;
use roster_sync::SyncConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("activation_distance must be a non-negative number, got {0}")]
    ActivationDistance(f32),
    #[error("keyboard_step must be positive, got {0}")]
    KeyboardStep(f32),
    #[error("max_drop_distance must be positive, got {0}")]
    MaxDropDistance(f32),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub drag: DragConfig,
    pub member_order: MemberOrder,
    pub sync: SyncConfig,
}

impl BoardConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: BoardConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let drag = &self.drag;
        if !(drag.activation_distance >= 0.0) {
            return Err(ConfigError::ActivationDistance(drag.activation_distance));
        }
        if !(drag.keyboard_step > 0.0) {
            return Err(ConfigError::KeyboardStep(drag.keyboard_step));
        }
        if let Some(max) = drag.max_drop_distance {
            if !(max > 0.0) {
                return Err(ConfigError::MaxDropDistance(max));
            }
        }
        Ok(())
    }
}
