//! TOML scene files: layout bounds and initial data
//!
//! ```toml
//! [layout]
//! width = 800
//! height = 600
//! direction = "ltr"
//!
//! [data]
//! w = "620px"
//! list = ["1", "2", "3"]
//! ```

use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;
use thiserror::Error;

use crate::config::SessionConfig;
use crate::expr::Value;
use crate::style::Direction;

/// Errors that can occur when loading a scene file
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("Failed to read scene file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse scene TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Unknown layout direction '{0}' (expected inherit, ltr or rtl)")]
    InvalidDirection(String),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub direction: Option<Direction>,
    /// Initial context values, in file order
    pub data: IndexMap<String, Value>,
}

#[derive(Deserialize)]
struct TomlScene {
    layout: Option<TomlLayout>,
    #[serde(default)]
    data: IndexMap<String, Value>,
}

#[derive(Deserialize)]
struct TomlLayout {
    width: Option<f32>,
    height: Option<f32>,
    direction: Option<String>,
}

impl Scene {
    pub fn from_file(path: &Path) -> Result<Self, SceneError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, SceneError> {
        let parsed: TomlScene = toml::from_str(content)?;
        let layout = parsed.layout;

        let direction = match layout.as_ref().and_then(|l| l.direction.as_deref()) {
            Some(text) => Some(
                Direction::from_keyword(&text.to_lowercase())
                    .ok_or_else(|| SceneError::InvalidDirection(text.to_string()))?,
            ),
            None => None,
        };

        Ok(Scene {
            width: layout.as_ref().and_then(|l| l.width),
            height: layout.as_ref().and_then(|l| l.height),
            direction,
            data: parsed.data,
        })
    }

    /// Overlay the scene's layout settings on `config`
    pub fn apply_to(&self, mut config: SessionConfig) -> SessionConfig {
        if let Some(width) = self.width {
            config.max_width = width;
        }
        if let Some(height) = self.height {
            config.max_height = height;
        }
        if let Some(direction) = self.direction {
            config.direction = direction;
        }
        config
    }
}
