//! Configuration system
//!
//! Window and graphics settings that can be loaded from TOML or RON files.
//! Every field has a default, so a config file only needs the values it
//! changes.

pub use serde::{Serialize, Deserialize};

use crate::graphics::ApplicationInfo;
use crate::window::WindowHint;

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    ///
    /// # Errors
    /// Fails if the file cannot be read or parsed, or its extension is neither
    /// `.toml` nor `.ron`.
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(ConfigError::Io)?;

        // Try different formats
        if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to file
    ///
    /// # Errors
    /// Fails if serialization or the write fails, or the extension is unsupported.
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Window settings used by the sample driver
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Width in screen coordinates
    pub width: u32,
    /// Height in screen coordinates
    pub height: u32,
    /// Window title
    pub title: String,
    /// Hints applied before the window is opened
    pub hints: Vec<WindowHint>,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 600,
            height: 600,
            title: "test".to_string(),
            hints: vec![WindowHint::Resizable(false)],
        }
    }
}

/// Defaults used when building instance and device descriptors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphicsConfig {
    /// Application metadata for the instance
    pub application: ApplicationInfo,
    /// Instance layers to enable, e.g. `VK_LAYER_KHRONOS_validation`
    pub enabled_layers: Vec<String>,
    /// Priority of the single graphics queue
    pub queue_priority: f32,
}

impl Default for GraphicsConfig {
    fn default() -> Self {
        Self {
            application: ApplicationInfo::default(),
            enabled_layers: Vec::new(),
            queue_priority: 0.0,
        }
    }
}

/// Top-level configuration file
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PpglConfig {
    /// Window settings
    pub window: WindowConfig,
    /// Graphics settings
    pub graphics: GraphicsConfig,
}

impl Config for PpglConfig {}
