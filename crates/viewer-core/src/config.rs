//! Viewer configuration
//!
//! Ruler proportions, camera timing and overlay palettes. Stored as RON.

use std::path::Path;

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Configuration error types
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Serialization error: {0}")]
    Serialize(String),
    #[error("Deserialization error: {0}")]
    Deserialize(String),
}

/// Ruler geometry, expressed as fractions of the target's largest extent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RulerConfig {
    /// Length of labeled ticks
    pub major_tick_ratio: f64,
    /// Length of unlabeled half-step ticks
    pub minor_tick_ratio: f64,
    /// Length of the marks closing both ends of a ruler
    pub end_tick_ratio: f64,
    /// World height of the dimension label
    pub label_scale_ratio: f64,
    /// Tick label height relative to the dimension label
    pub tick_label_ratio: f64,
    /// Font size requested for dimension labels
    pub dimension_font_size: f32,
    /// Font size requested for tick labels
    pub tick_font_size: f32,
}

impl Default for RulerConfig {
    fn default() -> Self {
        Self {
            major_tick_ratio: 0.038,
            minor_tick_ratio: 0.022,
            end_tick_ratio: 0.042,
            label_scale_ratio: 0.055,
            tick_label_ratio: 0.6,
            dimension_font_size: 48.0,
            tick_font_size: 32.0,
        }
    }
}

/// Camera animation settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    /// Duration of preset and reset transitions in milliseconds
    pub transition_ms: f64,
    /// Eye direction (from the center) used by reset
    pub home_direction: [f64; 3],
    /// Up vector used by reset
    pub home_up: [f64; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            transition_ms: 400.0,
            home_direction: [0.0, 0.0, 1.0],
            home_up: [0.0, 1.0, 0.0],
        }
    }
}

impl CameraConfig {
    /// Normalized home direction, falling back to +Z when unusable.
    pub fn home_direction(&self) -> DVec3 {
        DVec3::from_array(self.home_direction)
            .try_normalize()
            .unwrap_or(DVec3::Z)
    }

    /// Normalized home up vector, falling back to +Y when unusable.
    pub fn home_up(&self) -> DVec3 {
        DVec3::from_array(self.home_up)
            .try_normalize()
            .unwrap_or(DVec3::Y)
    }
}

/// Line and label colors for one UI theme
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct OverlayPalette {
    pub line_color: [f32; 4],
    pub line_opacity: f32,
    pub label_color: [f32; 4],
}

/// Overlay palettes for dark and light backgrounds
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ThemeConfig {
    pub dark: OverlayPalette,
    pub light: OverlayPalette,
    /// Theme in effect before the host reports one
    pub start_dark: bool,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            dark: OverlayPalette {
                line_color: [0.85, 0.87, 0.9, 1.0],
                line_opacity: 0.9,
                label_color: [0.93, 0.94, 0.96, 1.0],
            },
            light: OverlayPalette {
                line_color: [0.2, 0.22, 0.25, 1.0],
                line_opacity: 0.85,
                label_color: [0.12, 0.13, 0.15, 1.0],
            },
            start_dark: true,
        }
    }
}

impl ThemeConfig {
    pub fn palette(&self, is_dark: bool) -> OverlayPalette {
        if is_dark { self.dark } else { self.light }
    }
}

/// Complete viewer configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ViewerConfig {
    /// Configuration format version
    #[serde(default)]
    pub version: u32,
    #[serde(default)]
    pub ruler: RulerConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub theme: ThemeConfig,
}

impl ViewerConfig {
    /// Current configuration version
    pub const CURRENT_VERSION: u32 = 1;

    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            ..Default::default()
        }
    }

    /// Parse a RON document; missing fields take their defaults.
    pub fn from_ron_str(content: &str) -> Result<Self, ConfigError> {
        ron::from_str(content).map_err(|e| ConfigError::Deserialize(e.to_string()))
    }

    pub fn to_ron_string(&self) -> Result<String, ConfigError> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    /// Load configuration from a RON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        let config = Self::from_ron_str(&content)?;
        tracing::info!("Loaded viewer config from {:?}", path);
        Ok(config)
    }

    /// Save configuration to a RON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Io(e.to_string()))?;
        }
        std::fs::write(path, self.to_ron_string()?).map_err(|e| ConfigError::Io(e.to_string()))?;
        tracing::info!("Saved viewer config to {:?}", path);
        Ok(())
    }
}
