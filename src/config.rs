//! Configuration file support for the editor.
//!
//! Interaction thresholds, zoom steps and display colors can be tuned in a
//! JSON file. Every field has a default, so partial files are accepted.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::constants;

/// Log level setting for the host application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Show only errors
    Error,
    /// Show errors and warnings
    Warn,
    /// Show errors, warnings, and info messages
    #[default]
    Info,
    /// Show debug-level logging
    Debug,
    /// Show all log messages including trace
    Trace,
}

impl LogLevel {
    /// Convert to log crate's LevelFilter.
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Current configuration file format version.
/// Increment this when making breaking changes to the config format.
pub const CONFIG_VERSION: u32 = 1;

/// Editor configuration that can be exported and imported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Version of the configuration file format
    pub version: u32,

    /// Pointer interaction thresholds
    #[serde(default)]
    pub interaction: InteractionSettings,

    /// Zoom behavior
    #[serde(default)]
    pub view: ViewSettings,

    /// Box appearance
    #[serde(default)]
    pub display: DisplaySettings,

    /// Log verbosity level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Pointer interaction thresholds, in scene pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InteractionSettings {
    /// Band along each edge that turns a press into a resize
    #[serde(default = "default_edge_width")]
    pub edge_width: f64,

    /// Smallest side of a created box; smaller drags count as clicks
    #[serde(default = "default_min_box_size")]
    pub min_box_size: f64,
}

fn default_edge_width() -> f64 {
    constants::EDGE_WIDTH
}

fn default_min_box_size() -> f64 {
    constants::MIN_BOX_SIZE
}

impl Default for InteractionSettings {
    fn default() -> Self {
        Self {
            edge_width: default_edge_width(),
            min_box_size: default_min_box_size(),
        }
    }
}

/// Zoom steps and limits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewSettings {
    #[serde(default = "default_zoom_in_factor")]
    pub zoom_in_factor: f64,
    #[serde(default = "default_zoom_out_factor")]
    pub zoom_out_factor: f64,
    #[serde(default = "default_min_zoom")]
    pub min_zoom: f64,
    #[serde(default = "default_max_zoom")]
    pub max_zoom: f64,
}

fn default_zoom_in_factor() -> f64 {
    constants::ZOOM_IN_FACTOR
}

fn default_zoom_out_factor() -> f64 {
    constants::ZOOM_OUT_FACTOR
}

fn default_min_zoom() -> f64 {
    constants::MIN_ZOOM
}

fn default_max_zoom() -> f64 {
    constants::MAX_ZOOM
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            zoom_in_factor: default_zoom_in_factor(),
            zoom_out_factor: default_zoom_out_factor(),
            min_zoom: default_min_zoom(),
            max_zoom: default_max_zoom(),
        }
    }
}

/// Colors used for displayed boxes (RGB).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    /// Selected box
    pub highlight: [u8; 3],
    /// Machine-created box not yet reviewed, and boxes being drawn
    pub provisional: [u8; 3],
    /// Human-created or reviewed box
    pub confirmed: [u8; 3],
    /// Detail text overlay
    pub detail_text: [u8; 3],
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            highlight: [255, 0, 0],
            provisional: [0, 255, 0],
            confirmed: [255, 255, 0],
            detail_text: [255, 255, 0],
        }
    }
}

/// Box appearance settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplaySettings {
    #[serde(default)]
    pub palette: Palette,

    /// Outline width of displayed boxes
    #[serde(default = "default_pen_width")]
    pub pen_width: f32,

    /// Detail text point size as a fraction of box width
    #[serde(default = "default_detail_font_scale")]
    pub detail_font_scale: f64,
}

fn default_pen_width() -> f32 {
    constants::PEN_WIDTH
}

fn default_detail_font_scale() -> f64 {
    constants::DETAIL_FONT_SCALE
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            palette: Palette::default(),
            pen_width: default_pen_width(),
            detail_font_scale: default_detail_font_scale(),
        }
    }
}

impl EditorConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self {
            version: CONFIG_VERSION,
            interaction: InteractionSettings::default(),
            view: ViewSettings::default(),
            display: DisplaySettings::default(),
            log_level: LogLevel::default(),
        }
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;

        // Validate version compatibility
        if config.version > CONFIG_VERSION {
            return Err(ConfigError::VersionTooNew {
                file_version: config.version,
                supported_version: CONFIG_VERSION,
            });
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject values that would break the interaction model.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let checks = [
            ("interaction.edge_width", self.interaction.edge_width >= 0.0),
            ("interaction.min_box_size", self.interaction.min_box_size >= 0.0),
            ("view.zoom_in_factor", self.view.zoom_in_factor > 1.0),
            (
                "view.zoom_out_factor",
                self.view.zoom_out_factor > 0.0 && self.view.zoom_out_factor < 1.0,
            ),
            (
                "view.min_zoom",
                self.view.min_zoom > 0.0 && self.view.min_zoom <= self.view.max_zoom,
            ),
            ("display.detail_font_scale", self.display.detail_font_scale > 0.0),
        ];

        match checks.iter().find(|(_, ok)| !ok) {
            Some((field, _)) => Err(ConfigError::InvalidValue((*field).to_string())),
            None => Ok(()),
        }
    }

    /// Get the default filename for config export.
    pub fn default_filename() -> &'static str {
        "bboxee-config.json"
    }

    /// Get the default config file path.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn default_path() -> Option<std::path::PathBuf> {
        // Try to use XDG config directory, fall back to home directory
        if let Some(config_dir) = dirs::config_dir() {
            Some(config_dir.join("bboxee").join(Self::default_filename()))
        } else {
            dirs::home_dir().map(|home_dir| {
                home_dir
                    .join(".config")
                    .join("bboxee")
                    .join(Self::default_filename())
            })
        }
    }

    /// Load configuration from a file.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Save configuration to a file, creating parent directories.
    pub fn save_to_path(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = self.to_json()?;
        std::fs::write(path, json)?;
        log::info!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// Try to load configuration from the default path.
    /// Returns None if the file doesn't exist or can't be read.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_default_path() -> Option<Self> {
        let path = Self::default_path()?;
        if !path.exists() {
            log::debug!("No config file found at {:?}", path);
            return None;
        }

        match Self::load_from_path(&path) {
            Ok(config) => Some(config),
            Err(e) => {
                log::warn!("Failed to load config file {:?}: {}", path, e);
                None
            }
        }
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// JSON parsing error
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Configuration version is newer than supported
    #[error(
        "Configuration file version {file_version} is newer than supported version {supported_version}"
    )]
    VersionTooNew {
        file_version: u32,
        supported_version: u32,
    },

    /// A setting is out of its valid range
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    /// I/O error when reading/writing config
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}
