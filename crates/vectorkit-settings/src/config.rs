//! Configuration and settings management for VectorKit
//!
//! Provides configuration file handling and validation for the editing
//! tools. Supports JSON and TOML file formats; the format is picked from the
//! file extension.
//!
//! Configuration is organized into one section per engine:
//! - History (bounded snapshot sequence, diff threshold)
//! - Membrane brush (decoration size and spacing)
//! - Text on path (font size, offset, alignment)
//! - Right-angle arrow (arrowhead geometry, guide dash, grid)
//! - Eraser (stroke width)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, SettingsError, SettingsResult};

/// Undo/redo history settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistorySettings {
    /// Maximum number of snapshots kept; older ones are pruned from the front
    pub max_size: usize,
    /// A diff is kept only while its compressed size stays at or below
    /// this fraction of the full serialization size
    pub diff_threshold: f64,
    /// Every n-th step is stored as a full checkpoint
    pub checkpoint_interval: usize,
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self {
            max_size: 20,
            diff_threshold: 0.3,
            checkpoint_interval: 5,
        }
    }
}

/// Membrane brush settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrushSettings {
    /// Size of one decoration instance
    pub icon_size: f64,
    /// Gap between consecutive instances
    pub spacing: f64,
    /// Rotate each instance to the local path tangent
    pub rotate_to_path: bool,
    /// Emit a mirrored second row on commit
    pub double_sided: bool,
    /// Opacity of preview instances while drawing
    pub preview_opacity: f64,
}

impl Default for BrushSettings {
    fn default() -> Self {
        Self {
            icon_size: 20.0,
            spacing: 5.0,
            rotate_to_path: true,
            double_sided: false,
            preview_opacity: 0.5,
        }
    }
}

/// Text-on-path defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextPathSettings {
    pub font_size: f64,
    /// Perpendicular distance between the path and the glyph baseline
    pub offset: f64,
    /// Where along the path the text starts, 0.0 to 1.0
    pub start_alignment: f64,
    /// Place glyphs on the other side of the path
    pub flip: bool,
}

impl Default for TextPathSettings {
    fn default() -> Self {
        Self {
            font_size: 16.0,
            offset: 0.0,
            start_alignment: 0.0,
            flip: false,
        }
    }
}

/// Right-angle arrow settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArrowSettings {
    pub head_length: f64,
    /// Half-angle of the arrowhead in degrees
    pub head_angle_deg: f64,
    pub stroke_width: f64,
    pub stroke: String,
    /// Snap clicked points to this grid when set
    pub grid_size: Option<f64>,
    /// Dash pattern of the preview guides
    pub dash: Vec<f64>,
}

impl Default for ArrowSettings {
    fn default() -> Self {
        Self {
            head_length: 15.0,
            head_angle_deg: 25.0,
            stroke_width: 2.0,
            stroke: "#000000".to_string(),
            grid_size: None,
            dash: vec![5.0, 5.0],
        }
    }
}

/// Eraser settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EraserSettings {
    pub stroke_width: f64,
}

impl Default for EraserSettings {
    fn default() -> Self {
        Self { stroke_width: 20.0 }
    }
}

/// Complete tool configuration
///
/// Aggregates all settings sections and provides file I/O operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub history: HistorySettings,
    pub brush: BrushSettings,
    pub text_path: TextPathSettings,
    pub arrow: ArrowSettings,
    pub eraser: EraserSettings,
}

/// Platform-specific location of the default config file
pub fn default_config_path() -> SettingsResult<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join("vectorkit").join("config.toml"))
        .ok_or_else(|| {
            SettingsError::ConfigDirectory("no config directory on this platform".to_string())
        })
}

enum FileFormat {
    Json,
    Toml,
}

fn format_of(path: &Path) -> SettingsResult<FileFormat> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => Ok(FileFormat::Json),
        Some("toml") => Ok(FileFormat::Toml),
        other => Err(ConfigError::UnsupportedFormat(other.unwrap_or("").to_string()).into()),
    }
}

fn out_of_range(key: &str, value: impl ToString) -> SettingsError {
    ConfigError::ValueOutOfRange {
        key: key.to_string(),
        value: value.to_string(),
    }
    .into()
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = format_of(path)?;
        let content = std::fs::read_to_string(path)
            .map_err(|e| SettingsError::LoadError(format!("{}: {}", path.display(), e)))?;

        let config: Self = match format {
            FileFormat::Json => serde_json::from_str(&content)?,
            FileFormat::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Load the config at `path`, falling back to defaults when the file does not exist
    pub fn load_or_default(path: &Path) -> SettingsResult<Self> {
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load_from_file(path)
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match format_of(path)? {
            FileFormat::Json => serde_json::to_string_pretty(self)?,
            FileFormat::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)
            .map_err(|e| SettingsError::SaveError(format!("{}: {}", path.display(), e)))?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        let history = &self.history;
        if history.max_size == 0 {
            return Err(out_of_range("history.max_size", history.max_size));
        }
        if history.checkpoint_interval == 0 {
            return Err(out_of_range(
                "history.checkpoint_interval",
                history.checkpoint_interval,
            ));
        }
        if !(history.diff_threshold > 0.0 && history.diff_threshold <= 1.0) {
            return Err(out_of_range(
                "history.diff_threshold",
                history.diff_threshold,
            ));
        }

        if self.brush.icon_size <= 0.0 {
            return Err(out_of_range("brush.icon_size", self.brush.icon_size));
        }
        if self.brush.spacing < 0.0 {
            return Err(out_of_range("brush.spacing", self.brush.spacing));
        }
        if !(0.0..=1.0).contains(&self.brush.preview_opacity) {
            return Err(out_of_range(
                "brush.preview_opacity",
                self.brush.preview_opacity,
            ));
        }

        if self.text_path.font_size <= 0.0 {
            return Err(out_of_range("text_path.font_size", self.text_path.font_size));
        }
        if !(0.0..=1.0).contains(&self.text_path.start_alignment) {
            return Err(out_of_range(
                "text_path.start_alignment",
                self.text_path.start_alignment,
            ));
        }

        if self.arrow.head_length <= 0.0 {
            return Err(out_of_range("arrow.head_length", self.arrow.head_length));
        }
        if !(self.arrow.head_angle_deg > 0.0 && self.arrow.head_angle_deg < 90.0) {
            return Err(out_of_range(
                "arrow.head_angle_deg",
                self.arrow.head_angle_deg,
            ));
        }
        if let Some(grid) = self.arrow.grid_size {
            if grid <= 0.0 {
                return Err(out_of_range("arrow.grid_size", grid));
            }
        }

        if self.eraser.stroke_width <= 0.0 {
            return Err(out_of_range("eraser.stroke_width", self.eraser.stroke_width));
        }

        Ok(())
    }
}
