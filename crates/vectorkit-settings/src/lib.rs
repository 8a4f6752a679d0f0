//! VectorKit Settings Crate
//!
//! Handles tool and history configuration, loaded from TOML or JSON files.

pub mod config;
pub mod error;

pub use config::{
    default_config_path, ArrowSettings, BrushSettings, Config, EraserSettings, HistorySettings,
    TextPathSettings,
};
pub use error::{ConfigError, SettingsError, SettingsResult};
