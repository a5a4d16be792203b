//! Reroll settings: costs and presentation toggles, loaded from TOML.

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::RerollKind;

pub const SETTINGS_PATH_ENV: &str = "MAP_REROLL_SETTINGS_PATH";

const BUILTIN_SETTINGS: &str = include_str!("data/reroll_settings.toml");

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RerollSettings {
    pub map_reroll_cost: f64,
    pub geyser_reroll_cost: f64,
    pub enable_interface: bool,
    pub use_silly_loading_messages: bool,
    pub num_loading_messages: u32,
    pub log_consumed_resources: bool,
}

impl Default for RerollSettings {
    fn default() -> Self {
        Self {
            map_reroll_cost: 15.0,
            geyser_reroll_cost: 5.0,
            enable_interface: true,
            use_silly_loading_messages: true,
            num_loading_messages: 8,
            log_consumed_resources: false,
        }
    }
}

impl RerollSettings {
    pub fn cost_of(&self, kind: RerollKind) -> f64 {
        match kind {
            RerollKind::Map => self.map_reroll_cost,
            RerollKind::Geyser => self.geyser_reroll_cost,
        }
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to parse reroll settings: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to read reroll settings from {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{field} must be a percentage in [0, 100], got {value}")]
    InvalidCost { field: &'static str, value: f64 },
}

/// Loads settings from `MAP_REROLL_SETTINGS_PATH` when set, falling back to the built-in file.
pub fn load_settings_from_env() -> RerollSettings {
    if let Some(path) = env::var(SETTINGS_PATH_ENV).ok().map(PathBuf::from) {
        match read_settings_from_file(&path) {
            Ok(settings) => return settings,
            Err(err) => {
                tracing::warn!(
                    target: "map_reroll::settings",
                    path = %path.display(),
                    error = %err,
                    "settings.load_failed"
                );
            }
        }
    }
    builtin_settings()
}

pub fn builtin_settings() -> RerollSettings {
    read_settings_from_str(BUILTIN_SETTINGS).unwrap_or_else(|err| {
        tracing::error!(target: "map_reroll::settings", error = %err, "settings.builtin_invalid");
        RerollSettings::default()
    })
}

pub fn read_settings_from_file(path: &Path) -> Result<RerollSettings, SettingsError> {
    let contents = fs::read_to_string(path)
        .map_err(|source| SettingsError::Read { path: path.to_path_buf(), source })?;
    read_settings_from_str(&contents)
}

pub fn read_settings_from_str(data: &str) -> Result<RerollSettings, SettingsError> {
    let settings: RerollSettings = toml::from_str(data)?;
    validate_cost("map_reroll_cost", settings.map_reroll_cost)?;
    validate_cost("geyser_reroll_cost", settings.geyser_reroll_cost)?;
    Ok(settings)
}

fn validate_cost(field: &'static str, value: f64) -> Result<(), SettingsError> {
    if (0.0..=100.0).contains(&value) {
        Ok(())
    } else {
        Err(SettingsError::InvalidCost { field, value })
    }
}
