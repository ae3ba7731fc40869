//! Settings persistence
//!
//! Saves and loads [`NotationSettings`] to/from a JSON file.
//!
//! # File Location
//!
//! Settings are stored in `settings.json` in the user's configuration
//! directory, e.g. `~/.config/xfchess-pgn/settings.json` on Linux. If the
//! platform has no such directory the file is looked up in the current
//! directory instead. Callers may also pass an explicit path.
//!
//! # Error Handling
//!
//! - [`load_settings`] falls back to defaults and logs why
//! - [`read_settings`] and [`save_settings`] report failures as [`CoreError`](super::CoreError)

use super::error::CoreResult;
use crate::notation::GameOutcome;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Settings filename
const SETTINGS_FILENAME: &str = "settings.json";

/// Output preferences for written games
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotationSettings {
    /// Wrap movetext at this many characters; 0 disables wrapping
    pub line_width: usize,
    /// Write the tag block in front of the movetext
    pub include_tags: bool,
    /// Result written when the source game has none
    pub default_result: GameOutcome,
}

impl Default for NotationSettings {
    fn default() -> Self {
        Self {
            line_width: 80,
            include_tags: true,
            default_result: GameOutcome::Unknown,
        }
    }
}

/// Path of `settings.json` in the user's configuration directory
///
/// Falls back to a local `settings.json` if the system config dir cannot be found.
pub fn settings_path() -> PathBuf {
    if let Some(proj_dirs) = ProjectDirs::from("com", "trilltino", "xfchess-pgn") {
        proj_dirs.config_dir().join(SETTINGS_FILENAME)
    } else {
        PathBuf::from(SETTINGS_FILENAME)
    }
}

/// Load settings, using defaults if the file is missing or unreadable
///
/// `path` overrides the default location.
pub fn load_settings(path: Option<&Path>) -> NotationSettings {
    let settings_path = path.map_or_else(settings_path, Path::to_path_buf);

    if !settings_path.exists() {
        info!(
            "[SETTINGS] No settings file found at {:?}. Using defaults.",
            settings_path
        );
        return NotationSettings::default();
    }

    match read_settings(&settings_path) {
        Ok(settings) => {
            info!("[SETTINGS] Loaded settings from {:?}", settings_path);
            settings
        }
        Err(e) => {
            warn!(
                "[SETTINGS] Failed to load settings file at {:?}: {}. Using defaults.",
                settings_path, e
            );
            NotationSettings::default()
        }
    }
}

/// Read and parse a settings file
pub fn read_settings(path: &Path) -> CoreResult<NotationSettings> {
    let contents = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

/// Write settings as pretty JSON, creating the directory if needed
pub fn save_settings(settings: &NotationSettings, path: Option<&Path>) -> CoreResult<PathBuf> {
    let settings_path = path.map_or_else(settings_path, Path::to_path_buf);

    if let Some(parent) = settings_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    let json = serde_json::to_string_pretty(settings)?;
    fs::write(&settings_path, json)?;
    info!("[SETTINGS] Saved settings to {:?}", settings_path);
    Ok(settings_path)
}
