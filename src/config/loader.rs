// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::model::{RawSettings, Settings};
use crate::errors::Result;

/// Load a settings file from a given path and return the raw `RawSettings`.
///
/// This only performs TOML deserialization; use [`load_and_validate`] to get
/// typed [`Settings`].
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawSettings> {
    let contents = fs::read_to_string(path.as_ref())?;
    let raw: RawSettings = toml::from_str(&contents)?;
    Ok(raw)
}

/// Load a settings file from path and validate it.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<Settings> {
    let raw = load_from_path(&path)?;
    Settings::try_from(raw)
}

/// Resolve the settings for a run.
///
/// - An explicitly given path must exist.
/// - Otherwise [`default_config_path`] is used if present, and built-in
///   defaults if not.
pub fn load_settings(explicit: Option<&Path>) -> Result<Settings> {
    match explicit {
        Some(path) => load_and_validate(path),
        None => {
            let path = default_config_path();
            if path.is_file() {
                load_and_validate(path)
            } else {
                Ok(Settings::default())
            }
        }
    }
}

/// `faas-stacks.toml` in the current working directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("faas-stacks.toml")
}
