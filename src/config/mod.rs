// src/config/mod.rs

//! Tool settings.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a settings file from disk (`loader.rs`).
//! - Validate it into typed `Settings` (`validate.rs`, `duration.rs`).

pub mod duration;
pub mod loader;
pub mod model;
pub mod validate;

pub use duration::parse_duration;
pub use loader::{default_config_path, load_and_validate, load_from_path, load_settings};
pub use model::{
    FissionSettings, OpenFaasSettings, PlatformSettings, PollingSettings, RawSettings,
    RunnerSettings, Settings,
};
