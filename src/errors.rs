// src/errors.rs

//! Crate-wide error type and result alias.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::exec::CommandError;

#[derive(Error, Debug)]
pub enum StackError {
    #[error("failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("malformed document {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("malformed document {path:?}: {reason}")]
    Invalid { path: PathBuf, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Command(#[from] CommandError),

    #[error("readiness probe for '{function}' failed: {source}")]
    Probe {
        function: String,
        #[source]
        source: CommandError,
    },

    #[error("functions of stack '{stack}' not ready after {waited:?}")]
    ReadinessTimeout { stack: String, waited: Duration },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, StackError>;
