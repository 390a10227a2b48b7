// src/spec/mod.rs

//! Stack documents and how they are loaded.
//!
//! Every stack directory holds a platform-agnostic `stack.yaml` plus one
//! platform document. The per-backend modules describe the platform
//! documents; this module holds the shared reading helpers.
//!
//! Keyed maps are deserialized into `BTreeMap`s and the resolved entries are
//! sorted by name, so command order and probe order follow function names.

pub mod fission;
pub mod knative;
pub mod kubeless;
pub mod openfaas;
pub mod overlay;
pub mod stack_info;

use std::path::Path;

use serde::de::DeserializeOwned;

use crate::errors::{Result, StackError};
use crate::fs::FileSystem;

pub use overlay::{SourceDefaults, non_empty_or};
pub use stack_info::{STACK_FILE, StackInfo};

/// Summary of one deployed function: the unit that readiness is tracked for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Function {
    pub name: String,
    pub handler: String,
    pub description: String,
    pub runtime: String,
    pub memory: String,
}

impl Function {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Read a file through `fs`, mapping failures to a load error.
pub fn read_raw(fs: &dyn FileSystem, path: &Path) -> Result<String> {
    fs.read_to_string(path).map_err(|source| StackError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Read and deserialize a single YAML document.
pub fn read_document<T: DeserializeOwned>(fs: &dyn FileSystem, path: &Path) -> Result<T> {
    let contents = read_raw(fs, path)?;
    serde_yaml::from_str(&contents).map_err(|source| StackError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Entries name themselves through a `name` field; the map key stands in
/// when that field is left empty.
pub(crate) fn name_or_key(name: &str, key: &str) -> String {
    non_empty_or(name, key)
}
