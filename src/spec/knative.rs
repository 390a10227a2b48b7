// src/spec/knative.rs

//! `service.yml`: a stream of Knative Service manifests, one per function.
//!
//! Only `metadata.name` is read; the manifest itself is handed to
//! `kubectl apply` untouched.

use std::path::Path;

use serde::Deserialize;

use super::{Function, read_raw};
use crate::errors::{Result, StackError};
use crate::fs::FileSystem;

/// File name of the Knative service manifest.
pub const SERVICE_FILE: &str = "service.yml";

#[derive(Debug, Default, Deserialize)]
struct KnativeService {
    #[serde(default)]
    metadata: Metadata,
}

#[derive(Debug, Default, Deserialize)]
struct Metadata {
    #[serde(default)]
    name: String,
}

/// Read every service in the manifest, in document order.
pub fn load_services(fs: &dyn FileSystem, dir: &Path) -> Result<Vec<Function>> {
    let path = dir.join(SERVICE_FILE);
    let contents = read_raw(fs, &path)?;
    parse_services(&path, &contents)
}

pub fn parse_services(path: &Path, contents: &str) -> Result<Vec<Function>> {
    let parse_error = |source: serde_yaml::Error| StackError::Parse {
        path: path.to_path_buf(),
        source,
    };

    let mut functions = Vec::new();
    for (index, document) in serde_yaml::Deserializer::from_str(contents).enumerate() {
        let value = serde_yaml::Value::deserialize(document).map_err(parse_error)?;
        if value.is_null() {
            continue;
        }

        let service: KnativeService = serde_yaml::from_value(value).map_err(parse_error)?;
        if service.metadata.name.is_empty() {
            return Err(StackError::Invalid {
                path: path.to_path_buf(),
                reason: format!("document {} has no metadata.name", index + 1),
            });
        }
        functions.push(Function::named(service.metadata.name));
    }

    Ok(functions)
}
