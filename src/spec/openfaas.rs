// src/spec/openfaas.rs

//! `openfaas.yml`: the faas-cli stack file. The map key is the function
//! name; memory comes from `limits` and an optional `autoscaling` block
//! asks for a horizontal pod autoscaler.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use super::{Function, read_document};
use crate::errors::Result;
use crate::fs::FileSystem;

/// File name of the faas-cli stack file.
pub const SPEC_FILE: &str = "openfaas.yml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OpenFaasSpec {
    pub functions: BTreeMap<String, OpenFaasFunction>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct OpenFaasFunction {
    pub handler: String,
    pub description: String,
    pub lang: String,
    pub limits: Limits,
    pub autoscaling: Option<Autoscaling>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Limits {
    pub memory: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Autoscaling {
    pub min: String,
    pub max: String,
    pub target_cpu: String,
}

/// A function paired with the name it is deployed under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedFunction {
    pub name: String,
    pub function: OpenFaasFunction,
}

impl NamedFunction {
    pub fn summary(&self) -> Function {
        Function {
            name: self.name.clone(),
            handler: self.function.handler.clone(),
            description: self.function.description.clone(),
            runtime: self.function.lang.clone(),
            memory: self.function.limits.memory.clone(),
        }
    }
}

impl OpenFaasSpec {
    pub fn load(fs: &dyn FileSystem, dir: &Path) -> Result<Self> {
        read_document(fs, &dir.join(SPEC_FILE))
    }

    pub fn into_named_functions(self) -> Vec<NamedFunction> {
        self.functions
            .into_iter()
            .map(|(name, function)| NamedFunction { name, function })
            .collect()
    }
}
