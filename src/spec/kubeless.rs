// src/spec/kubeless.rs

//! `kubeless.yml`: stack-wide source defaults plus a map of functions that
//! may override them.
//!
//! ```yaml
//! hostname: kubeless.example.com
//! file: handler.js
//! dependencies: package.json
//! functions:
//!   hello:
//!     name: hello
//!     handler: handler.hello
//!     runtime: nodejs8
//!     memory: 128Mi
//!     path: /hello
//!     min-scale: "1"
//!     max-scale: "3"
//!     target-cpu: "70"
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use super::{Function, SourceDefaults, name_or_key, read_document};
use crate::errors::Result;
use crate::fs::FileSystem;

/// File name of the Kubeless platform document.
pub const SPEC_FILE: &str = "kubeless.yml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct KubelessSpec {
    pub hostname: String,
    pub file: String,
    pub dependencies: String,
    pub env: String,
    pub functions: BTreeMap<String, KubelessFunction>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct KubelessFunction {
    pub name: String,
    pub handler: String,
    pub description: String,
    pub runtime: String,
    pub memory: String,
    pub path: String,
    pub cpu: String,
    pub min_scale: String,
    pub max_scale: String,
    pub target_cpu: String,
    pub env: String,
    pub file: String,
    pub dependencies: String,
}

impl KubelessFunction {
    pub fn summary(&self) -> Function {
        Function {
            name: self.name.clone(),
            handler: self.handler.clone(),
            description: self.description.clone(),
            runtime: self.runtime.clone(),
            memory: self.memory.clone(),
        }
    }

    pub fn overrides(&self) -> SourceDefaults {
        SourceDefaults {
            file: self.file.clone(),
            dependencies: self.dependencies.clone(),
            env: self.env.clone(),
        }
    }

    /// An autoscaler is only attached when some scaling field is set.
    pub fn is_autoscaled(&self) -> bool {
        !(self.min_scale.is_empty() && self.max_scale.is_empty() && self.target_cpu.is_empty())
    }
}

impl KubelessSpec {
    pub fn load(fs: &dyn FileSystem, dir: &Path) -> Result<Self> {
        read_document(fs, &dir.join(SPEC_FILE))
    }

    pub fn defaults(&self) -> SourceDefaults {
        SourceDefaults {
            file: self.file.clone(),
            dependencies: self.dependencies.clone(),
            env: self.env.clone(),
        }
    }

    /// Functions with names resolved, sorted by name.
    pub fn ordered_functions(&self) -> Vec<KubelessFunction> {
        let mut functions: Vec<KubelessFunction> = self
            .functions
            .iter()
            .map(|(key, function)| KubelessFunction {
                name: name_or_key(&function.name, key),
                ..function.clone()
            })
            .collect();
        functions.sort_by(|a, b| a.name.cmp(&b.name));
        functions
    }
}
