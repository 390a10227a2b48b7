// src/spec/fission.rs

//! `fission.yml`: named environments, each owning a map of functions.
//!
//! ```yaml
//! envs:
//!   node:
//!     env:
//!       name: nodejs
//!       image: fission/node-env
//!       builder: fission/node-builder
//!     functions:
//!       hello:
//!         name: hello
//!         handler: hello.zip
//!         entrypoint: hello.handler
//!         maxmemory: "128"
//!         minscale: "1"
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use super::{Function, name_or_key, read_document};
use crate::errors::Result;
use crate::fs::FileSystem;

/// File name of the Fission platform document.
pub const SPEC_FILE: &str = "fission.yml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FissionSpec {
    pub envs: BTreeMap<String, FissionEnv>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FissionEnv {
    pub env: EnvSpec,
    pub functions: BTreeMap<String, FissionFunction>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EnvSpec {
    pub name: String,
    pub image: String,
    pub builder: String,
}

/// One Fission function. Empty strings mean "let the platform decide".
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FissionFunction {
    pub name: String,
    pub handler: String,
    pub description: String,
    pub runtime: String,
    pub entrypoint: String,
    #[serde(rename = "maxmemory")]
    pub max_memory: String,
    #[serde(rename = "minmemory")]
    pub min_memory: String,
    #[serde(rename = "mincpu")]
    pub min_cpu: String,
    #[serde(rename = "maxcpu")]
    pub max_cpu: String,
    #[serde(rename = "minscale")]
    pub min_scale: String,
    #[serde(rename = "maxscale")]
    pub max_scale: String,
    #[serde(rename = "targetcpu")]
    pub target_cpu: String,
}

impl FissionFunction {
    pub fn summary(&self) -> Function {
        Function {
            name: self.name.clone(),
            handler: self.handler.clone(),
            description: self.description.clone(),
            runtime: self.runtime.clone(),
            memory: self.max_memory.clone(),
        }
    }
}

/// An environment with its functions, names resolved, sorted by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    pub spec: EnvSpec,
    pub functions: Vec<FissionFunction>,
}

impl FissionSpec {
    pub fn load(fs: &dyn FileSystem, dir: &Path) -> Result<Self> {
        read_document(fs, &dir.join(SPEC_FILE))
    }

    /// Flatten the keyed maps into environments ordered by resolved name.
    /// Entries sharing a name keep their key order.
    pub fn into_environments(self) -> Vec<Environment> {
        let mut environments: Vec<Environment> = self
            .envs
            .into_iter()
            .map(|(env_key, env)| {
                let spec = EnvSpec {
                    name: name_or_key(&env.env.name, &env_key),
                    ..env.env
                };
                let mut functions: Vec<FissionFunction> = env
                    .functions
                    .into_iter()
                    .map(|(fn_key, function)| FissionFunction {
                        name: name_or_key(&function.name, &fn_key),
                        ..function
                    })
                    .collect();
                functions.sort_by(|a, b| a.name.cmp(&b.name));
                Environment { spec, functions }
            })
            .collect();
        environments.sort_by(|a, b| a.spec.name.cmp(&b.spec.name));
        environments
    }
}
