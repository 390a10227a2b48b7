// src/spec/stack_info.rs

use std::path::Path;

use serde::Deserialize;

use crate::errors::Result;
use crate::fs::FileSystem;

/// File name of the platform-agnostic stack descriptor.
pub const STACK_FILE: &str = "stack.yaml";

/// Identity of a deployable stack, as read from `stack.yaml`.
///
/// ```yaml
/// name: hello-stack
/// project: faastest
/// stage: dev
/// ```
///
/// All three keys are required.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StackInfo {
    pub name: String,
    pub project: String,
    pub stage: String,
}

impl StackInfo {
    pub fn load(fs: &dyn FileSystem, dir: &Path) -> Result<Self> {
        super::read_document(fs, &dir.join(STACK_FILE))
    }
}
