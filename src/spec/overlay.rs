// src/spec/overlay.rs

//! Two-level value resolution: stack-wide defaults overlaid by per-function
//! overrides, field by field, where a non-empty override wins.

/// Return `value` unless it is empty, in which case `fallback`.
pub fn non_empty_or(value: &str, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}

/// Source-related settings a function inherits from its stack.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceDefaults {
    /// Handler source file.
    pub file: String,
    /// Dependency manifest passed to the platform.
    pub dependencies: String,
    /// Environment variables for the function runtime.
    pub env: String,
}

impl SourceDefaults {
    /// Merge `overrides` on top of `self`.
    pub fn overlay(&self, overrides: &SourceDefaults) -> SourceDefaults {
        SourceDefaults {
            file: non_empty_or(&overrides.file, &self.file),
            dependencies: non_empty_or(&overrides.dependencies, &self.dependencies),
            env: non_empty_or(&overrides.env, &self.env),
        }
    }
}
