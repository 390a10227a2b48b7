#![allow(dead_code)]

use std::path::{Path, PathBuf};

use faas_stacks::fs::MemoryFileSystem;
use faas_stacks::spec::STACK_FILE;

/// Builder for an in-memory stack directory.
pub struct StackFiles {
    dir: PathBuf,
    fs: MemoryFileSystem,
}

impl StackFiles {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            fs: MemoryFileSystem::new(),
        }
    }

    /// Write `stack.yaml`.
    pub fn with_stack(self, name: &str, project: &str, stage: &str) -> Self {
        let contents = format!("name: {name}\nproject: {project}\nstage: {stage}\n");
        self.with_file(STACK_FILE, &contents)
    }

    /// Write `contents` to `file_name` inside the stack directory.
    pub fn with_file(self, file_name: &str, contents: &str) -> Self {
        self.fs.add_file(self.dir.join(file_name), contents);
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn build(self) -> (PathBuf, MemoryFileSystem) {
        (self.dir, self.fs)
    }
}
