// src/exec/invocation.rs

//! Description of a single external command and what came back from it.

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// One external command: program, arguments, working directory and extra
/// environment variables.
///
/// Extra variables are added on top of the inherited process environment,
/// they never replace it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub dir: PathBuf,
    pub env: Vec<(String, String)>,
}

impl Invocation {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            dir: PathBuf::from("."),
            env: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Append `flag value` as two separate arguments.
    ///
    /// The value is passed through even when empty: the platform CLIs read an
    /// empty value as "use the platform default".
    pub fn flag(self, flag: &str, value: impl Into<String>) -> Self {
        self.arg(flag).arg(value)
    }

    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.dir = dir.as_ref().to_path_buf();
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// Program and arguments joined by spaces, for logs and assertions.
    pub fn command_line(&self) -> String {
        let mut line = self.program.clone();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.command_line())
    }
}

/// Captured output of a successful command, trimmed of surrounding whitespace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn new(stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }
}

/// Failure of a single external command.
///
/// Platform error text is carried verbatim in `stderr`; nothing here
/// reinterprets it.
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("failed to start `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed waiting for `{command}`: {source}")]
    Wait {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to capture stdout or stderr of `{command}`: {source}")]
    Capture {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` exited with {}: {stderr}", exit_code_label(.code))]
    Exit {
        command: String,
        code: Option<i32>,
        stdout: String,
        stderr: String,
    },
}

impl CommandError {
    /// Captured stderr of the failed command, if it got far enough to have any.
    pub fn stderr(&self) -> Option<&str> {
        match self {
            CommandError::Exit { stderr, .. } => Some(stderr),
            _ => None,
        }
    }
}

fn exit_code_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "no exit code (terminated by signal)".to_string(),
    }
}
