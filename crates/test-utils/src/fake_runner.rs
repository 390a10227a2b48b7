use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex};

use faas_stacks::exec::{CommandError, CommandOutput, CommandRunner, Invocation, RunFuture};

/// One scripted answer to a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Exit 0 with this stdout.
    Stdout(String),
    /// Exit non-zero with this stderr.
    Exit { code: i32, stderr: String },
    /// The program could not be started at all.
    SpawnFailure,
}

impl Reply {
    pub fn stdout(stdout: &str) -> Self {
        Reply::Stdout(stdout.to_string())
    }

    pub fn exit(code: i32, stderr: &str) -> Self {
        Reply::Exit {
            code,
            stderr: stderr.to_string(),
        }
    }

    fn into_result(self, command: String) -> Result<CommandOutput, CommandError> {
        match self {
            Reply::Stdout(stdout) => Ok(CommandOutput::new(stdout, "")),
            Reply::Exit { code, stderr } => Err(CommandError::Exit {
                command,
                code: Some(code),
                stdout: String::new(),
                stderr,
            }),
            Reply::SpawnFailure => Err(CommandError::Spawn {
                command,
                source: io::Error::new(io::ErrorKind::NotFound, "no such program"),
            }),
        }
    }
}

#[derive(Debug)]
struct Script {
    pattern: String,
    replies: VecDeque<Reply>,
}

impl Script {
    /// Next reply; the last one repeats forever.
    fn next(&mut self) -> Reply {
        if self.replies.len() > 1 {
            self.replies.pop_front().unwrap()
        } else {
            self.replies.front().cloned().unwrap()
        }
    }
}

#[derive(Debug, Default)]
struct State {
    calls: Vec<Invocation>,
    scripts: Vec<Script>,
}

/// A fake command runner that:
/// - records every invocation it is handed
/// - answers from scripts matched by command-line substring, most recently
///   added script first
/// - answers anything unscripted with success and empty output.
#[derive(Debug, Clone, Default)]
pub struct FakeRunner {
    state: Arc<Mutex<State>>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// A runner whose `kubectl ... -o jsonpath=...` status probes all print
    /// `True` straight away.
    pub fn all_ready() -> Self {
        Self::new().reply("jsonpath=", "True")
    }

    /// Always answer commands containing `pattern` with `stdout`.
    pub fn reply(self, pattern: &str, stdout: &str) -> Self {
        self.sequence(pattern, vec![Reply::stdout(stdout)])
    }

    /// Always fail commands containing `pattern` with exit code 1.
    pub fn fail(self, pattern: &str, stderr: &str) -> Self {
        self.sequence(pattern, vec![Reply::exit(1, stderr)])
    }

    /// Answer successive commands containing `pattern` with `replies`, the
    /// last one repeating.
    pub fn sequence(self, pattern: &str, replies: Vec<Reply>) -> Self {
        assert!(!replies.is_empty(), "a script needs at least one reply");
        self.state.lock().unwrap().scripts.push(Script {
            pattern: pattern.to_string(),
            replies: replies.into(),
        });
        self
    }

    /// Every invocation so far, in order.
    pub fn invocations(&self) -> Vec<Invocation> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Command lines of every invocation so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.invocations()
            .iter()
            .map(Invocation::command_line)
            .collect()
    }

    /// Command lines containing `pattern`, in order.
    pub fn calls_matching(&self, pattern: &str) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|line| line.contains(pattern))
            .collect()
    }

    /// Command lines that are not readiness probes.
    pub fn actions(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|line| !line.contains("jsonpath=") && !line.contains("faas-cli describe"))
            .collect()
    }

    fn answer(&self, invocation: Invocation) -> Result<CommandOutput, CommandError> {
        let command = invocation.command_line();
        let mut state = self.state.lock().unwrap();
        state.calls.push(invocation);

        let reply = state
            .scripts
            .iter_mut()
            .rev()
            .find(|script| command.contains(&script.pattern))
            .map(Script::next)
            .unwrap_or_else(|| Reply::stdout(""));

        reply.into_result(command)
    }
}

impl CommandRunner for FakeRunner {
    fn run(&self, invocation: Invocation) -> RunFuture<'_> {
        let result = self.answer(invocation);
        Box::pin(async move { result })
    }
}
