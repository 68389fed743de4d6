//! External command execution.
//!
//! # Responsibilities
//! - Run a program to completion and capture exit code plus output
//! - Escalate to root for privileged commands
//!
//! # Design Decisions
//! - Blocking calls with no timeout; a hung command hangs the caller
//! - A non-zero exit is data, not an error: callers decide what it means
//! - Only failing to launch the program is a `CommandError`

pub mod system;

use std::fmt::{self, Debug};
use std::io;

use thiserror::Error;

pub use system::SystemRunner;

/// Outcome of a finished command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `-1` when the process was terminated by a signal.
    pub code: i32,
    /// Combined stdout and stderr.
    pub output: String,
}

impl CommandOutput {
    pub fn new(code: i32, output: impl Into<String>) -> Self {
        Self {
            code,
            output: output.into(),
        }
    }

    pub fn success(&self) -> bool {
        self.code == 0
    }
}

/// A command could not be started.
#[derive(Debug, Error)]
#[error("failed to run `{command}`: {source}")]
pub struct CommandError {
    pub command: CommandLine,
    #[source]
    pub source: io::Error,
}

/// Program plus arguments, kept for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandLine {
    pub fn new(program: &str, args: &[&str]) -> Self {
        Self {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }

    fn parts(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.program.as_str()).chain(self.args.iter().map(String::as_str))
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match shlex::try_join(self.parts()) {
            Ok(joined) => f.write_str(&joined),
            Err(_) => f.write_str(&self.parts().collect::<Vec<_>>().join(" ")),
        }
    }
}

/// Runs commands on behalf of the manager and its collaborators.
pub trait CommandRunner: Send + Sync + Debug {
    /// Run as the current process user.
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput, CommandError>;

    /// Run with root privileges.
    fn run_as_root(&self, program: &str, args: &[&str]) -> Result<CommandOutput, CommandError>;
}
