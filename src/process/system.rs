//! Commands run through `std::process`.

use std::process::Command;

use super::{CommandError, CommandLine, CommandOutput, CommandRunner};

/// Runs real processes, using `sudo` for privileged commands when needed.
#[derive(Debug, Clone)]
pub struct SystemRunner {
    sudo: String,
}

impl SystemRunner {
    pub fn new() -> Self {
        Self {
            sudo: "sudo".to_string(),
        }
    }

    fn execute(&self, line: CommandLine) -> Result<CommandOutput, CommandError> {
        tracing::debug!(command = %line, "Running command");

        let output = match Command::new(&line.program).args(&line.args).output() {
            Ok(output) => output,
            Err(source) => return Err(CommandError { command: line, source }),
        };

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));
        let code = output.status.code().unwrap_or(-1);

        tracing::debug!(command = %line, code, "Command finished");
        Ok(CommandOutput::new(code, combined))
    }
}

impl Default for SystemRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput, CommandError> {
        self.execute(CommandLine::new(program, args))
    }

    fn run_as_root(&self, program: &str, args: &[&str]) -> Result<CommandOutput, CommandError> {
        if is_root() {
            return self.run(program, args);
        }
        let mut escalated = Vec::with_capacity(args.len() + 1);
        escalated.push(program);
        escalated.extend_from_slice(args);
        self.execute(CommandLine::new(&self.sudo, &escalated))
    }
}

#[cfg(unix)]
fn is_root() -> bool {
    nix::unistd::geteuid().is_root()
}

#[cfg(not(unix))]
fn is_root() -> bool {
    false
}
