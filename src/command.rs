//! External command execution
//!
//! Every host mutation goes through a [`CommandRunner`], which turns a process
//! result into either captured output or a typed failure. Backends never spawn
//! processes themselves, so tests can swap in a recording runner.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::fmt;
use std::process::Command;
use tracing::debug;

/// A single external command to run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Program name (resolved via PATH)
    pub program: String,
    /// Arguments
    pub args: Vec<String>,
    /// Whether the command needs elevated privilege
    pub privileged: bool,
}

impl Invocation {
    /// Command that needs root
    pub fn privileged<I, S>(program: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.to_string(),
            args: args.into_iter().map(Into::into).collect(),
            privileged: true,
        }
    }

    /// Command that runs as the current user
    pub fn unprivileged<I, S>(program: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            privileged: false,
            ..Self::privileged(program, args)
        }
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Captured result of a successful command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Standard output
    pub stdout: String,
    /// Standard error
    pub stderr: String,
    /// Exit code (if available)
    pub exit_code: Option<i32>,
}

/// Runs external commands on behalf of the backends
pub trait CommandRunner {
    /// Run the command, failing with [`Error::CommandExecutionFailed`] on non-zero exit
    fn run(&self, invocation: &Invocation) -> Result<CommandOutput>;
}

impl<R: CommandRunner + ?Sized> CommandRunner for &R {
    fn run(&self, invocation: &Invocation) -> Result<CommandOutput> {
        (**self).run(invocation)
    }
}

/// How privileged commands gain root
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Privilege {
    /// Use sudo unless already running as root
    #[default]
    Auto,
    /// Always prefix privileged commands with sudo
    Sudo,
    /// Never escalate
    None,
}

impl Privilege {
    /// Whether privileged commands should be wrapped in sudo
    pub fn escalates(&self) -> bool {
        match self {
            Privilege::Auto => !nix::unistd::geteuid().is_root(),
            Privilege::Sudo => true,
            Privilege::None => false,
        }
    }
}

/// Runner that spawns real processes
#[derive(Debug, Clone)]
pub struct SystemRunner {
    escalate: bool,
}

impl SystemRunner {
    /// Create a runner honoring the privilege policy
    pub fn new(privilege: Privilege) -> Self {
        Self {
            escalate: privilege.escalates(),
        }
    }

    fn command(&self, invocation: &Invocation) -> Command {
        if invocation.privileged && self.escalate {
            let mut cmd = Command::new("sudo");
            cmd.arg(&invocation.program).args(&invocation.args);
            cmd
        } else {
            let mut cmd = Command::new(&invocation.program);
            cmd.args(&invocation.args);
            cmd
        }
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> Result<CommandOutput> {
        debug!(command = %invocation, escalate = invocation.privileged && self.escalate, "running");

        let output = self
            .command(invocation)
            .output()
            .map_err(|e| Error::CommandSpawn {
                command: invocation.to_string(),
                source: e,
            })?;

        let result = CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code: output.status.code(),
        };

        if output.status.success() {
            Ok(result)
        } else {
            Err(failure(invocation, &result))
        }
    }
}

/// Build the typed failure for a non-zero exit
pub fn failure(invocation: &Invocation, output: &CommandOutput) -> Error {
    let mut message = output.stderr.trim();
    if message.is_empty() {
        message = output.stdout.trim();
    }

    let stderr = match (message.is_empty(), output.exit_code) {
        (false, _) => message.to_string(),
        (true, Some(code)) => format!("exited with status {}", code),
        (true, None) => "terminated by signal".to_string(),
    };

    Error::CommandExecutionFailed {
        command: invocation.to_string(),
        stderr,
    }
}
