//! Platform backends for interface provisioning
//!
//! Provides:
//! - Linux dummy links via iproute2
//! - macOS bridges renamed to the requested name via ifconfig
//! - Compensation of partially applied creates

pub mod linux;
pub mod macos;

pub use linux::LinuxBackend;
pub use macos::MacosBackend;

use crate::command::{CommandRunner, Invocation};
use crate::error::Result;
use crate::interface::InterfaceSpec;
use crate::platform::Platform;
use tracing::{debug, warn};

/// Backend selected by host platform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Linux(LinuxBackend),
    Darwin(MacosBackend),
}

impl Backend {
    pub fn for_platform(platform: Platform) -> Self {
        match platform {
            Platform::Linux => Backend::Linux(LinuxBackend),
            Platform::Darwin => Backend::Darwin(MacosBackend),
        }
    }

    /// Run the ordered create sequence, stopping at the first failed step
    ///
    /// With `rollback` set, steps already applied are undone in reverse
    /// order before the error is returned.
    pub fn create<R: CommandRunner>(
        &self,
        runner: &R,
        spec: &InterfaceSpec,
        rollback: bool,
    ) -> Result<()> {
        let mut undo = Undo::default();

        let result = match self {
            Backend::Linux(backend) => backend.create(runner, spec, &mut undo),
            Backend::Darwin(backend) => backend.create(runner, spec, &mut undo),
        };

        if result.is_err() {
            if rollback {
                undo.run(runner, &spec.name);
            } else if !undo.is_empty() {
                warn!(
                    interface = %spec.name,
                    "create failed part way; rollback disabled, host may hold a half-configured interface"
                );
            }
        }

        result
    }

    /// Remove the interface named `id`
    pub fn delete<R: CommandRunner>(&self, runner: &R, id: &str) -> Result<()> {
        runner.run(&self.teardown(id))?;
        Ok(())
    }

    /// Command that removes the interface named `id`
    pub fn teardown(&self, id: &str) -> Invocation {
        match self {
            Backend::Linux(_) => LinuxBackend::teardown(id),
            Backend::Darwin(_) => MacosBackend::teardown(id),
        }
    }
}

/// Compensating commands recorded while a create progresses
#[derive(Debug, Default)]
pub struct Undo {
    actions: Vec<Invocation>,
}

impl Undo {
    pub fn push(&mut self, action: Invocation) {
        self.actions.push(action);
    }

    /// Drop the most recent action (it no longer applies)
    pub fn pop(&mut self) -> Option<Invocation> {
        self.actions.pop()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Execute recorded actions newest first; failures are only logged
    fn run<R: CommandRunner>(self, runner: &R, name: &str) {
        for action in self.actions.into_iter().rev() {
            debug!(interface = %name, command = %action, "rolling back");
            if let Err(e) = runner.run(&action) {
                warn!(interface = %name, command = %action, error = %e, "rollback step failed");
            }
        }
    }
}
