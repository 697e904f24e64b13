//! Linux dummy interfaces
//!
//! The kernel creates the link under the caller's name directly and `ip`
//! accepts CIDR notation, so no discovery or netmask math is needed.

use super::Undo;
use crate::command::{CommandRunner, Invocation};
use crate::error::Result;
use crate::interface::InterfaceSpec;

/// iproute2-based backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LinuxBackend;

impl LinuxBackend {
    /// Add the dummy link, bring it up, then assign the address if any
    pub fn create<R: CommandRunner>(
        &self,
        runner: &R,
        spec: &InterfaceSpec,
        undo: &mut Undo,
    ) -> Result<()> {
        let name = spec.name.as_str();

        runner.run(&Invocation::privileged(
            "ip",
            ["link", "add", name, "type", "dummy"],
        ))?;
        undo.push(Self::teardown(name));

        runner.run(&Invocation::privileged("ip", ["link", "set", name, "up"]))?;

        if let Some(address) = &spec.address {
            runner.run(&Invocation::privileged(
                "ip",
                ["addr", "add", address.as_str(), "dev", name],
            ))?;
        }

        Ok(())
    }

    pub fn teardown(id: &str) -> Invocation {
        Invocation::privileged("ip", ["link", "delete", id])
    }
}
