//! macOS bridge interfaces
//!
//! macOS has no dummy link type. A bridge is the closest substitute, but
//! `ifconfig bridge create` picks its own name (bridge0, bridge1, ...), so the
//! new bridge is found by diffing the interface listing and then renamed.

use super::Undo;
use crate::command::{CommandRunner, Invocation};
use crate::error::{Error, Result};
use crate::interface::InterfaceSpec;
use crate::netmask;
use tracing::debug;

/// Prefix of system-assigned bridge names
const BRIDGE_PREFIX: &str = "bridge";

/// ifconfig-based backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MacosBackend;

impl MacosBackend {
    /// Create a bridge, rename it, bring it up and assign the address if any
    pub fn create<R: CommandRunner>(
        &self,
        runner: &R,
        spec: &InterfaceSpec,
        undo: &mut Undo,
    ) -> Result<()> {
        let name = spec.name.as_str();
        // ifconfig needs IPv4 and a dotted netmask; reject anything else up front
        let address = spec.address.as_deref().map(netmask::split).transpose()?;

        let before = bridge_names(&runner.run(&Self::list())?.stdout);

        runner.run(&Invocation::privileged("ifconfig", ["bridge", "create"]))?;

        let after = bridge_names(&runner.run(&Self::list())?.stdout);
        let assigned = after
            .into_iter()
            .rfind(|bridge| !before.contains(bridge))
            .ok_or_else(|| {
                Error::InterfaceCreationFailed(format!(
                    "no new {} interface appeared after 'ifconfig bridge create'",
                    BRIDGE_PREFIX
                ))
            })?;
        debug!(interface = %name, assigned = %assigned, "discovered bridge");
        undo.push(Self::teardown(&assigned));

        if assigned != name {
            runner.run(&Invocation::privileged(
                "ifconfig",
                [assigned.as_str(), "name", name],
            ))?;
            undo.pop();
            undo.push(Self::teardown(name));
        }

        runner.run(&Invocation::privileged("ifconfig", [name, "up"]))?;

        if let Some(split) = address {
            runner.run(&Invocation::privileged(
                "ifconfig",
                [name, "inet", split.address.as_str()],
            ))?;

            if let Some(mask) = &split.netmask {
                runner.run(&Invocation::privileged(
                    "ifconfig",
                    [name, "netmask", mask.as_str()],
                ))?;
            }
        }

        Ok(())
    }

    pub fn teardown(id: &str) -> Invocation {
        Invocation::privileged("ifconfig", [id, "destroy"])
    }

    fn list() -> Invocation {
        Invocation::unprivileged("ifconfig", ["-a"])
    }
}

/// Bridge names from `ifconfig -a` output, in listing order
///
/// Interface headers start at column 0 as `name: flags=...`; detail lines
/// are indented.
fn bridge_names(listing: &str) -> Vec<String> {
    listing
        .lines()
        .filter(|line| line.starts_with(BRIDGE_PREFIX))
        .filter_map(|line| line.split(':').next())
        .map(str::to_string)
        .collect()
}
