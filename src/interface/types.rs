//! Interface specification and observed state

use crate::error::{Error, Result};
use crate::netmask;
use crate::platform::Platform;
use serde::{Deserialize, Serialize};

/// Longest interface name the kernel accepts (IFNAMSIZ minus the NUL)
pub const MAX_NAME_LEN: usize = 15;

/// Desired interface, as submitted by the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceSpec {
    /// Interface name (also the resource id)
    pub name: String,
    /// Optional address, bare or in CIDR notation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl InterfaceSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: None,
        }
    }

    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Check the name and address before any command runs
    ///
    /// Any IPv4 or IPv6 address passes here; backends that need more (the
    /// macOS netmask split) check again before running anything.
    pub fn validate(&self) -> Result<()> {
        validate_name(&self.name)?;
        if let Some(address) = &self.address {
            netmask::check(address)?;
        }
        Ok(())
    }
}

/// Check an interface name against what `ip` and `ifconfig` accept
pub fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::InvalidInterfaceName(
            "name must not be empty".to_string(),
        ));
    }

    if name.len() > MAX_NAME_LEN {
        return Err(Error::InvalidInterfaceName(format!(
            "'{}' is longer than {} bytes",
            name, MAX_NAME_LEN
        )));
    }

    if name
        .chars()
        .any(|c| c.is_whitespace() || c == '/' || c == ':')
    {
        return Err(Error::InvalidInterfaceName(format!(
            "'{}' contains whitespace, '/' or ':'",
            name
        )));
    }

    Ok(())
}

/// Observed interface after a successful create
///
/// `id` is the only field delete relies on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceState {
    /// Resource identity, equal to the interface name
    pub id: String,
    /// Interface name
    pub name: String,
    /// Address as submitted
    pub address: Option<String>,
    /// Platform the interface was created on
    #[serde(rename = "os_type")]
    pub platform: Platform,
}

impl InterfaceState {
    pub fn new(spec: &InterfaceSpec, platform: Platform) -> Self {
        Self {
            id: spec.name.clone(),
            name: spec.name.clone(),
            address: spec.address.clone(),
            platform,
        }
    }

    /// Specification that produced this state
    pub fn spec(&self) -> InterfaceSpec {
        InterfaceSpec {
            name: self.name.clone(),
            address: self.address.clone(),
        }
    }
}
