//! Address and CIDR helpers
//!
//! `ip` accepts CIDR notation directly, `ifconfig` on macOS does not: it wants
//! the bare address and a dotted-quad netmask as separate arguments.

use crate::error::{Error, Result};
use ipnet::IpNet;
use std::net::{IpAddr, Ipv4Addr};

/// An address split into its bare form and optional dotted-quad netmask
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitAddress {
    /// Address without any `/prefix` suffix
    pub address: String,
    /// Netmask derived from the prefix length, if one was given
    pub netmask: Option<String>,
}

/// Check that `addr` is an IPv4 or IPv6 address, bare or in CIDR notation
pub fn check(addr: &str) -> Result<()> {
    if addr.parse::<IpNet>().is_ok() || addr.parse::<IpAddr>().is_ok() {
        return Ok(());
    }

    Err(Error::InvalidAddressFormat(format!(
        "'{}' is not an IP address or CIDR block",
        addr
    )))
}

/// Split `addr` on `/` and derive the netmask from the prefix length
///
/// `"192.168.1.100/24"` yields `192.168.1.100` and `255.255.255.0`;
/// `"10.0.0.1"` is returned unchanged with no netmask. Only IPv4 is
/// accepted.
pub fn split(addr: &str) -> Result<SplitAddress> {
    let Some((address, prefix)) = addr.split_once('/') else {
        parse_ipv4(addr, addr)?;
        return Ok(SplitAddress {
            address: addr.to_string(),
            netmask: None,
        });
    };

    let prefix_len = prefix
        .parse::<u8>()
        .ok()
        .filter(|p| *p <= 32)
        .ok_or_else(|| {
            Error::InvalidAddressFormat(format!(
                "prefix length '{}' in '{}' must be an integer between 0 and 32",
                prefix, addr
            ))
        })?;
    parse_ipv4(address, addr)?;

    Ok(SplitAddress {
        address: address.to_string(),
        netmask: Some(netmask(prefix_len)),
    })
}

fn parse_ipv4(address: &str, addr: &str) -> Result<Ipv4Addr> {
    address.parse::<Ipv4Addr>().map_err(|e| {
        Error::InvalidAddressFormat(format!(
            "'{}' in '{}' is not an IPv4 address: {}",
            address, addr, e
        ))
    })
}

/// Render the mask for a prefix length (0-32) as four dotted octets
pub fn netmask(prefix_len: u8) -> String {
    // Widen before shifting: a /0 shifts by 32
    let mask = (0xFFFF_FFFFu64 << (32 - u32::from(prefix_len.min(32)))) & 0xFFFF_FFFF;

    [24, 16, 8, 0]
        .iter()
        .map(|shift| ((mask >> shift) & 0xFF).to_string())
        .collect::<Vec<_>>()
        .join(".")
}
