//! Host platform detection

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Platforms with an interface backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Linux, using iproute2 dummy links
    Linux,
    /// macOS, using ifconfig bridges
    Darwin,
}

impl Platform {
    /// Detect the platform this binary was built for
    pub fn detect() -> Result<Self> {
        Self::from_os(std::env::consts::OS)
    }

    /// Map an OS name to a supported platform
    ///
    /// Accepts both Rust's `macos` and the kernel name `darwin`.
    pub fn from_os(os: &str) -> Result<Self> {
        match os.to_ascii_lowercase().as_str() {
            "linux" => Ok(Platform::Linux),
            "darwin" | "macos" => Ok(Platform::Darwin),
            other => Err(Error::UnsupportedPlatform(other.to_string())),
        }
    }

    /// Platform string exported to consumers
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Linux => "linux",
            Platform::Darwin => "darwin",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
