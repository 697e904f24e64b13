//! Unified error types for hostiface

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for hostiface operations
#[derive(Error, Debug)]
pub enum Error {
    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    // Config errors
    #[error("Failed to read config file '{path}': {source}")]
    ConfigRead { path: PathBuf, source: io::Error },

    #[error("Failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Config validation failed: {0}")]
    ConfigValidation(String),

    // Ledger errors
    #[error("Failed to read ledger '{path}': {source}")]
    LedgerRead { path: PathBuf, source: io::Error },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // Platform errors
    #[error("Operating system '{0}' is not supported. Only Linux and macOS are supported.")]
    UnsupportedPlatform(String),

    // Command errors
    #[error("Command '{command}' failed: {stderr}")]
    CommandExecutionFailed { command: String, stderr: String },

    #[error("Failed to run '{command}': {source}")]
    CommandSpawn { command: String, source: io::Error },

    // Interface errors
    #[error("Interface creation failed: {0}")]
    InterfaceCreationFailed(String),

    #[error("Failed to create network interface '{name}': {source}")]
    InterfaceCreate { name: String, source: Box<Error> },

    #[error("Invalid interface name: {0}")]
    InvalidInterfaceName(String),

    #[error("Invalid address format: {0}")]
    InvalidAddressFormat(String),

    #[error("Interface '{resource}' cannot handle '{event}' while {state}")]
    InvalidTransition {
        resource: String,
        event: String,
        state: String,
    },
}

// Test-only accessor for asserting on wrapped create failures
#[cfg(test)]
impl Error {
    /// The innermost error, looking through create-path wrapping
    pub fn root(&self) -> &Error {
        match self {
            Error::InterfaceCreate { source, .. } => source.root(),
            other => other,
        }
    }
}

/// Result type alias for hostiface operations
pub type Result<T> = std::result::Result<T, Error>;
