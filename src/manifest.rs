//! Configuration file parsing for hostiface
//!
//! Parses `hostiface.toml` configuration files using serde

use crate::command::Privilege;
use crate::error::{Error, Result};
use crate::interface::InterfaceSpec;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Default ledger location, relative to the working directory
pub const DEFAULT_LEDGER: &str = "hostiface.state.json";

/// Load configuration from a file
pub fn load(path: &Path) -> Result<HostifaceConfig> {
    let config = read(path)?;
    config.validate()?;
    Ok(config)
}

/// Load and merge multiple configuration files
///
/// Files are merged in order, with later files overriding earlier ones.
/// Interfaces with the same name are replaced, new ones are appended.
pub fn load_merged(paths: &[PathBuf]) -> Result<HostifaceConfig> {
    let mut merged: Option<HostifaceConfig> = None;

    for path in paths {
        let config = read(path)?;
        merged = Some(match merged {
            None => config,
            Some(base) => base.merge(config),
        });
    }

    let config = merged.ok_or_else(|| {
        Error::ConfigValidation("No configuration files provided".into())
    })?;

    config.validate()?;
    Ok(config)
}

fn read(path: &Path) -> Result<HostifaceConfig> {
    let content = fs::read_to_string(path).map_err(|e| Error::ConfigRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(toml::from_str(&content)?)
}

/// Root configuration structure
#[derive(Debug, Default, Deserialize)]
pub struct HostifaceConfig {
    /// Global configuration settings
    #[serde(default)]
    pub config: GlobalConfig,

    /// Interface definitions, in apply order
    #[serde(default)]
    pub interfaces: Vec<InterfaceSpec>,
}

impl HostifaceConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let mut names = HashSet::new();
        for iface in &self.interfaces {
            if !names.insert(&iface.name) {
                return Err(Error::ConfigValidation(format!(
                    "Duplicate interface name: {}",
                    iface.name
                )));
            }

            iface.validate().map_err(|e| {
                Error::ConfigValidation(format!("interface '{}': {}", iface.name, e))
            })?;
        }

        Ok(())
    }

    /// Get an interface definition by name
    pub fn get_interface(&self, name: &str) -> Option<&InterfaceSpec> {
        self.interfaces.iter().find(|i| i.name == name)
    }

    /// Merge another config into this one
    pub fn merge(mut self, other: HostifaceConfig) -> HostifaceConfig {
        self.config = self.config.merge(other.config);

        for iface in other.interfaces {
            if let Some(existing) = self.interfaces.iter_mut().find(|i| i.name == iface.name) {
                *existing = iface;
            } else {
                self.interfaces.push(iface);
            }
        }

        self
    }
}

/// Global configuration settings
#[derive(Debug, Default, Deserialize)]
pub struct GlobalConfig {
    /// Where created interface ids are recorded
    pub ledger: Option<PathBuf>,

    /// How privileged commands gain root
    pub privilege: Option<Privilege>,

    /// Undo applied steps when a create fails part way (default: true)
    pub rollback: Option<bool>,
}

impl GlobalConfig {
    pub fn ledger_path(&self) -> PathBuf {
        self.ledger
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LEDGER))
    }

    pub fn privilege(&self) -> Privilege {
        self.privilege.unwrap_or_default()
    }

    pub fn rollback(&self) -> bool {
        self.rollback.unwrap_or(true)
    }

    /// Other's values override self's where specified
    fn merge(self, other: GlobalConfig) -> GlobalConfig {
        GlobalConfig {
            ledger: other.ledger.or(self.ledger),
            privilege: other.privilege.or(self.privilege),
            rollback: other.rollback.or(self.rollback),
        }
    }
}
