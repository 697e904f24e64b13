//! Record of created interfaces
//!
//! Delete only needs the resource id, but something has to remember the ids
//! between `up` and `down`. The ledger is a small JSON file holding the state
//! returned by every successful create, in creation order.

use crate::error::{Error, Result};
use crate::interface::InterfaceState;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Persisted interface states
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Ledger {
    /// File backing this ledger
    #[serde(skip)]
    path: PathBuf,

    /// Created interfaces, oldest first
    #[serde(default)]
    interfaces: Vec<InterfaceState>,
}

impl Ledger {
    /// Load the ledger at `path`; a missing file is an empty ledger
    pub fn load(path: &Path) -> Result<Self> {
        let mut ledger = match fs::read_to_string(path) {
            Ok(content) => serde_json::from_str::<Ledger>(&content)?,
            Err(e) if e.kind() == ErrorKind::NotFound => Ledger::default(),
            Err(e) => {
                return Err(Error::LedgerRead {
                    path: path.to_path_buf(),
                    source: e,
                });
            }
        };

        ledger.path = path.to_path_buf();
        Ok(ledger)
    }

    /// Write the ledger back to its file
    ///
    /// Writes a sibling temp file first and renames it over the target.
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, serde_json::to_string_pretty(self)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, id: &str) -> Option<&InterfaceState> {
        self.interfaces.iter().find(|s| s.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Record a created interface, replacing any entry with the same id
    pub fn record(&mut self, state: InterfaceState) {
        match self.interfaces.iter_mut().find(|s| s.id == state.id) {
            Some(existing) => *existing = state,
            None => self.interfaces.push(state),
        }
    }

    pub fn remove(&mut self, id: &str) -> Option<InterfaceState> {
        let index = self.interfaces.iter().position(|s| s.id == id)?;
        Some(self.interfaces.remove(index))
    }

    /// Recorded states, oldest first
    pub fn interfaces(&self) -> &[InterfaceState] {
        &self.interfaces
    }

    pub fn is_empty(&self) -> bool {
        self.interfaces.is_empty()
    }
}
