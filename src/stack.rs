//! Declarative apply and destroy of configured interfaces
//!
//! Handles:
//! - Creating every configured interface the ledger does not record yet
//! - Deleting recorded interfaces newest first
//! - Reporting configured vs recorded interfaces

use crate::command::CommandRunner;
use crate::error::Result;
use crate::interface::InterfaceSpec;
use crate::ledger::Ledger;
use crate::manifest::HostifaceConfig;
use crate::provider::{DeleteOutcome, InterfaceProvider};
use serde::Serialize;
use tracing::{info, warn};

/// Configured interfaces together with the ledger of what exists
pub struct Stack<R> {
    config: HostifaceConfig,
    ledger: Ledger,
    provider: InterfaceProvider<R>,
}

/// One line of `status`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusEntry {
    pub name: String,
    pub address: Option<String>,
    pub recorded: bool,
    pub configured: bool,
}

impl<R: CommandRunner> Stack<R> {
    pub fn new(config: HostifaceConfig, ledger: Ledger, provider: InterfaceProvider<R>) -> Self {
        Self {
            config,
            ledger,
            provider,
        }
    }

    /// Create configured interfaces missing from the ledger, in declaration order
    ///
    /// Stops at the first failure. Interfaces created before it stay recorded.
    /// Returns the names created by this call.
    pub fn up(&mut self) -> Result<Vec<String>> {
        let mut created = Vec::new();

        for spec in &self.config.interfaces {
            if self.ledger.contains(&spec.name) {
                info!(interface = %spec.name, "already recorded, skipping");
                continue;
            }

            let state = self.provider.create(spec)?;
            self.ledger.record(state);
            if let Err(e) = self.ledger.save() {
                warn!(
                    interface = %spec.name,
                    ledger = %self.ledger.path().display(),
                    error = %e,
                    "interface created but not recorded; `down` will not remove it"
                );
                return Err(e);
            }
            created.push(spec.name.clone());
        }

        Ok(created)
    }

    /// Delete every recorded interface, newest first
    ///
    /// Each delete is best effort; every entry leaves the ledger either way.
    pub fn down(&mut self) -> Result<Vec<(String, DeleteOutcome)>> {
        let ids: Vec<String> = self
            .ledger
            .interfaces()
            .iter()
            .rev()
            .map(|s| s.id.clone())
            .collect();

        let mut outcomes = Vec::new();
        for id in ids {
            let props = self
                .ledger
                .get(&id)
                .map(|s| s.spec())
                .unwrap_or_else(|| InterfaceSpec::new(id.as_str()));

            let outcome = self.provider.delete(&id, &props);
            if let DeleteOutcome::Skipped { reason } = &outcome {
                warn!(interface = %id, reason = %reason, "retired without confirmed teardown");
            }

            self.ledger.remove(&id);
            self.ledger.save()?;
            outcomes.push((id, outcome));
        }

        Ok(outcomes)
    }

    /// Configured interfaces first, then recorded ones no longer configured
    pub fn status(&self) -> Vec<StatusEntry> {
        let mut entries: Vec<StatusEntry> = self
            .config
            .interfaces
            .iter()
            .map(|spec| StatusEntry {
                name: spec.name.clone(),
                address: spec.address.clone(),
                recorded: self.ledger.contains(&spec.name),
                configured: true,
            })
            .collect();

        for state in self.ledger.interfaces() {
            if self.config.get_interface(&state.id).is_none() {
                entries.push(StatusEntry {
                    name: state.id.clone(),
                    address: state.address.clone(),
                    recorded: true,
                    configured: false,
                });
            }
        }

        entries
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }
}
