//! Interface state machine
//!
//! Type-safe lifecycle for an interface resource using the state-machines crate.
//! `Failed` is terminal: a failed create is reported upward, never retried here.

use crate::error::Error;
use state_machines::state_machine;
use tracing::debug;

state_machine! {
    name: InterfaceMachine,
    dynamic: true,
    initial: Absent,
    states: [Absent, Creating, Present, Deleting, Failed],
    events {
        create {
            transition: { from: Absent, to: Creating }
        }
        created {
            transition: { from: Creating, to: Present }
        }
        fail {
            transition: { from: Creating, to: Failed }
        }
        delete {
            transition: { from: Present, to: Deleting }
        }
        deleted {
            transition: { from: Deleting, to: Absent }
        }
    }
}

/// Simple state enum for external use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Absent,
    Creating,
    Present,
    Deleting,
    Failed,
}

impl State {
    /// Parse state from string representation
    pub fn from_str(s: &str) -> Self {
        match s {
            "Creating" => State::Creating,
            "Present" => State::Present,
            "Deleting" => State::Deleting,
            "Failed" => State::Failed,
            _ => State::Absent,
        }
    }
}

/// Lifecycle of one interface resource
pub struct InterfaceInstance {
    /// The state machine (dynamic mode with unit context)
    machine: DynamicInterfaceMachine<()>,
    /// Interface name, used in errors and logs
    name: String,
}

impl InterfaceInstance {
    /// New resource that does not exist yet
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            machine: InterfaceMachine::new(()).into_dynamic(),
            name: name.into(),
        }
    }

    /// Resource recorded as present by a previous create
    pub fn adopt(name: impl Into<String>) -> crate::error::Result<Self> {
        let mut instance = Self::new(name);
        instance.create()?;
        instance.created()?;
        Ok(instance)
    }

    /// Get current state as enum
    pub fn state(&self) -> State {
        State::from_str(self.machine.current_state())
    }

    pub fn create(&mut self) -> crate::error::Result<()> {
        self.fire(InterfaceMachineEvent::Create, "create")
    }

    pub fn created(&mut self) -> crate::error::Result<()> {
        self.fire(InterfaceMachineEvent::Created, "created")
    }

    pub fn fail(&mut self) -> crate::error::Result<()> {
        self.fire(InterfaceMachineEvent::Fail, "fail")
    }

    pub fn delete(&mut self) -> crate::error::Result<()> {
        self.fire(InterfaceMachineEvent::Delete, "delete")
    }

    pub fn deleted(&mut self) -> crate::error::Result<()> {
        self.fire(InterfaceMachineEvent::Deleted, "deleted")
    }

    fn fire(&mut self, event: InterfaceMachineEvent, label: &str) -> crate::error::Result<()> {
        let from = self.machine.current_state().to_string();

        if self.machine.handle(event).is_err() {
            return Err(Error::InvalidTransition {
                resource: self.name.clone(),
                event: label.to_string(),
                state: from,
            });
        }

        debug!(
            interface = %self.name,
            event = label,
            from = %from,
            to = %self.machine.current_state(),
            "state transition"
        );
        Ok(())
    }
}
