//! Capability tables: name → handler lookup for API and bridge commands.
//!
//! Commands are registered explicitly during distributor boot and looked up
//! by name at use time; there is no implicit fallback resolution. The table
//! stores opaque `HandlerRef`s only; invocation is the caller's concern.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::module::descriptor::HandlerRef;

/// Errors raised while populating a capability table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CapabilityError {
    /// Two modules (or one module twice) registered the same command name.
    #[error("command '{command}' already registered by {existing}, rejected for {incoming}")]
    DuplicateCommand {
        command: String,
        existing: String,
        incoming: String,
    },
}

/// A name → handler mapping, populated during distributor boot and
/// read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct CapabilityTable {
    commands: BTreeMap<String, HandlerRef>,
}

impl CapabilityTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command under `name`. Command names are namespaced by the
    /// caller (the distributor prefixes them with the owning module code),
    /// so a duplicate here is always a genuine conflict.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        handler: HandlerRef,
    ) -> Result<(), CapabilityError> {
        let name = name.into();
        if let Some(existing) = self.commands.get(&name) {
            return Err(CapabilityError::DuplicateCommand {
                command: name,
                existing: existing.module.clone(),
                incoming: handler.module,
            });
        }
        self.commands.insert(name, handler);
        Ok(())
    }

    /// Look up a command by name.
    pub fn get(&self, name: &str) -> Option<&HandlerRef> {
        self.commands.get(name)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &HandlerRef)> {
        self.commands.iter()
    }
}
