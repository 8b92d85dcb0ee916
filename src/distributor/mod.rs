//! Distributor boot: from enabled-module list to a published route table.
//!
//! # Data Flow
//! ```text
//! (enabled modules, available descriptors)
//!     → module::resolver (load order, or fatal resolution error)
//!     → RouteTable::insert_module per module, in order
//!         failures isolate the module and become boot warnings
//!     → RouteTable::finalize (shadow binding, same isolation)
//!     → capability tables (api + bridge commands)
//!     → BootReport
//! ```
//!
//! # Design Decisions
//! - Resolution errors are fatal: a distributor never comes up partially
//!   resolved
//! - Registration errors are per-module: the offending module's routes and
//!   commands are excluded, siblings load, and the report says so

pub mod registry;

pub use registry::{DistributorRegistry, RebuildError};

use thiserror::Error;

use crate::module::capability::{CapabilityError, CapabilityTable};
use crate::module::descriptor::ModuleDescriptor;
use crate::module::resolver::{self, ResolutionError};
use crate::routing::table::{RegistrationError, RouteTable};
use crate::version::{Version, VersionRange};

/// A non-fatal boot issue, attributed to one module.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BootIssue {
    #[error(transparent)]
    Registration(#[from] RegistrationError),
    #[error(transparent)]
    Capability(#[from] CapabilityError),
}

/// One excluded module and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootWarning {
    pub module: String,
    pub issue: BootIssue,
}

/// What a distributor boot produced.
#[derive(Debug, Clone)]
pub struct BootReport {
    pub distributor: String,
    /// Modules in load order (dependencies first).
    pub loaded: Vec<(String, Version)>,
    pub warnings: Vec<BootWarning>,
}

/// The tables a booted distributor serves from.
#[derive(Debug, Clone, Default)]
pub struct DistributorTables {
    pub routes: RouteTable,
    pub api: CapabilityTable,
    pub bridge: CapabilityTable,
}

/// Key for a module command inside a distributor-wide capability table.
pub fn command_key(module: &str, command: &str) -> String {
    format!("{module}#{command}")
}

/// Boot one distributor. Single-threaded build phase; the caller publishes
/// the returned tables atomically.
pub fn boot(
    distributor: &str,
    enabled: &[(String, VersionRange)],
    available: &[ModuleDescriptor],
) -> Result<(DistributorTables, BootReport), ResolutionError> {
    let order = resolver::resolve(enabled, available, distributor)?;

    let mut tables = DistributorTables::default();
    let mut loaded = Vec::with_capacity(order.len());
    let mut warnings = Vec::new();

    for descriptor in &order {
        if let Err(err) = tables.routes.insert_module(descriptor) {
            tracing::warn!(
                distributor,
                module = %descriptor.code,
                version = %descriptor.version,
                error = %err,
                "Module registration failed, excluding its routes"
            );
            warnings.push(BootWarning {
                module: descriptor.code.clone(),
                issue: err.into(),
            });
            continue;
        }

        if let Err(err) = register_commands(&mut tables, descriptor) {
            // Routes for this module are already in; command conflicts are
            // reported but do not unwind the module.
            warnings.push(BootWarning {
                module: descriptor.code.clone(),
                issue: err.into(),
            });
        }

        loaded.push((descriptor.code.clone(), descriptor.version));
    }

    for (module, err) in tables.routes.finalize() {
        tracing::warn!(
            distributor,
            module = %module,
            error = %err,
            "Shadow route rejected at finalize"
        );
        warnings.push(BootWarning {
            module,
            issue: err.into(),
        });
    }

    tracing::info!(
        distributor,
        modules = loaded.len(),
        routes = tables.routes.len(),
        warnings = warnings.len(),
        "Distributor booted"
    );

    let report = BootReport {
        distributor: distributor.to_string(),
        loaded,
        warnings,
    };
    Ok((tables, report))
}

fn register_commands(
    tables: &mut DistributorTables,
    descriptor: &ModuleDescriptor,
) -> Result<(), CapabilityError> {
    for (name, handler) in &descriptor.api_commands {
        tables
            .api
            .register(command_key(&descriptor.code, name), handler.clone())?;
    }
    for (name, handler) in &descriptor.bridge_commands {
        tables
            .bridge
            .register(command_key(&descriptor.code, name), handler.clone())?;
    }
    Ok(())
}
