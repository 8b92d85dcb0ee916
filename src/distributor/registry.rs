//! The distributor registry: explicit, shared, no global state.
//!
//! # Responsibilities
//! - Own the per-distributor boot sources (enabled list + descriptors)
//! - Publish built tables to the dispatcher, atomically on rebuild
//! - Expose capability lookups (api commands, cross-distributor bridge)
//! - Emit lifecycle events through the event bus
//!
//! # Design Decisions
//! - A registry value is passed by reference where needed, keeping
//!   distributor isolation explicit and testable
//! - Rebuild is all-or-nothing: a failing rebuild leaves the previous
//!   table serving

use std::sync::Arc;

use dashmap::DashMap;
use thiserror::Error;

use crate::distributor::{self, command_key, BootReport, DistributorTables};
use crate::events::{Event, EventBus};
use crate::module::descriptor::{HandlerRef, ModuleDescriptor};
use crate::module::resolver::ResolutionError;
use crate::routing::dispatcher::{DispatchError, Dispatcher};
use crate::routing::table::{RouteMatch, RouteTable};
use crate::version::VersionRange;

/// Rebuild failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RebuildError {
    #[error("unknown distributor '{0}'")]
    UnknownDistributor(String),

    #[error(transparent)]
    Resolution(#[from] ResolutionError),
}

/// Boot inputs for one distributor, kept for rebuilds.
#[derive(Debug, Clone)]
struct BootSource {
    enabled: Vec<(String, VersionRange)>,
    available: Vec<ModuleDescriptor>,
}

/// Registry of booted distributors.
pub struct DistributorRegistry {
    dispatcher: Dispatcher,
    sources: DashMap<String, BootSource>,
    capabilities: DashMap<String, Arc<DistributorTables>>,
    bus: EventBus,
}

impl DistributorRegistry {
    pub fn new() -> Self {
        Self::with_bus(EventBus::new())
    }

    pub fn with_bus(bus: EventBus) -> Self {
        Self {
            dispatcher: Dispatcher::new(),
            sources: DashMap::new(),
            capabilities: DashMap::new(),
            bus,
        }
    }

    /// Boot (or re-boot) a distributor from fresh sources and publish its
    /// table. Resolution failures leave any previously published table
    /// serving.
    pub fn boot(
        &self,
        distributor: &str,
        enabled: Vec<(String, VersionRange)>,
        available: Vec<ModuleDescriptor>,
    ) -> Result<BootReport, ResolutionError> {
        let (tables, report) = distributor::boot(distributor, &enabled, &available)?;

        self.sources.insert(
            distributor.to_string(),
            BootSource { enabled, available },
        );
        self.publish(distributor, tables);

        self.bus.notify_all(&Event::DistributorBooted {
            distributor: distributor.to_string(),
            modules: report.loaded.iter().map(|(code, _)| code.clone()).collect(),
        });
        for warning in &report.warnings {
            self.bus.notify_all(&Event::ModuleSkipped {
                distributor: distributor.to_string(),
                module: warning.module.clone(),
                reason: warning.issue.to_string(),
            });
        }

        Ok(report)
    }

    /// Rebuild a distributor from its stored sources (reload trigger).
    pub fn rebuild(&self, distributor: &str) -> Result<BootReport, RebuildError> {
        let source = self
            .sources
            .get(distributor)
            .map(|s| s.value().clone())
            .ok_or_else(|| RebuildError::UnknownDistributor(distributor.to_string()))?;

        let (tables, report) =
            distributor::boot(distributor, &source.enabled, &source.available)?;
        self.publish(distributor, tables);

        self.bus.notify_all(&Event::TableSwapped {
            distributor: distributor.to_string(),
        });
        Ok(report)
    }

    /// Take a distributor down entirely.
    pub fn retire(&self, distributor: &str) -> bool {
        self.sources.remove(distributor);
        self.capabilities.remove(distributor);
        let existed = self.dispatcher.retire(distributor);
        if existed {
            self.bus.notify_all(&Event::DistributorRetired {
                distributor: distributor.to_string(),
            });
        }
        existed
    }

    fn publish(&self, distributor: &str, tables: DistributorTables) {
        let routes = tables.routes.clone();
        self.capabilities
            .insert(distributor.to_string(), Arc::new(tables));
        self.dispatcher.publish(distributor, routes);
    }

    /// Resolve a request path within one distributor.
    pub fn dispatch(&self, distributor: &str, path: &str) -> Result<RouteMatch, DispatchError> {
        self.dispatcher.dispatch(distributor, path)
    }

    /// Snapshot of a distributor's current route table.
    pub fn table(&self, distributor: &str) -> Option<Arc<RouteTable>> {
        self.dispatcher.table(distributor)
    }

    /// Look up an API command exposed by a module of a distributor.
    pub fn api(&self, distributor: &str, module: &str, command: &str) -> Option<HandlerRef> {
        self.capabilities
            .get(distributor)?
            .api
            .get(&command_key(module, command))
            .cloned()
    }

    /// Look up a bridge command for cross-distributor invocation.
    pub fn bridge(&self, distributor: &str, module: &str, command: &str) -> Option<HandlerRef> {
        self.capabilities
            .get(distributor)?
            .bridge
            .get(&command_key(module, command))
            .cloned()
    }

    pub fn distributor_count(&self) -> usize {
        self.dispatcher.distributor_count()
    }
}

impl Default for DistributorRegistry {
    fn default() -> Self {
        Self::new()
    }
}
