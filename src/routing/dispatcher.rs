//! Request dispatch across distributors.
//!
//! # Responsibilities
//! - Select the right distributor's table for a request (strict isolation:
//!   distributor A's table is never consulted for distributor B)
//! - Convert table misses into the request-time error taxonomy
//! - Publish rebuilt tables atomically
//!
//! # Design Decisions
//! - `ArcSwap` per distributor: dispatch loads a snapshot and keeps it for
//!   the duration of the call, so a concurrent rebuild never tears a read
//! - `DashMap` for the distributor map: many concurrent readers, rare
//!   writers (boot and reload only)

use std::sync::Arc;

use arc_swap::ArcSwap;
use dashmap::DashMap;
use thiserror::Error;

use crate::routing::table::{RouteMatch, RouteTable};

/// Request-time dispatch failures. Recoverable: the boundary maps these to
/// a 404-equivalent response, with no internal detail leaked.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("unknown distributor '{0}'")]
    UnknownDistributor(String),

    #[error("no route in distributor '{distributor}' matches '{path}'")]
    NotFound { distributor: String, path: String },
}

/// Per-distributor table selection with lock-free reads and atomic reloads.
#[derive(Debug, Default)]
pub struct Dispatcher {
    tables: DashMap<String, ArcSwap<RouteTable>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a freshly built table for a distributor, swapping out any
    /// previous one. In-flight dispatches finish against the table they
    /// loaded.
    pub fn publish(&self, distributor: impl Into<String>, table: RouteTable) {
        let distributor = distributor.into();
        let table = Arc::new(table);
        let swapped = table.clone();
        self.tables
            .entry(distributor)
            .and_modify(move |slot| slot.store(swapped))
            .or_insert_with(|| ArcSwap::from(table));
    }

    /// Drop a distributor's table entirely (distributor disabled).
    pub fn retire(&self, distributor: &str) -> bool {
        self.tables.remove(distributor).is_some()
    }

    /// Snapshot of a distributor's current table.
    pub fn table(&self, distributor: &str) -> Option<Arc<RouteTable>> {
        self.tables.get(distributor).map(|slot| slot.load_full())
    }

    /// Resolve a path within one distributor.
    pub fn dispatch(&self, distributor: &str, path: &str) -> Result<RouteMatch, DispatchError> {
        let table = self
            .table(distributor)
            .ok_or_else(|| DispatchError::UnknownDistributor(distributor.to_string()))?;
        table.resolve(path).map_err(|e| DispatchError::NotFound {
            distributor: distributor.to_string(),
            path: e.path,
        })
    }

    pub fn distributor_count(&self) -> usize {
        self.tables.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::descriptor::{HandlerRef, ModuleDescriptor};
    use crate::version::Version;

    fn table_for(symbol: &str) -> RouteTable {
        let mut table = RouteTable::new();
        table
            .insert_module(
                &ModuleDescriptor::new("acme/site", Version::new(1, 0, 0))
                    .with_absolute_route("/home", symbol),
            )
            .unwrap();
        table.finalize();
        table
    }

    #[test]
    fn test_distributor_isolation() {
        let dispatcher = Dispatcher::new();
        dispatcher.publish("alpha", table_for("alpha.home"));
        dispatcher.publish("beta", table_for("beta.home"));

        let m = dispatcher.dispatch("alpha", "/home").unwrap();
        assert_eq!(m.handler, HandlerRef::new("acme/site", "alpha.home"));

        let m = dispatcher.dispatch("beta", "/home").unwrap();
        assert_eq!(m.handler, HandlerRef::new("acme/site", "beta.home"));
    }

    #[test]
    fn test_unknown_distributor() {
        let dispatcher = Dispatcher::new();
        let err = dispatcher.dispatch("ghost", "/home").unwrap_err();
        assert_eq!(err, DispatchError::UnknownDistributor("ghost".into()));
    }

    #[test]
    fn test_not_found_carries_context() {
        let dispatcher = Dispatcher::new();
        dispatcher.publish("alpha", table_for("home"));
        let err = dispatcher.dispatch("alpha", "/missing").unwrap_err();
        assert_eq!(
            err,
            DispatchError::NotFound {
                distributor: "alpha".into(),
                path: "/missing".into(),
            }
        );
    }

    #[test]
    fn test_publish_swaps_atomically() {
        let dispatcher = Dispatcher::new();
        dispatcher.publish("alpha", table_for("v1"));

        // A reader holding the old snapshot keeps it across a swap.
        let before = dispatcher.table("alpha").unwrap();
        dispatcher.publish("alpha", table_for("v2"));

        let old = before.resolve("/home").unwrap();
        assert_eq!(old.handler.symbol, "v1");
        let new = dispatcher.dispatch("alpha", "/home").unwrap();
        assert_eq!(new.handler.symbol, "v2");
    }

    #[test]
    fn test_retire() {
        let dispatcher = Dispatcher::new();
        dispatcher.publish("alpha", table_for("home"));
        assert!(dispatcher.retire("alpha"));
        assert!(!dispatcher.retire("alpha"));
        assert!(matches!(
            dispatcher.dispatch("alpha", "/home"),
            Err(DispatchError::UnknownDistributor(_))
        ));
    }
}
