//! Lifecycle event fan-out.
//!
//! # Responsibilities
//! - Broadcast boot/reload events to a fixed list of listeners
//! - Report every listener's outcome; a failing listener never silences the
//!   others and is never silently discarded
//!
//! # Design Decisions
//! - Listeners are registered once, during wiring, and iterated in order
//! - `notify_all` returns per-listener outcomes; failures are also logged

use std::fmt;

use thiserror::Error;

/// Events emitted by the distributor lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A distributor finished booting; `modules` is the load order.
    DistributorBooted {
        distributor: String,
        modules: Vec<String>,
    },
    /// A module's registration failed and its routes were excluded.
    ModuleSkipped {
        distributor: String,
        module: String,
        reason: String,
    },
    /// A rebuilt route table was swapped in.
    TableSwapped { distributor: String },
    /// A distributor was taken down.
    DistributorRetired { distributor: String },
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::DistributorBooted {
                distributor,
                modules,
            } => write!(f, "booted {distributor} ({} modules)", modules.len()),
            Event::ModuleSkipped {
                distributor,
                module,
                reason,
            } => write!(f, "skipped {module} in {distributor}: {reason}"),
            Event::TableSwapped { distributor } => write!(f, "swapped table for {distributor}"),
            Event::DistributorRetired { distributor } => write!(f, "retired {distributor}"),
        }
    }
}

/// A listener failure. Carries a message only; the bus does not interpret it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ListenerError(pub String);

/// A lifecycle listener.
pub trait Listener: Send + Sync {
    /// Stable name used in outcome reporting and logs.
    fn name(&self) -> &str;

    fn on_event(&self, event: &Event) -> Result<(), ListenerError>;
}

/// Outcome of delivering one event to one listener.
#[derive(Debug)]
pub struct ListenerOutcome {
    pub listener: String,
    pub result: Result<(), ListenerError>,
}

/// Fixed-list broadcast bus.
#[derive(Default)]
pub struct EventBus {
    listeners: Vec<Box<dyn Listener>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener. Wiring-phase only; the list is fixed afterwards.
    pub fn subscribe(&mut self, listener: Box<dyn Listener>) {
        self.listeners.push(listener);
    }

    /// Deliver `event` to every listener, collecting each outcome. Failures
    /// are logged and returned, never swallowed.
    pub fn notify_all(&self, event: &Event) -> Vec<ListenerOutcome> {
        let mut outcomes = Vec::with_capacity(self.listeners.len());
        for listener in &self.listeners {
            let result = listener.on_event(event);
            if let Err(err) = &result {
                tracing::warn!(
                    listener = listener.name(),
                    event = %event,
                    error = %err,
                    "Event listener failed"
                );
            }
            outcomes.push(ListenerOutcome {
                listener: listener.name().to_string(),
                result,
            });
        }
        outcomes
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Counting {
        name: String,
        seen: Arc<AtomicUsize>,
    }

    impl Listener for Counting {
        fn name(&self) -> &str {
            &self.name
        }

        fn on_event(&self, _event: &Event) -> Result<(), ListenerError> {
            self.seen.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct Failing;

    impl Listener for Failing {
        fn name(&self) -> &str {
            "failing"
        }

        fn on_event(&self, _event: &Event) -> Result<(), ListenerError> {
            Err(ListenerError("refused".into()))
        }
    }

    #[test]
    fn test_all_listeners_run_despite_failure() {
        let seen = Arc::new(AtomicUsize::new(0));
        let mut bus = EventBus::new();
        bus.subscribe(Box::new(Counting {
            name: "first".into(),
            seen: seen.clone(),
        }));
        bus.subscribe(Box::new(Failing));
        bus.subscribe(Box::new(Counting {
            name: "last".into(),
            seen: seen.clone(),
        }));

        let outcomes = bus.notify_all(&Event::TableSwapped {
            distributor: "alpha".into(),
        });

        assert_eq!(outcomes.len(), 3);
        assert_eq!(seen.load(Ordering::SeqCst), 2);
        assert!(outcomes[0].result.is_ok());
        assert!(outcomes[1].result.is_err());
        assert!(outcomes[2].result.is_ok());
        assert_eq!(outcomes[1].listener, "failing");
    }
}
