//! Observability subsystem.
//!
//! # Design Decisions
//! - Structured logging via `tracing`, level configurable through the
//!   environment (`RUST_LOG`) with a sensible default
//! - Boot, reload and dispatch paths log with structured fields so a
//!   distributor's lifecycle can be followed per id

pub mod logging;

pub use logging::init_logging;
