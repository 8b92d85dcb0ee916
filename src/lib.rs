//! Tessera: multi-tenant module resolution and routing dispatch engine.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌──────────────────────────────────────────────────┐
//!                    │                     TESSERA                      │
//!                    │                                                  │
//!   manifest.toml    │  ┌─────────┐   ┌──────────┐   ┌──────────────┐  │
//!   ────────────────▶│  │ config  │──▶│  module  │──▶│ distributor  │  │
//!                    │  │ loader  │   │ resolver │   │    boot      │  │
//!                    │  └─────────┘   └──────────┘   └──────┬───────┘  │
//!                    │                                      │          │
//!                    │                                      ▼          │
//!                    │                              ┌──────────────┐   │
//!                    │                              │  routing     │   │
//!                    │                              │ table build  │   │
//!                    │                              └──────┬───────┘   │
//!                    │                                     │ swap      │
//!   (distributor,    │  ┌──────────────┐           ┌──────▼───────┐   │
//!    path)           │  │  dispatcher  │◀──────────│  published   │   │
//!   ────────────────▶│  │              │           │    tables    │   │
//!   handler + params │  └──────────────┘           └──────────────┘   │
//!                    │                                                  │
//!                    │  cross-cutting: version ranges, events bus,      │
//!                    │  observability                                   │
//!                    └──────────────────────────────────────────────────┘
//! ```
//!
//! Distributors are isolated site instances: each names its enabled modules
//! with version selectors, gets its own resolved load order and its own
//! route table, and is never consulted for another distributor's requests.
//! Tables are immutable once built; reloads build a fresh table and swap it
//! in atomically while in-flight dispatches finish on their snapshot.

// Core subsystems
pub mod config;
pub mod distributor;
pub mod module;
pub mod routing;
pub mod version;

// Cross-cutting concerns
pub mod events;
pub mod observability;

pub use distributor::{BootReport, DistributorRegistry};
pub use module::{HandlerRef, ModuleDescriptor};
pub use routing::{DispatchError, Dispatcher, RouteMatch, RouteTable};
pub use version::{Version, VersionRange};
