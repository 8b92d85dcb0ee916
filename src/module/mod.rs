//! Module metadata and dependency resolution.
//!
//! # Data Flow
//! ```text
//! Manifest (external loader)
//!     → ModuleDescriptor[] (immutable metadata per module version)
//!     → resolver.rs (version selection + topological ordering)
//!     → Return: dependency-first load order, or a resolution failure
//! ```
//!
//! # Design Decisions
//! - Descriptors are immutable after construction; version ranges are parsed
//!   and validated before a descriptor exists
//! - One descriptor per (code, version) pair within a distributor
//! - The resolver is pure: same inputs, same load order or same failure

pub mod capability;
pub mod descriptor;
pub mod resolver;

pub use capability::CapabilityTable;
pub use descriptor::{HandlerRef, ModuleDescriptor, RouteDecl, RouteKind, RouteTarget};
pub use resolver::{resolve, ResolutionError};
