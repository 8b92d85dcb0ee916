//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! RouteDecl[] (per loaded module, in dependency order)
//!     → pattern.rs (token grammar → anchored regex + capture metadata)
//!     → table.rs (absolute list + lazy trie + shadow bindings)
//!     → Freeze via finalize(), publish via atomic swap
//!
//! Request path
//!     → dispatcher.rs (distributor table selection)
//!     → table.rs resolve() → Return: handler + params, or NotFound
//! ```
//!
//! # Design Decisions
//! - Tables compiled at boot, immutable at dispatch time
//! - First match wins among anchored routes (ordered by registration)
//! - Deterministic: same input always matches same route
//! - Shadow indirection is resolved at finalize, so dispatch is one hop

pub mod dispatcher;
pub mod pattern;
pub mod table;

pub use dispatcher::{DispatchError, Dispatcher};
pub use pattern::{CompiledRoute, PatternError};
pub use table::{RegistrationError, RouteMatch, RouteTable};
