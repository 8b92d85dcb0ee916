//! Configuration management subsystem.
//!
//! This layer is the "external loader" collaborator of the core: it parses
//! the manifest storage format and hands the engine already-built module
//! descriptors and enabled-module lists. The core itself never touches
//! storage.
//!
//! # Data Flow
//! ```text
//! manifest file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks, range/version parsing)
//!     → CompiledManifest (descriptors + per-distributor enable lists)
//!     → DistributorRegistry::boot per distributor
//!
//! On reload signal:
//!     watcher.rs detects change
//!     → loader.rs loads new manifest
//!     → validation.rs validates
//!     → registry re-boot + atomic table swap
//! ```
//!
//! # Design Decisions
//! - A manifest is immutable once loaded; changes require full reload
//! - Validation separates syntactic (serde) from semantic checks and
//!   returns all errors, not just the first

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_manifest, ConfigError};
pub use schema::{DistributorConfig, Manifest, ModuleConfig, RouteConfig};
pub use validation::{compile_manifest, CompiledManifest, ValidationError};
pub use watcher::{ManifestUpdate, ManifestWatcher};
