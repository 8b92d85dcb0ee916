//! Semantic versions and version range expressions.
//!
//! # Responsibilities
//! - Parse `major.minor.patch` version triples
//! - Parse range expressions (`*`, `^`, `~`, comparator chains)
//! - Evaluate a range against a version (pure, no allocation)
//!
//! # Design Decisions
//! - Ranges are parsed once, at descriptor construction; a malformed range
//!   is rejected there and can never surface during resolution
//! - `^0.y.z` pins both major and minor, stricter than `^x.y.z` for x > 0

pub mod range;
pub mod semver;

pub use range::VersionRange;
pub use semver::Version;

use thiserror::Error;

/// Errors produced while parsing versions or range expressions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionError {
    /// A version string was not a `major.minor.patch` triple of integers.
    #[error("malformed version '{0}': expected numeric major.minor.patch")]
    MalformedVersion(String),

    /// A range expression could not be parsed.
    #[error("malformed version range '{expr}': {reason}")]
    MalformedRange { expr: String, reason: String },
}
