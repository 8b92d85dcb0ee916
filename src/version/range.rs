//! Version range expressions.
//!
//! Supported forms:
//! - `*` — any version
//! - `^1.2.3` — compatible-with: `>=1.2.3, <2.0.0`; for a zero major the
//!   minor is pinned too (`^0.2.3` is `>=0.2.3, <0.3.0`)
//! - `~1.2.3` — same major.minor: `>=1.2.3, <1.3.0`
//! - comparator chains: `>=1.0.0 <2.0.0`, `>1.0.0, <=1.5.0`, `=1.2.3`
//! - a bare `1.2.3` is an exact match

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::version::{Version, VersionError};

/// A comparison operator in an explicit comparator chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Gt,
    Ge,
    Lt,
    Le,
}

impl CompareOp {
    fn eval(self, candidate: Version, anchor: Version) -> bool {
        match self {
            CompareOp::Eq => candidate == anchor,
            CompareOp::Gt => candidate > anchor,
            CompareOp::Ge => candidate >= anchor,
            CompareOp::Lt => candidate < anchor,
            CompareOp::Le => candidate <= anchor,
        }
    }
}

/// A parsed version range predicate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum VersionRange {
    /// `*` — matches every version.
    Any,
    /// `^x.y.z` — compatible-with.
    Caret(Version),
    /// `~x.y.z` — same major.minor.
    Tilde(Version),
    /// ANDed comparator chain; a bare version parses to `[(Eq, v)]`.
    Comparators(Vec<(CompareOp, Version)>),
}

impl VersionRange {
    /// Parse a range expression. Fails with `MalformedRange` on syntax
    /// violations; this runs at module registration, never at resolution.
    pub fn parse(expr: &str) -> Result<Self, VersionError> {
        let malformed = |reason: &str| VersionError::MalformedRange {
            expr: expr.to_string(),
            reason: reason.to_string(),
        };

        let trimmed = expr.trim();
        if trimmed.is_empty() {
            return Err(malformed("empty expression"));
        }
        if trimmed == "*" {
            return Ok(VersionRange::Any);
        }

        if let Some(rest) = trimmed.strip_prefix('^') {
            let anchor = Version::parse(rest)
                .map_err(|_| malformed("caret anchor is not a version triple"))?;
            return Ok(VersionRange::Caret(anchor));
        }
        if let Some(rest) = trimmed.strip_prefix('~') {
            let anchor = Version::parse(rest)
                .map_err(|_| malformed("tilde anchor is not a version triple"))?;
            return Ok(VersionRange::Tilde(anchor));
        }

        let mut comparators = Vec::new();
        for part in trimmed.split([' ', ',']).filter(|p| !p.is_empty()) {
            let (op, version_str) = if let Some(rest) = part.strip_prefix(">=") {
                (CompareOp::Ge, rest)
            } else if let Some(rest) = part.strip_prefix("<=") {
                (CompareOp::Le, rest)
            } else if let Some(rest) = part.strip_prefix('>') {
                (CompareOp::Gt, rest)
            } else if let Some(rest) = part.strip_prefix('<') {
                (CompareOp::Lt, rest)
            } else if let Some(rest) = part.strip_prefix('=') {
                (CompareOp::Eq, rest)
            } else {
                (CompareOp::Eq, part)
            };

            let version = Version::parse(version_str)
                .map_err(|_| malformed("comparator operand is not a version triple"))?;
            comparators.push((op, version));
        }

        if comparators.is_empty() {
            return Err(malformed("no comparators"));
        }
        Ok(VersionRange::Comparators(comparators))
    }

    /// Whether `candidate` satisfies this range. Pure and total over
    /// well-formed inputs.
    pub fn matches(&self, candidate: &Version) -> bool {
        match self {
            VersionRange::Any => true,
            VersionRange::Caret(anchor) => {
                if *candidate < *anchor {
                    return false;
                }
                if anchor.major > 0 {
                    candidate.major == anchor.major
                } else {
                    // ^0.y.z pins major and minor.
                    candidate.major == 0 && candidate.minor == anchor.minor
                }
            }
            VersionRange::Tilde(anchor) => {
                *candidate >= *anchor
                    && candidate.major == anchor.major
                    && candidate.minor == anchor.minor
            }
            VersionRange::Comparators(chain) => {
                chain.iter().all(|(op, anchor)| op.eval(*candidate, *anchor))
            }
        }
    }
}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionRange::Any => write!(f, "*"),
            VersionRange::Caret(v) => write!(f, "^{v}"),
            VersionRange::Tilde(v) => write!(f, "~{v}"),
            VersionRange::Comparators(chain) => {
                for (i, (op, v)) in chain.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    let sym = match op {
                        CompareOp::Eq => "=",
                        CompareOp::Gt => ">",
                        CompareOp::Ge => ">=",
                        CompareOp::Lt => "<",
                        CompareOp::Le => "<=",
                    };
                    write!(f, "{sym}{v}")?;
                }
                Ok(())
            }
        }
    }
}

impl FromStr for VersionRange {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for VersionRange {
    type Error = VersionError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<VersionRange> for String {
    fn from(r: VersionRange) -> Self {
        r.to_string()
    }
}
