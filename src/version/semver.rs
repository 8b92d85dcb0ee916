//! Version triple parsing and ordering.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::version::VersionError;

/// A semantic version triple.
///
/// Ordering is lexicographic over (major, minor, patch), which matches
/// semantic-versioning precedence for plain triples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl Version {
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Parse a `major.minor.patch` string.
    pub fn parse(input: &str) -> Result<Self, VersionError> {
        let malformed = || VersionError::MalformedVersion(input.to_string());

        let mut parts = input.trim().split('.');
        let major = parse_segment(parts.next()).ok_or_else(malformed)?;
        let minor = parse_segment(parts.next()).ok_or_else(malformed)?;
        let patch = parse_segment(parts.next()).ok_or_else(malformed)?;
        if parts.next().is_some() {
            return Err(malformed());
        }

        Ok(Self::new(major, minor, patch))
    }
}

fn parse_segment(segment: Option<&str>) -> Option<u64> {
    let s = segment?;
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for Version {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Version {
    type Error = VersionError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<Version> for String {
    fn from(v: Version) -> Self {
        v.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        assert_eq!(Version::parse("1.2.3").unwrap(), Version::new(1, 2, 3));
        assert_eq!(Version::parse("0.0.0").unwrap(), Version::new(0, 0, 0));
        assert_eq!(
            Version::parse(" 10.20.30 ").unwrap(),
            Version::new(10, 20, 30)
        );
    }

    #[test]
    fn test_parse_malformed() {
        for input in ["1.2", "1.2.3.4", "1.x.3", "", "v1.2.3", "1..3", "-1.0.0"] {
            assert!(
                matches!(
                    Version::parse(input),
                    Err(VersionError::MalformedVersion(_))
                ),
                "expected failure for {input:?}"
            );
        }
    }

    #[test]
    fn test_ordering() {
        assert!(Version::new(1, 2, 3) < Version::new(1, 2, 4));
        assert!(Version::new(1, 9, 9) < Version::new(2, 0, 0));
        assert!(Version::new(0, 10, 0) > Version::new(0, 9, 9));
    }

    #[test]
    fn test_display_round_trip() {
        let v = Version::new(3, 14, 1);
        assert_eq!(Version::parse(&v.to_string()).unwrap(), v);
    }
}
