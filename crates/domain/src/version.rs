//! Supported database engine versions and their DDL syntax.
//!
//! Uniqueness-constraint DDL changed shape across releases: 4.2 and 4.3 only
//! accept `ON (n:Label) ASSERT ... IS UNIQUE`, while 4.4 and 5.x use
//! `FOR (n:Label) REQUIRE ... IS UNIQUE`. The set of profiles is closed; an
//! engine reporting any other version cannot be administered.

use std::fmt;

use crate::error::DomainError;

/// A supported engine release family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VersionProfile {
    V4_2,
    V4_3,
    V4_4,
    V5,
}

/// The two historical families of uniqueness-constraint syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstraintSyntax {
    /// `CREATE CONSTRAINT ... ON (n:L) ASSERT n.p IS UNIQUE`
    Assert,
    /// `CREATE CONSTRAINT ... FOR (n:L) REQUIRE n.p IS UNIQUE`
    Require,
}

impl VersionProfile {
    /// Map an engine component version string (e.g. `"4.4.12"`) to a profile.
    pub fn from_version(version: &str) -> Result<Self, DomainError> {
        let version = version.trim();
        if version.starts_with("4.4") {
            Ok(VersionProfile::V4_4)
        } else if version.starts_with("4.3") {
            Ok(VersionProfile::V4_3)
        } else if version.starts_with("4.2") {
            Ok(VersionProfile::V4_2)
        } else if version.starts_with("5.") {
            Ok(VersionProfile::V5)
        } else {
            Err(DomainError::unsupported_version(version))
        }
    }

    pub fn constraint_syntax(&self) -> ConstraintSyntax {
        match self {
            VersionProfile::V4_2 | VersionProfile::V4_3 => ConstraintSyntax::Assert,
            VersionProfile::V4_4 | VersionProfile::V5 => ConstraintSyntax::Require,
        }
    }
}

impl fmt::Display for VersionProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            VersionProfile::V4_2 => "4.2",
            VersionProfile::V4_3 => "4.3",
            VersionProfile::V4_4 => "4.4",
            VersionProfile::V5 => "5.x",
        };
        write!(f, "{name}")
    }
}
