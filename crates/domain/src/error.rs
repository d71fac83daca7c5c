//! Unified error types for the domain layer
//!
//! Provides a common error type for the pure schema rules, so adapters never
//! need to fall back to String or anyhow when a rule is violated.

use thiserror::Error;

/// Unified error type for domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Validation failed (e.g., descriptor without labels or properties)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The database engine reported a version no syntax profile exists for.
    ///
    /// This is a configuration error: retrying cannot fix it.
    #[error("Unsupported Neo4j version: {0}")]
    UnsupportedVersion(String),
}

impl DomainError {
    /// Creates a validation error for descriptor rule violations.
    ///
    /// # Example
    /// ```ignore
    /// if descriptor.labels_or_types.is_empty() {
    ///     return Err(DomainError::validation("descriptor has no label"));
    /// }
    /// ```
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create an unsupported version error
    pub fn unsupported_version(version: impl Into<String>) -> Self {
        Self::UnsupportedVersion(version.into())
    }
}
