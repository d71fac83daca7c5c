//! Engine version detection.

use std::sync::Arc;

use schemactl_domain::{DomainError, VersionProfile};

use super::SchemaError;
use crate::infrastructure::ports::SchemaRepo;

/// Resolves the connected engine's version into a DDL profile.
pub struct VersionDetector {
    repo: Arc<dyn SchemaRepo>,
}

impl VersionDetector {
    pub fn new(repo: Arc<dyn SchemaRepo>) -> Self {
        Self { repo }
    }

    /// Must succeed before any statement is synthesized.
    pub async fn detect(&self) -> Result<VersionProfile, SchemaError> {
        let version = self.repo.server_version().await?.ok_or_else(|| {
            DomainError::unsupported_version("the server reported no component versions")
        })?;
        let profile = VersionProfile::from_version(&version)?;
        tracing::info!(version = %version, profile = %profile, "Detected Neo4j version");
        Ok(profile)
    }
}
