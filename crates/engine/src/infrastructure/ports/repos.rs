//! Repository port traits for database access.

use async_trait::async_trait;
use schemactl_domain::{EntityType, IndexDescriptor, IndexStatus};

use super::error::RepoError;

// =============================================================================
// Schema Catalog
// =============================================================================

/// Access to the database's schema catalog and DDL execution.
///
/// Every call borrows a connection for its own duration only; nothing is held
/// between calls, so callers may sleep between polls freely.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SchemaRepo: Send + Sync {
    /// Every index and constraint-backing index, in catalog order.
    async fn list_indexes(&self) -> Result<Vec<IndexDescriptor>, RepoError>;

    /// First component version reported by the engine, if any.
    async fn server_version(&self) -> Result<Option<String>, RepoError>;

    /// Approximate number of entities carrying `label` (or relationship type).
    async fn count_entities(&self, entity_type: EntityType, label: &str)
        -> Result<u64, RepoError>;

    /// Build progress of the index called `name`; `None` if the catalog has no such index.
    async fn index_status(&self, name: &str) -> Result<Option<IndexStatus>, RepoError>;

    /// Whether the constraint catalog lists a constraint called `name`.
    async fn constraint_exists(&self, name: &str) -> Result<bool, RepoError>;

    /// Run one schema statement in its own write transaction.
    async fn run_schema(&self, statement: &str) -> Result<(), RepoError>;

    /// Run several schema statements in a single write transaction.
    async fn run_schema_batch(&self, statements: Vec<String>) -> Result<(), RepoError>;
}
