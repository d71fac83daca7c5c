//! Live schema catalog reads.

use std::collections::HashSet;
use std::sync::Arc;

use schemactl_domain::{sort_canonical, IndexDescriptor};

use crate::infrastructure::ports::{RepoError, SchemaRepo};

/// Read access to the live index and constraint catalog.
pub struct SchemaCatalog {
    repo: Arc<dyn SchemaRepo>,
}

impl SchemaCatalog {
    pub fn new(repo: Arc<dyn SchemaRepo>) -> Self {
        Self { repo }
    }

    /// Every live descriptor in canonical order.
    pub async fn read_live(&self) -> Result<Vec<IndexDescriptor>, RepoError> {
        let mut descriptors = self.repo.list_indexes().await?;
        sort_canonical(&mut descriptors);
        Ok(descriptors)
    }

    pub async fn existing_names(&self) -> Result<HashSet<String>, RepoError> {
        Ok(self
            .repo
            .list_indexes()
            .await?
            .into_iter()
            .map(|d| d.name)
            .collect())
    }

    /// Rows under the descriptor's first label, or `None` if counting failed.
    pub async fn row_count(&self, descriptor: &IndexDescriptor) -> Option<u64> {
        let label = descriptor.first_label()?;
        match self
            .repo
            .count_entities(descriptor.entity_type, label)
            .await
        {
            Ok(rows) => Some(rows),
            Err(e) => {
                tracing::warn!(
                    index = %descriptor.name,
                    label = %label,
                    error = %e,
                    "Could not count rows, treating label as large"
                );
                None
            }
        }
    }
}
