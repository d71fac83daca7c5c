//! In-memory schema catalog for testing
//!
//! Serves a fixed catalog and records every schema statement it is asked to
//! run. Builds report ONLINE immediately unless configured to fail. It does not
//! interpret DDL, so the served catalog never changes.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use schemactl_domain::{EntityType, IndexDescriptor, IndexState, IndexStatus};
use tokio::sync::RwLock;

use crate::infrastructure::ports::{RepoError, SchemaRepo};

/// One call that mutated the schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaCall {
    Statement(String),
    Batch(Vec<String>),
}

#[derive(Default)]
struct State {
    indexes: Vec<IndexDescriptor>,
    version: Option<String>,
    row_counts: HashMap<String, u64>,
    failing_counts: HashSet<String>,
    failing_builds: HashSet<String>,
    offline_constraints: HashSet<String>,
    calls: Vec<SchemaCall>,
}

pub struct InMemorySchemaRepo {
    state: RwLock<State>,
}

impl InMemorySchemaRepo {
    pub fn new(version: &str) -> Self {
        Self {
            state: RwLock::new(State {
                version: Some(version.to_string()),
                ..State::default()
            }),
        }
    }

    pub fn with_indexes(mut self, indexes: Vec<IndexDescriptor>) -> Self {
        self.state.get_mut().indexes = indexes;
        self
    }

    pub fn with_row_count(mut self, label: &str, rows: u64) -> Self {
        self.state.get_mut().row_counts.insert(label.to_string(), rows);
        self
    }

    /// Counting rows for `label` fails.
    pub fn with_failing_count(mut self, label: &str) -> Self {
        self.state.get_mut().failing_counts.insert(label.to_string());
        self
    }

    /// The index called `name` reports FAILED.
    pub fn with_failing_build(mut self, name: &str) -> Self {
        self.state.get_mut().failing_builds.insert(name.to_string());
        self
    }

    /// The constraint called `name` never shows up in the constraint catalog.
    pub fn with_offline_constraint(mut self, name: &str) -> Self {
        self.state
            .get_mut()
            .offline_constraints
            .insert(name.to_string());
        self
    }

    pub async fn calls(&self) -> Vec<SchemaCall> {
        self.state.read().await.calls.clone()
    }

    /// Every statement run so far, batches flattened, in order.
    pub async fn statements(&self) -> Vec<String> {
        self.calls()
            .await
            .into_iter()
            .flat_map(|call| match call {
                SchemaCall::Statement(s) => vec![s],
                SchemaCall::Batch(batch) => batch,
            })
            .collect()
    }
}

#[async_trait]
impl SchemaRepo for InMemorySchemaRepo {
    async fn list_indexes(&self) -> Result<Vec<IndexDescriptor>, RepoError> {
        Ok(self.state.read().await.indexes.clone())
    }

    async fn server_version(&self) -> Result<Option<String>, RepoError> {
        Ok(self.state.read().await.version.clone())
    }

    async fn count_entities(
        &self,
        _entity_type: EntityType,
        label: &str,
    ) -> Result<u64, RepoError> {
        let state = self.state.read().await;
        if state.failing_counts.contains(label) {
            return Err(RepoError::database("count_entities", "count failed"));
        }
        Ok(state.row_counts.get(label).copied().unwrap_or_default())
    }

    async fn index_status(&self, name: &str) -> Result<Option<IndexStatus>, RepoError> {
        if self.state.read().await.failing_builds.contains(name) {
            return Ok(Some(IndexStatus::new(IndexState::Failed, 0.0)));
        }
        Ok(Some(IndexStatus::new(IndexState::Online, 100.0)))
    }

    async fn constraint_exists(&self, name: &str) -> Result<bool, RepoError> {
        Ok(!self.state.read().await.offline_constraints.contains(name))
    }

    async fn run_schema(&self, statement: &str) -> Result<(), RepoError> {
        self.state
            .write()
            .await
            .calls
            .push(SchemaCall::Statement(statement.to_string()));
        Ok(())
    }

    async fn run_schema_batch(&self, statements: Vec<String>) -> Result<(), RepoError> {
        self.state
            .write()
            .await
            .calls
            .push(SchemaCall::Batch(statements));
        Ok(())
    }
}
