//! Application state and composition.

use std::sync::Arc;

use schemactl_domain::BucketPolicy;

use crate::infrastructure::neo4j::{Neo4jGraph, Neo4jSchemaRepo};
use crate::infrastructure::ports::SchemaRepo;
use crate::use_cases::schema::PollSettings;
use crate::use_cases::SchemaUseCases;

/// Main application state.
///
/// Holds the schema repository and the use cases built on it.
pub struct App {
    pub schema_repo: Arc<dyn SchemaRepo>,
    pub use_cases: SchemaUseCases,
}

impl App {
    /// Compose the application over a connected graph with default cadence
    /// and batching.
    pub fn new(graph: Neo4jGraph) -> Self {
        Self::with_repo(
            Arc::new(Neo4jSchemaRepo::new(graph)),
            PollSettings::default(),
            BucketPolicy::default(),
        )
    }

    pub fn with_repo(
        schema_repo: Arc<dyn SchemaRepo>,
        poll: PollSettings,
        policy: BucketPolicy,
    ) -> Self {
        Self {
            use_cases: SchemaUseCases::new(schema_repo.clone(), poll, policy),
            schema_repo,
        }
    }
}
