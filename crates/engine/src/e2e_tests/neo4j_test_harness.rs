//! Neo4j test harness for E2E testing.
//!
//! Provides testcontainer-based Neo4j instance management for integration tests.

use std::sync::Arc;

use neo4rs::query;
use schemactl_domain::BucketPolicy;
use testcontainers::{core::WaitFor, runners::AsyncRunner, ContainerAsync, GenericImage};

use crate::app::App;
use crate::infrastructure::neo4j::{connect, Neo4jGraph, Neo4jSchemaRepo, Neo4jSettings};
use crate::use_cases::schema::PollSettings;

/// Password used for Neo4j test containers.
pub const TEST_NEO4J_PASSWORD: &str = "testpassword";

/// Rounds of `connect` (each with its own backoff) while the container boots.
const CONNECT_ROUNDS: u32 = 6;

/// Neo4j test harness managing container lifecycle.
pub struct Neo4jTestHarness {
    _container: ContainerAsync<GenericImage>,
    settings: Neo4jSettings,
    graph: Neo4jGraph,
}

impl Neo4jTestHarness {
    /// Start a new Neo4j container and establish a connection.
    ///
    /// # Errors
    ///
    /// Returns an error if the container fails to start or connection cannot be established.
    pub async fn start() -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let container: ContainerAsync<GenericImage> = neo4j_image(TEST_NEO4J_PASSWORD).start().await;
        let bolt_port = container.get_host_port_ipv4(7687).await;
        let settings = Neo4jSettings {
            uri: format!("bolt://127.0.0.1:{bolt_port}"),
            username: "neo4j".to_string(),
            password: TEST_NEO4J_PASSWORD.to_string(),
            database: None,
            no_auth: false,
        };

        let graph = connect_with_retry(&settings).await?;

        Ok(Self {
            _container: container,
            settings,
            graph,
        })
    }

    pub fn graph(&self) -> &Neo4jGraph {
        &self.graph
    }

    pub fn settings(&self) -> &Neo4jSettings {
        &self.settings
    }

    /// An app over this database with production cadence and batching.
    pub fn app(&self) -> App {
        App::with_repo(
            Arc::new(Neo4jSchemaRepo::new(self.graph.clone())),
            PollSettings::default(),
            BucketPolicy::default(),
        )
    }

    /// Run one statement, failing the test on error.
    pub async fn run(&self, statement: &str) {
        self.graph
            .run(query(statement))
            .await
            .unwrap_or_else(|e| panic!("`{statement}` failed: {e}"));
    }
}

/// Create a Neo4j container image with the given password.
///
/// Configuration for reliability:
/// - Pinned version for consistency across runs
/// - Memory limits to prevent JVM crashes
/// - Connection readiness is verified by connect_with_retry
pub fn neo4j_image(password: &str) -> GenericImage {
    GenericImage::new("neo4j", "5.26.0-community")
        .with_env_var("NEO4J_AUTH", format!("neo4j/{password}"))
        // Memory limits to prevent JVM crashes under resource pressure
        .with_env_var("NEO4J_server_memory_heap_initial__size", "256m")
        .with_env_var("NEO4J_server_memory_heap_max__size", "512m")
        .with_env_var("NEO4J_server_memory_pagecache_size", "128m")
        .with_exposed_port(7687)
        .with_wait_for(WaitFor::seconds(5))
}

/// Connect while the container finishes booting.
pub async fn connect_with_retry(
    settings: &Neo4jSettings,
) -> Result<Neo4jGraph, Box<dyn std::error::Error + Send + Sync>> {
    let mut last_err = None;
    for round in 1..=CONNECT_ROUNDS {
        match connect(settings).await {
            Ok(graph) => return Ok(graph),
            Err(e) => {
                tracing::debug!(round, error = %e, "Neo4j not ready yet");
                last_err = Some(e);
            }
        }
    }
    Err(match last_err {
        Some(e) => e.into(),
        None => "no connection attempts made".into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore = "requires docker (testcontainers)"]
    async fn test_neo4j_harness_starts_and_connects() {
        let harness = Neo4jTestHarness::start()
            .await
            .expect("Failed to start Neo4j harness");

        let mut result = harness
            .graph()
            .execute(query("RETURN 1 as n"))
            .await
            .expect("Query failed");

        let row = result.next().await.expect("Row error").expect("No result");
        let n: i64 = row.get("n").expect("Column not found");
        assert_eq!(n, 1);
    }
}
