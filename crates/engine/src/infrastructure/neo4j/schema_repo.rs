//! Schema catalog repository backed by Neo4j introspection commands.

use async_trait::async_trait;
use neo4rs::{query, Row};
use schemactl_domain::cypher::quote_identifier;
use schemactl_domain::{
    EntityType, IndexDescriptor, IndexState, IndexStatus, DEFAULT_INDEX_PROVIDER,
};

use super::query_helpers::{fetch_all, fetch_first, has_rows, optional, required, run_write};
use super::Neo4jGraph;
use crate::infrastructure::ports::{RepoError, SchemaRepo};

/// Every column of the index catalog. Columns differ across releases, so rows
/// are read by name and optional columns are tolerated.
const LIST_INDEXES: &str = "SHOW INDEXES YIELD *";

const SERVER_VERSION: &str =
    "CALL dbms.components() YIELD versions UNWIND versions AS version RETURN version";

const INDEX_STATUS: &str =
    "SHOW INDEXES YIELD name, state, populationPercent WHERE name = $name";

const CONSTRAINT_STATUS: &str = "SHOW CONSTRAINTS YIELD name WHERE name = $name";

fn count_statement(entity_type: EntityType, label: &str) -> String {
    let token = quote_identifier(label);
    match entity_type {
        EntityType::Node => format!("MATCH (n:{token}) RETURN count(n) AS count"),
        EntityType::Relationship => format!("MATCH ()-[r:{token}]->() RETURN count(r) AS count"),
    }
}

pub struct Neo4jSchemaRepo {
    graph: Neo4jGraph,
}

impl Neo4jSchemaRepo {
    pub fn new(graph: Neo4jGraph) -> Self {
        Self { graph }
    }
}

fn row_to_descriptor(row: Row) -> Result<IndexDescriptor, RepoError> {
    let name: String = required(&row, "name")?;

    // 4.x reports "UNIQUE"/"NONUNIQUE"; 5.x drops the column and links the
    // backing index to its constraint instead.
    let uniqueness = match optional::<String>(&row, "uniqueness") {
        Some(value) => value.eq_ignore_ascii_case("UNIQUE"),
        None => optional::<String>(&row, "owningConstraint").is_some(),
    };

    Ok(IndexDescriptor {
        id: optional(&row, "id").unwrap_or_default(),
        name,
        state: optional(&row, "state").unwrap_or_default(),
        population_percent: optional(&row, "populationPercent").unwrap_or_default(),
        uniqueness,
        index_type: optional(&row, "type").unwrap_or_default(),
        entity_type: EntityType::from_catalog(
            &optional::<String>(&row, "entityType").unwrap_or_default(),
        ),
        labels_or_types: optional(&row, "labelsOrTypes").unwrap_or_default(),
        properties: optional(&row, "properties").unwrap_or_default(),
        index_provider: optional::<String>(&row, "indexProvider")
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| DEFAULT_INDEX_PROVIDER.to_string()),
    })
}

fn row_to_status(row: Row) -> Result<IndexStatus, RepoError> {
    let state: String = optional(&row, "state").unwrap_or_default();
    let percent: f64 = optional(&row, "populationPercent").unwrap_or_default();
    Ok(IndexStatus::new(IndexState::from_catalog(&state), percent))
}

#[async_trait]
impl SchemaRepo for Neo4jSchemaRepo {
    async fn list_indexes(&self) -> Result<Vec<IndexDescriptor>, RepoError> {
        fetch_all(&self.graph, "list_indexes", query(LIST_INDEXES), row_to_descriptor).await
    }

    async fn server_version(&self) -> Result<Option<String>, RepoError> {
        fetch_first(&self.graph, "server_version", query(SERVER_VERSION), |row| {
            required(&row, "version")
        })
        .await
    }

    async fn count_entities(
        &self,
        entity_type: EntityType,
        label: &str,
    ) -> Result<u64, RepoError> {
        let count: Option<i64> = fetch_first(
            &self.graph,
            "count_entities",
            query(&count_statement(entity_type, label)),
            |row| required(&row, "count"),
        )
        .await?;
        Ok(count.unwrap_or_default().max(0) as u64)
    }

    async fn index_status(&self, name: &str) -> Result<Option<IndexStatus>, RepoError> {
        fetch_first(
            &self.graph,
            "index_status",
            query(INDEX_STATUS).param("name", name),
            row_to_status,
        )
        .await
    }

    async fn constraint_exists(&self, name: &str) -> Result<bool, RepoError> {
        has_rows(
            &self.graph,
            "constraint_exists",
            query(CONSTRAINT_STATUS).param("name", name),
        )
        .await
    }

    async fn run_schema(&self, statement: &str) -> Result<(), RepoError> {
        run_write(&self.graph, "run_schema", query(statement)).await
    }

    async fn run_schema_batch(&self, statements: Vec<String>) -> Result<(), RepoError> {
        let queries = statements.iter().map(|s| query(s)).collect();
        self.graph
            .run_in_transaction(queries)
            .await
            .map_err(|e| RepoError::database("run_schema_batch", e))
    }
}
