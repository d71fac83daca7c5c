//! Query and column helpers shared by the catalog adapter.
//!
//! Every helper takes the name of the repository operation it serves, so a
//! driver failure is reported as e.g. `Database error in index_status: ...`.

use neo4rs::{Query, Row};
use serde::de::DeserializeOwned;

use crate::infrastructure::neo4j::{Neo4jGraph, Neo4jRowStream};
use crate::infrastructure::ports::RepoError;

async fn open(
    graph: &Neo4jGraph,
    operation: &'static str,
    query: Query,
) -> Result<Neo4jRowStream, RepoError> {
    graph
        .execute(query)
        .await
        .map_err(|e| RepoError::database(operation, e))
}

async fn next_row(
    rows: &mut Neo4jRowStream,
    operation: &'static str,
) -> Result<Option<Row>, RepoError> {
    rows.next()
        .await
        .map_err(|e| RepoError::database(operation, e))
}

/// Convert every row of `query`.
pub async fn fetch_all<T>(
    graph: &Neo4jGraph,
    operation: &'static str,
    query: Query,
    convert: impl Fn(Row) -> Result<T, RepoError>,
) -> Result<Vec<T>, RepoError> {
    let mut rows = open(graph, operation, query).await?;
    let mut items = Vec::new();
    while let Some(row) = next_row(&mut rows, operation).await? {
        items.push(convert(row)?);
    }
    Ok(items)
}

/// Convert the first row of `query`, ignoring the rest.
pub async fn fetch_first<T>(
    graph: &Neo4jGraph,
    operation: &'static str,
    query: Query,
    convert: impl FnOnce(Row) -> Result<T, RepoError>,
) -> Result<Option<T>, RepoError> {
    let mut rows = open(graph, operation, query).await?;
    next_row(&mut rows, operation).await?.map(convert).transpose()
}

/// Whether `query` yields at least one row.
pub async fn has_rows(
    graph: &Neo4jGraph,
    operation: &'static str,
    query: Query,
) -> Result<bool, RepoError> {
    let mut rows = open(graph, operation, query).await?;
    Ok(next_row(&mut rows, operation).await?.is_some())
}

/// Run a statement whose result is discarded.
pub async fn run_write(
    graph: &Neo4jGraph,
    operation: &'static str,
    query: Query,
) -> Result<(), RepoError> {
    graph
        .run(query)
        .await
        .map_err(|e| RepoError::database(operation, e))
}

/// A column every row must carry.
pub fn required<T: DeserializeOwned>(row: &Row, column: &str) -> Result<T, RepoError> {
    row.get::<T>(column)
        .map_err(|e| RepoError::serialization(format!("column `{column}`: {e}")))
}

/// A column that may be absent from this server release or null.
pub fn optional<T: DeserializeOwned>(row: &Row, column: &str) -> Option<T> {
    row.get::<Option<T>>(column).ok().flatten()
}
