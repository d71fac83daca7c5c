//! Neo4j database implementations.

mod connection;
mod graph;
mod query_helpers;
mod schema_repo;

pub use connection::{connect, Neo4jSettings, MAX_CONNECT_ATTEMPTS};
pub use graph::{Neo4jGraph, Neo4jRowStream};
pub use schema_repo::Neo4jSchemaRepo;
