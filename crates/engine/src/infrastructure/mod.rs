//! Infrastructure implementations.
//!
//! Contains port trait implementations for external dependencies: the Neo4j
//! schema catalog and the descriptor and checkpoint files.

pub mod checkpoint;
pub mod descriptor_file;
pub mod neo4j;
pub mod ports;

#[cfg(test)]
pub mod memory_schema;
