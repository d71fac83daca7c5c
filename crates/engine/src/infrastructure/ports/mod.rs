//! Port traits for infrastructure boundaries.
//!
//! The schema catalog is the only abstraction in the engine. Everything else
//! (descriptor files, checkpoints, polling) is concrete. The port exists so the
//! orchestration can be exercised without a running Neo4j.

mod error;
mod repos;

pub use error::{FileError, RepoError};
pub use repos::SchemaRepo;

#[cfg(test)]
pub use repos::MockSchemaRepo;
