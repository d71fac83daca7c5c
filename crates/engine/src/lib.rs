//! schemactl engine library.
//!
//! Administers the index and constraint catalog of a Neo4j database.
//!
//! ## Structure
//!
//! - `use_cases/` - dump, load, rebuild and drop orchestration
//! - `infrastructure/` - External dependency implementations (ports + adapters)
//! - `cli` - Command-line surface
//! - `app` - Application composition

pub mod app;
pub mod cli;
pub mod infrastructure;
pub mod use_cases;

/// E2E integration tests using real Neo4j via testcontainers.
#[cfg(test)]
mod e2e_tests;

pub use app::App;
pub use cli::{Cli, Commands};
