//! Use cases - User story orchestration.
//!
//! Use cases orchestrate the schema catalog, build monitoring and files to
//! fulfil one command each.

pub mod schema;

pub use schema::SchemaUseCases;
