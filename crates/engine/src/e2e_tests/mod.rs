//! Schema lifecycle E2E tests.
//!
//! These tests run every command against a real Neo4j started with
//! testcontainers and the production `Neo4jSchemaRepo`.
//!
//! # Running E2E Tests
//!
//! ```bash
//! # Run all E2E tests (requires Docker)
//! cargo test -p schemactl-engine --lib e2e_tests -- --ignored --test-threads=1
//! ```

mod neo4j_test_harness;

pub use neo4j_test_harness::*;
