//! Drop every entry named in a descriptor file.

use std::path::PathBuf;
use std::sync::Arc;

use schemactl_domain::cypher::drop_statement;

use super::SchemaError;
use crate::infrastructure::descriptor_file::read_descriptors;
use crate::infrastructure::ports::SchemaRepo;

#[derive(Debug, Clone)]
pub struct DropOptions {
    pub file: PathBuf,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DropReport {
    pub dropped: Vec<String>,
    pub failed: Vec<(String, String)>,
}

pub struct DropSchema {
    repo: Arc<dyn SchemaRepo>,
}

impl DropSchema {
    pub fn new(repo: Arc<dyn SchemaRepo>) -> Self {
        Self { repo }
    }

    /// Drops in file order. A failed drop is logged and the rest still run.
    pub async fn execute(&self, options: &DropOptions) -> Result<DropReport, SchemaError> {
        let descriptors = read_descriptors(&options.file)?;
        let mut report = DropReport::default();

        for descriptor in &descriptors {
            match self.repo.run_schema(&drop_statement(descriptor)).await {
                Ok(()) => {
                    tracing::info!(index = %descriptor.name, "Dropped");
                    report.dropped.push(descriptor.name.clone());
                }
                Err(e) => {
                    tracing::error!(index = %descriptor.name, error = %e, "Drop failed");
                    report.failed.push((descriptor.name.clone(), e.to_string()));
                }
            }
        }
        Ok(report)
    }
}
