//! Rebuild every live index and constraint in place.
//!
//! Each entry is dropped, recreated and awaited before the next one starts.
//! The name of the entry being rebuilt is written to a checkpoint file first,
//! so an interrupted run resumes at that entry.

use std::path::PathBuf;
use std::sync::Arc;

use schemactl_domain::cypher::{create_statement, drop_statement};
use schemactl_domain::IndexDescriptor;

use super::{BuildMonitor, SchemaCatalog, SchemaError, VersionDetector};
use crate::infrastructure::checkpoint::CheckpointFile;
use crate::infrastructure::ports::SchemaRepo;

#[derive(Debug, Clone)]
pub struct RebuildOptions {
    pub checkpoint: PathBuf,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RebuildReport {
    pub rebuilt: Vec<String>,
    pub invalid: Vec<String>,
    /// Checkpointed name the run resumed at, if it was found.
    pub resumed_from: Option<String>,
}

/// Position of `checkpoint` in `descriptors`, or 0 if there is none or it is
/// not in the list.
pub fn resume_offset(descriptors: &[IndexDescriptor], checkpoint: Option<&str>) -> usize {
    checkpoint
        .and_then(|name| descriptors.iter().position(|d| d.name == name))
        .unwrap_or(0)
}

pub struct RebuildSchema {
    repo: Arc<dyn SchemaRepo>,
    catalog: Arc<SchemaCatalog>,
    detector: Arc<VersionDetector>,
    monitor: Arc<BuildMonitor>,
}

impl RebuildSchema {
    pub fn new(
        repo: Arc<dyn SchemaRepo>,
        catalog: Arc<SchemaCatalog>,
        detector: Arc<VersionDetector>,
        monitor: Arc<BuildMonitor>,
    ) -> Self {
        Self {
            repo,
            catalog,
            detector,
            monitor,
        }
    }

    /// Stops at the first entry that fails to come online, leaving the
    /// checkpoint on it so the next run retries it.
    pub async fn execute(&self, options: &RebuildOptions) -> Result<RebuildReport, SchemaError> {
        let profile = self.detector.detect().await?;
        let mut report = RebuildReport::default();

        let (valid, invalid): (Vec<_>, Vec<_>) = self
            .catalog
            .read_live()
            .await?
            .into_iter()
            .partition(IndexDescriptor::is_buildable);
        for descriptor in invalid {
            if let Err(e) = descriptor.validate() {
                tracing::warn!(error = %e, "Skipping descriptor that cannot be recreated");
            }
            report.invalid.push(descriptor.name);
        }

        let checkpoint = CheckpointFile::new(&options.checkpoint);
        let last = checkpoint.read()?;
        let offset = resume_offset(&valid, last.as_deref());
        if let Some(name) = last {
            if valid.iter().any(|d| d.name == name) {
                tracing::info!(index = %name, skipped = offset, "Resuming rebuild");
                report.resumed_from = Some(name);
            } else {
                tracing::warn!(index = %name, "Checkpoint not in catalog, starting from the beginning");
            }
        }

        let total = valid.len();
        for (position, descriptor) in valid.iter().enumerate().skip(offset) {
            tracing::info!(
                index = %descriptor.name,
                step = position + 1,
                total,
                "Rebuilding"
            );
            checkpoint.write(&descriptor.name)?;
            self.repo.run_schema(&drop_statement(descriptor)).await?;
            self.repo
                .run_schema(&create_statement(profile, descriptor))
                .await?;
            self.monitor.await_built(descriptor).await?;
            report.rebuilt.push(descriptor.name.clone());
        }

        checkpoint.clear()?;
        tracing::info!(rebuilt = report.rebuilt.len(), "Rebuild finished");
        Ok(report)
    }
}
