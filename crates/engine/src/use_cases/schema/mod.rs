//! Schema lifecycle use cases.
//!
//! - `dump` writes the live index and constraint catalog to a file
//! - `load` recreates a catalog from a file, batching by label size
//! - `rebuild` drops and recreates every live entry, resumably
//! - `drop` removes every entry named in a file

use std::sync::Arc;

mod catalog;
mod drop;
mod dump;
mod error;
mod load;
mod monitor;
mod rebuild;
mod version;

pub use catalog::SchemaCatalog;
pub use drop::{DropOptions, DropReport, DropSchema};
pub use dump::{DumpOptions, DumpSchema};
pub use error::{BuildError, SchemaError};
pub use load::{plan_load, LoadOptions, LoadPlan, LoadReport, LoadSchema};
pub use monitor::{BuildMonitor, PollSettings};
pub use rebuild::{resume_offset, RebuildOptions, RebuildReport, RebuildSchema};
pub use version::VersionDetector;

use schemactl_domain::BucketPolicy;

use crate::infrastructure::ports::SchemaRepo;

/// Container for schema use cases.
pub struct SchemaUseCases {
    pub dump: Arc<DumpSchema>,
    pub load: Arc<LoadSchema>,
    pub rebuild: Arc<RebuildSchema>,
    pub drop: Arc<DropSchema>,
}

impl SchemaUseCases {
    /// Wire every use case against one repository.
    pub fn new(repo: Arc<dyn SchemaRepo>, poll: PollSettings, policy: BucketPolicy) -> Self {
        let catalog = Arc::new(SchemaCatalog::new(repo.clone()));
        let detector = Arc::new(VersionDetector::new(repo.clone()));
        let monitor = Arc::new(BuildMonitor::new(repo.clone(), poll));

        Self {
            dump: Arc::new(DumpSchema::new(catalog.clone())),
            load: Arc::new(LoadSchema::new(
                repo.clone(),
                catalog.clone(),
                detector.clone(),
                monitor.clone(),
                policy,
            )),
            rebuild: Arc::new(RebuildSchema::new(repo.clone(), catalog, detector, monitor)),
            drop: Arc::new(DropSchema::new(repo)),
        }
    }
}
