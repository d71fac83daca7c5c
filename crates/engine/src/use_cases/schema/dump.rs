//! Dump the live catalog to a descriptor file.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use schemactl_domain::{sort_canonical, ALTERNATE_INDEX_PROVIDER};

use super::{SchemaCatalog, SchemaError};
use crate::infrastructure::descriptor_file::write_descriptors;

#[derive(Debug, Clone)]
pub struct DumpOptions {
    pub file: PathBuf,
    /// Descriptors covering any of these properties are written with the
    /// alternate (full-text capable) provider.
    pub lucene_properties: HashSet<String>,
}

pub struct DumpSchema {
    catalog: Arc<SchemaCatalog>,
}

impl DumpSchema {
    pub fn new(catalog: Arc<SchemaCatalog>) -> Self {
        Self { catalog }
    }

    /// Write every live descriptor to `options.file`; returns how many were written.
    pub async fn execute(&self, options: &DumpOptions) -> Result<usize, SchemaError> {
        let mut descriptors = self.catalog.read_live().await?;

        for descriptor in descriptors
            .iter_mut()
            .filter(|d| d.covers_any(&options.lucene_properties))
        {
            tracing::debug!(index = %descriptor.name, "Using alternate index provider");
            descriptor.index_provider = ALTERNATE_INDEX_PROVIDER.to_string();
        }
        sort_canonical(&mut descriptors);

        write_descriptors(&options.file, &descriptors)?;
        tracing::info!(
            file = %options.file.display(),
            count = descriptors.len(),
            "Dumped schema catalog"
        );
        Ok(descriptors.len())
    }
}
