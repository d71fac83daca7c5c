//! Error types for schema use cases.

use schemactl_domain::{DomainError, IndexState};

use crate::infrastructure::ports::{FileError, RepoError};

/// A single index or constraint that did not come online.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BuildError {
    #[error("Index '{name}' never started building")]
    NeverStarted { name: String },

    #[error("Index '{name}' failed to build (state {state})")]
    Failed { name: String, state: IndexState },

    #[error("Constraint '{name}' failed to come online, please create manually")]
    ConstraintTimeout { name: String },
}

impl BuildError {
    pub fn name(&self) -> &str {
        match self {
            Self::NeverStarted { name }
            | Self::Failed { name, .. }
            | Self::ConstraintTimeout { name } => name,
        }
    }
}

/// Errors that abort a dump, load, rebuild or drop run.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    File(#[from] FileError),

    #[error(transparent)]
    Build(#[from] BuildError),
}
