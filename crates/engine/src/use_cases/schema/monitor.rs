//! Build progress monitoring.
//!
//! After a create statement is submitted, the build moves through three
//! phases: waiting for the engine to pick it up, population, and (for
//! uniqueness constraints) the constraint itself appearing in the catalog.

use std::sync::Arc;
use std::time::Duration;

use schemactl_domain::{IndexDescriptor, IndexState, IndexStatus};
use tokio::time::sleep;

use super::{BuildError, SchemaError};
use crate::infrastructure::ports::SchemaRepo;

/// Poll cadence for each build phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    pub start_attempts: u32,
    pub start_interval: Duration,
    pub population_interval: Duration,
    pub constraint_attempts: u32,
    pub constraint_interval: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            start_attempts: 10,
            start_interval: Duration::from_secs(1),
            population_interval: Duration::from_millis(100),
            constraint_attempts: 100,
            constraint_interval: Duration::from_millis(100),
        }
    }
}

impl PollSettings {
    /// Same attempt budgets, no waiting between polls.
    pub fn immediate() -> Self {
        Self {
            start_interval: Duration::ZERO,
            population_interval: Duration::ZERO,
            constraint_interval: Duration::ZERO,
            ..Self::default()
        }
    }
}

/// Waits for a submitted index or constraint to come online.
pub struct BuildMonitor {
    repo: Arc<dyn SchemaRepo>,
    settings: PollSettings,
}

impl BuildMonitor {
    pub fn new(repo: Arc<dyn SchemaRepo>, settings: PollSettings) -> Self {
        Self { repo, settings }
    }

    /// Block until `descriptor` is fully built.
    ///
    /// Build failures surface as [`SchemaError::Build`]; anything else is a
    /// repository failure while polling.
    pub async fn await_built(&self, descriptor: &IndexDescriptor) -> Result<(), SchemaError> {
        let name = descriptor.name.as_str();

        let started = self.confirm_started(name).await?;
        self.await_population(name, started).await?;
        if descriptor.uniqueness {
            self.await_constraint(name).await?;
        }

        tracing::info!(index = %name, kind = %descriptor.kind().keyword(), "Online");
        Ok(())
    }

    async fn confirm_started(&self, name: &str) -> Result<IndexStatus, SchemaError> {
        for attempt in 1..=self.settings.start_attempts {
            match self.repo.index_status(name).await? {
                Some(status) if status.state.is_started() => return Ok(status),
                Some(status) if status.state == IndexState::Failed => {
                    return Err(BuildError::Failed {
                        name: name.to_string(),
                        state: status.state,
                    }
                    .into());
                }
                _ => {
                    tracing::debug!(index = %name, attempt, "Waiting for build to start");
                    sleep(self.settings.start_interval).await;
                }
            }
        }

        Err(BuildError::NeverStarted {
            name: name.to_string(),
        }
        .into())
    }

    async fn await_population(&self, name: &str, first: IndexStatus) -> Result<(), SchemaError> {
        let mut status = first;
        let mut reported = None;

        loop {
            if status.state.is_failed() {
                return Err(BuildError::Failed {
                    name: name.to_string(),
                    state: status.state,
                }
                .into());
            }

            let percent = status.whole_percent();
            let advanced = match reported {
                Some(last) => percent > last,
                None => true,
            };
            if advanced {
                tracing::info!(index = %name, percent, "Populating");
                reported = Some(percent);
            }

            if status.is_complete() {
                return Ok(());
            }

            sleep(self.settings.population_interval).await;
            status = self
                .repo
                .index_status(name)
                .await?
                .unwrap_or_else(IndexStatus::missing);
        }
    }

    async fn await_constraint(&self, name: &str) -> Result<(), SchemaError> {
        for _ in 0..self.settings.constraint_attempts {
            if self.repo.constraint_exists(name).await? {
                return Ok(());
            }
            sleep(self.settings.constraint_interval).await;
        }

        tracing::error!(constraint = %name, "Constraint did not come online");
        Err(BuildError::ConstraintTimeout {
            name: name.to_string(),
        }
        .into())
    }
}
