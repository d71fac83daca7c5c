//! Load a descriptor file into the live catalog.
//!
//! Entries whose name already exists are skipped unless recreation is forced,
//! in which case every entry is dropped before it is created.
//! Single-label entries are grouped by how many rows their label holds and
//! submitted a batch at a time; everything else is built one by one.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use schemactl_domain::cypher::{create_statement, drop_statement};
use schemactl_domain::{BucketPolicy, IndexDescriptor, VersionProfile};

use super::{BuildMonitor, SchemaCatalog, SchemaError, VersionDetector};
use crate::infrastructure::descriptor_file::read_descriptors;
use crate::infrastructure::ports::SchemaRepo;

#[derive(Debug, Clone)]
pub struct LoadOptions {
    pub file: PathBuf,
    /// Drop every entry before creating it, instead of skipping existing ones.
    pub recreate: bool,
    /// Log the statements that would run without touching the database.
    pub dry_run: bool,
}

/// Outcome of a load, by descriptor name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    pub created: Vec<String>,
    pub skipped: Vec<String>,
    pub invalid: Vec<String>,
    /// Name and reason of every entry that did not come online.
    pub failed: Vec<(String, String)>,
    /// Statements a dry run would have submitted.
    pub planned: Vec<String>,
}

impl LoadReport {
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}

/// How each descriptor of a file will be handled.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadPlan {
    pub invalid: Vec<IndexDescriptor>,
    pub skipped: Vec<IndexDescriptor>,
    /// Existing entries to drop and recreate.
    pub forced: Vec<IndexDescriptor>,
    /// Multi-label entries, built one at a time.
    pub individual: Vec<IndexDescriptor>,
    /// Single-label entries, built in size-tiered batches.
    pub bucketed: Vec<IndexDescriptor>,
}

/// Split `descriptors` by how they will be loaded. File order is kept within
/// each group.
pub fn plan_load(
    descriptors: Vec<IndexDescriptor>,
    existing: &HashSet<String>,
    recreate: bool,
) -> LoadPlan {
    let mut plan = LoadPlan::default();
    for descriptor in descriptors {
        if !descriptor.is_buildable() {
            plan.invalid.push(descriptor);
        } else if existing.contains(&descriptor.name) {
            if recreate {
                plan.forced.push(descriptor);
            } else {
                plan.skipped.push(descriptor);
            }
        } else if descriptor.is_multi_label() {
            plan.individual.push(descriptor);
        } else {
            plan.bucketed.push(descriptor);
        }
    }
    plan
}

pub struct LoadSchema {
    repo: Arc<dyn SchemaRepo>,
    catalog: Arc<SchemaCatalog>,
    detector: Arc<VersionDetector>,
    monitor: Arc<BuildMonitor>,
    policy: BucketPolicy,
}

impl LoadSchema {
    pub fn new(
        repo: Arc<dyn SchemaRepo>,
        catalog: Arc<SchemaCatalog>,
        detector: Arc<VersionDetector>,
        monitor: Arc<BuildMonitor>,
        policy: BucketPolicy,
    ) -> Self {
        Self {
            repo,
            catalog,
            detector,
            monitor,
            policy,
        }
    }

    pub async fn execute(&self, options: &LoadOptions) -> Result<LoadReport, SchemaError> {
        let profile = self.detector.detect().await?;
        let descriptors = read_descriptors(&options.file)?;
        let mut report = LoadReport::default();

        if options.dry_run {
            for descriptor in &descriptors {
                if let Err(e) = descriptor.validate() {
                    tracing::warn!(error = %e, "Skipping invalid descriptor");
                    report.invalid.push(descriptor.name.clone());
                    continue;
                }
                let statement = create_statement(profile, descriptor);
                tracing::debug!(index = %descriptor.name, statement = %statement, "Dry run");
                report.planned.push(statement);
            }
            return Ok(report);
        }

        let existing = self.catalog.existing_names().await?;
        let plan = plan_load(descriptors, &existing, options.recreate);

        for descriptor in &plan.invalid {
            if let Err(e) = descriptor.validate() {
                tracing::warn!(error = %e, "Skipping invalid descriptor");
            }
            report.invalid.push(descriptor.name.clone());
        }
        for descriptor in &plan.skipped {
            tracing::info!(index = %descriptor.name, "Already exists, skipping");
            report.skipped.push(descriptor.name.clone());
        }

        for descriptor in &plan.forced {
            tracing::info!(index = %descriptor.name, "Recreating");
            self.repo.run_schema(&drop_statement(descriptor)).await?;
            self.create_one(profile, descriptor, &mut report).await?;
        }

        for descriptor in &plan.individual {
            if options.recreate {
                self.repo.run_schema(&drop_statement(descriptor)).await?;
            }
            self.create_one(profile, descriptor, &mut report).await?;
        }

        self.create_bucketed(profile, plan.bucketed, options.recreate, &mut report)
            .await?;

        tracing::info!(
            created = report.created.len(),
            skipped = report.skipped.len(),
            invalid = report.invalid.len(),
            failed = report.failed.len(),
            "Load finished"
        );
        Ok(report)
    }

    async fn create_one(
        &self,
        profile: VersionProfile,
        descriptor: &IndexDescriptor,
        report: &mut LoadReport,
    ) -> Result<(), SchemaError> {
        self.repo
            .run_schema(&create_statement(profile, descriptor))
            .await?;
        let outcome = self.monitor.await_built(descriptor).await;
        record(report, descriptor, outcome)
    }

    async fn create_bucketed(
        &self,
        profile: VersionProfile,
        descriptors: Vec<IndexDescriptor>,
        recreate: bool,
        report: &mut LoadReport,
    ) -> Result<(), SchemaError> {
        let mut sized = Vec::with_capacity(descriptors.len());
        for descriptor in descriptors {
            let rows = self.catalog.row_count(&descriptor).await.unwrap_or(u64::MAX);
            sized.push((descriptor, rows));
        }

        for bucket in self.policy.build_buckets(sized) {
            tracing::info!(
                tier = ?bucket.tier,
                descriptors = bucket.descriptor_count(),
                batches = bucket.batches.len(),
                "Building bucket"
            );
            for batch in bucket.batches {
                if recreate {
                    for descriptor in &batch.descriptors {
                        self.repo.run_schema(&drop_statement(descriptor)).await?;
                    }
                }
                let statements = batch
                    .descriptors
                    .iter()
                    .map(|d| create_statement(profile, d))
                    .collect();
                self.repo.run_schema_batch(statements).await?;

                for descriptor in &batch.descriptors {
                    let outcome = self.monitor.await_built(descriptor).await;
                    record(report, descriptor, outcome)?;
                }
            }
        }
        Ok(())
    }
}

/// Build failures are recorded; anything else aborts the load.
fn record(
    report: &mut LoadReport,
    descriptor: &IndexDescriptor,
    outcome: Result<(), SchemaError>,
) -> Result<(), SchemaError> {
    match outcome {
        Ok(()) => report.created.push(descriptor.name.clone()),
        Err(SchemaError::Build(e)) => {
            tracing::error!(index = %e.name(), error = %e, "Build failed");
            report.failed.push((e.name().to_string(), e.to_string()));
        }
        Err(e) => return Err(e),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::descriptor_file::write_descriptors;
    use crate::infrastructure::memory_schema::{InMemorySchemaRepo, SchemaCall};
    use crate::use_cases::schema::PollSettings;

    fn load_schema(repo: Arc<InMemorySchemaRepo>) -> LoadSchema {
        let catalog = Arc::new(SchemaCatalog::new(repo.clone()));
        let detector = Arc::new(VersionDetector::new(repo.clone()));
        let monitor = Arc::new(BuildMonitor::new(repo.clone(), PollSettings::immediate()));
        LoadSchema::new(repo, catalog, detector, monitor, BucketPolicy::default())
    }

    fn options(dir: &tempfile::TempDir, descriptors: &[IndexDescriptor]) -> LoadOptions {
        let file = dir.path().join("dump.json");
        write_descriptors(&file, descriptors).expect("seed file");
        LoadOptions {
            file,
            recreate: false,
            dry_run: false,
        }
    }

    fn create(name: &str, label: &str, property: &str) -> String {
        format!(
            "CREATE INDEX `{name}` IF NOT EXISTS FOR (n:`{label}`) ON (n.`{property}`) \
             OPTIONS {{ indexProvider: 'native-btree-1.0' }}"
        )
    }

    #[test]
    fn plan_separates_invalid_existing_multi_label_and_bucketed() {
        let existing = HashSet::from(["old".to_string()]);
        let descriptors = vec![
            IndexDescriptor::index("no_props", "Person", &[]),
            IndexDescriptor::index("old", "Person", &["name"]),
            IndexDescriptor::index("multi", "Person", &["name"]).with_labels(&["Person", "Actor"]),
            IndexDescriptor::index("single", "Person", &["age"]),
        ];

        let plan = plan_load(descriptors.clone(), &existing, false);
        assert_eq!(plan.invalid, vec![descriptors[0].clone()]);
        assert_eq!(plan.skipped, vec![descriptors[1].clone()]);
        assert!(plan.forced.is_empty());
        assert_eq!(plan.individual, vec![descriptors[2].clone()]);
        assert_eq!(plan.bucketed, vec![descriptors[3].clone()]);

        let plan = plan_load(descriptors.clone(), &existing, true);
        assert!(plan.skipped.is_empty());
        assert_eq!(plan.forced, vec![descriptors[1].clone()]);
    }

    #[tokio::test]
    async fn existing_names_are_skipped() {
        let dir = tempfile::tempdir().expect("tempdir");
        let repo = Arc::new(
            InMemorySchemaRepo::new("4.4.0")
                .with_indexes(vec![IndexDescriptor::index("a", "Person", &["name"])]),
        );
        let options = options(
            &dir,
            &[
                IndexDescriptor::index("a", "Person", &["name"]),
                IndexDescriptor::index("b", "Person", &["age"]),
            ],
        );

        let report = load_schema(repo.clone())
            .execute(&options)
            .await
            .expect("load");

        assert_eq!(report.skipped, vec!["a"]);
        assert_eq!(report.created, vec!["b"]);
        assert_eq!(repo.statements().await, vec![create("b", "Person", "age")]);
    }

    #[tokio::test]
    async fn recreate_drops_every_entry_before_creating_it() {
        let dir = tempfile::tempdir().expect("tempdir");
        let repo = Arc::new(
            InMemorySchemaRepo::new("4.4.0")
                .with_indexes(vec![IndexDescriptor::index("a", "Person", &["name"])]),
        );
        let mut options = options(
            &dir,
            &[
                IndexDescriptor::index("a", "Person", &["name"]),
                IndexDescriptor::index("b", "Person", &["age"]),
            ],
        );
        options.recreate = true;

        let report = load_schema(repo.clone())
            .execute(&options)
            .await
            .expect("load");

        assert!(report.skipped.is_empty());
        assert_eq!(report.created, vec!["a", "b"]);
        assert_eq!(
            repo.calls().await,
            vec![
                SchemaCall::Statement("DROP INDEX `a` IF EXISTS".to_string()),
                SchemaCall::Statement(create("a", "Person", "name")),
                SchemaCall::Statement("DROP INDEX `b` IF EXISTS".to_string()),
                SchemaCall::Batch(vec![create("b", "Person", "age")]),
            ]
        );
    }

    #[tokio::test]
    async fn recreate_drops_multi_label_entries_that_do_not_exist_yet() {
        let dir = tempfile::tempdir().expect("tempdir");
        let repo = Arc::new(InMemorySchemaRepo::new("5.1.0"));
        let multi =
            IndexDescriptor::index("multi", "Person", &["name"]).with_labels(&["Person", "Actor"]);
        let mut options = options(&dir, &[multi]);
        options.recreate = true;

        load_schema(repo.clone())
            .execute(&options)
            .await
            .expect("load");

        assert_eq!(
            repo.statements().await,
            vec![
                "DROP INDEX `multi` IF EXISTS".to_string(),
                create("multi", "Person", "name"),
            ]
        );
    }

    #[tokio::test]
    async fn invalid_descriptors_are_never_submitted() {
        let dir = tempfile::tempdir().expect("tempdir");
        let repo = Arc::new(InMemorySchemaRepo::new("4.4.0"));
        let options = options(
            &dir,
            &[
                IndexDescriptor::index("no_label", "Person", &["name"]).with_labels(&[]),
                IndexDescriptor::index("no_props", "Person", &[]),
                IndexDescriptor::index("ok", "Person", &["name"]),
            ],
        );

        let report = load_schema(repo.clone())
            .execute(&options)
            .await
            .expect("load");

        assert_eq!(report.invalid, vec!["no_label", "no_props"]);
        assert_eq!(repo.statements().await, vec![create("ok", "Person", "name")]);
    }

    #[tokio::test]
    async fn dry_run_submits_nothing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let repo = Arc::new(InMemorySchemaRepo::new("4.3.0"));
        let mut options = options(
            &dir,
            &[
                IndexDescriptor::unique_constraint("person_id", "Person", "id"),
                IndexDescriptor::index("no_props", "Person", &[]),
            ],
        );
        options.dry_run = true;

        let report = load_schema(repo.clone())
            .execute(&options)
            .await
            .expect("load");

        assert!(repo.calls().await.is_empty());
        assert_eq!(report.invalid, vec!["no_props"]);
        assert_eq!(
            report.planned,
            vec![
                "CREATE CONSTRAINT `person_id` IF NOT EXISTS ON (n:`Person`) ASSERT n.`id` IS UNIQUE"
                    .to_string()
            ]
        );
    }

    #[tokio::test]
    async fn single_label_entries_are_batched_by_size() {
        let dir = tempfile::tempdir().expect("tempdir");
        let repo = Arc::new(
            InMemorySchemaRepo::new("5.1.0")
                .with_row_count("Tag", 10)
                .with_row_count("Person", 500_000),
        );
        let options = options(
            &dir,
            &[
                IndexDescriptor::index("person_name", "Person", &["name"]),
                IndexDescriptor::index("tag_a", "Tag", &["a"]),
                IndexDescriptor::index("person_age", "Person", &["age"]),
                IndexDescriptor::index("tag_b", "Tag", &["b"]),
            ],
        );

        let report = load_schema(repo.clone())
            .execute(&options)
            .await
            .expect("load");

        assert_eq!(
            repo.calls().await,
            vec![
                SchemaCall::Batch(vec![create("tag_a", "Tag", "a"), create("tag_b", "Tag", "b")]),
                SchemaCall::Batch(vec![create("person_name", "Person", "name")]),
                SchemaCall::Batch(vec![create("person_age", "Person", "age")]),
            ]
        );
        assert_eq!(report.created.len(), 4);
    }

    #[tokio::test]
    async fn uncountable_label_is_built_one_at_a_time() {
        let dir = tempfile::tempdir().expect("tempdir");
        let repo = Arc::new(InMemorySchemaRepo::new("5.1.0").with_failing_count("Tag"));
        let options = options(
            &dir,
            &[
                IndexDescriptor::index("tag_a", "Tag", &["a"]),
                IndexDescriptor::index("tag_b", "Tag", &["b"]),
            ],
        );

        load_schema(repo.clone())
            .execute(&options)
            .await
            .expect("load");

        assert_eq!(repo.calls().await.len(), 2);
    }

    #[tokio::test]
    async fn multi_label_entries_are_submitted_alone() {
        let dir = tempfile::tempdir().expect("tempdir");
        let repo = Arc::new(InMemorySchemaRepo::new("5.1.0"));
        let multi =
            IndexDescriptor::index("multi", "Person", &["name"]).with_labels(&["Person", "Actor"]);
        let options = options(&dir, &[multi]);

        load_schema(repo.clone())
            .execute(&options)
            .await
            .expect("load");

        assert_eq!(
            repo.calls().await,
            vec![SchemaCall::Statement(create("multi", "Person", "name"))]
        );
    }

    #[tokio::test]
    async fn failed_build_is_recorded_and_load_continues() {
        let dir = tempfile::tempdir().expect("tempdir");
        let repo = Arc::new(InMemorySchemaRepo::new("5.1.0").with_failing_build("b"));
        let options = options(
            &dir,
            &[
                IndexDescriptor::index("a", "Person", &["name"]),
                IndexDescriptor::index("b", "Person", &["age"]),
                IndexDescriptor::index("c", "Person", &["email"]),
            ],
        );

        let report = load_schema(repo)
            .execute(&options)
            .await
            .expect("load");

        assert!(report.has_failures());
        assert_eq!(report.created, vec!["a", "c"]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, "b");
    }

    #[tokio::test]
    async fn constraint_that_never_appears_is_reported() {
        let dir = tempfile::tempdir().expect("tempdir");
        let repo = Arc::new(InMemorySchemaRepo::new("4.4.0").with_offline_constraint("person_id"));
        let options = options(
            &dir,
            &[IndexDescriptor::unique_constraint("person_id", "Person", "id")],
        );

        let report = load_schema(repo).execute(&options).await.expect("load");

        assert!(report.created.is_empty());
        assert_eq!(
            report.failed,
            vec![(
                "person_id".to_string(),
                "Constraint 'person_id' failed to come online, please create manually".to_string()
            )]
        );
    }

    #[tokio::test]
    async fn unsupported_version_stops_before_reading_catalog() {
        let dir = tempfile::tempdir().expect("tempdir");
        let repo = Arc::new(InMemorySchemaRepo::new("3.5.0"));
        let options = options(&dir, &[IndexDescriptor::index("a", "Person", &["name"])]);

        let err = load_schema(repo.clone())
            .execute(&options)
            .await
            .expect_err("should fail");

        assert!(matches!(err, SchemaError::Domain(_)));
        assert!(repo.calls().await.is_empty());
    }
}
