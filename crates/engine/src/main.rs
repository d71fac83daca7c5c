//! schemactl - Main entry point.

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use schemactl_engine::infrastructure::neo4j;
use schemactl_engine::use_cases::schema::{DropOptions, DumpOptions, LoadOptions, RebuildOptions};
use schemactl_engine::{App, Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Environment first so clap's env fallbacks see it.
    load_dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "schemactl_engine=info,schemactl=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let settings = cli.settings();

    tracing::info!(uri = %settings.uri, database = ?settings.database, "Connecting to Neo4j");
    let graph = neo4j::connect(&settings)
        .await
        .with_context(|| format!("connecting to {}", settings.uri))?;
    let app = App::new(graph);

    match cli.command {
        Commands::Dump(args) => {
            let options = DumpOptions {
                file: args.file,
                lucene_properties: args.lucene_properties.into_iter().collect(),
            };
            let count = app.use_cases.dump.execute(&options).await?;
            tracing::info!(count, file = %options.file.display(), "Dump complete");
        }
        Commands::Load(args) => {
            let options = LoadOptions {
                file: args.file,
                recreate: args.recreate,
                dry_run: args.dry_run,
            };
            let report = app.use_cases.load.execute(&options).await?;
            for statement in &report.planned {
                println!("{statement};");
            }
            if report.has_failures() {
                for (name, reason) in &report.failed {
                    tracing::error!(index = %name, reason = %reason, "Not created");
                }
                anyhow::bail!(
                    "{} of {} entries failed to build",
                    report.failed.len(),
                    report.failed.len() + report.created.len()
                );
            }
        }
        Commands::Rebuild(args) => {
            let options = RebuildOptions {
                checkpoint: args.checkpoint,
            };
            let report = app.use_cases.rebuild.execute(&options).await.with_context(|| {
                format!(
                    "rebuild stopped; rerun to resume from {}",
                    options.checkpoint.display()
                )
            })?;
            tracing::info!(rebuilt = report.rebuilt.len(), "Rebuild complete");
        }
        Commands::Drop(args) => {
            let options = DropOptions { file: args.file };
            let report = app.use_cases.drop.execute(&options).await?;
            if !report.failed.is_empty() {
                anyhow::bail!("{} entries could not be dropped", report.failed.len());
            }
            tracing::info!(dropped = report.dropped.len(), "Drop complete");
        }
    }

    Ok(())
}

/// Load `.env.local` then `.env` from the working directory; earlier files win.
fn load_dotenv() {
    for filename in [".env.local", ".env"] {
        let path = std::path::Path::new(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}
