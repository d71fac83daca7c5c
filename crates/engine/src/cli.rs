//! Command-line interface.
//!
//! Connection settings come from flags or the environment (`.env` is loaded
//! first by the binary):
//!
//! - `NEO4J_URL` - bolt endpoint (default: `bolt://localhost:7687`)
//! - `NEO4J_USERNAME` - user name (default: `neo4j`)
//! - `NEO4J_PASSWORD` - password
//! - `NEO4J_DATABASE` - target database (default: the server default)

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::infrastructure::neo4j::Neo4jSettings;

/// Dump, load, rebuild and drop Neo4j indexes and constraints.
#[derive(Parser)]
#[command(name = "schemactl")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Bolt URL of the server.
    #[arg(
        long = "url",
        short = 'a',
        env = "NEO4J_URL",
        default_value = "bolt://localhost:7687"
    )]
    pub url: String,

    /// User name.
    #[arg(long, short = 'u', env = "NEO4J_USERNAME", default_value = "neo4j")]
    pub username: String,

    /// Password.
    #[arg(long, short = 'p', env = "NEO4J_PASSWORD", default_value = "", hide_env_values = true)]
    pub password: String,

    /// Database to administer; the server default if unset.
    #[arg(long, env = "NEO4J_DATABASE")]
    pub database: Option<String>,

    /// Connect without credentials.
    #[arg(long, short = 'n')]
    pub no_auth: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl std::fmt::Debug for Cli {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cli")
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("database", &self.database)
            .field("no_auth", &self.no_auth)
            .field("command", &self.command)
            .finish()
    }
}

impl Cli {
    pub fn settings(&self) -> Neo4jSettings {
        Neo4jSettings {
            uri: self.url.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
            database: self.database.clone(),
            no_auth: self.no_auth,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Write the live index and constraint catalog to a file.
    Dump(DumpArgs),
    /// Create the indexes and constraints listed in a file.
    Load(LoadArgs),
    /// Drop and recreate every live index and constraint, one at a time.
    Rebuild(RebuildArgs),
    /// Drop every index and constraint listed in a file.
    Drop(DropArgs),
}

#[derive(Debug, Args)]
pub struct DumpArgs {
    /// Output file.
    #[arg(long, short = 'f', default_value = "dump.json")]
    pub file: PathBuf,

    /// Properties whose indexes should use the lucene provider (repeatable).
    #[arg(long = "lucene", short = 'l')]
    pub lucene_properties: Vec<String>,
}

#[derive(Debug, Args)]
pub struct LoadArgs {
    /// Input file.
    #[arg(long, short = 'f', default_value = "dump.json")]
    pub file: PathBuf,

    /// Drop and recreate entries that already exist.
    #[arg(long, short = 'r')]
    pub recreate: bool,

    /// Print the statements without running them.
    #[arg(long, short = 'd')]
    pub dry_run: bool,
}

#[derive(Debug, Args)]
pub struct RebuildArgs {
    /// Checkpoint file recording the entry being rebuilt.
    #[arg(long = "resume-file", short = 'r', default_value = "lastIndex")]
    pub checkpoint: PathBuf,
}

#[derive(Debug, Args)]
pub struct DropArgs {
    /// File listing the entries to drop.
    #[arg(long, short = 'f')]
    pub file: PathBuf,
}
