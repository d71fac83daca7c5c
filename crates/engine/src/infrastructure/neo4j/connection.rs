//! Neo4j connection management

use std::time::Duration;

use neo4rs::{query, ConfigBuilder, Graph};
use tokio::time::sleep;

use crate::infrastructure::neo4j::Neo4jGraph;
use crate::infrastructure::ports::RepoError;

/// Connection attempts before giving up.
pub const MAX_CONNECT_ATTEMPTS: u32 = 5;

/// Where and how to connect.
#[derive(Clone)]
pub struct Neo4jSettings {
    pub uri: String,
    pub username: String,
    pub password: String,
    /// Target database; the server default when `None`.
    pub database: Option<String>,
    /// Send empty credentials (for servers with `dbms.security.auth_enabled=false`).
    pub no_auth: bool,
}

impl std::fmt::Debug for Neo4jSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Neo4jSettings")
            .field("uri", &self.uri)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("database", &self.database)
            .field("no_auth", &self.no_auth)
            .finish()
    }
}

impl Neo4jSettings {
    fn credentials(&self) -> (&str, &str) {
        if self.no_auth {
            ("", "")
        } else {
            (&self.username, &self.password)
        }
    }
}

async fn connect_once(settings: &Neo4jSettings) -> Result<Graph, neo4rs::Error> {
    let (user, password) = settings.credentials();
    let mut builder = ConfigBuilder::default()
        .uri(settings.uri.as_str())
        .user(user)
        .password(password);
    if let Some(database) = &settings.database {
        builder = builder.db(database.as_str());
    }
    let graph = Graph::connect(builder.build()?).await?;
    // Pool creation is lazy; prove a session can actually be opened.
    graph.run(query("RETURN 1")).await?;
    Ok(graph)
}

/// Connect to Neo4j, retrying transient failures with exponential backoff.
///
/// Backoff: 500ms → 1s → 2s → 4s, capped at 5s, for at most
/// [`MAX_CONNECT_ATTEMPTS`] attempts.
pub async fn connect(settings: &Neo4jSettings) -> Result<Neo4jGraph, RepoError> {
    let initial_delay = Duration::from_millis(500);
    let max_delay = Duration::from_secs(5);

    let mut delay = initial_delay;
    let mut last_err = String::new();

    for attempt in 1..=MAX_CONNECT_ATTEMPTS {
        if settings.no_auth {
            tracing::info!(uri = %settings.uri, attempt, "Connecting without authentication");
        } else {
            tracing::info!(uri = %settings.uri, attempt, "Connecting with basic authentication");
        }

        match connect_once(settings).await {
            Ok(graph) => {
                tracing::info!(uri = %settings.uri, "Connected to Neo4j");
                return Ok(Neo4jGraph::new(graph));
            }
            Err(e) => {
                last_err = e.to_string();
                tracing::warn!(
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %last_err,
                    "Failed to connect, retrying"
                );
            }
        }

        if attempt < MAX_CONNECT_ATTEMPTS {
            sleep(delay).await;
            delay = std::cmp::min(delay.saturating_mul(2), max_delay);
        }
    }

    Err(RepoError::Unavailable {
        uri: settings.uri.clone(),
        attempts: MAX_CONNECT_ATTEMPTS,
        message: last_err,
    })
}
