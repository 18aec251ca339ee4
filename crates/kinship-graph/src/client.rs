//! Neo4j connection management and shared graph client.

use neo4rs::{query, ConfigBuilder, Graph, Query};

use kinship_core::config::Neo4jSettings;

/// Errors from graph operations.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Neo4j connection error: {0}")]
    Connection(String),

    #[error("No user-created databases found on this instance")]
    NoDatabases,

    #[error("Neo4j query error: {0}")]
    Query(#[from] neo4rs::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid property name: {0}")]
    InvalidProperty(String),
}

/// Configuration for connecting to Neo4j.
#[derive(Debug, Clone)]
pub struct GraphConfig {
    pub uri: String,
    pub user: String,
    pub password: String,
    /// Logical database; the server default when `None`.
    pub database: Option<String>,
    pub max_connections: usize,
    pub fetch_size: usize,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self::from(&Neo4jSettings::default())
    }
}

impl From<&Neo4jSettings> for GraphConfig {
    fn from(settings: &Neo4jSettings) -> Self {
        Self {
            uri: settings.uri.clone(),
            user: settings.user.clone(),
            password: settings.password.clone(),
            database: settings.database.clone(),
            max_connections: settings.max_connections,
            fetch_size: settings.fetch_size,
        }
    }
}

impl GraphConfig {
    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }
}

/// Neo4j graph client scoped to one logical database.
///
/// Clone is cheap (inner Arc).
#[derive(Clone)]
pub struct GraphClient {
    graph: Graph,
    database: Option<String>,
}

impl GraphClient {
    /// Connect to Neo4j and verify the credentials with a round trip.
    pub async fn connect(config: &GraphConfig) -> Result<Self, GraphError> {
        let mut builder = ConfigBuilder::default()
            .uri(&config.uri)
            .user(&config.user)
            .password(&config.password)
            .max_connections(config.max_connections)
            .fetch_size(config.fetch_size);
        if let Some(db) = &config.database {
            builder = builder.db(db.as_str());
        }
        let neo_config = builder
            .build()
            .map_err(|e| GraphError::Connection(e.to_string()))?;

        let graph = Graph::connect(neo_config)
            .await
            .map_err(classify_driver_error)?;

        graph
            .run(query("RETURN 1"))
            .await
            .map_err(classify_driver_error)?;

        tracing::info!(uri = %config.uri, database = ?config.database, "Connected to Neo4j");
        Ok(Self {
            graph,
            database: config.database.clone(),
        })
    }

    pub fn database(&self) -> Option<&str> {
        self.database.as_deref()
    }

    /// Execute a write-only query (CREATE, MERGE, DELETE, SET).
    pub async fn run(&self, query: Query) -> Result<(), GraphError> {
        self.graph.run(query).await?;
        Ok(())
    }

    /// Execute a read query and collect all rows.
    pub async fn query_rows(&self, query: Query) -> Result<Vec<neo4rs::Row>, GraphError> {
        let mut stream = self.graph.execute(query).await?;
        let mut rows = Vec::new();
        while let Some(row) = stream.next().await? {
            rows.push(row);
        }
        Ok(rows)
    }

    /// Execute a read query and return the first row, if any.
    pub async fn query_one(&self, query: Query) -> Result<Option<neo4rs::Row>, GraphError> {
        let mut stream = self.graph.execute(query).await?;
        Ok(stream.next().await?)
    }

    /// Execute a query ending in `RETURN count(..) AS cnt`.
    pub(crate) async fn query_count(&self, query: Query) -> Result<i64, GraphError> {
        count_from_row(self.query_one(query).await?.as_ref())
    }
}

/// No row counts as zero; an undecodable `cnt` is an error, not zero.
pub(crate) fn count_from_row(row: Option<&neo4rs::Row>) -> Result<i64, GraphError> {
    match row {
        Some(row) => row
            .get::<i64>("cnt")
            .map_err(|e| GraphError::Serialization(format!("count column: {e}"))),
        None => Ok(0),
    }
}

/// Sort a driver failure at connect time into rejected credentials or
/// anything else on the transport.
pub(crate) fn classify_driver_error(err: neo4rs::Error) -> GraphError {
    match err {
        neo4rs::Error::AuthenticationError(message) => GraphError::Authentication(message),
        other => classify_connect_error(other.to_string()),
    }
}

/// Fallback for errors that only carry the server's message text.
pub(crate) fn classify_connect_error(message: String) -> GraphError {
    let lower = message.to_lowercase();
    if lower.contains("unauthorized") || lower.contains("authentication") {
        GraphError::Authentication(message)
    } else {
        GraphError::Connection(message)
    }
}
