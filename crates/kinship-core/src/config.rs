//! Configuration management for Kinship.
//!
//! Configuration is loaded from (in priority order):
//! 1. Environment variables (`KINSHIP__` prefix, `__` separator)
//! 2. Config file (`kinship.toml`, prefix overridable)
//! 3. Defaults

use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct KinshipConfig {
    #[serde(default)]
    pub neo4j: Neo4jSettings,

    #[serde(default)]
    pub tree: TreeSettings,
}

/// Connection settings, `[neo4j]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct Neo4jSettings {
    #[serde(default = "default_uri")]
    pub uri: String,

    #[serde(default = "default_user")]
    pub user: String,

    /// Empty means "ask at startup".
    #[serde(default)]
    pub password: String,

    /// Logical database to use; skips the picker when set.
    #[serde(default)]
    pub database: Option<String>,

    #[serde(default = "default_max_connections")]
    pub max_connections: usize,

    #[serde(default = "default_fetch_size")]
    pub fetch_size: usize,
}

/// Database selection rules, `[tree]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct TreeSettings {
    /// URIs containing this host suffix are fully managed hosted instances.
    #[serde(default = "default_hosted_domain")]
    pub hosted_domain: String,

    /// Database used on hosted instances without prompting.
    #[serde(default = "default_hosted_database")]
    pub hosted_database: String,

    /// Built-in databases hidden from the picker.
    #[serde(default = "default_excluded_databases")]
    pub excluded_databases: Vec<String>,
}

fn default_uri() -> String {
    "bolt://localhost:7687".to_string()
}

fn default_user() -> String {
    "neo4j".to_string()
}

fn default_max_connections() -> usize {
    4
}

fn default_fetch_size() -> usize {
    200
}

fn default_hosted_domain() -> String {
    ".databases.neo4j.io".to_string()
}

fn default_hosted_database() -> String {
    "neo4j".to_string()
}

fn default_excluded_databases() -> Vec<String> {
    vec!["system".to_string(), "neo4j".to_string()]
}

impl Default for Neo4jSettings {
    fn default() -> Self {
        Self {
            uri: default_uri(),
            user: default_user(),
            password: String::new(),
            database: None,
            max_connections: default_max_connections(),
            fetch_size: default_fetch_size(),
        }
    }
}

impl Default for TreeSettings {
    fn default() -> Self {
        Self {
            hosted_domain: default_hosted_domain(),
            hosted_database: default_hosted_database(),
            excluded_databases: default_excluded_databases(),
        }
    }
}

impl KinshipConfig {
    /// Load from `{file_prefix}.toml` (optional) overlaid with `KINSHIP__*` variables.
    pub fn load(file_prefix: &str) -> Result<Self, config::ConfigError> {
        let cfg = config::Config::builder()
            .add_source(config::File::with_name(file_prefix).required(false))
            .add_source(
                config::Environment::with_prefix("KINSHIP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let loaded: KinshipConfig = cfg.try_deserialize()?;
        tracing::debug!(uri = %loaded.neo4j.uri, "Configuration loaded");
        Ok(loaded)
    }
}

impl TreeSettings {
    pub fn is_hosted(&self, uri: &str) -> bool {
        !self.hosted_domain.is_empty() && uri.contains(&self.hosted_domain)
    }

    pub fn is_excluded(&self, database: &str) -> bool {
        self.excluded_databases.iter().any(|d| d == database)
    }
}
