//! Working-database selection.
//!
//! Hosted instances always use one fixed database. Self-managed servers are
//! asked for their databases (through the `system` database) and the caller
//! picks one of the user-created ones.

use kinship_core::config::TreeSettings;

use crate::client::{GraphClient, GraphConfig, GraphError};

/// Outcome of database discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseTarget {
    /// Use this database without asking.
    Fixed(String),
    /// The caller must choose one of these (never empty).
    Choose(Vec<String>),
}

/// Decide which logical database the session should use.
///
/// An explicitly configured database wins; hosted URIs get
/// `tree.hosted_database`; otherwise the server is enumerated.
pub async fn discover_database(
    config: &GraphConfig,
    tree: &TreeSettings,
) -> Result<DatabaseTarget, GraphError> {
    if let Some(db) = &config.database {
        return Ok(DatabaseTarget::Fixed(db.clone()));
    }

    if tree.is_hosted(&config.uri) {
        tracing::info!(database = %tree.hosted_database, "Hosted instance, using default database");
        return Ok(DatabaseTarget::Fixed(tree.hosted_database.clone()));
    }

    let system = GraphClient::connect(&config.clone().with_database("system")).await?;
    let names = system.list_databases().await?;
    tracing::debug!(count = names.len(), "Listed databases");

    target_from_names(names, tree)
}

/// Turn the server's database list into a choice, or `NoDatabases` when
/// only built-in databases exist.
pub fn target_from_names(names: Vec<String>, tree: &TreeSettings) -> Result<DatabaseTarget, GraphError> {
    let eligible = eligible_databases(names, tree);
    if eligible.is_empty() {
        return Err(GraphError::NoDatabases);
    }
    Ok(DatabaseTarget::Choose(eligible))
}

/// Drop built-in databases and duplicates, keeping server order.
pub fn eligible_databases(names: Vec<String>, tree: &TreeSettings) -> Vec<String> {
    let mut eligible: Vec<String> = Vec::with_capacity(names.len());
    for name in names {
        if !tree.is_excluded(&name) && !eligible.contains(&name) {
            eligible.push(name);
        }
    }
    eligible
}
