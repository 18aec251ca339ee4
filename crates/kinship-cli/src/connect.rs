//! Startup: credentials, database selection, and the session.

use std::io::Write;

use kinship_core::config::KinshipConfig;
use kinship_graph::{discover_database, DatabaseTarget, GraphClient, GraphConfig};

use crate::error::Result;
use crate::prompt::{LineSource, Prompter};

/// Connect to the configured server and settle on a working database.
///
/// Prompts for the password when none is configured and for the database
/// when the server offers a choice.
pub async fn open_session<R: LineSource, W: Write>(
    settings: &KinshipConfig,
    p: &mut Prompter<R, W>,
) -> Result<GraphClient> {
    let mut graph_config = GraphConfig::from(&settings.neo4j);
    if graph_config.password.is_empty() {
        p.say(format!("--- Neo4j connection ({}) ---", graph_config.uri))?;
        graph_config.password = p.ask_secret(&password_prompt(&graph_config.user))?;
    }

    let database = match discover_database(&graph_config, &settings.tree).await? {
        DatabaseTarget::Fixed(name) => name,
        DatabaseTarget::Choose(names) => pick_database(&names, p)?,
    };

    let client = GraphClient::connect(&graph_config.with_database(database.clone())).await?;
    tracing::info!(database = ?client.database(), "Session opened");
    p.say(format!("Connected to database: '{database}'"))?;
    Ok(client)
}

/// The answer is echoed, so the prompt says so and names the way around it.
pub fn password_prompt(user: &str) -> String {
    format!("Password for '{user}' (input is visible; set KINSHIP__NEO4J__PASSWORD to skip)")
}

/// Numbered picker; `names` is never empty.
pub fn pick_database<R: LineSource, W: Write>(names: &[String], p: &mut Prompter<R, W>) -> Result<String> {
    p.say("\nAvailable Databases:")?;
    for (n, name) in names.iter().enumerate() {
        p.say(format!("  {}. {name}", n + 1))?;
    }
    let index = p.choose("Select a database (number)", names.len())?;
    Ok(names[index].clone())
}
