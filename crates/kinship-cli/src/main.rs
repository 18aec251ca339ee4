//! CLI entry point for the kinship family-tree manager.

use std::io::Write;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{fmt, EnvFilter};

use kinship_cli::app::App;
use kinship_cli::config::{load_settings, Overrides};
use kinship_cli::connect::open_session;
use kinship_cli::prompt::{LineSource, Prompter};
use kinship_cli::render::{self, PersonDetails};
use kinship_cli::{browse, menu};

#[derive(Parser)]
#[command(name = "kinship")]
#[command(about = "Manage a family tree stored in Neo4j")]
struct Cli {
    /// Config file prefix (default: kinship).
    #[arg(short, long, default_value = "kinship")]
    config: String,

    /// Neo4j URI, e.g. bolt://localhost:7687 or neo4j+s://xxxx.databases.neo4j.io.
    #[arg(long)]
    uri: Option<String>,

    /// Neo4j user name.
    #[arg(long)]
    user: Option<String>,

    /// Working database; skips the database picker.
    #[arg(long)]
    database: Option<String>,

    /// Emit logs as JSON lines.
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Interactive numbered menu (default).
    Menu,
    /// Browse the tree one generation at a time.
    Browse,
    /// List every person.
    List {
        #[arg(long)]
        json: bool,
    },
    /// Show one person with parents, spouses and children.
    Show {
        id: String,
        #[arg(long)]
        json: bool,
    },
    /// List the editable property keys.
    Keys {
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    let overrides = Overrides {
        uri: cli.uri.clone(),
        user: cli.user.clone(),
        database: cli.database.clone(),
    };
    let settings = load_settings(&cli.config, &overrides)?;

    #[cfg(feature = "readline")]
    let input = kinship_cli::prompt::Readline::new()?;
    #[cfg(not(feature = "readline"))]
    let input = std::io::stdin().lock();
    let mut prompter = Prompter::new(input, std::io::stdout());
    let client = open_session(&settings, &mut prompter).await?;
    let app = App::start(Arc::new(client)).await?;

    match cli.command.unwrap_or(Command::Menu) {
        Command::Menu => menu::run(&app, &mut prompter).await?,
        Command::Browse => browse::run(&app, &mut prompter).await?,
        Command::List { json } => {
            let rows = app.persons.list_all().await?;
            emit(&mut prompter, json, &rows, || render::person_table(&rows))?;
        }
        Command::Show { id, json } => {
            let details = PersonDetails::load(&app.persons, &id).await?;
            emit(&mut prompter, json, &details, || render::person_details(&details))?;
        }
        Command::Keys { json } => {
            let schema = app.schema.current().await?;
            emit(&mut prompter, json, &schema, || render::schema_keys(&schema))?;
        }
    }

    tracing::info!("Session closed");
    Ok(())
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let subscriber = fmt().with_env_filter(filter).with_writer(std::io::stderr);
    if json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}

fn emit<R: LineSource, W: Write, T: Serialize>(
    p: &mut Prompter<R, W>,
    json: bool,
    value: &T,
    text: impl FnOnce() -> String,
) -> anyhow::Result<()> {
    if json {
        p.say(serde_json::to_string_pretty(value)?)?;
    } else {
        p.show(&text())?;
    }
    Ok(())
}
