//! Text master/detail browser.
//!
//! Shows one generation at a time as a numbered listing and acts on a
//! selected row: descend into children, add a child, sibling or spouse,
//! modify, or show details. Every command reloads the listing.

use std::io::Write;

use kinship_core::Properties;
use kinship_tree::{Listing, Navigator, PersonForm, RelativeKind, RelativeRequest};

use crate::app::App;
use crate::error::{CliError, Result};
use crate::menu;
use crate::prompt::{LineSource, Prompter};
use crate::render::{self, PersonDetails};

const HELP: &str = "Commands: v N view children | c N add child | s N add sibling | p N add spouse\n          m N modify | i N info | b back | t top | q quit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    ViewChildren(usize),
    AddRelative(RelativeKind, usize),
    Modify(usize),
    Info(usize),
    Back,
    Top,
    Quit,
}

impl Command {
    /// Parse `letter [row]`; rows are 1-based as displayed.
    pub fn parse(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace();
        let verb = parts.next()?.to_lowercase();
        let row = parts.next().and_then(|n| n.parse::<usize>().ok());
        if parts.next().is_some() {
            return None;
        }

        match (verb.as_str(), row) {
            ("b", None) => Some(Self::Back),
            ("t", None) => Some(Self::Top),
            ("q", None) => Some(Self::Quit),
            (_, Some(0)) | (_, None) => None,
            ("v", Some(n)) => Some(Self::ViewChildren(n - 1)),
            ("c", Some(n)) => Some(Self::AddRelative(RelativeKind::Child, n - 1)),
            ("s", Some(n)) => Some(Self::AddRelative(RelativeKind::Sibling, n - 1)),
            ("p", Some(n)) => Some(Self::AddRelative(RelativeKind::Spouse, n - 1)),
            ("m", Some(n)) => Some(Self::Modify(n - 1)),
            ("i", Some(n)) => Some(Self::Info(n - 1)),
            _ => None,
        }
    }
}

pub async fn run<R: LineSource, W: Write>(app: &App, p: &mut Prompter<R, W>) -> Result<()> {
    let mut nav = Navigator::new();
    loop {
        // A failed listing steps back one view; at the top the user still
        // gets a prompt to retry or quit.
        let listing = match app.persons.load_view(nav.current()).await {
            Ok(listing) => listing,
            Err(e) => {
                tracing::debug!(error = %e, view = ?nav.current(), "Listing failed");
                p.say(format!("Error: {e}"))?;
                if nav.go_back() {
                    continue;
                }
                Listing {
                    title: "Listing unavailable".to_string(),
                    rows: Vec::new(),
                }
            }
        };
        p.show(&render::listing(&listing))?;
        p.say(HELP)?;

        let line = p.ask("Browse", true)?;
        let Some(command) = Command::parse(&line) else {
            p.say("Unknown command.")?;
            continue;
        };

        match apply(app, p, &mut nav, &listing, command).await {
            Ok(true) => {}
            Ok(false) => return Ok(()),
            Err(CliError::InputClosed) => return Err(CliError::InputClosed),
            Err(e) => p.say(format!("Error: {e}"))?,
        }
    }
}

/// Run one command; `false` leaves the browser.
async fn apply<R: LineSource, W: Write>(
    app: &App,
    p: &mut Prompter<R, W>,
    nav: &mut Navigator,
    listing: &Listing,
    command: Command,
) -> Result<bool> {
    let selected = |row: usize| {
        listing.rows.get(row).map(|r| r.id.clone()).ok_or_else(|| {
            CliError::Validation(kinship_core::ValidationError::Rejected(format!(
                "No row {} in this listing",
                row + 1
            )))
        })
    };

    match command {
        Command::Quit => return Ok(false),
        Command::Back => {
            if !nav.go_back() {
                p.say("Already at the top generation.")?;
            }
        }
        Command::Top => nav.go_to_top(),
        Command::ViewChildren(row) => nav.view_children(selected(row)?),
        Command::Modify(row) => menu::modify_existing(app, p, &selected(row)?).await?,
        Command::Info(row) => {
            let details = PersonDetails::load(&app.persons, &selected(row)?).await?;
            p.show(&render::person_details(&details))?;
        }
        Command::AddRelative(kind, row) => add_relative(app, p, kind, &selected(row)?).await?,
    }
    Ok(true)
}

async fn add_relative<R: LineSource, W: Write>(
    app: &App,
    p: &mut Prompter<R, W>,
    kind: RelativeKind,
    anchor_id: &str,
) -> Result<()> {
    // Fails before prompting when a sibling has no parent to hang from.
    let context = app.persons.relative_context(kind, anchor_id).await?;
    p.say(format!(
        "\n--- Add {kind} of {} ({anchor_id}) ---",
        context.anchor.display_name()
    ))?;

    let mut request = RelativeRequest::default();
    match &context.id_base {
        Some(base) => {
            let number = p.ask(&format!("Child number (ID will be {base}_<number>)"), true)?;
            request.child_number = Some(number);
        }
        None => request.spouse_id = Some(p.ask("Spouse ID", true)?),
    }

    let form = PersonForm::for_new(&app.schema.current().await?);
    let answers: Properties = menu::fill_new_form(&form, p)?;
    request.properties = form.new_properties(&answers)?;

    let added = app.persons.add_relative(kind, anchor_id, &request).await?;
    p.say(format!(
        "-> Added {kind} {} (generation {}), linked to: {}",
        added.id,
        added.generation,
        added.linked_to.join(", ")
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Cursor;
    use std::sync::Arc;

    use kinship_core::{PersonId, RelationshipKind};
    use kinship_graph::mock::MockGraphStore;
    use kinship_graph::GraphStore;

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("v 2"), Some(Command::ViewChildren(1)));
        assert_eq!(
            Command::parse("C 1"),
            Some(Command::AddRelative(RelativeKind::Child, 0))
        );
        assert_eq!(Command::parse(" b "), Some(Command::Back));
        assert_eq!(Command::parse("v"), None);
        assert_eq!(Command::parse("v 0"), None);
        assert_eq!(Command::parse("b 1"), None);
        assert_eq!(Command::parse("x 1"), None);
        assert_eq!(Command::parse("v 1 2"), None);
    }

    async fn seeded() -> (Arc<MockGraphStore>, App) {
        let mock = Arc::new(MockGraphStore::new());
        let app = App::start(mock.clone()).await.unwrap();
        let mut props = Properties::new();
        props.insert("firstName".to_string(), "Ada".to_string());
        app.persons
            .add_with_generation(&PersonId::parse("gen1_01").unwrap(), &props, Some(1))
            .await
            .unwrap();
        (mock, app)
    }

    async fn drive(app: &App, script: &str) -> String {
        let mut p = Prompter::new(Cursor::new(script.as_bytes().to_vec()), Vec::new());
        run(app, &mut p).await.unwrap();
        String::from_utf8(p.into_output()).unwrap()
    }

    #[tokio::test]
    async fn test_add_child_and_descend() {
        let (mock, app) = seeded().await;
        let out = drive(&app, "c 1\n1\nKid\nX\nF\n1930\n\nv 1\nb\nb\nq\n").await;

        assert!(out.contains("-> Added child gen1_01_1 (generation 2), linked to: gen1_01"));
        assert!(out.contains("=== Children of: Ada ==="));
        assert!(out.contains("gen1_01_1 | Kid | 1930"));
        assert!(out.contains("Already at the top generation."));
        assert_eq!(
            mock.edges_between("gen1_01_1", "gen1_01", RelationshipKind::ChildOf).await,
            1
        );
    }

    #[tokio::test]
    async fn test_failed_children_listing_returns_to_previous_view() {
        let (mock, app) = seeded().await;
        mock.fail_on("children_of").await;

        let out = drive(&app, "v 1\nb\nq\n").await;
        assert!(out.contains("Error: Graph error: Neo4j connection error: children_of unavailable"));
        assert_eq!(out.matches("=== Top Generation").count(), 3);
        assert!(out.contains("Already at the top generation."));
    }

    #[tokio::test]
    async fn test_failed_root_listing_still_prompts() {
        let (mock, app) = seeded().await;
        mock.fail_on("root_persons").await;

        let out = drive(&app, "v 1\nq\n").await;
        assert!(out.contains("Error: Graph error: Neo4j connection error: root_persons unavailable"));
        assert!(out.contains("=== Listing unavailable ==="));
        assert!(out.contains("Error: Validation error: No row 1 in this listing"));
    }

    #[tokio::test]
    async fn test_sibling_of_root_fails_before_prompting() {
        let (mock, app) = seeded().await;
        let out = drive(&app, "s 1\nq\n").await;
        assert!(out.contains("Error: Validation error: gen1_01 has no parents on file"));
        assert!(!out.contains("Child number"));
        assert_eq!(mock.person_count().await, 1);
    }

    #[tokio::test]
    async fn test_add_spouse_and_bad_row() {
        let (mock, app) = seeded().await;
        let out = drive(&app, "p 1\nsp_1\nBob\nX\nM\n1899\n\ni 7\nq\n").await;
        assert!(out.contains("-> Added spouse sp_1 (generation 1)"));
        assert!(out.contains("Error: Validation error: No row 7 in this listing"));
        assert_eq!(
            mock.edges_between("sp_1", "gen1_01", RelationshipKind::SpouseOf).await,
            1
        );
        let spouse = mock.get_person("sp_1").await.unwrap().unwrap();
        assert_eq!(spouse.generation, Some(1));
    }
}
