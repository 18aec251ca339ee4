//! The numbered console menu.
//!
//! Every action runs to completion before the menu is shown again. A failed
//! action prints `Error: ...` and returns to the menu; only closed input
//! ends the loop early.

use std::io::Write;

use kinship_core::{PersonId, Properties};
use kinship_tree::{PersonForm, UpdateOutcome};

use crate::app::App;
use crate::browse;
use crate::error::{CliError, Result};
use crate::prompt::{LineSource, Prompter};
use crate::render::{self, PersonDetails};

const RULE: &str = "--------------------------------------";

/// Answer in the modify flow that clears a property.
pub const CLEAR_MARKER: &str = "-";

pub async fn run<R: LineSource, W: Write>(app: &App, p: &mut Prompter<R, W>) -> Result<()> {
    loop {
        p.say("\nFamily Tree Manager")?;
        p.say(RULE)?;
        p.say("1. Add a New Person")?;
        p.say("2. Modify an Existing Person")?;
        p.say("3. Delete a Person")?;
        p.say("4. Add a Relationship")?;
        p.say("5. Configure Property Keys")?;
        p.say("6. List All Property Keys")?;
        p.say("7. List a Person's Info")?;
        p.say("8. List All Persons")?;
        p.say("9. Browse the Tree")?;
        p.say("0. Exit")?;
        p.say(RULE)?;

        let choice = match p.ask("Choose an option", true) {
            Ok(choice) => choice,
            Err(CliError::InputClosed) => return Ok(()),
            Err(e) => return Err(e),
        };

        let outcome = match choice.as_str() {
            "1" => add_person(app, p).await,
            "2" => modify_person(app, p).await,
            "3" => delete_person(app, p).await,
            "4" => add_relationship(app, p).await,
            "5" => configure_keys(app, p).await,
            "6" => list_keys(app, p).await,
            "7" => show_person(app, p).await,
            "8" => list_persons(app, p).await,
            "9" => browse::run(app, p).await,
            "0" => return Ok(()),
            _ => p.say("Invalid option."),
        };

        match outcome {
            Ok(()) => {}
            Err(CliError::InputClosed) => return Ok(()),
            Err(e) => {
                tracing::debug!(error = %e, option = %choice, "Menu action failed");
                p.say(format!("Error: {e}"))?;
            }
        }
    }
}

/// Ask for every schema field and return the answers keyed by field name.
pub(crate) fn fill_new_form<R: LineSource, W: Write>(
    form: &PersonForm,
    p: &mut Prompter<R, W>,
) -> Result<Properties> {
    p.say("Please provide the following details:")?;
    let mut answers = Properties::new();
    for field in form.fields() {
        let value = p.ask(&field.label(), field.mandatory)?;
        answers.insert(field.name.clone(), value);
    }
    Ok(answers)
}

async fn add_person<R: LineSource, W: Write>(app: &App, p: &mut Prompter<R, W>) -> Result<()> {
    p.say("\n--- Add a New Person ---")?;
    let id = PersonId::parse(&p.ask("Unique ID (e.g., gen2_04)", true)?)?;

    let form = PersonForm::for_new(&app.schema.current().await?);
    let properties = form.new_properties(&fill_new_form(&form, p)?)?;

    app.persons.add(&id, &properties).await?;
    p.say(format!("-> Successfully added/updated Person with ID: {id}"))
}

async fn modify_person<R: LineSource, W: Write>(app: &App, p: &mut Prompter<R, W>) -> Result<()> {
    let id = p.ask("Enter the ID of the person to modify", true)?;
    modify_existing(app, p, &id).await
}

/// Prompt with current values; Enter keeps a value and `-` clears it.
pub(crate) async fn modify_existing<R: LineSource, W: Write>(
    app: &App,
    p: &mut Prompter<R, W>,
    id: &str,
) -> Result<()> {
    let person = app.persons.require(id).await?;
    let form = PersonForm::for_existing(&app.schema.current().await?, &person);

    p.say("\n--- Modifying Person ---")?;
    p.say(format!(
        "Enter new values below (Enter keeps the current value, '{CLEAR_MARKER}' clears it)."
    ))?;
    let mut answers = Properties::new();
    for field in form.fields() {
        let current = field.current.as_deref().unwrap_or_default();
        let answer = p.ask(&format!("{} [{current}]", field.label()), false)?;
        match answer.as_str() {
            "" => {}
            CLEAR_MARKER => {
                answers.insert(field.name.clone(), String::new());
            }
            _ => {
                answers.insert(field.name.clone(), answer);
            }
        }
    }

    let changes = form.changes(&answers)?;
    match app.persons.update(id, &changes.set, &changes.remove).await? {
        UpdateOutcome::NothingToDo => p.say("-> No changes to apply."),
        UpdateOutcome::Updated => p.say(format!("-> Successfully updated Person with ID: {id}")),
    }
}

async fn delete_person<R: LineSource, W: Write>(app: &App, p: &mut Prompter<R, W>) -> Result<()> {
    let id = p.ask("Enter ID of person to delete", true)?;
    if !p.confirm(&format!("Sure you want to delete '{id}' and all their relationships?"))? {
        return p.say("-> Deletion cancelled.");
    }
    app.persons.delete(&id).await?;
    p.say(format!("-> Successfully deleted Person with ID: {id}"))
}

async fn add_relationship<R: LineSource, W: Write>(app: &App, p: &mut Prompter<R, W>) -> Result<()> {
    p.say("\n--- Add a Relationship ---")?;
    let id1 = p.ask("Enter the first Person's ID", true)?;
    let id2 = p.ask("Enter the second Person's ID", true)?;
    let rel_type = p.ask("Relationship Type (CHILD_OF or SPOUSE_OF)", true)?;

    let kind = app.persons.link(&id1, &id2, &rel_type).await?;
    p.say(format!("-> Successfully linked {id1} and {id2} with relationship: {kind}"))
}

async fn configure_keys<R: LineSource, W: Write>(app: &App, p: &mut Prompter<R, W>) -> Result<()> {
    loop {
        p.say("\n--- Configure Property Keys ---")?;
        p.say("1. Add a new property")?;
        p.say("2. Rename an existing property")?;
        p.say("3. Delete a property")?;
        p.say("4. Back to Main Menu")?;
        p.say("---------------------------------")?;

        let outcome = match p.ask("Choose an option", true)?.as_str() {
            "1" => add_key(app, p).await,
            "2" => rename_key(app, p).await,
            "3" => delete_key(app, p).await,
            "4" => return Ok(()),
            _ => p.say("Invalid option."),
        };
        match outcome {
            Err(CliError::InputClosed) => return Err(CliError::InputClosed),
            Err(e) => p.say(format!("Error: {e}"))?,
            Ok(()) => {}
        }
    }
}

async fn add_key<R: LineSource, W: Write>(app: &App, p: &mut Prompter<R, W>) -> Result<()> {
    let key = p.ask("Enter new property name", true)?;
    let mandatory = p.confirm("Is this property mandatory?")?;
    let default_value = p.ask("Default value (can be blank)", false)?;

    let change = app.schema.add_key(&key, mandatory, &default_value).await?;
    p.say(format!(
        "-> Added property '{key}' to schema. Mandatory: {mandatory}. Persons updated: {}",
        change.persons_updated
    ))
}

async fn rename_key<R: LineSource, W: Write>(app: &App, p: &mut Prompter<R, W>) -> Result<()> {
    let old = p.ask("Property to rename", true)?;
    let new = p.ask("New property name", true)?;

    let change = app.schema.rename_key(&old, &new).await?;
    p.say(format!(
        "-> Renamed property '{old}' to '{new}' on {} person(s).",
        change.persons_updated
    ))
}

async fn delete_key<R: LineSource, W: Write>(app: &App, p: &mut Prompter<R, W>) -> Result<()> {
    let key = p.ask("Property to delete", true)?;
    if !p.confirm(&format!("Sure you want to delete '{key}' from the schema and every person?"))? {
        return p.say("-> Deletion cancelled.");
    }
    app.schema.delete_key(&key).await?;
    p.say(format!("-> Deleted property '{key}' from schema and all Person nodes."))
}

async fn list_keys<R: LineSource, W: Write>(app: &App, p: &mut Prompter<R, W>) -> Result<()> {
    let schema = app.schema.current().await?;
    p.show(&render::schema_keys(&schema))
}

async fn show_person<R: LineSource, W: Write>(app: &App, p: &mut Prompter<R, W>) -> Result<()> {
    let id = p.ask("Enter the ID of the person to list", true)?;
    let details = PersonDetails::load(&app.persons, &id).await?;
    p.show(&render::person_details(&details))
}

async fn list_persons<R: LineSource, W: Write>(app: &App, p: &mut Prompter<R, W>) -> Result<()> {
    let rows = app.persons.list_all().await?;
    p.show(&render::person_table(&rows))
}
