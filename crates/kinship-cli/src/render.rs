//! Plain-text views of persons, listings, and the schema.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use serde::Serialize;

use kinship_core::types::{CREATED_AT_PROPERTY, GENERATION_PROPERTY, ID_PROPERTY};
use kinship_core::{Person, PersonSummary, RelativePattern, SchemaRecord};
use kinship_tree::{Listing, PersonRepository};

use crate::error::Result;

const NOT_AVAILABLE: &str = "N/A";
const NOT_SET: &str = "Not Set";

/// A person together with their immediate family.
#[derive(Debug, Clone, Serialize)]
pub struct PersonDetails {
    pub person: Person,
    pub parents: Vec<Person>,
    pub spouses: Vec<Person>,
    pub children: Vec<Person>,
}

impl PersonDetails {
    pub async fn load(repo: &PersonRepository, id: &str) -> Result<Self> {
        let person = repo.require(id).await?;
        Ok(Self {
            parents: repo.find_relatives(id, RelativePattern::Parents).await?,
            spouses: repo.find_relatives(id, RelativePattern::Spouses).await?,
            children: repo.find_relatives(id, RelativePattern::Children).await?,
            person,
        })
    }

    fn section(&self, pattern: RelativePattern) -> &[Person] {
        match pattern {
            RelativePattern::Parents => &self.parents,
            RelativePattern::Spouses => &self.spouses,
            RelativePattern::Children => &self.children,
        }
    }
}

pub fn person_details(details: &PersonDetails) -> String {
    let person = &details.person;
    let mut out = String::new();
    let _ = writeln!(
        out,
        "\n--- Information for {} ({}) ---",
        person.first_name().unwrap_or_default(),
        person.id
    );
    let _ = writeln!(out, "\nProperties:");
    for (key, value) in all_properties(person) {
        let _ = writeln!(out, "  - {key}: {value}");
    }

    for pattern in [RelativePattern::Parents, RelativePattern::Spouses, RelativePattern::Children] {
        let relatives = details.section(pattern);
        if relatives.is_empty() {
            continue;
        }
        let _ = writeln!(out, "\n{}:", pattern.title());
        for relative in relatives {
            let _ = writeln!(out, "  - {} (ID: {})", relative.display_name(), relative.id);
        }
    }
    let _ = writeln!(out, "{}", "-".repeat(49));
    out
}

/// Every stored property, managed ones included, sorted by key.
fn all_properties(person: &Person) -> BTreeMap<&str, String> {
    let mut all: BTreeMap<&str, String> = person
        .properties
        .iter()
        .map(|(k, v)| (k.as_str(), v.clone()))
        .collect();
    all.insert(ID_PROPERTY, person.id.to_string());
    if let Some(created_at) = &person.created_at {
        all.insert(CREATED_AT_PROPERTY, created_at.clone());
    }
    if let Some(generation) = person.generation {
        all.insert(GENERATION_PROPERTY, generation.to_string());
    }
    all
}

/// Column-aligned `ID | First Name | Last Name` table.
pub fn person_table(rows: &[PersonSummary]) -> String {
    let mut out = String::from("\n--- All Persons in Family Tree ---\n");
    if rows.is_empty() {
        out.push_str("-> No people found in the database.\n");
        return out;
    }

    let cell = |v: &Option<String>| v.clone().unwrap_or_else(|| NOT_AVAILABLE.to_string());
    let id_w = column_width("ID", rows.iter().map(|r| r.id.len()));
    let first_w = column_width("First Name", rows.iter().map(|r| cell(&r.first_name).len()));
    let last_w = column_width("Last Name", rows.iter().map(|r| cell(&r.last_name).len()));

    let header = format!("{:id_w$} | {:first_w$} | {:last_w$}", "ID", "First Name", "Last Name");
    let _ = writeln!(out, "{header}");
    let _ = writeln!(out, "{}-+-{}-+-{}", "-".repeat(id_w), "-".repeat(first_w), "-".repeat(last_w));
    for row in rows {
        let _ = writeln!(
            out,
            "{:id_w$} | {:first_w$} | {:last_w$}",
            row.id,
            cell(&row.first_name),
            cell(&row.last_name)
        );
    }
    let _ = writeln!(out, "{}", "-".repeat(header.len()));
    out
}

fn column_width(header: &str, values: impl Iterator<Item = usize>) -> usize {
    values.fold(header.len(), usize::max)
}

pub fn schema_keys(schema: &SchemaRecord) -> String {
    let mut out = String::from("\n--- Current Editable Property Keys ---\n");
    if schema.keys.is_empty() {
        out.push_str("-> Schema not found or is empty.\n");
        return out;
    }
    for key in &schema.keys {
        let marker = if schema.is_mandatory(key) { " (mandatory)" } else { "" };
        let _ = writeln!(out, "  - {key}{marker}");
    }
    out.push_str("------------------------------------\n");
    out.push_str("(Managed keys like 'id', 'created_at' and 'genNumber' are not listed.)\n");
    out
}

/// Numbered browser rows: id, first name, date of birth.
pub fn listing(listing: &Listing) -> String {
    let mut out = format!("\n=== {} ===\n", listing.title);
    if listing.rows.is_empty() {
        out.push_str("  (nobody here)\n");
        return out;
    }
    for (n, row) in listing.rows.iter().enumerate() {
        let _ = writeln!(
            out,
            "  {:>3}. {} | {} | {}",
            n + 1,
            row.id,
            row.first_name.as_deref().unwrap_or(NOT_AVAILABLE),
            row.dob.as_deref().unwrap_or(NOT_SET)
        );
    }
    out
}
