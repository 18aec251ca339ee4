//! Core domain types for the family-tree graph.
//!
//! A Person carries three system-managed fields (`id`, `created_at`,
//! `genNumber`) and an open map of schema-driven string properties.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

// ── Managed Properties ───────────────────────────────────────────

/// Unique, user-chosen identifier stored on every Person node.
pub const ID_PROPERTY: &str = "id";

/// Creation timestamp, stamped once when the Person node is first merged.
pub const CREATED_AT_PROPERTY: &str = "created_at";

/// Generation number, derived from the anchor person when adding relatives.
pub const GENERATION_PROPERTY: &str = "genNumber";

/// Properties owned by the system. They never appear in the schema lists
/// and cannot be set, renamed, or removed through user edits.
pub const MANAGED_PROPERTIES: [&str; 3] = [ID_PROPERTY, CREATED_AT_PROPERTY, GENERATION_PROPERTY];

pub fn is_managed(name: &str) -> bool {
    MANAGED_PROPERTIES.contains(&name)
}

/// Check that a name can be used as an editable Person property.
///
/// Property names are backtick-quoted when spliced into Cypher, so a name
/// containing a backtick is refused outright.
pub fn validate_property_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::EmptyProperty);
    }
    if is_managed(name) {
        return Err(ValidationError::ManagedProperty(name.to_string()));
    }
    if name.contains('`') {
        return Err(ValidationError::IllegalPropertyName(name.to_string()));
    }
    Ok(())
}

/// Value written to `created_at` when a Person node is first merged.
pub fn creation_timestamp() -> String {
    Utc::now().to_rfc3339()
}

/// Render a millisecond epoch (as written by Cypher's `timestamp()`) in the
/// same RFC 3339 form as [`creation_timestamp`].
pub fn timestamp_from_millis(millis: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_else(|| millis.to_string())
}

// ── Person ───────────────────────────────────────────────────────

/// Schema-driven property values keyed by property name.
pub type Properties = BTreeMap<String, String>;

/// Identifier of a Person node.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct PersonId(pub String);

impl PersonId {
    /// Build an id from user input, trimming surrounding whitespace.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyId);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A family member as stored in the graph.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Person {
    pub id: PersonId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(rename = "genNumber", skip_serializing_if = "Option::is_none")]
    pub generation: Option<i64>,
    pub properties: Properties,
}

impl Person {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    pub fn first_name(&self) -> Option<&str> {
        self.get("firstName")
    }

    /// First name, or `N/A` when it was never recorded.
    pub fn display_name(&self) -> &str {
        self.first_name().unwrap_or("N/A")
    }
}

/// One row of a person listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PersonSummary {
    pub id: String,
    #[serde(rename = "firstName")]
    pub first_name: Option<String>,
    #[serde(rename = "lastName")]
    pub last_name: Option<String>,
    pub dob: Option<String>,
}

impl From<&Person> for PersonSummary {
    fn from(person: &Person) -> Self {
        Self {
            id: person.id.0.clone(),
            first_name: person.get("firstName").map(str::to_string),
            last_name: person.get("lastName").map(str::to_string),
            dob: person.get("dob").map(str::to_string),
        }
    }
}

// ── Relationships ────────────────────────────────────────────────

/// The two relationship types a family tree records.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelationshipKind {
    /// Directed, child → parent.
    ChildOf,
    /// Undirected; stored once regardless of argument order.
    SpouseOf,
}

impl RelationshipKind {
    pub fn as_cypher(&self) -> &'static str {
        match self {
            Self::ChildOf => "CHILD_OF",
            Self::SpouseOf => "SPOUSE_OF",
        }
    }

    pub fn is_symmetric(&self) -> bool {
        matches!(self, Self::SpouseOf)
    }
}

impl fmt::Display for RelationshipKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_cypher())
    }
}

impl FromStr for RelationshipKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "CHILD_OF" => Ok(Self::ChildOf),
            "SPOUSE_OF" => Ok(Self::SpouseOf),
            _ => Err(ValidationError::InvalidRelationship(s.trim().to_string())),
        }
    }
}

/// Which relatives to fetch around a person.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelativePattern {
    /// Outgoing CHILD_OF.
    Parents,
    /// SPOUSE_OF in either direction.
    Spouses,
    /// Incoming CHILD_OF.
    Children,
}

impl RelativePattern {
    /// Relationship pattern between `(p)` and `(relative)` in a MATCH clause.
    pub fn cypher(&self) -> &'static str {
        match self {
            Self::Parents => "-[:CHILD_OF]->",
            Self::Spouses => "-[:SPOUSE_OF]-",
            Self::Children => "<-[:CHILD_OF]-",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Parents => "Parents",
            Self::Spouses => "Spouses",
            Self::Children => "Children",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_person_id_trims_and_rejects_empty() {
        assert_eq!(PersonId::parse("  gen1_01 ").unwrap().as_str(), "gen1_01");
        assert_eq!(PersonId::parse("   "), Err(ValidationError::EmptyId));
    }

    #[test]
    fn test_managed_properties_rejected() {
        for name in MANAGED_PROPERTIES {
            assert_eq!(
                validate_property_name(name),
                Err(ValidationError::ManagedProperty(name.to_string()))
            );
        }
        assert!(validate_property_name("birthPlace").is_ok());
        assert!(matches!(
            validate_property_name("bad`name"),
            Err(ValidationError::IllegalPropertyName(_))
        ));
        assert_eq!(validate_property_name(""), Err(ValidationError::EmptyProperty));
    }

    #[test]
    fn test_timestamps_share_format() {
        assert_eq!(timestamp_from_millis(0), "1970-01-01T00:00:00+00:00");
        assert!(DateTime::parse_from_rfc3339(&creation_timestamp()).is_ok());
    }

    #[test]
    fn test_relationship_kind_parsing() {
        assert_eq!("child_of".parse::<RelationshipKind>(), Ok(RelationshipKind::ChildOf));
        assert_eq!(" SPOUSE_OF".parse::<RelationshipKind>(), Ok(RelationshipKind::SpouseOf));
        assert_eq!(
            "SIBLING_OF".parse::<RelationshipKind>(),
            Err(ValidationError::InvalidRelationship("SIBLING_OF".to_string()))
        );
        assert!(RelationshipKind::SpouseOf.is_symmetric());
        assert!(!RelationshipKind::ChildOf.is_symmetric());
    }

    #[test]
    fn test_person_serializes_managed_fields() {
        let mut properties = Properties::new();
        properties.insert("firstName".to_string(), "Ada".to_string());
        let person = Person {
            id: PersonId("gen1_01".to_string()),
            created_at: Some("2024-01-01T00:00:00+00:00".to_string()),
            generation: Some(1),
            properties,
        };

        let json = serde_json::to_value(&person).unwrap();
        assert_eq!(json["id"], "gen1_01");
        assert_eq!(json["genNumber"], 1);
        assert_eq!(json["properties"]["firstName"], "Ada");
        assert_eq!(person.display_name(), "Ada");
    }

    #[test]
    fn test_summary_from_person() {
        let person = Person {
            id: PersonId("p1".to_string()),
            created_at: None,
            generation: None,
            properties: Properties::from([("lastName".to_string(), "B".to_string())]),
        };
        let summary = PersonSummary::from(&person);
        assert_eq!(summary.id, "p1");
        assert_eq!(summary.first_name, None);
        assert_eq!(summary.last_name.as_deref(), Some("B"));
        assert_eq!(person.display_name(), "N/A");
    }
}
