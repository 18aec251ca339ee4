//! kinship-core: Shared types, configuration, and validation for Kinship.
//!
//! This crate provides the foundational types used across all Kinship components:
//! - Person records and their schema-driven property maps
//! - Relationship kinds (CHILD_OF, SPOUSE_OF) and relative lookup patterns
//! - The schema record listing editable and mandatory property names
//! - Configuration management
//! - Validation errors

pub mod config;
pub mod error;
pub mod schema;
pub mod types;

pub use error::ValidationError;
pub use schema::SchemaRecord;
pub use types::{
    Person, PersonId, PersonSummary, Properties, RelationshipKind, RelativePattern,
};
