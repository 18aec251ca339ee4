//! kinship-tree: Person management on top of the family-tree graph.
//!
//! Both front-ends go through this crate: the [`SchemaStore`] tells them
//! which fields to render, the [`PersonRepository`] applies their edits,
//! [`form`] turns answers into validated property changes, and the
//! [`Navigator`] tracks which generation the browser is looking at.

pub mod error;
pub mod form;
pub mod navigation;
pub mod relatives;
pub mod repository;
pub mod schema;

pub use error::{Result, TreeError};
pub use form::{FormField, PersonChanges, PersonForm};
pub use navigation::{Listing, Navigator, View};
pub use relatives::{AddedRelative, RelativeContext, RelativeKind, RelativeRequest};
pub use repository::{PersonRepository, UpdateOutcome};
pub use schema::{KeyChange, SchemaStore};
