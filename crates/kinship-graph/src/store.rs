//! GraphStore trait definition
//!
//! The abstract interface over every query the family tree issues.
//! `GraphClient` implements it against Neo4j; `mock::MockGraphStore`
//! implements it in memory so the service layer can be tested offline.

use async_trait::async_trait;

use kinship_core::{Person, PersonSummary, Properties, RelationshipKind, RelativePattern, SchemaRecord};

use crate::client::GraphError;

/// Abstract interface for all graph database operations.
///
/// Property names handed to the bulk and update methods must already be
/// validated; values always travel as query parameters.
#[async_trait]
pub trait GraphStore: Send + Sync {
    // ========================================================================
    // Schema singleton
    // ========================================================================

    /// Create the schema node with `defaults` unless it already exists.
    async fn ensure_schema(&self, defaults: &SchemaRecord) -> Result<(), GraphError>;

    /// Read the schema node, `None` when it is missing.
    async fn get_schema(&self) -> Result<Option<SchemaRecord>, GraphError>;

    /// Append `key` to `keys` (and `mandatory_keys` when `mandatory`) if absent.
    async fn append_schema_key(&self, key: &str, mandatory: bool) -> Result<(), GraphError>;

    /// Overwrite both schema lists.
    async fn write_schema(&self, schema: &SchemaRecord) -> Result<(), GraphError>;

    /// Drop `key` from both schema lists.
    async fn remove_schema_key(&self, key: &str) -> Result<(), GraphError>;

    // ========================================================================
    // Bulk property operations over every Person
    // ========================================================================

    /// Set `key = value` on every Person. Returns the number touched.
    async fn set_property_on_all(&self, key: &str, value: &str) -> Result<i64, GraphError>;

    /// Move `old` to `new` on every Person that has `old`. Returns the number touched.
    async fn rename_property_on_all(&self, old: &str, new: &str) -> Result<i64, GraphError>;

    /// Remove `key` from every Person. Returns the number touched.
    async fn remove_property_on_all(&self, key: &str) -> Result<i64, GraphError>;

    // ========================================================================
    // Person operations
    // ========================================================================

    /// Create-or-merge a Person, stamping `created_at` on first creation,
    /// then overlay `properties` (and `genNumber` when given).
    async fn merge_person(
        &self,
        id: &str,
        properties: &Properties,
        generation: Option<i64>,
    ) -> Result<(), GraphError>;

    /// Apply `set` then remove `remove` in one request. `false` when no such Person.
    async fn update_person(
        &self,
        id: &str,
        set: &Properties,
        remove: &[String],
    ) -> Result<bool, GraphError>;

    async fn get_person(&self, id: &str) -> Result<Option<Person>, GraphError>;

    /// Persons reachable from `id` through `pattern`, ordered by id.
    async fn find_relatives(
        &self,
        id: &str,
        pattern: RelativePattern,
    ) -> Result<Vec<Person>, GraphError>;

    /// Every Person, ordered by id.
    async fn list_persons(&self) -> Result<Vec<PersonSummary>, GraphError>;

    /// Persons with no outgoing CHILD_OF edge, ordered by id.
    async fn root_persons(&self) -> Result<Vec<PersonSummary>, GraphError>;

    /// Persons with a CHILD_OF edge to `parent_id`, ordered by id.
    async fn children_of(&self, parent_id: &str) -> Result<Vec<PersonSummary>, GraphError>;

    /// Remove a Person with all its relationships. `false` when no such Person.
    async fn delete_person(&self, id: &str) -> Result<bool, GraphError>;

    /// Merge an edge between two existing Persons. `false` when either is missing.
    async fn link(&self, from: &str, to: &str, kind: RelationshipKind) -> Result<bool, GraphError>;
}
