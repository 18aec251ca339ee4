//! `GraphStore` implementation for `GraphClient`.
//!
//! Every method simply delegates to the corresponding inherent method.

use async_trait::async_trait;

use kinship_core::{Person, PersonSummary, Properties, RelationshipKind, RelativePattern, SchemaRecord};

use crate::client::{GraphClient, GraphError};
use crate::store::GraphStore;

#[async_trait]
impl GraphStore for GraphClient {
    async fn ensure_schema(&self, defaults: &SchemaRecord) -> Result<(), GraphError> {
        self.ensure_schema(defaults).await
    }

    async fn get_schema(&self) -> Result<Option<SchemaRecord>, GraphError> {
        self.get_schema().await
    }

    async fn append_schema_key(&self, key: &str, mandatory: bool) -> Result<(), GraphError> {
        self.append_schema_key(key, mandatory).await
    }

    async fn write_schema(&self, schema: &SchemaRecord) -> Result<(), GraphError> {
        self.write_schema(schema).await
    }

    async fn remove_schema_key(&self, key: &str) -> Result<(), GraphError> {
        self.remove_schema_key(key).await
    }

    async fn set_property_on_all(&self, key: &str, value: &str) -> Result<i64, GraphError> {
        self.set_property_on_all(key, value).await
    }

    async fn rename_property_on_all(&self, old: &str, new: &str) -> Result<i64, GraphError> {
        self.rename_property_on_all(old, new).await
    }

    async fn remove_property_on_all(&self, key: &str) -> Result<i64, GraphError> {
        self.remove_property_on_all(key).await
    }

    async fn merge_person(
        &self,
        id: &str,
        properties: &Properties,
        generation: Option<i64>,
    ) -> Result<(), GraphError> {
        self.merge_person(id, properties, generation).await
    }

    async fn update_person(
        &self,
        id: &str,
        set: &Properties,
        remove: &[String],
    ) -> Result<bool, GraphError> {
        self.update_person(id, set, remove).await
    }

    async fn get_person(&self, id: &str) -> Result<Option<Person>, GraphError> {
        self.get_person(id).await
    }

    async fn find_relatives(
        &self,
        id: &str,
        pattern: RelativePattern,
    ) -> Result<Vec<Person>, GraphError> {
        self.find_relatives(id, pattern).await
    }

    async fn list_persons(&self) -> Result<Vec<PersonSummary>, GraphError> {
        self.list_persons().await
    }

    async fn root_persons(&self) -> Result<Vec<PersonSummary>, GraphError> {
        self.root_persons().await
    }

    async fn children_of(&self, parent_id: &str) -> Result<Vec<PersonSummary>, GraphError> {
        self.children_of(parent_id).await
    }

    async fn delete_person(&self, id: &str) -> Result<bool, GraphError> {
        self.delete_person(id).await
    }

    async fn link(&self, from: &str, to: &str, kind: RelationshipKind) -> Result<bool, GraphError> {
        self.link(from, to, kind).await
    }
}
