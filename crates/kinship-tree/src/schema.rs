//! The schema store: which Person properties exist and which are mandatory.
//!
//! Key mutations run in two phases, first the schema lists and then a bulk
//! update of every Person. Nothing ties the phases together; an interruption
//! between them leaves the lists and the nodes out of step.

use std::sync::Arc;

use kinship_core::types::validate_property_name;
use kinship_core::SchemaRecord;
use kinship_graph::GraphStore;

use crate::error::Result;

/// Effect of a key mutation on the Person population.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyChange {
    pub persons_updated: i64,
}

#[derive(Clone)]
pub struct SchemaStore {
    store: Arc<dyn GraphStore>,
}

impl SchemaStore {
    pub fn new(store: Arc<dyn GraphStore>) -> Self {
        Self { store }
    }

    /// Create the schema record with defaults if absent. Never overwrites.
    pub async fn ensure_initialized(&self) -> Result<()> {
        self.store.ensure_schema(&SchemaRecord::default()).await?;
        Ok(())
    }

    /// The stored schema, or the defaults if the record has gone missing.
    pub async fn current(&self) -> Result<SchemaRecord> {
        match self.store.get_schema().await? {
            Some(schema) => Ok(schema),
            None => {
                tracing::warn!("Schema record missing, using default keys");
                Ok(SchemaRecord::default())
            }
        }
    }

    pub async fn get_keys(&self) -> Result<Vec<String>> {
        Ok(self.current().await?.keys)
    }

    pub async fn get_mandatory_keys(&self) -> Result<Vec<String>> {
        Ok(self.current().await?.mandatory_keys)
    }

    /// Add a property key and write `default_value`, even an empty one, to
    /// every existing Person.
    pub async fn add_key(&self, name: &str, mandatory: bool, default_value: &str) -> Result<KeyChange> {
        let name = name.trim();
        self.current().await?.add_key(name, mandatory)?;

        self.store.append_schema_key(name, mandatory).await?;
        let persons_updated = self.store.set_property_on_all(name, default_value).await?;

        tracing::info!(key = %name, mandatory, persons_updated, "Added property key");
        Ok(KeyChange { persons_updated })
    }

    /// Rename a key in both lists and move the value on every Person that has it.
    pub async fn rename_key(&self, old: &str, new: &str) -> Result<KeyChange> {
        let (old, new) = (old.trim(), new.trim());
        validate_property_name(old)?;

        let current = self.current().await?;
        let mut renamed = current.clone();
        renamed.rename_key(old, new)?;
        if old == new {
            return Ok(KeyChange { persons_updated: 0 });
        }

        if renamed != current {
            self.store.write_schema(&renamed).await?;
        }
        let persons_updated = self.store.rename_property_on_all(old, new).await?;

        tracing::info!(old = %old, new = %new, persons_updated, "Renamed property key");
        Ok(KeyChange { persons_updated })
    }

    /// Drop a key from both lists and from every Person.
    pub async fn delete_key(&self, name: &str) -> Result<KeyChange> {
        let name = name.trim();
        validate_property_name(name)?;

        self.store.remove_schema_key(name).await?;
        let persons_updated = self.store.remove_property_on_all(name).await?;

        tracing::info!(key = %name, persons_updated, "Deleted property key");
        Ok(KeyChange { persons_updated })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use kinship_core::{Properties, ValidationError};
    use kinship_graph::mock::MockGraphStore;

    use crate::error::TreeError;

    async fn setup() -> (Arc<MockGraphStore>, SchemaStore) {
        let mock = Arc::new(MockGraphStore::new());
        let schema = SchemaStore::new(mock.clone());
        schema.ensure_initialized().await.unwrap();
        (mock, schema)
    }

    async fn seed(mock: &MockGraphStore, id: &str, pairs: &[(&str, &str)]) {
        let props: Properties = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        mock.merge_person(id, &props, None).await.unwrap();
    }

    #[tokio::test]
    async fn test_ensure_initialized_is_idempotent() {
        let (mock, schema) = setup().await;
        schema.add_key("nickname", false, "").await.unwrap();
        schema.ensure_initialized().await.unwrap();

        let keys = schema.get_keys().await.unwrap();
        assert!(keys.contains(&"nickname".to_string()));
        assert_eq!(mock.get_schema().await.unwrap().unwrap().keys.len(), 6);
    }

    #[tokio::test]
    async fn test_missing_record_falls_back_to_defaults() {
        let schema = SchemaStore::new(Arc::new(MockGraphStore::new()));
        assert_eq!(
            schema.get_keys().await.unwrap(),
            vec!["firstName", "lastName", "gender", "dob", "dod"]
        );
        assert_eq!(
            schema.get_mandatory_keys().await.unwrap(),
            vec!["firstName", "lastName", "gender", "dob"]
        );
    }

    #[tokio::test]
    async fn test_add_key_writes_default_to_every_person() {
        let (mock, schema) = setup().await;
        seed(&mock, "a", &[("firstName", "A")]).await;
        seed(&mock, "b", &[("firstName", "B")]).await;

        let change = schema.add_key("birthPlace", true, "unknown").await.unwrap();
        assert_eq!(change.persons_updated, 2);
        assert!(schema.get_mandatory_keys().await.unwrap().contains(&"birthPlace".to_string()));

        let a = mock.get_person("a").await.unwrap().unwrap();
        assert_eq!(a.get("birthPlace"), Some("unknown"));
    }

    #[tokio::test]
    async fn test_add_key_with_empty_default_writes_empty_value() {
        let (mock, schema) = setup().await;
        seed(&mock, "a", &[("firstName", "A")]).await;

        let change = schema.add_key("nickname", true, "").await.unwrap();
        assert_eq!(change.persons_updated, 1);
        assert!(schema.get_mandatory_keys().await.unwrap().contains(&"nickname".to_string()));
        assert_eq!(mock.get_person("a").await.unwrap().unwrap().get("nickname"), Some(""));
    }

    #[tokio::test]
    async fn test_add_managed_key_rejected() {
        let (_mock, schema) = setup().await;
        for name in ["id", "created_at", "genNumber"] {
            let err = schema.add_key(name, false, "").await.unwrap_err();
            assert!(matches!(
                err,
                TreeError::Validation(ValidationError::ManagedProperty(_))
            ));
        }
        assert_eq!(schema.current().await.unwrap(), SchemaRecord::default());
    }

    #[tokio::test]
    async fn test_rename_key_moves_values() {
        let (mock, schema) = setup().await;
        seed(&mock, "a", &[("dob", "1900-01-01")]).await;
        seed(&mock, "b", &[("firstName", "B")]).await;

        let change = schema.rename_key("dob", "birthDate").await.unwrap();
        assert_eq!(change.persons_updated, 1);

        let current = schema.current().await.unwrap();
        assert!(current.is_mandatory("birthDate"));
        assert!(!current.contains("dob"));

        let a = mock.get_person("a").await.unwrap().unwrap();
        assert_eq!(a.get("birthDate"), Some("1900-01-01"));
        assert_eq!(a.get("dob"), None);
    }

    #[tokio::test]
    async fn test_rename_managed_key_rejected() {
        let (_mock, schema) = setup().await;
        assert!(schema.rename_key("id", "identifier").await.is_err());
        assert!(schema.rename_key("dob", "created_at").await.is_err());
        assert!(schema.rename_key("dob", "lastName").await.is_err());
        assert_eq!(schema.current().await.unwrap(), SchemaRecord::default());
    }

    #[tokio::test]
    async fn test_delete_key_from_lists_and_persons() {
        let (mock, schema) = setup().await;
        seed(&mock, "a", &[("gender", "F"), ("firstName", "A")]).await;

        schema.delete_key("gender").await.unwrap();
        let current = schema.current().await.unwrap();
        assert!(!current.contains("gender"));
        assert!(!current.is_mandatory("gender"));
        assert_eq!(mock.get_person("a").await.unwrap().unwrap().get("gender"), None);
    }

    #[tokio::test]
    async fn test_invariant_after_mixed_mutations() {
        let (_mock, schema) = setup().await;
        schema.add_key("nickname", true, "").await.unwrap();
        schema.rename_key("nickname", "alias").await.unwrap();
        schema.delete_key("firstName").await.unwrap();
        let _ = schema.add_key("id", true, "").await;
        let _ = schema.rename_key("alias", "created_at").await;
        schema.add_key("firstName", false, "").await.unwrap();
        schema.delete_key("alias").await.unwrap();

        let current = schema.current().await.unwrap();
        assert!(current.is_consistent());
        assert!(!current.is_mandatory("firstName"));
    }
}
