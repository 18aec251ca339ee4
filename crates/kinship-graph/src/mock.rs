//! In-memory mock implementation of GraphStore for testing.
//!
//! Mirrors the Cypher semantics of `GraphClient`: MERGE-style idempotent
//! writes, undirected SPOUSE_OF, DETACH DELETE, and id-ordered listings.
//! Compiled for this crate's tests and behind the `mock` feature.

use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use tokio::sync::RwLock;

use kinship_core::types::creation_timestamp;
use kinship_core::{
    Person, PersonId, PersonSummary, Properties, RelationshipKind, RelativePattern, SchemaRecord,
};

use crate::client::GraphError;
use crate::store::GraphStore;

/// A stored relationship, `from -[kind]-> to`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockEdge {
    pub from: String,
    pub to: String,
    pub kind: RelationshipKind,
}

/// In-memory mock implementation of GraphStore for testing.
#[derive(Default)]
pub struct MockGraphStore {
    pub schema: RwLock<Option<SchemaRecord>>,
    pub persons: RwLock<BTreeMap<String, Person>>,
    pub edges: RwLock<Vec<MockEdge>>,
    /// Listing operations (`list_persons`, `root_persons`, `children_of`)
    /// that answer with a connection error.
    pub failing: RwLock<BTreeSet<&'static str>>,
}

impl MockGraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of edges of `kind` between `a` and `b`, either direction.
    pub async fn edges_between(&self, a: &str, b: &str, kind: RelationshipKind) -> usize {
        self.edges
            .read()
            .await
            .iter()
            .filter(|e| {
                e.kind == kind && ((e.from == a && e.to == b) || (e.from == b && e.to == a))
            })
            .count()
    }

    pub async fn edge_count(&self) -> usize {
        self.edges.read().await.len()
    }

    pub async fn person_count(&self) -> usize {
        self.persons.read().await.len()
    }

    /// Make the named listing operation fail until further notice.
    pub async fn fail_on(&self, operation: &'static str) {
        self.failing.write().await.insert(operation);
    }

    async fn check(&self, operation: &'static str) -> Result<(), GraphError> {
        if self.failing.read().await.contains(operation) {
            return Err(GraphError::Connection(format!("{operation} unavailable")));
        }
        Ok(())
    }

    async fn summaries_where<F>(&self, keep: F) -> Vec<PersonSummary>
    where
        F: Fn(&Person) -> bool,
    {
        self.persons
            .read()
            .await
            .values()
            .filter(|p| keep(p))
            .map(PersonSummary::from)
            .collect()
    }
}

#[async_trait]
impl GraphStore for MockGraphStore {
    async fn ensure_schema(&self, defaults: &SchemaRecord) -> Result<(), GraphError> {
        let mut schema = self.schema.write().await;
        if schema.is_none() {
            *schema = Some(defaults.clone());
        }
        Ok(())
    }

    async fn get_schema(&self) -> Result<Option<SchemaRecord>, GraphError> {
        Ok(self.schema.read().await.clone())
    }

    async fn append_schema_key(&self, key: &str, mandatory: bool) -> Result<(), GraphError> {
        if let Some(schema) = self.schema.write().await.as_mut() {
            if !schema.contains(key) {
                schema.keys.push(key.to_string());
            }
            if mandatory && !schema.is_mandatory(key) {
                schema.mandatory_keys.push(key.to_string());
            }
        }
        Ok(())
    }

    async fn write_schema(&self, record: &SchemaRecord) -> Result<(), GraphError> {
        if let Some(schema) = self.schema.write().await.as_mut() {
            *schema = record.clone();
        }
        Ok(())
    }

    async fn remove_schema_key(&self, key: &str) -> Result<(), GraphError> {
        if let Some(schema) = self.schema.write().await.as_mut() {
            schema.remove_key(key);
        }
        Ok(())
    }

    async fn set_property_on_all(&self, key: &str, value: &str) -> Result<i64, GraphError> {
        let mut persons = self.persons.write().await;
        for person in persons.values_mut() {
            person.properties.insert(key.to_string(), value.to_string());
        }
        Ok(persons.len() as i64)
    }

    async fn rename_property_on_all(&self, old: &str, new: &str) -> Result<i64, GraphError> {
        let mut touched = 0;
        for person in self.persons.write().await.values_mut() {
            if let Some(value) = person.properties.remove(old) {
                person.properties.insert(new.to_string(), value);
                touched += 1;
            }
        }
        Ok(touched)
    }

    async fn remove_property_on_all(&self, key: &str) -> Result<i64, GraphError> {
        let mut touched = 0;
        for person in self.persons.write().await.values_mut() {
            if person.properties.remove(key).is_some() {
                touched += 1;
            }
        }
        Ok(touched)
    }

    async fn merge_person(
        &self,
        id: &str,
        properties: &Properties,
        generation: Option<i64>,
    ) -> Result<(), GraphError> {
        let mut persons = self.persons.write().await;
        let person = persons.entry(id.to_string()).or_insert_with(|| Person {
            id: PersonId(id.to_string()),
            created_at: Some(creation_timestamp()),
            generation: None,
            properties: Properties::new(),
        });
        person
            .properties
            .extend(properties.iter().map(|(k, v)| (k.clone(), v.clone())));
        if generation.is_some() {
            person.generation = generation;
        }
        Ok(())
    }

    async fn update_person(
        &self,
        id: &str,
        set: &Properties,
        remove: &[String],
    ) -> Result<bool, GraphError> {
        let mut persons = self.persons.write().await;
        let Some(person) = persons.get_mut(id) else {
            return Ok(false);
        };
        person
            .properties
            .extend(set.iter().map(|(k, v)| (k.clone(), v.clone())));
        for key in remove {
            person.properties.remove(key);
        }
        Ok(true)
    }

    async fn get_person(&self, id: &str) -> Result<Option<Person>, GraphError> {
        Ok(self.persons.read().await.get(id).cloned())
    }

    async fn find_relatives(
        &self,
        id: &str,
        pattern: RelativePattern,
    ) -> Result<Vec<Person>, GraphError> {
        let persons = self.persons.read().await;
        if !persons.contains_key(id) {
            return Ok(Vec::new());
        }

        let mut ids: Vec<&str> = Vec::new();
        for edge in self.edges.read().await.iter() {
            let other = match (pattern, edge.kind) {
                (RelativePattern::Parents, RelationshipKind::ChildOf) if edge.from == id => &edge.to,
                (RelativePattern::Children, RelationshipKind::ChildOf) if edge.to == id => &edge.from,
                (RelativePattern::Spouses, RelationshipKind::SpouseOf) if edge.from == id => &edge.to,
                (RelativePattern::Spouses, RelationshipKind::SpouseOf) if edge.to == id => &edge.from,
                _ => continue,
            };
            if let Some((key, _)) = persons.get_key_value(other.as_str()) {
                if !ids.contains(&key.as_str()) {
                    ids.push(key.as_str());
                }
            }
        }
        ids.sort_unstable();

        Ok(ids.into_iter().filter_map(|k| persons.get(k).cloned()).collect())
    }

    async fn list_persons(&self) -> Result<Vec<PersonSummary>, GraphError> {
        self.check("list_persons").await?;
        Ok(self.summaries_where(|_| true).await)
    }

    async fn root_persons(&self) -> Result<Vec<PersonSummary>, GraphError> {
        self.check("root_persons").await?;
        let edges = self.edges.read().await.clone();
        let known: Vec<String> = self.persons.read().await.keys().cloned().collect();
        Ok(self
            .summaries_where(|p| {
                !edges.iter().any(|e| {
                    e.kind == RelationshipKind::ChildOf
                        && e.from == p.id.0
                        && known.contains(&e.to)
                })
            })
            .await)
    }

    async fn children_of(&self, parent_id: &str) -> Result<Vec<PersonSummary>, GraphError> {
        self.check("children_of").await?;
        if !self.persons.read().await.contains_key(parent_id) {
            return Ok(Vec::new());
        }
        let edges = self.edges.read().await.clone();
        Ok(self
            .summaries_where(|p| {
                edges.iter().any(|e| {
                    e.kind == RelationshipKind::ChildOf && e.from == p.id.0 && e.to == parent_id
                })
            })
            .await)
    }

    async fn delete_person(&self, id: &str) -> Result<bool, GraphError> {
        if self.persons.write().await.remove(id).is_none() {
            return Ok(false);
        }
        self.edges
            .write()
            .await
            .retain(|e| e.from != id && e.to != id);
        Ok(true)
    }

    async fn link(&self, from: &str, to: &str, kind: RelationshipKind) -> Result<bool, GraphError> {
        {
            let persons = self.persons.read().await;
            if !persons.contains_key(from) || !persons.contains_key(to) {
                return Ok(false);
            }
        }

        let mut edges = self.edges.write().await;
        let exists = edges.iter().any(|e| {
            e.kind == kind
                && ((e.from == from && e.to == to)
                    || (kind.is_symmetric() && e.from == to && e.to == from))
        });
        if !exists {
            edges.push(MockEdge {
                from: from.to_string(),
                to: to.to_string(),
                kind,
            });
        }
        Ok(true)
    }
}
