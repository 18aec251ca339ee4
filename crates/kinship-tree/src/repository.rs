//! CRUD over Person nodes and their relationships.
//!
//! The repository checks names and ids but not mandatory fields; callers
//! enforce the schema contract through [`crate::form::PersonForm`].

use std::sync::Arc;

use kinship_core::types::validate_property_name;
use kinship_core::{
    Person, PersonId, PersonSummary, Properties, RelationshipKind, RelativePattern,
};
use kinship_graph::GraphStore;

use crate::error::{Result, TreeError};

/// Result of [`PersonRepository::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Updated,
    /// Both the set map and the removal list were empty.
    NothingToDo,
}

#[derive(Clone)]
pub struct PersonRepository {
    store: Arc<dyn GraphStore>,
}

impl PersonRepository {
    pub fn new(store: Arc<dyn GraphStore>) -> Self {
        Self { store }
    }

    // ── Writes ───────────────────────────────────────────────────

    /// Create-or-merge a Person and overlay `properties`.
    pub async fn add(&self, id: &PersonId, properties: &Properties) -> Result<()> {
        self.add_with_generation(id, properties, None).await
    }

    pub async fn add_with_generation(
        &self,
        id: &PersonId,
        properties: &Properties,
        generation: Option<i64>,
    ) -> Result<()> {
        for key in properties.keys() {
            validate_property_name(key)?;
        }
        self.store
            .merge_person(id.as_str(), properties, generation)
            .await?;
        tracing::info!(person_id = %id, generation = ?generation, "Added or updated person");
        Ok(())
    }

    /// Set then remove properties in one request.
    pub async fn update(&self, id: &str, set: &Properties, remove: &[String]) -> Result<UpdateOutcome> {
        if set.is_empty() && remove.is_empty() {
            return Ok(UpdateOutcome::NothingToDo);
        }
        for key in set.keys().chain(remove.iter()) {
            validate_property_name(key)?;
        }

        if !self.store.update_person(id, set, remove).await? {
            return Err(TreeError::not_found(id));
        }
        tracing::info!(person_id = %id, set = set.len(), removed = remove.len(), "Updated person");
        Ok(UpdateOutcome::Updated)
    }

    /// Delete a Person together with all its relationships.
    pub async fn delete(&self, id: &str) -> Result<()> {
        if !self.store.delete_person(id).await? {
            return Err(TreeError::not_found(id));
        }
        tracing::info!(person_id = %id, "Deleted person");
        Ok(())
    }

    /// Link two Persons by a relationship type name (`CHILD_OF` or `SPOUSE_OF`).
    pub async fn link(&self, id1: &str, id2: &str, rel_type: &str) -> Result<RelationshipKind> {
        let kind: RelationshipKind = rel_type.parse()?;
        self.link_kind(id1, id2, kind).await?;
        Ok(kind)
    }

    pub async fn link_kind(&self, id1: &str, id2: &str, kind: RelationshipKind) -> Result<()> {
        if !self.store.link(id1, id2, kind).await? {
            let missing = match self.store.get_person(id1).await? {
                None => id1,
                Some(_) => id2,
            };
            return Err(TreeError::not_found(missing));
        }
        tracing::info!(from = %id1, to = %id2, rel = %kind, "Linked persons");
        Ok(())
    }

    // ── Reads ────────────────────────────────────────────────────

    pub async fn find(&self, id: &str) -> Result<Option<Person>> {
        Ok(self.store.get_person(id).await?)
    }

    /// Like [`find`](Self::find) but a missing Person is an error.
    pub async fn require(&self, id: &str) -> Result<Person> {
        self.find(id).await?.ok_or_else(|| TreeError::not_found(id))
    }

    pub async fn find_relatives(&self, id: &str, pattern: RelativePattern) -> Result<Vec<Person>> {
        Ok(self.store.find_relatives(id, pattern).await?)
    }

    /// Every Person's id, first name and last name, ordered by id.
    pub async fn list_all(&self) -> Result<Vec<PersonSummary>> {
        Ok(self.store.list_persons().await?)
    }

    pub async fn root_generation(&self) -> Result<Vec<PersonSummary>> {
        Ok(self.store.root_persons().await?)
    }

    pub async fn children_of(&self, parent_id: &str) -> Result<Vec<PersonSummary>> {
        Ok(self.store.children_of(parent_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use kinship_core::ValidationError;
    use kinship_graph::mock::MockGraphStore;

    fn props(pairs: &[(&str, &str)]) -> Properties {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn id(raw: &str) -> PersonId {
        PersonId::parse(raw).unwrap()
    }

    fn setup() -> (Arc<MockGraphStore>, PersonRepository) {
        let mock = Arc::new(MockGraphStore::new());
        (mock.clone(), PersonRepository::new(mock))
    }

    #[tokio::test]
    async fn test_add_then_find_returns_submitted_properties() {
        let (_mock, repo) = setup();
        let submitted = props(&[
            ("firstName", "A"),
            ("lastName", "B"),
            ("gender", "M"),
            ("dob", "1900-01-01"),
        ]);
        repo.add(&id("gen1_01"), &submitted).await.unwrap();

        let person = repo.find("gen1_01").await.unwrap().unwrap();
        assert_eq!(person.id.as_str(), "gen1_01");
        assert_eq!(person.properties, submitted);
        assert!(person.created_at.as_deref().is_some_and(|t| !t.is_empty()));
    }

    #[tokio::test]
    async fn test_add_rejects_managed_property() {
        let (mock, repo) = setup();
        let err = repo
            .add(&id("p"), &props(&[("created_at", "yesterday")]))
            .await
            .unwrap_err();
        assert!(matches!(err, TreeError::Validation(ValidationError::ManagedProperty(_))));
        assert_eq!(mock.person_count().await, 0);
    }

    #[tokio::test]
    async fn test_update_sets_and_removes() {
        let (_mock, repo) = setup();
        repo.add(&id("p"), &props(&[("firstName", "A"), ("dod", "1990")]))
            .await
            .unwrap();

        let outcome = repo.update("p", &props(&[("firstName", "Z")]), &[]).await.unwrap();
        assert_eq!(outcome, UpdateOutcome::Updated);
        assert_eq!(repo.require("p").await.unwrap().get("firstName"), Some("Z"));

        repo.update("p", &Properties::new(), &["dod".to_string()]).await.unwrap();
        assert_eq!(repo.require("p").await.unwrap().get("dod"), None);
    }

    #[tokio::test]
    async fn test_update_with_nothing_to_do() {
        let (_mock, repo) = setup();
        let outcome = repo.update("ghost", &Properties::new(), &[]).await.unwrap();
        assert_eq!(outcome, UpdateOutcome::NothingToDo);
    }

    #[tokio::test]
    async fn test_update_missing_person_is_not_found() {
        let (_mock, repo) = setup();
        let err = repo.update("ghost", &props(&[("firstName", "Z")]), &[]).await.unwrap_err();
        assert!(matches!(err, TreeError::NotFound { ref id } if id == "ghost"));
    }

    #[tokio::test]
    async fn test_update_cannot_remove_managed_property() {
        let (_mock, repo) = setup();
        repo.add(&id("p"), &Properties::new()).await.unwrap();
        let err = repo
            .update("p", &Properties::new(), &["created_at".to_string()])
            .await
            .unwrap_err();
        assert!(matches!(err, TreeError::Validation(_)));
        assert!(repo.require("p").await.unwrap().created_at.is_some());
    }

    #[tokio::test]
    async fn test_spouse_link_twice_creates_one_edge() {
        let (mock, repo) = setup();
        repo.add(&id("a"), &Properties::new()).await.unwrap();
        repo.add(&id("b"), &Properties::new()).await.unwrap();

        repo.link("a", "b", "SPOUSE_OF").await.unwrap();
        repo.link("a", "b", "spouse_of").await.unwrap();

        assert_eq!(mock.edges_between("a", "b", RelationshipKind::SpouseOf).await, 1);
        let spouses = repo.find_relatives("a", RelativePattern::Spouses).await.unwrap();
        assert_eq!(spouses.len(), 1);
        assert_eq!(spouses[0].id.as_str(), "b");
    }

    #[tokio::test]
    async fn test_link_rejects_unknown_kind() {
        let (mock, repo) = setup();
        repo.add(&id("a"), &Properties::new()).await.unwrap();
        repo.add(&id("b"), &Properties::new()).await.unwrap();

        let err = repo.link("a", "b", "SIBLING_OF").await.unwrap_err();
        assert!(matches!(
            err,
            TreeError::Validation(ValidationError::InvalidRelationship(_))
        ));
        assert_eq!(mock.edge_count().await, 0);
    }

    #[tokio::test]
    async fn test_link_reports_missing_endpoint() {
        let (_mock, repo) = setup();
        repo.add(&id("a"), &Properties::new()).await.unwrap();
        let err = repo.link("a", "ghost", "CHILD_OF").await.unwrap_err();
        assert!(matches!(err, TreeError::NotFound { ref id } if id == "ghost"));
    }

    #[tokio::test]
    async fn test_list_all_single_person_scenario() {
        let (_mock, repo) = setup();
        repo.add(
            &id("gen1_01"),
            &props(&[
                ("firstName", "A"),
                ("lastName", "B"),
                ("gender", "M"),
                ("dob", "1900-01-01"),
            ]),
        )
        .await
        .unwrap();

        let rows = repo.list_all().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, "gen1_01");
        assert_eq!(rows[0].first_name.as_deref(), Some("A"));
        assert_eq!(rows[0].last_name.as_deref(), Some("B"));
    }

    #[tokio::test]
    async fn test_delete_removes_child_of_edges() {
        let (_mock, repo) = setup();
        repo.add(&id("gen1_01"), &Properties::new()).await.unwrap();
        repo.add(&id("gen1_01_1"), &Properties::new()).await.unwrap();
        repo.link("gen1_01_1", "gen1_01", "CHILD_OF").await.unwrap();
        assert_eq!(
            repo.find_relatives("gen1_01_1", RelativePattern::Parents).await.unwrap().len(),
            1
        );

        repo.delete("gen1_01").await.unwrap();
        let parents = repo.find_relatives("gen1_01_1", RelativePattern::Parents).await.unwrap();
        assert!(parents.iter().all(|p| p.id.as_str() != "gen1_01"));
        assert!(matches!(repo.delete("gen1_01").await, Err(TreeError::NotFound { .. })));
    }
}
