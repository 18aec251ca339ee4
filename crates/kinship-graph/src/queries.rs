//! Read operations against the family-tree graph.

use neo4rs::query;

use kinship_core::schema::SCHEMA_NODE_ID;
use kinship_core::types::{
    timestamp_from_millis, CREATED_AT_PROPERTY, GENERATION_PROPERTY, ID_PROPERTY,
};
use kinship_core::{Person, PersonId, PersonSummary, Properties, RelativePattern, SchemaRecord};

use crate::client::{GraphClient, GraphError};

impl GraphClient {
    // ── Schema ───────────────────────────────────────────────────

    /// Read the schema singleton. A list stored as null falls back to its default.
    pub async fn get_schema(&self) -> Result<Option<SchemaRecord>, GraphError> {
        let q = query(
            "MATCH (s:Schema {id: $id})
             RETURN s.keys AS keys, s.mandatory_keys AS mandatory_keys",
        )
        .param("id", SCHEMA_NODE_ID);

        let Some(row) = self.query_one(q).await? else {
            return Ok(None);
        };

        let defaults = SchemaRecord::default();
        let keys = row
            .get::<Option<Vec<String>>>("keys")
            .ok()
            .flatten()
            .unwrap_or(defaults.keys);
        let mandatory_keys = row
            .get::<Option<Vec<String>>>("mandatory_keys")
            .ok()
            .flatten()
            .unwrap_or(defaults.mandatory_keys);

        Ok(Some(SchemaRecord {
            keys,
            mandatory_keys,
        }))
    }

    // ── Single Person Lookups ────────────────────────────────────

    pub async fn get_person(&self, id: &str) -> Result<Option<Person>, GraphError> {
        let q = query("MATCH (p:Person {id: $id}) RETURN p").param("id", id);

        match self.query_one(q).await? {
            Some(row) => {
                let node: neo4rs::Node = row.get("p").map_err(|e| {
                    GraphError::Serialization(format!("Failed to deserialize person: {e}"))
                })?;
                Ok(Some(node_to_person(&node)?))
            }
            None => Ok(None),
        }
    }

    /// Persons reachable from `id` through `pattern`.
    pub async fn find_relatives(
        &self,
        id: &str,
        pattern: RelativePattern,
    ) -> Result<Vec<Person>, GraphError> {
        let cypher = format!(
            "MATCH (p:Person {{id: $id}}){}(relative:Person)
             RETURN DISTINCT relative
             ORDER BY relative.id",
            pattern.cypher()
        );
        let q = query(&cypher).param("id", id);

        let rows = self.query_rows(q).await?;
        let mut results = Vec::with_capacity(rows.len());
        for row in rows {
            let node: neo4rs::Node = row.get("relative").map_err(|e| {
                GraphError::Serialization(format!("Failed to deserialize relative: {e}"))
            })?;
            results.push(node_to_person(&node)?);
        }
        tracing::debug!(person_id = %id, pattern = pattern.title(), count = results.len(), "Fetched relatives");
        Ok(results)
    }

    // ── Listings ─────────────────────────────────────────────────

    pub async fn list_persons(&self) -> Result<Vec<PersonSummary>, GraphError> {
        let q = query(
            "MATCH (p:Person)
             RETURN p.id AS id, p.firstName AS firstName, p.lastName AS lastName, p.dob AS dob
             ORDER BY p.id",
        );
        self.summaries(q).await
    }

    /// The top generation: Persons without a recorded parent.
    pub async fn root_persons(&self) -> Result<Vec<PersonSummary>, GraphError> {
        let q = query(
            "MATCH (p:Person)
             WHERE NOT (p)-[:CHILD_OF]->(:Person)
             RETURN p.id AS id, p.firstName AS firstName, p.lastName AS lastName, p.dob AS dob
             ORDER BY p.id",
        );
        self.summaries(q).await
    }

    pub async fn children_of(&self, parent_id: &str) -> Result<Vec<PersonSummary>, GraphError> {
        let q = query(
            "MATCH (parent:Person {id: $parent_id})<-[:CHILD_OF]-(p:Person)
             RETURN DISTINCT p.id AS id, p.firstName AS firstName, p.lastName AS lastName, p.dob AS dob
             ORDER BY id",
        )
        .param("parent_id", parent_id);
        self.summaries(q).await
    }

    async fn summaries(&self, q: neo4rs::Query) -> Result<Vec<PersonSummary>, GraphError> {
        let rows = self.query_rows(q).await?;
        Ok(rows.iter().map(row_to_summary).collect())
    }

    // ── Databases ────────────────────────────────────────────────

    /// Names of all logical databases. Must be issued on the `system` database.
    pub async fn list_databases(&self) -> Result<Vec<String>, GraphError> {
        let rows = self.query_rows(query("SHOW DATABASES")).await?;
        let mut names: Vec<String> = Vec::with_capacity(rows.len());
        for row in rows {
            if let Ok(name) = row.get::<String>("name") {
                // Clustered servers report one row per member.
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }
        Ok(names)
    }
}

/// Convert a Person node into our domain type.
///
/// Values written by other tools may not be strings; integers, floats and
/// booleans are rendered as text rather than dropped.
pub(crate) fn node_to_person(node: &neo4rs::Node) -> Result<Person, GraphError> {
    let id: String = node
        .get(ID_PROPERTY)
        .map_err(|e| GraphError::Serialization(format!("Person node without id: {e}")))?;

    let mut person = Person {
        id: PersonId(id),
        created_at: None,
        generation: None,
        properties: Properties::new(),
    };

    for key in node.keys() {
        match key {
            ID_PROPERTY => {}
            CREATED_AT_PROPERTY => {
                person.created_at = node
                    .get::<String>(key)
                    .ok()
                    .or_else(|| node.get::<i64>(key).ok().map(timestamp_from_millis));
            }
            GENERATION_PROPERTY => {
                person.generation = node
                    .get::<i64>(key)
                    .ok()
                    .or_else(|| node.get::<String>(key).ok().and_then(|s| s.parse().ok()));
            }
            _ => {
                if let Some(value) = property_as_string(node, key) {
                    person.properties.insert(key.to_string(), value);
                }
            }
        }
    }

    Ok(person)
}

fn property_as_string(node: &neo4rs::Node, key: &str) -> Option<String> {
    node.get::<String>(key)
        .ok()
        .or_else(|| node.get::<i64>(key).ok().map(|v| v.to_string()))
        .or_else(|| node.get::<f64>(key).ok().map(|v| v.to_string()))
        .or_else(|| node.get::<bool>(key).ok().map(|v| v.to_string()))
}

fn row_to_summary(row: &neo4rs::Row) -> PersonSummary {
    let text = |key: &str| row.get::<Option<String>>(key).ok().flatten();
    PersonSummary {
        id: row.get::<String>("id").unwrap_or_default(),
        first_name: text("firstName"),
        last_name: text("lastName"),
        dob: text("dob"),
    }
}
