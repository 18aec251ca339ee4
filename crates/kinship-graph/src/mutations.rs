//! Write operations for the family-tree graph.
//!
//! Person nodes are keyed by `id` and written with MERGE, as are both
//! relationship types, so repeating a write never duplicates anything.
//! Property names that must appear in the Cypher text are backtick-quoted
//! through [`quote_property`]; values are always parameters.

use std::collections::HashMap;

use neo4rs::query;

use kinship_core::schema::SCHEMA_NODE_ID;
use kinship_core::types::creation_timestamp;
use kinship_core::{Properties, RelationshipKind, SchemaRecord};

use crate::client::{GraphClient, GraphError};

impl GraphClient {
    // ── Schema ───────────────────────────────────────────────────

    /// Create the schema node with defaults; an existing node is left untouched.
    pub async fn ensure_schema(&self, defaults: &SchemaRecord) -> Result<(), GraphError> {
        let q = query(
            "MERGE (s:Schema {id: $id})
             ON CREATE SET s.keys = $keys, s.mandatory_keys = $mandatory_keys",
        )
        .param("id", SCHEMA_NODE_ID)
        .param("keys", defaults.keys.clone())
        .param("mandatory_keys", defaults.mandatory_keys.clone());

        self.run(q).await
    }

    pub async fn append_schema_key(&self, key: &str, mandatory: bool) -> Result<(), GraphError> {
        let q = query(
            "MATCH (s:Schema {id: $id})
             SET s.keys = CASE WHEN $key IN s.keys THEN s.keys ELSE s.keys + $key END,
                 s.mandatory_keys = CASE
                   WHEN $mandatory AND NOT $key IN s.mandatory_keys THEN s.mandatory_keys + $key
                   ELSE s.mandatory_keys
                 END",
        )
        .param("id", SCHEMA_NODE_ID)
        .param("key", key)
        .param("mandatory", mandatory);

        self.run(q).await
    }

    pub async fn write_schema(&self, schema: &SchemaRecord) -> Result<(), GraphError> {
        let q = query(
            "MATCH (s:Schema {id: $id})
             SET s.keys = $keys, s.mandatory_keys = $mandatory_keys",
        )
        .param("id", SCHEMA_NODE_ID)
        .param("keys", schema.keys.clone())
        .param("mandatory_keys", schema.mandatory_keys.clone());

        self.run(q).await
    }

    pub async fn remove_schema_key(&self, key: &str) -> Result<(), GraphError> {
        let q = query(
            "MATCH (s:Schema {id: $id})
             SET s.keys = [k IN s.keys WHERE k <> $key],
                 s.mandatory_keys = [mk IN s.mandatory_keys WHERE mk <> $key]",
        )
        .param("id", SCHEMA_NODE_ID)
        .param("key", key);

        self.run(q).await
    }

    // ── Bulk Property Updates ────────────────────────────────────

    pub async fn set_property_on_all(&self, key: &str, value: &str) -> Result<i64, GraphError> {
        let cypher = format!(
            "MATCH (p:Person)
             SET p.{prop} = $value
             RETURN count(p) AS cnt",
            prop = quote_property(key)?
        );
        let q = query(&cypher).param("value", value);
        self.query_count(q).await
    }

    pub async fn rename_property_on_all(&self, old: &str, new: &str) -> Result<i64, GraphError> {
        let old = quote_property(old)?;
        let new = quote_property(new)?;
        let cypher = format!(
            "MATCH (p:Person)
             WHERE p.{old} IS NOT NULL
             SET p.{new} = p.{old}
             REMOVE p.{old}
             RETURN count(p) AS cnt"
        );
        self.query_count(query(&cypher)).await
    }

    pub async fn remove_property_on_all(&self, key: &str) -> Result<i64, GraphError> {
        let cypher = format!(
            "MATCH (p:Person)
             WHERE p.{prop} IS NOT NULL
             REMOVE p.{prop}
             RETURN count(p) AS cnt",
            prop = quote_property(key)?
        );
        self.query_count(query(&cypher)).await
    }

    // ── Persons ──────────────────────────────────────────────────

    pub async fn merge_person(
        &self,
        id: &str,
        properties: &Properties,
        generation: Option<i64>,
    ) -> Result<(), GraphError> {
        let mut cypher = String::from(
            "MERGE (p:Person {id: $id})
             ON CREATE SET p.created_at = $now
             SET p += $props",
        );
        if generation.is_some() {
            cypher.push_str(", p.genNumber = $gen");
        }

        let q = query(&cypher)
            .param("id", id)
            .param("now", creation_timestamp())
            .param("props", to_param_map(properties))
            .param("gen", generation.unwrap_or_default());

        self.run(q).await
    }

    pub async fn update_person(
        &self,
        id: &str,
        set: &Properties,
        remove: &[String],
    ) -> Result<bool, GraphError> {
        let mut cypher = String::from("MATCH (p:Person {id: $id})");
        if !set.is_empty() {
            cypher.push_str(" SET p += $props");
        }
        if !remove.is_empty() {
            let quoted = remove
                .iter()
                .map(|k| quote_property(k).map(|q| format!("p.{q}")))
                .collect::<Result<Vec<_>, _>>()?;
            cypher.push_str(" REMOVE ");
            cypher.push_str(&quoted.join(", "));
        }
        cypher.push_str(" RETURN count(p) AS cnt");

        let q = query(&cypher)
            .param("id", id)
            .param("props", to_param_map(set));

        Ok(self.query_count(q).await? > 0)
    }

    /// Delete a Person and every relationship touching it.
    pub async fn delete_person(&self, id: &str) -> Result<bool, GraphError> {
        let q = query(
            "MATCH (p:Person {id: $id})
             DETACH DELETE p
             RETURN count(p) AS cnt",
        )
        .param("id", id);

        Ok(self.query_count(q).await? > 0)
    }

    // ── Relationships ────────────────────────────────────────────

    /// Merge `(from)-[kind]->(to)`. SPOUSE_OF is merged without direction so
    /// an existing edge either way is reused.
    pub async fn link(
        &self,
        from: &str,
        to: &str,
        kind: RelationshipKind,
    ) -> Result<bool, GraphError> {
        let arrow = if kind.is_symmetric() { "" } else { ">" };
        let cypher = format!(
            "MATCH (a:Person {{id: $from}}), (b:Person {{id: $to}})
             MERGE (a)-[:{rel}]-{arrow}(b)
             RETURN count(*) AS cnt",
            rel = kind.as_cypher()
        );
        let q = query(&cypher).param("from", from).param("to", to);

        Ok(self.query_count(q).await? > 0)
    }
}

// ── Helpers ──────────────────────────────────────────────────────

/// Backtick-quote a property name for use in Cypher text.
pub(crate) fn quote_property(name: &str) -> Result<String, GraphError> {
    if name.is_empty() || name.contains('`') {
        return Err(GraphError::InvalidProperty(name.to_string()));
    }
    Ok(format!("`{name}`"))
}

fn to_param_map(properties: &Properties) -> HashMap<String, String> {
    properties
        .iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}
