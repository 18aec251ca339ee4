//! The singleton schema record that drives every person form.
//!
//! `keys` lists the editable property names in display order and
//! `mandatory_keys` the subset that must be filled when creating a Person.
//! The list helpers here are pure; they keep `mandatory_keys ⊆ keys` and
//! never admit a managed property name.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::types::{is_managed, validate_property_name};

/// Well-known id of the `:Schema` node.
pub const SCHEMA_NODE_ID: &str = "person_schema";

pub const DEFAULT_KEYS: [&str; 5] = ["firstName", "lastName", "gender", "dob", "dod"];

pub const DEFAULT_MANDATORY_KEYS: [&str; 4] = ["firstName", "lastName", "gender", "dob"];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SchemaRecord {
    pub keys: Vec<String>,
    pub mandatory_keys: Vec<String>,
}

impl Default for SchemaRecord {
    fn default() -> Self {
        Self {
            keys: DEFAULT_KEYS.iter().map(|k| k.to_string()).collect(),
            mandatory_keys: DEFAULT_MANDATORY_KEYS.iter().map(|k| k.to_string()).collect(),
        }
    }
}

impl SchemaRecord {
    pub fn contains(&self, key: &str) -> bool {
        self.keys.iter().any(|k| k == key)
    }

    pub fn is_mandatory(&self, key: &str) -> bool {
        self.mandatory_keys.iter().any(|k| k == key)
    }

    /// Append `key` (and to the mandatory list when asked) unless already present.
    pub fn add_key(&mut self, key: &str, mandatory: bool) -> Result<(), ValidationError> {
        validate_property_name(key)?;
        if !self.contains(key) {
            self.keys.push(key.to_string());
        }
        if mandatory && !self.is_mandatory(key) {
            self.mandatory_keys.push(key.to_string());
        }
        Ok(())
    }

    /// Rewrite `old` to `new` in both lists, keeping positions.
    pub fn rename_key(&mut self, old: &str, new: &str) -> Result<(), ValidationError> {
        validate_property_name(new)?;
        if old == new {
            return Ok(());
        }
        if self.contains(new) {
            return Err(ValidationError::Rejected(format!(
                "Property '{new}' already exists in the schema"
            )));
        }
        for list in [&mut self.keys, &mut self.mandatory_keys] {
            for key in list.iter_mut().filter(|k| k.as_str() == old) {
                *key = new.to_string();
            }
        }
        Ok(())
    }

    pub fn remove_key(&mut self, key: &str) {
        self.keys.retain(|k| k != key);
        self.mandatory_keys.retain(|k| k != key);
    }

    /// True when `mandatory_keys ⊆ keys` and no managed name is listed.
    pub fn is_consistent(&self) -> bool {
        self.mandatory_keys.iter().all(|k| self.contains(k))
            && self.keys.iter().all(|k| !is_managed(k))
    }
}
