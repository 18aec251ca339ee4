//! Schema-driven person forms.
//!
//! A form is the list of schema keys with their mandatory flags and, when
//! editing, the person's current values. Front-ends collect one answer per
//! field and hand the answers back here to be checked against the schema.

use serde::Serialize;

use kinship_core::{Person, Properties, SchemaRecord, ValidationError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormField {
    pub name: String,
    pub mandatory: bool,
    pub current: Option<String>,
}

impl FormField {
    /// Prompt label, with `*` marking mandatory fields.
    pub fn label(&self) -> String {
        if self.mandatory {
            format!("{}*", self.name)
        } else {
            self.name.clone()
        }
    }
}

/// Property edits for an existing person.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonChanges {
    pub set: Properties,
    pub remove: Vec<String>,
}

impl PersonChanges {
    pub fn is_empty(&self) -> bool {
        self.set.is_empty() && self.remove.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct PersonForm {
    fields: Vec<FormField>,
}

impl PersonForm {
    pub fn for_new(schema: &SchemaRecord) -> Self {
        let fields = schema
            .keys
            .iter()
            .map(|key| FormField {
                name: key.clone(),
                mandatory: schema.is_mandatory(key),
                current: None,
            })
            .collect();
        Self { fields }
    }

    /// Form prefilled with `person`'s values. Properties outside the schema
    /// are not shown and never touched.
    pub fn for_existing(schema: &SchemaRecord, person: &Person) -> Self {
        let mut form = Self::for_new(schema);
        for field in &mut form.fields {
            field.current = person.get(&field.name).map(str::to_string);
        }
        form
    }

    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    /// Properties for a new person. Blank answers are dropped; a blank or
    /// missing mandatory field is an error.
    pub fn new_properties(&self, answers: &Properties) -> Result<Properties, ValidationError> {
        let mut properties = Properties::new();
        for field in &self.fields {
            let value = answers.get(&field.name).map(|v| v.trim()).unwrap_or_default();
            if value.is_empty() {
                if field.mandatory {
                    return Err(missing(&field.name));
                }
                continue;
            }
            properties.insert(field.name.clone(), value.to_string());
        }
        Ok(properties)
    }

    /// Diff the final answers against the current values.
    ///
    /// A field with no answer is left as is. A blank answer clears the
    /// property, which mandatory fields refuse.
    pub fn changes(&self, answers: &Properties) -> Result<PersonChanges, ValidationError> {
        let mut changes = PersonChanges::default();
        for field in &self.fields {
            let Some(answer) = answers.get(&field.name) else {
                continue;
            };
            let answer = answer.trim();
            if answer.is_empty() {
                if field.mandatory {
                    return Err(missing(&field.name));
                }
                if field.current.is_some() {
                    changes.remove.push(field.name.clone());
                }
            } else if field.current.as_deref() != Some(answer) {
                changes.set.insert(field.name.clone(), answer.to_string());
            }
        }
        Ok(changes)
    }
}

fn missing(name: &str) -> ValidationError {
    ValidationError::Rejected(format!("'{name}' is mandatory"))
}

#[cfg(test)]
mod tests {
    use super::*;

    use kinship_core::PersonId;

    fn answers(pairs: &[(&str, &str)]) -> Properties {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn person() -> Person {
        Person {
            id: PersonId::parse("gen1_01").unwrap(),
            created_at: None,
            generation: Some(1),
            properties: answers(&[
                ("firstName", "A"),
                ("lastName", "B"),
                ("gender", "M"),
                ("dob", "1900-01-01"),
                ("dod", "1970-01-01"),
                ("legacy", "kept"),
            ]),
        }
    }

    #[test]
    fn test_fields_follow_schema_order() {
        let form = PersonForm::for_new(&SchemaRecord::default());
        let labels: Vec<String> = form.fields().iter().map(FormField::label).collect();
        assert_eq!(labels, vec!["firstName*", "lastName*", "gender*", "dob*", "dod"]);
    }

    #[test]
    fn test_new_properties_requires_mandatory() {
        let form = PersonForm::for_new(&SchemaRecord::default());
        let err = form
            .new_properties(&answers(&[("firstName", "A"), ("lastName", "B"), ("gender", "M")]))
            .unwrap_err();
        assert_eq!(err, ValidationError::Rejected("'dob' is mandatory".to_string()));
    }

    #[test]
    fn test_new_properties_skips_blank_optional() {
        let form = PersonForm::for_new(&SchemaRecord::default());
        let props = form
            .new_properties(&answers(&[
                ("firstName", " A "),
                ("lastName", "B"),
                ("gender", "M"),
                ("dob", "1900-01-01"),
                ("dod", ""),
            ]))
            .unwrap();
        assert_eq!(props.len(), 4);
        assert_eq!(props.get("firstName").map(String::as_str), Some("A"));
        assert!(!props.contains_key("dod"));
    }

    #[test]
    fn test_changes_set_and_clear() {
        let form = PersonForm::for_existing(&SchemaRecord::default(), &person());
        let changes = form
            .changes(&answers(&[("firstName", "Z"), ("lastName", "B"), ("dod", "")]))
            .unwrap();
        assert_eq!(changes.set, answers(&[("firstName", "Z")]));
        assert_eq!(changes.remove, vec!["dod".to_string()]);
    }

    #[test]
    fn test_changes_refuse_clearing_mandatory() {
        let form = PersonForm::for_existing(&SchemaRecord::default(), &person());
        assert!(form.changes(&answers(&[("gender", "  ")])).is_err());
    }

    #[test]
    fn test_unchanged_answers_produce_nothing() {
        let form = PersonForm::for_existing(&SchemaRecord::default(), &person());
        let changes = form
            .changes(&answers(&[("firstName", "A"), ("dob", "1900-01-01")]))
            .unwrap();
        assert!(changes.is_empty());
    }
}
