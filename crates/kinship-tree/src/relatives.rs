//! Adding a child, sibling, or spouse relative to an existing person.
//!
//! - A child is linked CHILD_OF to the anchor and to every spouse of the anchor.
//! - A sibling is linked CHILD_OF to every parent of the anchor; an anchor
//!   without a recorded parent cannot get siblings.
//! - A spouse is linked SPOUSE_OF to the anchor only.
//!
//! Children and siblings get a synthesized id `{base}_{childNumber}` where
//! `base` is the anchor (child) or the anchor's first parent (sibling).
//! Spouses need an explicit id. All checks run before anything is written.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use kinship_core::{Person, PersonId, Properties, RelationshipKind, RelativePattern, ValidationError};

use crate::error::{Result, TreeError};
use crate::repository::PersonRepository;

/// Generation assumed for an anchor with no `genNumber`.
const DEFAULT_GENERATION: i64 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RelativeKind {
    Child,
    Sibling,
    Spouse,
}

impl RelativeKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Child => "child",
            Self::Sibling => "sibling",
            Self::Spouse => "spouse",
        }
    }

    /// Whether the new id is synthesized from a child number.
    pub fn uses_child_number(&self) -> bool {
        matches!(self, Self::Child | Self::Sibling)
    }
}

impl fmt::Display for RelativeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for RelativeKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "child" => Ok(Self::Child),
            "sibling" => Ok(Self::Sibling),
            "spouse" => Ok(Self::Spouse),
            other => Err(ValidationError::Rejected(format!(
                "Unknown relative kind '{other}'. Use child, sibling, or spouse"
            ))),
        }
    }
}

/// What the user supplied for the new relative.
#[derive(Debug, Clone, Default)]
pub struct RelativeRequest {
    /// Disambiguator for children and siblings.
    pub child_number: Option<String>,
    /// Explicit id, required for spouses.
    pub spouse_id: Option<String>,
    pub properties: Properties,
}

/// Everything known about the anchor before the form is filled in.
#[derive(Debug, Clone)]
pub struct RelativeContext {
    pub kind: RelativeKind,
    pub anchor: Person,
    /// Persons the new relative will be linked to, with the edge type.
    pub links: Vec<(String, RelationshipKind)>,
    /// Base for synthesized ids; `None` for spouses.
    pub id_base: Option<String>,
    pub generation: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AddedRelative {
    pub id: PersonId,
    pub kind: RelativeKind,
    pub generation: i64,
    pub linked_to: Vec<String>,
}

/// `{base}_{childNumber}`; fails without a child number.
pub fn synthesize_id(base: &str, child_number: Option<&str>) -> std::result::Result<PersonId, ValidationError> {
    let number = child_number.map(str::trim).unwrap_or_default();
    if number.is_empty() {
        return Err(ValidationError::Rejected(
            "'childNumber' is required to generate an ID".to_string(),
        ));
    }
    PersonId::parse(&format!("{base}_{number}"))
}

impl PersonRepository {
    /// Resolve the anchor, its link targets, and the new generation number.
    ///
    /// Fails for a sibling when the anchor has no recorded parent.
    pub async fn relative_context(&self, kind: RelativeKind, anchor_id: &str) -> Result<RelativeContext> {
        let anchor = self.require(anchor_id).await?;
        let anchor_generation = anchor.generation.unwrap_or(DEFAULT_GENERATION);

        let context = match kind {
            RelativeKind::Child => {
                let spouses = self.find_relatives(anchor_id, RelativePattern::Spouses).await?;
                let links = std::iter::once(anchor.id.0.clone())
                    .chain(spouses.into_iter().map(|s| s.id.0))
                    .map(|id| (id, RelationshipKind::ChildOf))
                    .collect();
                RelativeContext {
                    kind,
                    id_base: Some(anchor.id.0.clone()),
                    links,
                    generation: anchor_generation + 1,
                    anchor,
                }
            }
            RelativeKind::Sibling => {
                let parents = self.find_relatives(anchor_id, RelativePattern::Parents).await?;
                let Some(first) = parents.first() else {
                    return Err(TreeError::rejected(format!(
                        "{anchor_id} has no parents on file; a sibling cannot be added"
                    )));
                };
                RelativeContext {
                    kind,
                    id_base: Some(first.id.0.clone()),
                    links: parents
                        .iter()
                        .map(|p| (p.id.0.clone(), RelationshipKind::ChildOf))
                        .collect(),
                    generation: anchor_generation,
                    anchor,
                }
            }
            RelativeKind::Spouse => RelativeContext {
                kind,
                id_base: None,
                links: vec![(anchor.id.0.clone(), RelationshipKind::SpouseOf)],
                generation: anchor_generation,
                anchor,
            },
        };
        Ok(context)
    }

    /// Create the new relative and link it according to `kind`.
    pub async fn add_relative(
        &self,
        kind: RelativeKind,
        anchor_id: &str,
        request: &RelativeRequest,
    ) -> Result<AddedRelative> {
        let context = self.relative_context(kind, anchor_id).await?;

        let id = match &context.id_base {
            Some(base) => synthesize_id(base, request.child_number.as_deref())?,
            None => PersonId::parse(request.spouse_id.as_deref().unwrap_or_default())?,
        };
        if self.find(id.as_str()).await?.is_some() {
            return Err(TreeError::rejected(format!("A person with ID {id} already exists")));
        }

        self.add_with_generation(&id, &request.properties, Some(context.generation))
            .await?;
        for (target, rel) in &context.links {
            self.link_kind(id.as_str(), target, *rel).await?;
        }

        tracing::info!(person_id = %id, kind = %kind, anchor = %anchor_id, links = context.links.len(), "Added relative");
        Ok(AddedRelative {
            id,
            kind,
            generation: context.generation,
            linked_to: context.links.into_iter().map(|(target, _)| target).collect(),
        })
    }
}
