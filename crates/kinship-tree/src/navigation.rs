//! Generation-by-generation browsing.
//!
//! The browser starts at the top generation (persons without a parent) and
//! descends into the children of a selected person. Every descent pushes the
//! previous view onto a history stack; going back pops it.

use serde::Serialize;

use kinship_core::PersonSummary;

use crate::error::Result;
use crate::repository::PersonRepository;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "view", content = "parent", rename_all = "lowercase")]
pub enum View {
    /// Persons with no outgoing CHILD_OF edge.
    #[default]
    Root,
    /// Children of the given person id.
    Children(String),
}

#[derive(Debug, Clone, Default)]
pub struct Navigator {
    current: View,
    history: Vec<View>,
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> &View {
        &self.current
    }

    pub fn can_go_back(&self) -> bool {
        !self.history.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.history.len()
    }

    pub fn view_children(&mut self, parent_id: impl Into<String>) {
        let next = View::Children(parent_id.into());
        let previous = std::mem::replace(&mut self.current, next);
        self.history.push(previous);
    }

    /// Return to the previous view. `false` when already at the start.
    pub fn go_back(&mut self) -> bool {
        match self.history.pop() {
            Some(previous) => {
                self.current = previous;
                true
            }
            None => false,
        }
    }

    pub fn go_to_top(&mut self) {
        self.history.clear();
        self.current = View::Root;
    }
}

/// A titled list of persons for one view.
#[derive(Debug, Clone, Serialize)]
pub struct Listing {
    pub title: String,
    pub rows: Vec<PersonSummary>,
}

impl PersonRepository {
    pub async fn load_view(&self, view: &View) -> Result<Listing> {
        match view {
            View::Root => Ok(Listing {
                title: "Top Generation (people with no parents)".to_string(),
                rows: self.root_generation().await?,
            }),
            View::Children(parent_id) => {
                let parent = self.require(parent_id).await?;
                let name = parent.first_name().unwrap_or(parent_id.as_str());
                Ok(Listing {
                    title: format!("Children of: {name}"),
                    rows: self.children_of(parent_id).await?,
                })
            }
        }
    }
}
