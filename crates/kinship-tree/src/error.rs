//! Error types for the kinship-tree crate.

use thiserror::Error;

use kinship_core::ValidationError;

#[derive(Error, Debug)]
pub enum TreeError {
    #[error("Graph error: {0}")]
    Graph(#[from] kinship_graph::GraphError),

    #[error("Person not found: {id}")]
    NotFound { id: String },

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl TreeError {
    pub(crate) fn not_found(id: &str) -> Self {
        Self::NotFound { id: id.to_string() }
    }

    pub(crate) fn rejected(message: impl Into<String>) -> Self {
        Self::Validation(ValidationError::Rejected(message.into()))
    }
}

pub type Result<T> = std::result::Result<T, TreeError>;
