//! Error types for the kinship-cli crate.

use thiserror::Error;

use kinship_core::ValidationError;
use kinship_tree::TreeError;

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Tree(#[from] TreeError),

    #[error("Graph error: {0}")]
    Graph(#[from] kinship_graph::GraphError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Standard input reached end of file.
    #[error("Input closed")]
    InputClosed,
}

pub type Result<T> = std::result::Result<T, CliError>;
