use thiserror::Error;

/// Input rejected before any query is issued.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Person id must not be empty")]
    EmptyId,

    #[error("Property name must not be empty")]
    EmptyProperty,

    #[error("'{0}' is a managed property and cannot be edited")]
    ManagedProperty(String),

    #[error("Property name '{0}' contains a backtick")]
    IllegalPropertyName(String),

    #[error("Invalid relationship type '{0}'. Use one of: CHILD_OF, SPOUSE_OF")]
    InvalidRelationship(String),

    #[error("{0}")]
    Rejected(String),
}
