//! Error types for meshview

use thiserror::Error;

/// Main error type for meshview operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Insufficient points: need at least {required}, got {found}")]
    InsufficientPoints { required: usize, found: usize },

    #[error("Degenerate plane: the points do not span a unique plane")]
    DegeneratePlane,

    #[error("No plane defined")]
    NoPlaneDefined,

    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Unknown node type: {0}")]
    UnknownNodeType(String),

    #[error("Duplicate node name: {0}")]
    DuplicateNode(String),
}

/// Result type alias for meshview operations
pub type Result<T> = std::result::Result<T, Error>;
