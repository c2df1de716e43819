/// Error types for board operations
///
/// Schema problems (malformed board files) are kept separate from the
/// controller-level errors so a load failure can be reported as "this file
/// is not a valid board" without guessing from a generic error chain.

use std::path::PathBuf;
use thiserror::Error;

/// A board document that does not match the on-disk schema.
///
/// Produced only by the serialization layer. A failed parse never yields a
/// partially populated board model.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("invalid board document: {0}")]
pub struct SchemaError(pub String);

impl SchemaError {
    pub fn new(message: impl Into<String>) -> Self {
        SchemaError(message.into())
    }
}

/// Errors surfaced by the board controller and registry
#[derive(Error, Debug)]
pub enum BoardError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("not an existing file: {0}")]
    InvalidPath(PathBuf),

    #[error("no image named \"{0}\" on this board")]
    NotFound(String),

    #[error("image name \"{0}\" already in use")]
    NameConflict(String),

    #[error("invalid value for {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("board file I/O failed: {0}")]
    Persistence(#[from] std::io::Error),
}

/// Result type for board operations
pub type BoardResult<T> = Result<T, BoardError>;
