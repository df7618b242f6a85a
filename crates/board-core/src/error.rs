//! Board and view error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BoardError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Unknown square: {0}")]
    UnknownSquare(String),

    #[error("Piece not found in piece set: {0}")]
    PieceNotFound(String),

    #[error("Mount target not found: {0}")]
    TargetNotFound(String),

    #[error("Mount error: {0}")]
    Mount(#[from] std::io::Error),

    #[error("Invalid piece set: {0}")]
    PieceSet(#[from] serde_json::Error),
}

impl From<validator::ValidationErrors> for BoardError {
    fn from(errors: validator::ValidationErrors) -> Self {
        BoardError::Configuration(errors.to_string())
    }
}

pub type Result<T, E = BoardError> = std::result::Result<T, E>;
