use std::io;

use thiserror::Error;

use crate::application::error::ApplicationError;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("File not found: {0}")]
    NotFound(String),

    #[error("File already exists: {0}")]
    AlreadyExists(String),

    #[error("File exceeds the {limit} byte upload limit")]
    TooLarge { limit: u64 },

    #[error("Upload body could not be read: {0}")]
    Interrupted(#[source] io::Error),

    #[error("Storage I/O error: {0}")]
    Io(#[from] io::Error),
}

impl From<StorageError> for ApplicationError {
    fn from(error: StorageError) -> Self {
        match error {
            StorageError::NotFound(_) => ApplicationError::NotFound,
            StorageError::AlreadyExists(name) => {
                ApplicationError::Conflict(format!("File '{}' already exists", name))
            }
            StorageError::TooLarge { .. } => ApplicationError::PayloadTooLarge,
            StorageError::Interrupted(e) => {
                ApplicationError::BadRequest(format!("Upload interrupted: {}", e))
            }
            StorageError::Io(e) => ApplicationError::InternalError(format!("Storage error: {}", e)),
        }
    }
}
