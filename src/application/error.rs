use crate::domain::models::file_name::FileNameError;

#[derive(Debug)]
pub enum ApplicationError {
    NotFound,
    BadRequest(String),
    Forbidden(String),
    Conflict(String),
    PayloadTooLarge,
    UnsupportedMediaType(String),
    InternalError(String),
}

impl From<FileNameError> for ApplicationError {
    fn from(error: FileNameError) -> Self {
        match error {
            FileNameError::Traversal(_) => ApplicationError::Forbidden(error.to_string()),
            _ => ApplicationError::BadRequest(error.to_string()),
        }
    }
}
