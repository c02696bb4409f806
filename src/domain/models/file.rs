use std::time::SystemTime;

use chrono::{DateTime, Utc};

use crate::domain::models::file_name::FileName;

/// An uploaded artifact as it currently exists in the storage directory.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredFile {
    pub name: FileName,
    pub size: u64,
    pub content_type: String,
    pub uploaded_at: DateTime<Utc>,
}

impl StoredFile {
    pub fn new(name: FileName, size: u64, modified: SystemTime) -> Self {
        let content_type = name.content_type();
        Self {
            name,
            size,
            content_type,
            uploaded_at: DateTime::<Utc>::from(modified),
        }
    }

    pub fn content_disposition(&self) -> String {
        format!(
            "inline; filename*=UTF-8''{}",
            urlencoding::encode(self.name.as_str())
        )
    }
}
