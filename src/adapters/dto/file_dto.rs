use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::models::file::StoredFile;

#[derive(Debug, Serialize, Deserialize)]
pub struct FileResponse {
    #[serde(rename = "fileName")]
    pub file_name: String,
    pub size: u64,
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    #[serde(rename = "uploadedAt")]
    pub uploaded_at: DateTime<Utc>,
    pub url: String,
}

impl From<StoredFile> for FileResponse {
    fn from(file: StoredFile) -> Self {
        Self {
            url: file.name.view_url(),
            file_name: file.name.to_string(),
            size: file.size,
            mime_type: file.content_type,
            uploaded_at: file.uploaded_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FileListResponse {
    pub count: usize,
    pub files: Vec<FileResponse>,
}

impl From<Vec<StoredFile>> for FileListResponse {
    fn from(files: Vec<StoredFile>) -> Self {
        let files: Vec<FileResponse> = files.into_iter().map(FileResponse::from).collect();
        Self {
            count: files.len(),
            files,
        }
    }
}
