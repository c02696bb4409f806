use async_trait::async_trait;
use tokio::io::AsyncRead;

use crate::{
    application::error::ApplicationError,
    domain::models::{file::StoredFile, file_name::FileName},
};

pub type FileReader = Box<dyn AsyncRead + Send + Unpin>;

#[async_trait]
pub trait StorageService: Send + Sync {
    /// Streams `content` into storage under `name`. The file only becomes
    /// visible once fully written; an existing file is never replaced.
    async fn store(
        &self,
        name: &FileName,
        content: &mut (dyn AsyncRead + Send + Unpin),
    ) -> Result<StoredFile, ApplicationError>;
    async fn open(&self, name: &FileName) -> Result<(StoredFile, FileReader), ApplicationError>;
    async fn get_metadata(&self, name: &FileName) -> Result<StoredFile, ApplicationError>;
    async fn list(&self) -> Result<Vec<StoredFile>, ApplicationError>;
}
