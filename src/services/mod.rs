mod error;
mod local_storage;

pub use error::StorageError;
pub use local_storage::LocalStorageService;

use std::sync::Arc;

use crate::{application::services::StorageService, domain::config::server::ServerConfig};

pub async fn create_storage_service(
    config: &ServerConfig,
) -> Result<Arc<dyn StorageService>, StorageError> {
    let service = LocalStorageService::new(&config.storage_dir, config.max_upload_bytes).await?;
    tracing::info!("Storing uploads in {}", service.root().display());
    Ok(Arc::new(service))
}
