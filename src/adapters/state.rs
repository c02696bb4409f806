use axum::extract::FromRef;
use std::sync::Arc;

use crate::{
    application::services::{StorageService, UploadPolicy},
    domain::config::server::ServerConfig,
};

#[derive(Clone, FromRef)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub upload_policy: Arc<UploadPolicy>,
    pub storage_service: Arc<dyn StorageService>,
}

impl AppState {
    pub fn new(config: ServerConfig, storage_service: Arc<dyn StorageService>) -> Self {
        Self {
            upload_policy: Arc::new(UploadPolicy::from_config(&config)),
            config: Arc::new(config),
            storage_service,
        }
    }
}
