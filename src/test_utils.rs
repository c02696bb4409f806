use std::path::PathBuf;

use axum_test::TestServer;
use tempfile::TempDir;

use crate::{
    adapters::{router::build_router, state::AppState},
    domain::config::server::ServerConfig,
    services::create_storage_service,
};

pub struct TestApp {
    pub server: TestServer,
    pub storage_root: PathBuf,
    /// Keeps the directory alive for the duration of the test.
    pub dir: TempDir,
}

impl TestApp {
    /// Sorted names of every entry in the storage directory, temporary files included.
    pub fn stored_entries(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(&self.storage_root)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

pub fn create_test_config(dir: &TempDir) -> ServerConfig {
    ServerConfig {
        storage_dir: dir.path().join("data").join("uploads"),
        max_upload_bytes: 1024 * 1024,
        ..ServerConfig::default()
    }
}

pub async fn create_test_app() -> TestApp {
    create_test_app_with(|_| {}).await
}

pub async fn create_test_app_with<F>(configure: F) -> TestApp
where
    F: FnOnce(&mut ServerConfig),
{
    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&dir);
    configure(&mut config);

    let storage_root = config.storage_dir.clone();
    let storage_service = create_storage_service(&config).await.unwrap();
    let server = TestServer::new(build_router(AppState::new(config, storage_service))).unwrap();

    TestApp {
        server,
        storage_root,
        dir,
    }
}
