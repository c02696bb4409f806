use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use sysinfo::System;
use tracing::{info, warn};

use crate::adapters::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub storage: StorageInfo,
    pub config: HealthConfigInfo,
    pub metrics: SystemMetrics,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StorageInfo {
    pub directory: String,
    /// `None` when the directory could not be read.
    #[serde(rename = "storedFiles")]
    pub stored_files: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SystemMetrics {
    #[serde(rename = "cpuUsagePercent")]
    pub cpu_usage_percent: f32,
    #[serde(rename = "memoryUsedBytes")]
    pub memory_used_bytes: u64,
    #[serde(rename = "memoryTotalBytes")]
    pub memory_total_bytes: u64,
    #[serde(rename = "memoryUsagePercent")]
    pub memory_usage_percent: f32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthConfigInfo {
    #[serde(rename = "maxUploadBytes")]
    pub max_upload_bytes: u64,
    #[serde(rename = "allowedExtensions")]
    pub allowed_extensions: Vec<String>,
}

pub struct HealthController;

impl HealthController {
    /// GET /api/v1/health
    pub async fn health_check(State(app_state): State<AppState>) -> Json<HealthResponse> {
        info!("Health check requested");

        let stored_files = match app_state.storage_service.list().await {
            Ok(files) => Some(files.len()),
            Err(e) => {
                warn!("Health check could not list storage: {:?}", e);
                None
            }
        };

        let status = if stored_files.is_some() {
            "healthy"
        } else {
            "degraded"
        };

        // Collect system metrics (only refresh what's needed)
        let mut sys = System::new();
        sys.refresh_cpu_usage();
        sys.refresh_memory();

        let memory_used = sys.used_memory();
        let memory_total = sys.total_memory();
        let memory_usage_percent = if memory_total > 0 {
            (memory_used as f32 / memory_total as f32) * 100.0
        } else {
            0.0
        };

        Json(HealthResponse {
            status: status.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            storage: StorageInfo {
                directory: app_state.config.storage_dir.display().to_string(),
                stored_files,
            },
            config: HealthConfigInfo {
                max_upload_bytes: app_state.config.max_upload_bytes,
                allowed_extensions: app_state.upload_policy.allowed_extensions(),
            },
            metrics: SystemMetrics {
                cpu_usage_percent: sys.global_cpu_usage(),
                memory_used_bytes: memory_used,
                memory_total_bytes: memory_total,
                memory_usage_percent,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use crate::test_utils::create_test_app;

    use super::*;

    #[tokio::test]
    async fn test_health_reports_storage_and_limits() {
        let app = create_test_app().await;
        std::fs::write(app.storage_root.join("one.txt"), b"1").unwrap();

        let response = app.server.get("/api/v1/health").await;
        response.assert_status(StatusCode::OK);

        let body: HealthResponse = response.json();
        assert_eq!(body.status, "healthy");
        assert_eq!(body.storage.stored_files, Some(1));
        assert_eq!(body.config.max_upload_bytes, 1024 * 1024);
        assert!(body.config.allowed_extensions.is_empty());
    }
}
