use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::get,
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::adapters::{
    controllers::{
        file_controller::FileController, health_controller::HealthController,
        page_controller::PageController,
    },
    state::AppState,
};

/// Room for multipart boundaries and small text fields on top of the file itself.
const MULTIPART_OVERHEAD_BYTES: u64 = 64 * 1024;

pub fn build_router(app_state: AppState) -> Router {
    let cors = match &app_state.config.cors_allowed_origins {
        Some(allowed_origins) => {
            let origins: Vec<HeaderValue> = allowed_origins
                .iter()
                .filter_map(|origin| origin.parse().ok())
                .collect();
            CorsLayer::new()
                .allow_origin(origins)
                .allow_methods(Any)
                .allow_headers(Any)
        }
        // Allow all origins if not specified
        None => CorsLayer::permissive(),
    };

    let body_limit = usize::try_from(
        app_state
            .config
            .max_upload_bytes
            .saturating_add(MULTIPART_OVERHEAD_BYTES),
    )
    .unwrap_or(usize::MAX);

    let api_routes = Router::new()
        .route("/api/v1/health", get(HealthController::health_check))
        .route(
            "/api/v1/files",
            get(FileController::list_files).post(FileController::upload_file),
        )
        .route(
            "/api/v1/files/{file_name}",
            get(FileController::get_file_metadata).put(FileController::upload_raw),
        )
        .route(
            "/api/v1/files/{file_name}/content",
            get(FileController::download_file),
        );

    let page_routes = Router::new()
        .route("/", get(PageController::index))
        .route(
            "/upload",
            get(PageController::upload_form).post(FileController::upload_form),
        )
        .route("/uploads/{file_name}", get(PageController::view_file));

    Router::new()
        .merge(api_routes)
        .merge(page_routes)
        .fallback(PageController::not_found)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}
