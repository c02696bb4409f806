use axum::{
    extract::{Path, State},
    http::HeaderMap,
    response::{Html, Response},
};

use crate::{
    adapters::{
        controllers::file_controller::FileController,
        error::{negotiate_error, PageError},
        state::AppState,
    },
    application::error::ApplicationError,
};

const INDEX_TEMPLATE: &str = include_str!("../../../templates/index.html");
const UPLOAD_TEMPLATE: &str = include_str!("../../../templates/upload.html");

pub struct PageController;

impl PageController {
    /// GET /
    pub async fn index(State(app_state): State<AppState>) -> Result<Html<String>, PageError> {
        let files = app_state.storage_service.list().await?;

        // Sanitized names never contain markup characters, so they are inserted as-is.
        let items = if files.is_empty() {
            "        <li>No files uploaded yet</li>".to_string()
        } else {
            files
                .iter()
                .map(|file| {
                    format!(
                        r#"        <li><a href="{}">{}</a> ({} bytes)</li>"#,
                        file.name.view_url(),
                        file.name,
                        file.size
                    )
                })
                .collect::<Vec<String>>()
                .join("\n")
        };

        Ok(Html(INDEX_TEMPLATE.replace("{{files}}", &items)))
    }

    /// GET /upload
    pub async fn upload_form() -> Html<&'static str> {
        Html(UPLOAD_TEMPLATE)
    }

    /// GET /uploads/{file_name}
    /// Same bytes as the API download; failures become an HTML page for browsers.
    pub async fn view_file(
        state: State<AppState>,
        path: Path<String>,
        headers: HeaderMap,
    ) -> Response {
        match FileController::download_file(state, path).await {
            Ok(response) => response,
            Err(e) => negotiate_error(e, &headers),
        }
    }

    pub async fn not_found(headers: HeaderMap) -> Response {
        negotiate_error(ApplicationError::NotFound, &headers)
    }
}
