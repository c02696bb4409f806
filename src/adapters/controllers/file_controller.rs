use std::io;

use axum::{
    body::Body,
    extract::{multipart::MultipartError, Multipart, Path, State},
    http::{header, HeaderName, StatusCode},
    response::{Redirect, Response},
    Json,
};
use futures::TryStreamExt;
use tokio_util::io::{ReaderStream, StreamReader};
use tracing::{info, warn};

use crate::{
    adapters::{
        dto::file_dto::{FileListResponse, FileResponse},
        error::PageError,
        state::AppState,
    },
    application::error::ApplicationError,
    domain::models::{file::StoredFile, file_name::FileName},
};

type CreatedResponse = (StatusCode, [(HeaderName, String); 1], Json<FileResponse>);

pub struct FileController;

impl FileController {
    /// POST /api/v1/files
    /// multipart/form-data with a `file` part; an optional `filename` text
    /// field sent before it overrides the part's own file name.
    pub async fn upload_file(
        State(app_state): State<AppState>,
        mut multipart: Multipart,
    ) -> Result<CreatedResponse, ApplicationError> {
        let stored = Self::store_multipart(&app_state, &mut multipart).await?;
        Ok(created(stored))
    }

    /// PUT /api/v1/files/{file_name}
    /// The raw request body is the file content.
    pub async fn upload_raw(
        State(app_state): State<AppState>,
        Path(file_name): Path<String>,
        body: Body,
    ) -> Result<CreatedResponse, ApplicationError> {
        let name = app_state.upload_policy.admit(&file_name)?;

        let stream = body.into_data_stream().map_err(io::Error::other);
        let mut reader = Box::pin(StreamReader::new(stream));

        let stored = app_state.storage_service.store(&name, &mut reader).await?;
        info!("Stored {} ({} bytes) from raw upload", stored.name, stored.size);

        Ok(created(stored))
    }

    /// POST /upload
    /// Browser form variant of [`FileController::upload_file`].
    pub async fn upload_form(
        State(app_state): State<AppState>,
        mut multipart: Multipart,
    ) -> Result<Redirect, PageError> {
        Self::store_multipart(&app_state, &mut multipart).await?;
        Ok(Redirect::to("/"))
    }

    /// GET /api/v1/files/{file_name}/content, also behind GET /uploads/{file_name}
    pub async fn download_file(
        State(app_state): State<AppState>,
        Path(file_name): Path<String>,
    ) -> Result<Response, ApplicationError> {
        let name = FileName::parse(&file_name)?;
        let (stored, reader) = app_state.storage_service.open(&name).await?;

        info!("Serving {} ({} bytes)", stored.name, stored.size);

        Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, stored.content_type.as_str())
            .header(header::CONTENT_LENGTH, stored.size)
            .header(header::CONTENT_DISPOSITION, stored.content_disposition())
            .header(header::X_CONTENT_TYPE_OPTIONS, "nosniff")
            .body(Body::from_stream(ReaderStream::new(reader)))
            .map_err(|e| ApplicationError::InternalError(format!("Cannot build response: {}", e)))
    }

    /// GET /api/v1/files/{file_name}
    pub async fn get_file_metadata(
        State(app_state): State<AppState>,
        Path(file_name): Path<String>,
    ) -> Result<Json<FileResponse>, ApplicationError> {
        let name = FileName::parse(&file_name)?;
        let stored = app_state.storage_service.get_metadata(&name).await?;
        Ok(Json(FileResponse::from(stored)))
    }

    /// GET /api/v1/files
    pub async fn list_files(
        State(app_state): State<AppState>,
    ) -> Result<Json<FileListResponse>, ApplicationError> {
        let files = app_state.storage_service.list().await?;
        Ok(Json(FileListResponse::from(files)))
    }

    async fn store_multipart(
        app_state: &AppState,
        multipart: &mut Multipart,
    ) -> Result<StoredFile, ApplicationError> {
        let mut declared_name: Option<String> = None;

        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            let field_name = field.name().unwrap_or("").to_string();

            match field_name.as_str() {
                "filename" => {
                    declared_name = Some(field.text().await.map_err(multipart_error)?);
                }
                "file" => {
                    let raw_name = declared_name
                        .take()
                        .or_else(|| field.file_name().map(str::to_string))
                        .ok_or_else(|| {
                            warn!("Upload part carries no file name");
                            ApplicationError::BadRequest("Missing file name".to_string())
                        })?;
                    let name = app_state.upload_policy.admit(&raw_name)?;

                    let stream = field.map_err(io::Error::other);
                    let mut reader = Box::pin(StreamReader::new(stream));

                    let stored = app_state.storage_service.store(&name, &mut reader).await?;
                    info!("Stored {} ({} bytes)", stored.name, stored.size);

                    return Ok(stored);
                }
                _ => {}
            }
        }

        warn!("Missing required 'file' field in upload");
        Err(ApplicationError::BadRequest(
            "Missing required field".to_string(),
        ))
    }
}

fn created(stored: StoredFile) -> CreatedResponse {
    let location = stored.name.view_url();
    (
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(FileResponse::from(stored)),
    )
}

fn multipart_error(error: MultipartError) -> ApplicationError {
    if error.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return ApplicationError::PayloadTooLarge;
    }
    ApplicationError::BadRequest(format!("Invalid multipart data: {}", error))
}
