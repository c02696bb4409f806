use axum::{
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::{error, warn};

use crate::application::error::ApplicationError;

const ERROR_TEMPLATE: &str = include_str!("../../templates/error.html");

impl ApplicationError {
    /// Logs the error and returns the status and the message shown to clients.
    fn status_and_message(&self) -> (StatusCode, &'static str) {
        match self {
            ApplicationError::NotFound => {
                warn!("Resource not found");
                (StatusCode::NOT_FOUND, "Resource not found")
            }
            ApplicationError::BadRequest(msg) => {
                warn!("Bad request: {}", msg);
                (StatusCode::BAD_REQUEST, "Bad request")
            }
            ApplicationError::Forbidden(msg) => {
                warn!("Forbidden: {}", msg);
                (StatusCode::FORBIDDEN, "Access denied")
            }
            ApplicationError::Conflict(msg) => {
                warn!("Conflict: {}", msg);
                (StatusCode::CONFLICT, "File already exists")
            }
            ApplicationError::PayloadTooLarge => {
                warn!("File too large");
                (StatusCode::PAYLOAD_TOO_LARGE, "File too large")
            }
            ApplicationError::UnsupportedMediaType(msg) => {
                warn!("Unsupported media type: {}", msg);
                (StatusCode::UNSUPPORTED_MEDIA_TYPE, "File type not allowed")
            }
            ApplicationError::InternalError(msg) => {
                error!("Internal server error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        }
    }
}

impl IntoResponse for ApplicationError {
    fn into_response(self) -> Response {
        let (status, error_message) = self.status_and_message();

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

/// An [`ApplicationError`] rendered as an HTML page, for routes a browser navigates to.
pub struct PageError(pub ApplicationError);

impl From<ApplicationError> for PageError {
    fn from(error: ApplicationError) -> Self {
        Self(error)
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let (status, error_message) = self.0.status_and_message();

        let page = ERROR_TEMPLATE
            .replace("{{status}}", &status.to_string())
            .replace("{{message}}", error_message);

        (status, Html(page)).into_response()
    }
}

/// Renders the error as a page when the client asked for HTML, as JSON otherwise.
pub fn negotiate_error(error: ApplicationError, headers: &HeaderMap) -> Response {
    if accepts_html(headers) {
        PageError(error).into_response()
    } else {
        error.into_response()
    }
}

fn accepts_html(headers: &HeaderMap) -> bool {
    headers
        .get_all(header::ACCEPT)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .any(|value| value.contains("text/html"))
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn test_accepts_html_reads_browser_accept_header() {
        let mut headers = HeaderMap::new();
        assert!(!accepts_html(&headers));

        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        assert!(!accepts_html(&headers));

        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml;q=0.9,*/*;q=0.8"),
        );
        assert!(accepts_html(&headers));
    }

    #[test]
    fn test_page_error_keeps_status() {
        let response = PageError(ApplicationError::Forbidden("../x".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert!(response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with("text/html")));
    }
}
