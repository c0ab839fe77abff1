use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use thiserror::Error;
use tracing::error;

use clientbook_data::DataError;

/// Request-level failures. Validation failures are not represented here;
/// handlers recover from those locally by re-rendering the form.
#[derive(Error, Debug)]
pub enum WebError {
    #[error("{0}")]
    NotFound(String),

    #[error("template error: {0}")]
    Template(#[from] minijinja::Error),

    #[error(transparent)]
    Storage(DataError),
}

impl From<DataError> for WebError {
    fn from(e: DataError) -> Self {
        match e {
            DataError::NotFound { .. } => WebError::NotFound(e.to_string()),
            other => WebError::Storage(other),
        }
    }
}

const NOT_FOUND_PAGE: &str = "<!doctype html>\
<html><head><title>Not found</title></head>\
<body><h1>Not found</h1><p>The requested record does not exist.</p>\
<p><a href=\"/customers\">Back to customers</a></p></body></html>";

const FAILURE_PAGE: &str = "<!doctype html>\
<html><head><title>Something went wrong</title></head>\
<body><h1>Something went wrong</h1><p>The request could not be completed.</p></body></html>";

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        match self {
            WebError::NotFound(msg) => {
                tracing::debug!(reason = %msg, "request for missing record");
                (StatusCode::NOT_FOUND, Html(NOT_FOUND_PAGE)).into_response()
            }
            WebError::Template(e) => {
                error!(error = %e, "template rendering failed");
                (StatusCode::INTERNAL_SERVER_ERROR, Html(FAILURE_PAGE)).into_response()
            }
            WebError::Storage(e) => {
                error!(error = %e, "storage failure");
                (StatusCode::INTERNAL_SERVER_ERROR, Html(FAILURE_PAGE)).into_response()
            }
        }
    }
}
