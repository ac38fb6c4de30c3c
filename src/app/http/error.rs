use crate::core::report::ReportError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

impl ResponseError for ReportError {
    fn status_code(&self) -> StatusCode {
        match self {
            ReportError::NoFilePart
            | ReportError::NoSelectedFile
            | ReportError::UnsupportedFormat(_)
            | ReportError::InvalidTargetAcos(_)
            | ReportError::Multipart(_) => StatusCode::BAD_REQUEST,
            ReportError::TooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            ReportError::MissingColumns(_) | ReportError::Unreadable(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        error_body(self.status_code(), &self.to_string())
    }
}

/// Any failure out of a handler. Report errors keep their own status,
/// everything else is a 500.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct ApiError(#[from] anyhow::Error);

impl From<ReportError> for ApiError {
    fn from(err: ReportError) -> Self {
        ApiError(err.into())
    }
}

impl ApiError {
    pub fn report_error(&self) -> Option<&ReportError> {
        self.0.downcast_ref::<ReportError>()
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self.report_error() {
            Some(err) => err.status_code(),
            None => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        error_body(self.status_code(), &self.to_string())
    }
}

fn error_body(status: StatusCode, message: &str) -> HttpResponse {
    HttpResponse::build(status).json(json!({ "error": message }))
}
