//! Maps `AppError` onto HTTP responses.
//!
//! Error bodies are always `{"error": "<message>"}`.

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, ResponseError};
use pb_core::error::AppError;
use thiserror::Error;

use crate::dto::ErrorResponse;

/// Wrapper that lets handlers return `pb_core` errors with `?`.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct ApiError(#[from] pub AppError);

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match &self.0 {
            AppError::NotFound(..) => StatusCode::NOT_FOUND,
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            // Duplicate usernames have always been reported as 400.
            AppError::Conflict(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match &self.0 {
            AppError::Internal(detail) => {
                log::error!("request failed: {detail}");
                "internal service error".to_string()
            }
            other => {
                log::info!("client error: {other}");
                other.to_string()
            }
        };
        HttpResponse::build(self.status_code()).json(ErrorResponse { error })
    }
}

/// Rejects unreadable JSON bodies with a 400 instead of actix's plain-text default.
pub(crate) fn json_error(err: actix_web::error::JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    ApiError(AppError::ValidationError(err.to_string())).into()
}

/// A path id that is not an integer can never match a row.
pub(crate) fn path_error(err: actix_web::error::PathError, req: &HttpRequest) -> actix_web::Error {
    log::debug!("unparseable path {}: {err}", req.path());
    let id = req.match_info().get("id").unwrap_or_default();
    ApiError(AppError::not_found("Resource", id)).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (AppError::not_found("Post", 1), StatusCode::NOT_FOUND),
            (AppError::ValidationError("x".into()), StatusCode::BAD_REQUEST),
            (AppError::Unauthorized("x".into()), StatusCode::UNAUTHORIZED),
            (AppError::Conflict("x".into()), StatusCode::BAD_REQUEST),
            (AppError::Internal("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError(err).status_code(), status);
        }
    }

    #[test]
    fn test_internal_detail_is_hidden() {
        let resp = ApiError(AppError::Internal("disk on fire".into())).error_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
