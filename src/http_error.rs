use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use sqlx::Error as SqlxError;
use validator::ValidationErrors;

/// Message returned when a blog's slug is already taken.
pub const DUPLICATE_BLOG: &str = "Already store this blog";

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<String>,
}

#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
    pub code: Option<String>,
}

impl AppError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into(), code: None }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message).with_code("not_found")
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message).with_code("bad_request")
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, message).with_code("validation_error")
    }

    pub fn duplicate_slug() -> Self {
        Self::new(StatusCode::CONFLICT, DUPLICATE_BLOG).with_code("duplicate_slug")
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message).with_code("internal_error")
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(status = %self.status, code = ?self.code, "{}", self.message);
        }
        let body = ErrorBody { success: false, message: self.message, code: self.code };
        (self.status, Json(body)).into_response()
    }
}

impl From<SqlxError> for AppError {
    fn from(e: SqlxError) -> Self {
        use sqlx::Error::*;
        match e {
            RowNotFound => AppError::not_found("Blog not found"),
            Database(db) => {
                match db.code().as_deref() {
                    Some("23505") => {
                        if let Some(cons) = db.constraint() {
                            if cons == "blogs_slug_key" || cons.contains("slug") {
                                return AppError::duplicate_slug();
                            }
                        }
                        AppError::new(StatusCode::CONFLICT, "duplicateKey").with_code("duplicate_key")
                    }
                    // invalid text representation, not-null and check violations
                    Some("22P02") | Some("23502") | Some("23514") => AppError::bad_request(db.message().to_string()),
                    _ => AppError::internal(db.message().to_string()),
                }
            }
            other => AppError::internal(other.to_string()),
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |err| match &err.message {
                    Some(msg) => msg.to_string(),
                    None => format!("{} is invalid ({})", field, err.code),
                })
            })
            .collect();
        messages.sort();
        AppError::validation(messages.join("; "))
    }
}
