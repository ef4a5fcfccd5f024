//! Error type shared by every service.
//!
//! Handlers return `Result<HttpResponse, ServiceError>`; actix turns the error
//! into a plain-text response whose body is the user-facing notice.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use log::error;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Bad or missing form input.
    #[error("{0}")]
    Validation(String),

    #[error("No active HTML template found for topic '{0}'")]
    TemplateNotFound(String),

    #[error("Missing placeholder {0}")]
    MissingPlaceholder(String),

    #[error("Placeholder {name} cannot be formatted with '{spec}'")]
    InvalidFormat { name: String, spec: String },

    /// Unknown template, report or saved query id.
    #[error("{0}")]
    NotFound(String),

    /// The filters matched no movies.
    #[error("{0}")]
    NoData(String),

    #[error("Import failed: {0}")]
    Import(String),

    #[error("Upload failed: {0}")]
    Upload(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::Validation(_)
            | ServiceError::InvalidFormat { .. }
            | ServiceError::Import(_)
            | ServiceError::Upload(_) => StatusCode::BAD_REQUEST,
            ServiceError::TemplateNotFound(_)
            | ServiceError::NotFound(_)
            | ServiceError::NoData(_) => StatusCode::NOT_FOUND,
            ServiceError::MissingPlaceholder(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ServiceError::Database(_) | ServiceError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            error!("{}", self);
        }
        HttpResponse::build(status)
            .content_type("text/plain; charset=utf-8")
            .body(self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_failures_map_to_not_found() {
        assert_eq!(
            ServiceError::TemplateNotFound("hidden_gems".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ServiceError::NotFound("The query does not exist.".into()).status_code(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn missing_placeholder_names_the_key() {
        let err = ServiceError::MissingPlaceholder("b".into());
        assert_eq!(err.to_string(), "Missing placeholder b");
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn store_errors_are_server_errors() {
        let err = ServiceError::from(rusqlite::Error::InvalidQuery);
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
