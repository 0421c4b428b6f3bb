// Error handling for the HTTP boundary
// Domain errors travel as anyhow::Error and are mapped to status codes here

use std::fmt::{Display, Formatter};

use actix_web::{HttpResponse, http::StatusCode};

pub use insight_common::error::{
    ACCESS_DENIED, AUTHENTICATION_FAILED, DATA_ACCESS_ERROR, IMPORT_FILE_EMPTY,
    IMPORT_FILE_INVALID, MEDIA_TYPE_ERROR, OVER_MAX_SIZE, PARAMETER_MISSING,
    PARAMETER_VALIDATE_ERROR, RESOURCE_CONFLICT, RESOURCE_NOT_FOUND, SERVER_ERROR,
};
pub use insight_common::{ErrorCode, InsightError};
use insight_core::TranscodeError;

use crate::model::response::ErrorResult;

/// Failures while reading an uploaded file
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FileError {
    #[error("no file uploaded")]
    Missing,

    #[error("file too large")]
    TooLarge,

    #[error("unsupported file type: {0}")]
    UnsupportedType(String),

    #[error("malformed multipart body: {0}")]
    Malformed(String),
}

// Local wrapper so actix's ResponseError can be implemented for anyhow errors
#[derive(Debug)]
pub struct AppError {
    inner: anyhow::Error,
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(value: anyhow::Error) -> Self {
        AppError { inner: value }
    }
}

impl From<InsightError> for AppError {
    fn from(value: InsightError) -> Self {
        AppError {
            inner: value.into(),
        }
    }
}

impl From<FileError> for AppError {
    fn from(value: FileError) -> Self {
        AppError {
            inner: value.into(),
        }
    }
}

impl AppError {
    pub fn downcast_ref<E: std::error::Error + Send + Sync + 'static>(&self) -> Option<&E> {
        self.inner.downcast_ref::<E>()
    }

    /// HTTP status and error code for the wrapped error
    fn classify(&self) -> (StatusCode, i32) {
        if let Some(e) = self.downcast_ref::<InsightError>() {
            return match e {
                InsightError::Validation(_) => {
                    (StatusCode::BAD_REQUEST, PARAMETER_VALIDATE_ERROR.code)
                }
                InsightError::NotFound(_) => (StatusCode::NOT_FOUND, RESOURCE_NOT_FOUND.code),
                InsightError::Conflict(_) => (StatusCode::CONFLICT, RESOURCE_CONFLICT.code),
                InsightError::Auth(_) => (StatusCode::UNAUTHORIZED, AUTHENTICATION_FAILED.code),
                InsightError::Forbidden(_) => (StatusCode::FORBIDDEN, ACCESS_DENIED.code),
                InsightError::Storage(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, DATA_ACCESS_ERROR.code)
                }
                InsightError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, SERVER_ERROR.code),
            };
        }

        if let Some(e) = self.downcast_ref::<TranscodeError>() {
            return match e {
                TranscodeError::Empty => (StatusCode::BAD_REQUEST, IMPORT_FILE_EMPTY.code),
                TranscodeError::Invalid(_) => (StatusCode::BAD_REQUEST, IMPORT_FILE_INVALID.code),
            };
        }

        if let Some(e) = self.downcast_ref::<FileError>() {
            return match e {
                FileError::Missing => (StatusCode::BAD_REQUEST, PARAMETER_MISSING.code),
                FileError::TooLarge => (StatusCode::PAYLOAD_TOO_LARGE, OVER_MAX_SIZE.code),
                FileError::UnsupportedType(_) => {
                    (StatusCode::UNSUPPORTED_MEDIA_TYPE, MEDIA_TYPE_ERROR.code)
                }
                FileError::Malformed(_) => (StatusCode::BAD_REQUEST, PARAMETER_VALIDATE_ERROR.code),
            };
        }

        if self.downcast_ref::<sea_orm::DbErr>().is_some() {
            return (StatusCode::INTERNAL_SERVER_ERROR, DATA_ACCESS_ERROR.code);
        }

        (StatusCode::INTERNAL_SERVER_ERROR, SERVER_ERROR.code)
    }
}

impl actix_web::error::ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.classify().0
    }

    fn error_response(&self) -> HttpResponse {
        let (status, code) = self.classify();

        let message = if self.downcast_ref::<sea_orm::DbErr>().is_some() {
            InsightError::Storage(self.inner.to_string()).to_string()
        } else {
            self.inner.to_string()
        };

        if status.is_server_error() {
            tracing::error!(code, error = %self.inner, "Request failed");
        }

        ErrorResult::http_response(status.as_u16(), code, message)
    }
}
