//! Error types and error codes for Insight Manager
//!
//! This module defines:
//! - `InsightError`: Application-specific error enum
//! - `ErrorCode`: Structured error codes for API responses

use serde::{Deserialize, Serialize};

/// Application-specific error types
#[derive(thiserror::Error, Debug)]
pub enum InsightError {
    #[error("{0}")]
    Validation(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Auth(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl InsightError {
    pub fn validation(message: impl Into<String>) -> Self {
        InsightError::Validation(message.into())
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        InsightError::NotFound(what.into())
    }
}

/// Error code structure for API responses
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ErrorCode<'a> {
    pub code: i32,
    pub message: &'a str,
}

pub const SUCCESS: ErrorCode<'static> = ErrorCode {
    code: 0,
    message: "success",
};

pub const PARAMETER_MISSING: ErrorCode<'static> = ErrorCode {
    code: 10000,
    message: "parameter missing",
};

pub const ACCESS_DENIED: ErrorCode<'static> = ErrorCode {
    code: 10001,
    message: "access denied",
};

pub const DATA_ACCESS_ERROR: ErrorCode<'static> = ErrorCode {
    code: 10002,
    message: "data access error",
};

pub const AUTHENTICATION_FAILED: ErrorCode<'static> = ErrorCode {
    code: 10003,
    message: "authentication failed",
};

pub const PARAMETER_VALIDATE_ERROR: ErrorCode<'static> = ErrorCode {
    code: 20002,
    message: "parameter validate error",
};

pub const MEDIA_TYPE_ERROR: ErrorCode<'static> = ErrorCode {
    code: 20003,
    message: "MediaType Error",
};

pub const RESOURCE_NOT_FOUND: ErrorCode<'static> = ErrorCode {
    code: 20004,
    message: "resource not found",
};

pub const RESOURCE_CONFLICT: ErrorCode<'static> = ErrorCode {
    code: 20005,
    message: "resource conflict",
};

pub const OVER_MAX_SIZE: ErrorCode<'static> = ErrorCode {
    code: 20006,
    message: "file size is over limit",
};

pub const SERVER_ERROR: ErrorCode<'static> = ErrorCode {
    code: 30000,
    message: "server error",
};

// Import/Export error codes
pub const IMPORT_FILE_EMPTY: ErrorCode<'static> = ErrorCode {
    code: 100010,
    message: "Import file is empty",
};

pub const IMPORT_FILE_INVALID: ErrorCode<'static> = ErrorCode {
    code: 100011,
    message: "Import file format is invalid",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insight_error_display() {
        let err = InsightError::validation("creationNumber out of range");
        assert_eq!(format!("{}", err), "creationNumber out of range");

        let err = InsightError::not_found("insight 42");
        assert_eq!(format!("{}", err), "insight 42 not found");

        let err = InsightError::Storage("connection refused".to_string());
        assert_eq!(format!("{}", err), "storage error: connection refused");
    }

    #[test]
    fn test_error_code_constants() {
        assert_eq!(SUCCESS.code, 0);
        assert_eq!(SUCCESS.message, "success");
        assert_eq!(ACCESS_DENIED.code, 10001);
        assert_eq!(PARAMETER_VALIDATE_ERROR.code, 20002);
        assert_eq!(RESOURCE_NOT_FOUND.code, 20004);
        assert_eq!(RESOURCE_CONFLICT.code, 20005);
        assert_eq!(IMPORT_FILE_EMPTY.code, 100010);
    }
}
