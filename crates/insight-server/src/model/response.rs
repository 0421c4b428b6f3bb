//! HTTP response types for the Insight Manager server

use actix_web::{HttpResponse, HttpResponseBuilder, http::StatusCode};
use serde::{Deserialize, Serialize};

/// Error body returned by every failing endpoint
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ErrorResult {
    pub code: i32,
    pub error: String,
}

impl ErrorResult {
    pub fn new(code: i32, error: impl Into<String>) -> Self {
        ErrorResult {
            code,
            error: error.into(),
        }
    }

    pub fn http_response(status: u16, code: i32, error: impl Into<String>) -> HttpResponse {
        HttpResponseBuilder::new(
            StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        )
        .json(ErrorResult::new(code, error))
    }
}

/// Body of successful delete operations
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SuccessResult {
    pub success: bool,
}

impl SuccessResult {
    pub fn http_response() -> HttpResponse {
        HttpResponse::Ok().json(SuccessResult { success: true })
    }
}

/// Body of the image upload endpoint
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UploadResult {
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_result_shape() {
        let value = serde_json::to_value(ErrorResult::new(20002, "creationNumber out of range"))
            .unwrap();
        assert_eq!(
            value,
            serde_json::json!({"code": 20002, "error": "creationNumber out of range"})
        );
    }

    #[test]
    fn test_error_status_codes() {
        assert_eq!(
            ErrorResult::http_response(409, 20005, "duplicate").status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ErrorResult::http_response(42, 30000, "bad status").status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
