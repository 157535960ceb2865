use crate::plivo::VoiceApiError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Errors surfaced by the JSON endpoints. Webhook endpoints never return
/// these, they always answer with an XML document.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid destination number: {0}")]
    InvalidDestination(String),
    #[error(transparent)]
    Vendor(#[from] VoiceApiError),
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidDestination(_) => StatusCode::BAD_REQUEST,
            ApiError::Vendor(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(json!({
            "status": "failed",
            "error": self.to_string(),
        }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let invalid = ApiError::InvalidDestination("abc".to_string());
        assert_eq!(invalid.status_code(), StatusCode::BAD_REQUEST);

        let vendor = ApiError::Vendor(VoiceApiError::Api {
            status: 401,
            detail: "unauthorized".to_string(),
        });
        assert_eq!(vendor.status_code(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_error_messages() {
        let invalid = ApiError::InvalidDestination("abc".to_string());
        assert_eq!(invalid.to_string(), "invalid destination number: abc");

        let vendor = ApiError::Vendor(VoiceApiError::Api {
            status: 400,
            detail: "bad to".to_string(),
        });
        assert!(vendor.to_string().contains("400"));
        assert!(vendor.to_string().contains("bad to"));
    }
}
