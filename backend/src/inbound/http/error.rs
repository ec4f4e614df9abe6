//! HTTP rendering of domain errors.

use actix_web::http::header::{HeaderName, HeaderValue};
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;

use crate::domain::error::{Error, ErrorCode};
use crate::middleware::trace::TRACE_ID_HEADER;

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self.code {
            ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
            ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorCode::Forbidden => StatusCode::FORBIDDEN,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::Conflict => StatusCode::CONFLICT,
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        // Internal failure details stay in the logs; clients get the
        // trace id to quote instead.
        let message = if self.code == ErrorCode::InternalError {
            "Internal server error"
        } else {
            self.message.as_str()
        };
        let mut body = json!({
            "success": false,
            "error": message,
            "code": self.code,
        });
        if self.code != ErrorCode::InternalError {
            if let (Some(details), Some(object)) = (&self.details, body.as_object_mut()) {
                object.insert("details".into(), details.clone());
            }
        }
        let mut response = HttpResponse::build(self.status_code()).json(body);
        if let Some(trace_id) = &self.trace_id {
            if let Ok(value) = HeaderValue::from_str(trace_id) {
                response
                    .headers_mut()
                    .insert(HeaderName::from_static(TRACE_ID_HEADER), value);
            }
        }
        response
    }
}

/// Error body schema used in OpenAPI annotations.
#[derive(serde::Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Always `false` for error responses.
    pub success: bool,
    /// Human-readable description of the failure.
    pub error: String,
    /// Stable machine-readable code.
    pub code: ErrorCode,
}
