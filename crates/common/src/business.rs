//! Uniform response envelope and business error codes.
//!
//! Every HTTP answer carries a `BaseResponse`; failures carry the numeric
//! code of the `ErrorCode` that produced them.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    Success,
    ParamsError,
    NotLoginError,
    NoAuthError,
    NotFoundError,
    ForbiddenError,
    SystemError,
    OperationError,
}

impl ErrorCode {
    /// Stable numeric code sent to clients
    pub fn code(&self) -> i32 {
        match self {
            ErrorCode::Success => 0,
            ErrorCode::ParamsError => 40000,
            ErrorCode::NotLoginError => 40100,
            ErrorCode::NoAuthError => 40101,
            ErrorCode::ForbiddenError => 40300,
            ErrorCode::NotFoundError => 40400,
            ErrorCode::SystemError => 50000,
            ErrorCode::OperationError => 50001,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            ErrorCode::Success => "ok",
            ErrorCode::ParamsError => "invalid request parameters",
            ErrorCode::NotLoginError => "not logged in",
            ErrorCode::NoAuthError => "no permission",
            ErrorCode::ForbiddenError => "access forbidden",
            ErrorCode::NotFoundError => "requested data not found",
            ErrorCode::SystemError => "internal system error",
            ErrorCode::OperationError => "operation failed",
        }
    }
}

/// Tagged error raised by request guards and mapped 1:1 onto the envelope.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{message} ({})", code.code())]
pub struct BusinessError {
    pub code: ErrorCode,
    pub message: String,
}

impl BusinessError {
    pub fn new(code: ErrorCode) -> Self {
        Self { code, message: code.message().to_string() }
    }

    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self { code, message: message.into() }
    }
}

impl From<ErrorCode> for BusinessError {
    fn from(code: ErrorCode) -> Self { Self::new(code) }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BaseResponse<T> {
    pub code: i32,
    pub data: Option<T>,
    pub message: String,
}

impl<T> BaseResponse<T> {
    pub fn success(data: T) -> Self {
        Self { code: ErrorCode::Success.code(), data: Some(data), message: ErrorCode::Success.message().to_string() }
    }

    /// Success with no payload (`"data": null`)
    pub fn empty() -> Self {
        Self { code: ErrorCode::Success.code(), data: None, message: ErrorCode::Success.message().to_string() }
    }

    pub fn error(err: &BusinessError) -> Self {
        Self { code: err.code.code(), data: None, message: err.message.clone() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_envelope_serializes_data() {
        let body = serde_json::to_value(BaseResponse::success(42_i64)).unwrap();
        assert_eq!(body["code"], 0);
        assert_eq!(body["data"], 42);
        assert_eq!(body["message"], "ok");
    }

    #[test]
    fn error_envelope_has_null_data() {
        let err = BusinessError::with_message(ErrorCode::ParamsError, "id must be positive");
        let body = serde_json::to_value(BaseResponse::<()>::error(&err)).unwrap();
        assert_eq!(body["code"], 40000);
        assert!(body["data"].is_null());
        assert_eq!(body["message"], "id must be positive");
    }

    #[test]
    fn default_message_comes_from_code() {
        let err = BusinessError::from(ErrorCode::NoAuthError);
        assert_eq!(err.message, "no permission");
        assert_eq!(err.to_string(), "no permission (40101)");
    }
}
