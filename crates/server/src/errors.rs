use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use common::{BaseResponse, BusinessError, ErrorCode};
use service::errors::ServiceError;
use thiserror::Error;
use tracing::{error, warn};

/// Handler error; always rendered as the `BaseResponse` envelope.
#[derive(Debug)]
pub struct ApiError(pub BusinessError);

impl ApiError {
    pub fn status(&self) -> StatusCode { status_for(self.0.code) }
}

/// HTTP status follows the error code family.
pub fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::Success => StatusCode::OK,
        ErrorCode::ParamsError => StatusCode::BAD_REQUEST,
        ErrorCode::NotLoginError => StatusCode::UNAUTHORIZED,
        ErrorCode::NoAuthError | ErrorCode::ForbiddenError => StatusCode::FORBIDDEN,
        ErrorCode::NotFoundError => StatusCode::NOT_FOUND,
        ErrorCode::SystemError | ErrorCode::OperationError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(code = self.0.code.code(), message = %self.0.message, "request failed");
        }
        (status, Json(BaseResponse::<()>::error(&self.0))).into_response()
    }
}

impl From<BusinessError> for ApiError {
    fn from(e: BusinessError) -> Self { ApiError(e) }
}

impl From<ErrorCode> for ApiError {
    fn from(code: ErrorCode) -> Self { ApiError(BusinessError::new(code)) }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self { ApiError(e.into()) }
}

impl From<JsonRejection> for ApiError {
    fn from(e: JsonRejection) -> Self {
        warn!(err = %e.body_text(), "malformed json body");
        ApiError(BusinessError::with_message(ErrorCode::ParamsError, e.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(e: QueryRejection) -> Self {
        warn!(err = %e.body_text(), "malformed query string");
        ApiError(BusinessError::with_message(ErrorCode::ParamsError, e.body_text()))
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("database unavailable: {0}")]
    Database(String),
}
