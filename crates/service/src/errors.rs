use common::{BusinessError, ErrorCode};
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    #[error("database error: {0}")]
    Db(String),
    #[error("model error: {0}")]
    Model(#[from] models::errors::ModelError),
    #[error(transparent)]
    Business(#[from] BusinessError),
}

impl From<sea_orm::DbErr> for ServiceError {
    fn from(e: sea_orm::DbErr) -> Self { Self::Db(e.to_string()) }
}

/// Map onto the client-facing error. Storage details are logged, not returned.
impl From<ServiceError> for BusinessError {
    fn from(e: ServiceError) -> Self {
        use models::errors::ModelError;
        match e {
            ServiceError::Validation(msg) | ServiceError::Model(ModelError::Validation(msg)) => {
                BusinessError::with_message(ErrorCode::ParamsError, msg)
            }
            ServiceError::Unauthorized(_) => BusinessError::new(ErrorCode::NotLoginError),
            ServiceError::Db(msg) | ServiceError::Model(ModelError::Db(msg)) => {
                error!(err = %msg, "storage failure");
                BusinessError::new(ErrorCode::SystemError)
            }
            ServiceError::Business(b) => b,
        }
    }
}
