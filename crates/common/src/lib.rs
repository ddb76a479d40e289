//! Shared building blocks: response envelope, guard clauses, logging setup.

pub mod business;
pub mod guard;
pub mod types;
pub mod utils;

pub use business::{BaseResponse, BusinessError, ErrorCode};
