//! Auth module: resolves the login user from a bearer token and answers role checks.
//!
//! Tokens are issued by the account service; here they are only verified.

pub mod domain;
pub mod repository;
pub mod service;
pub mod repo;

pub use service::AuthService;
