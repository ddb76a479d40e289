//! Service layer providing business-oriented operations on top of models.
//! - Separates business logic from data access through repository traits.
//! - Reuses validation and entity definitions in `models` crate.
//! - Resolves the login user behind a bearer token.

pub mod errors;
pub mod auth;
pub mod pagination;
pub mod interface_info;
pub mod db;
#[cfg(test)]
pub mod test_support;
