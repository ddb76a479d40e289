use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use common::{BusinessError, ErrorCode};
use service::auth::{domain::LoginUser, AuthService};
use service::interface_info::InterfaceInfoService;

use crate::errors::ApiError;

/// Cookie consulted when no Authorization header is sent
pub const AUTH_COOKIE: &str = "auth_token";

#[derive(Clone)]
pub struct ServerState {
    pub auth: Arc<AuthService>,
    pub interface_info: Arc<InterfaceInfoService>,
    /// role required on admin routes
    pub admin_role: String,
}

/// Read the token from `Authorization: Bearer` or, failing that, the `auth_token` cookie.
pub fn extract_token(headers: &HeaderMap) -> Result<String, ApiError> {
    if let Some(authz) = headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        return match authz.strip_prefix("Bearer ") {
            Some(t) if !t.trim().is_empty() => Ok(t.trim().to_string()),
            _ => {
                tracing::warn!("invalid Authorization format (expect Bearer)");
                Err(ErrorCode::NotLoginError.into())
            }
        };
    }
    let jar = CookieJar::from_headers(headers);
    match jar.get(AUTH_COOKIE).map(|c| c.value().to_string()) {
        Some(t) if !t.is_empty() => Ok(t),
        _ => Err(ErrorCode::NotLoginError.into()),
    }
}

/// Resolve the caller and require `state.admin_role`.
/// Missing or invalid token answers NOT_LOGIN, a role mismatch NO_AUTH.
/// The resolved `LoginUser` is stored in request extensions for handlers.
pub async fn require_admin(State(state): State<ServerState>, mut req: Request, next: Next) -> Result<Response, ApiError> {
    let path = req.uri().path().to_string();
    let token = extract_token(req.headers()).map_err(|e| {
        tracing::warn!(path = %path, "missing bearer token and auth_token cookie");
        e
    })?;
    let user = state.auth.login_user(&token).await?;
    if !user.has_role(&state.admin_role) {
        tracing::warn!(path = %path, user_id = user.id, role = %user.user_role, "role check failed");
        return Err(BusinessError::new(ErrorCode::NoAuthError).into());
    }
    req.extensions_mut().insert::<LoginUser>(user);
    Ok(next.run(req).await)
}
