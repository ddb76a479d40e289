use std::sync::Arc;

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use tracing::{debug, instrument, warn};

use super::domain::{Claims, LoginUser};
use super::repository::UserRepository;
use crate::errors::ServiceError;

/// Auth service configuration
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
}

/// Resolves callers independent of web framework
pub struct AuthService {
    repo: Arc<dyn UserRepository>,
    cfg: AuthConfig,
}

impl AuthService {
    pub fn new(repo: Arc<dyn UserRepository>, cfg: AuthConfig) -> Self { Self { repo, cfg } }

    /// Verify signature and expiry of an HS256 token.
    pub fn decode_token(&self, token: &str) -> Result<Claims, ServiceError> {
        let key = DecodingKey::from_secret(self.cfg.jwt_secret.as_bytes());
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        decode::<Claims>(token, &key, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                warn!(err = %e, "token validation failed");
                ServiceError::Unauthorized(e.to_string())
            })
    }

    /// Resolve the login user behind a token.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use jsonwebtoken::{encode, EncodingKey, Header};
    /// use service::auth::{service::{AuthService, AuthConfig}, repository::mock::MockUserRepository, domain::{Claims, LoginUser}};
    /// let user = LoginUser { id: 7, user_account: "keypoint".into(), user_name: None, user_role: "admin".into() };
    /// let repo = Arc::new(MockUserRepository::with_users([user.clone()]));
    /// let svc = AuthService::new(repo, AuthConfig { jwt_secret: "secret".into() });
    /// let exp = (chrono::Utc::now() + chrono::Duration::hours(1)).timestamp() as usize;
    /// let claims = Claims { sub: "keypoint".into(), uid: 7, exp, iat: None };
    /// let token = encode(&Header::default(), &claims, &EncodingKey::from_secret(b"secret")).unwrap();
    /// let found = tokio_test::block_on(svc.login_user(&token)).unwrap();
    /// assert_eq!(found, user);
    /// ```
    #[instrument(skip(self, token))]
    pub async fn login_user(&self, token: &str) -> Result<LoginUser, ServiceError> {
        let claims = self.decode_token(token)?;
        let user = self.repo.find_by_id(claims.uid).await?.ok_or_else(|| {
            warn!(uid = claims.uid, "token refers to unknown or deleted user");
            ServiceError::Unauthorized("user not found".into())
        })?;
        debug!(user_id = user.id, role = %user.user_role, "login user resolved");
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::repository::mock::MockUserRepository;
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn token(secret: &str, uid: i64, exp_offset_secs: i64) -> String {
        let exp = (chrono::Utc::now().timestamp() + exp_offset_secs) as usize;
        let claims = Claims { sub: "acct".into(), uid, exp, iat: None };
        encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes())).unwrap()
    }

    fn svc(repo: Arc<MockUserRepository>) -> AuthService {
        AuthService::new(repo, AuthConfig { jwt_secret: "test-secret".into() })
    }

    fn admin() -> LoginUser {
        LoginUser { id: 1, user_account: "admin".into(), user_name: Some("Admin".into()), user_role: "admin".into() }
    }

    #[tokio::test]
    async fn resolves_existing_user() {
        let svc = svc(Arc::new(MockUserRepository::with_users([admin()])));
        let user = svc.login_user(&token("test-secret", 1, 3600)).await.unwrap();
        assert_eq!(user.id, 1);
        assert!(user.is_admin());
    }

    #[tokio::test]
    async fn rejects_wrong_secret() {
        let svc = svc(Arc::new(MockUserRepository::with_users([admin()])));
        let err = svc.login_user(&token("other-secret", 1, 3600)).await.unwrap_err();
        assert!(matches!(err, ServiceError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn rejects_expired_token() {
        let svc = svc(Arc::new(MockUserRepository::with_users([admin()])));
        let err = svc.login_user(&token("test-secret", 1, -600)).await.unwrap_err();
        assert!(matches!(err, ServiceError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn rejects_removed_user() {
        let repo = Arc::new(MockUserRepository::with_users([admin()]));
        let svc = svc(repo.clone());
        repo.remove(1);
        let err = svc.login_user(&token("test-secret", 1, 3600)).await.unwrap_err();
        assert!(matches!(err, ServiceError::Unauthorized(_)));
    }

    #[test]
    fn garbage_token_is_unauthorized() {
        let svc = svc(Arc::new(MockUserRepository::default()));
        assert!(matches!(svc.decode_token("not-a-jwt"), Err(ServiceError::Unauthorized(_))));
    }
}
