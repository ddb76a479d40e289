use serde::{Deserialize, Serialize};

use models::user::{ROLE_ADMIN, ROLE_BAN};

/// JWT claims shared with the account service (HS256).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// account name
    pub sub: String,
    /// user id
    pub uid: i64,
    pub exp: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<usize>,
}

/// The authenticated caller
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LoginUser {
    pub id: i64,
    pub user_account: String,
    pub user_name: Option<String>,
    pub user_role: String,
}

impl LoginUser {
    /// Banned users never pass; admins pass every check.
    pub fn has_role(&self, must_role: &str) -> bool {
        if self.user_role == ROLE_BAN {
            return false;
        }
        if must_role.is_empty() || self.user_role == ROLE_ADMIN {
            return true;
        }
        self.user_role == must_role
    }

    pub fn is_admin(&self) -> bool { self.user_role == ROLE_ADMIN }
}

impl From<models::user::Model> for LoginUser {
    fn from(u: models::user::Model) -> Self {
        Self { id: u.id, user_account: u.user_account, user_name: u.user_name, user_role: u.user_role }
    }
}
