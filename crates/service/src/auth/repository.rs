use async_trait::async_trait;

use super::domain::LoginUser;
use crate::errors::ServiceError;

/// Read access to user accounts.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Live (not soft-deleted) user by id
    async fn find_by_id(&self, id: i64) -> Result<Option<LoginUser>, ServiceError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockUserRepository {
        users: Mutex<HashMap<i64, LoginUser>>, // key: user id
    }

    impl MockUserRepository {
        pub fn with_users(users: impl IntoIterator<Item = LoginUser>) -> Self {
            Self { users: Mutex::new(users.into_iter().map(|u| (u.id, u)).collect()) }
        }

        pub fn remove(&self, id: i64) {
            self.users.lock().unwrap().remove(&id);
        }
    }

    #[async_trait]
    impl UserRepository for MockUserRepository {
        async fn find_by_id(&self, id: i64) -> Result<Option<LoginUser>, ServiceError> {
            let users = self.users.lock().unwrap();
            Ok(users.get(&id).cloned())
        }
    }
}
