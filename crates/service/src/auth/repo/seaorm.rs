use sea_orm::DatabaseConnection;

use crate::auth::domain::LoginUser;
use crate::auth::repository::UserRepository;
use crate::errors::ServiceError;

pub struct SeaOrmUserRepository {
    pub db: DatabaseConnection,
}

#[async_trait::async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<LoginUser>, ServiceError> {
        let found = models::user::find_live_by_id(&self.db, id).await?;
        Ok(found.map(LoginUser::from))
    }
}
