use sea_orm::{entity::prelude::*, Set, DatabaseConnection};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors;

pub const ROLE_USER: &str = "user";
pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_BAN: &str = "ban";

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_account: String,
    pub user_name: Option<String>,
    pub user_role: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    pub deleted_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_role(role: &str) -> Result<(), errors::ModelError> {
    if ![ROLE_USER, ROLE_ADMIN, ROLE_BAN].contains(&role) {
        return Err(errors::ModelError::Validation(format!("unknown role {role}")));
    }
    Ok(())
}

/// Insert an account row. Accounts are normally provisioned by the account
/// service; this is used by seeding and tests.
pub async fn create(db: &DatabaseConnection, user_account: &str, user_name: Option<&str>, user_role: &str) -> Result<Model, errors::ModelError> {
    if user_account.trim().len() < 4 { return Err(errors::ModelError::Validation("user_account too short (>=4)".into())); }
    validate_role(user_role)?;
    let now = Utc::now().into();
    let am = ActiveModel {
        user_account: Set(user_account.to_string()),
        user_name: Set(user_name.map(str::to_string)),
        user_role: Set(user_role.to_string()),
        created_at: Set(now),
        updated_at: Set(now),
        deleted_at: Set(None),
        ..Default::default()
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

pub async fn find_live_by_id(db: &DatabaseConnection, id: i64) -> Result<Option<Model>, errors::ModelError> {
    Entity::find_by_id(id)
        .filter(Column::DeletedAt.is_null())
        .one(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))
}

pub async fn hard_delete(db: &DatabaseConnection, id: i64) -> Result<(), errors::ModelError> {
    Entity::delete_by_id(id).exec(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))?;
    Ok(())
}
