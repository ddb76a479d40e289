use sea_orm::{entity::prelude::*, sea_query::Expr, DatabaseConnection, Select, Set};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors;

pub const NAME_MAX_CHARS: usize = 50;
/// Column widths of `interface_info`, in characters
pub const URL_MAX_CHARS: usize = 512;
pub const RETURN_FORMAT_MAX_CHARS: usize = 64;
pub const AVATAR_URL_MAX_CHARS: usize = 1024;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "interface_info")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub url: String,
    pub method: String,
    pub request_params: Option<String>,
    pub request_example: Option<String>,
    pub request_header: Option<String>,
    pub response_header: Option<String>,
    pub return_format: Option<String>,
    pub avatar_url: Option<String>,
    pub reduce_score: i64,
    pub total_invokes: i64,
    pub status: i32,
    pub user_id: i64,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    #[serde(skip_serializing)]
    pub deleted_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Publication state stored in `interface_info.status`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InterfaceStatus {
    Offline,
    Online,
}

impl InterfaceStatus {
    pub fn value(self) -> i32 {
        match self {
            InterfaceStatus::Offline => 0,
            InterfaceStatus::Online => 1,
        }
    }
}

impl TryFrom<i32> for InterfaceStatus {
    type Error = errors::ModelError;

    fn try_from(v: i32) -> Result<Self, Self::Error> {
        match v {
            0 => Ok(InterfaceStatus::Offline),
            1 => Ok(InterfaceStatus::Online),
            other => Err(errors::ModelError::Validation(format!("unknown interface status {other}"))),
        }
    }
}

/// Fields accepted when registering a new interface.
#[derive(Clone, Debug, Default)]
pub struct NewInterfaceInfo {
    pub name: String,
    pub description: Option<String>,
    pub url: String,
    pub method: String,
    pub request_params: Option<String>,
    pub request_example: Option<String>,
    pub request_header: Option<String>,
    pub response_header: Option<String>,
    pub return_format: Option<String>,
    pub avatar_url: Option<String>,
    pub reduce_score: i64,
    pub user_id: i64,
}

pub fn validate_name(name: &str) -> Result<(), errors::ModelError> {
    if name.trim().is_empty() {
        return Err(errors::ModelError::Validation("name required".into()));
    }
    if name.chars().count() > NAME_MAX_CHARS {
        return Err(errors::ModelError::Validation(format!("name longer than {NAME_MAX_CHARS} characters")));
    }
    Ok(())
}

fn check_max_chars(field: &str, value: &str, max: usize) -> Result<(), errors::ModelError> {
    if value.chars().count() > max {
        return Err(errors::ModelError::Validation(format!("{field} longer than {max} characters")));
    }
    Ok(())
}

pub fn validate_url(u: &str) -> Result<(), errors::ModelError> {
    if !(u.starts_with("http://") || u.starts_with("https://")) {
        return Err(errors::ModelError::Validation("url must start with http(s)".into()));
    }
    check_max_chars("url", u, URL_MAX_CHARS)
}

pub fn validate_return_format(f: &str) -> Result<(), errors::ModelError> {
    check_max_chars("returnFormat", f, RETURN_FORMAT_MAX_CHARS)
}

pub fn validate_avatar_url(u: &str) -> Result<(), errors::ModelError> {
    check_max_chars("avatarUrl", u, AVATAR_URL_MAX_CHARS)
}

pub fn validate_method(m: &str) -> Result<String, errors::ModelError> {
    let up = m.trim().to_ascii_uppercase();
    let valid = ["GET","POST","PUT","DELETE","PATCH","HEAD","OPTIONS"];
    if !valid.contains(&up.as_str()) {
        return Err(errors::ModelError::Validation("invalid HTTP method".into()));
    }
    Ok(up)
}

pub fn validate_reduce_score(score: i64) -> Result<(), errors::ModelError> {
    if score < 0 {
        return Err(errors::ModelError::Validation("reduce_score must be >= 0".into()));
    }
    Ok(())
}

/// Rows that have not been soft-deleted.
pub fn find_live() -> Select<Entity> {
    Entity::find().filter(Column::DeletedAt.is_null())
}

pub async fn create(db: &DatabaseConnection, input: NewInterfaceInfo) -> Result<Model, errors::ModelError> {
    validate_name(&input.name)?;
    validate_url(&input.url)?;
    let method = validate_method(&input.method)?;
    validate_reduce_score(input.reduce_score)?;
    if let Some(f) = &input.return_format { validate_return_format(f)?; }
    if let Some(u) = &input.avatar_url { validate_avatar_url(u)?; }

    let now = Utc::now().into();
    let am = ActiveModel {
        name: Set(input.name),
        description: Set(input.description),
        url: Set(input.url),
        method: Set(method),
        request_params: Set(input.request_params),
        request_example: Set(input.request_example),
        request_header: Set(input.request_header),
        response_header: Set(input.response_header),
        return_format: Set(input.return_format),
        avatar_url: Set(input.avatar_url),
        reduce_score: Set(input.reduce_score),
        total_invokes: Set(0),
        status: Set(InterfaceStatus::Offline.value()),
        user_id: Set(input.user_id),
        created_at: Set(now),
        updated_at: Set(now),
        deleted_at: Set(None),
        ..Default::default()
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

/// Returns false when no live row has this id.
pub async fn set_status(db: &DatabaseConnection, id: i64, status: InterfaceStatus) -> Result<bool, errors::ModelError> {
    let Some(found) = find_live()
        .filter(Column::Id.eq(id))
        .one(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))?
    else {
        return Ok(false);
    };
    let mut am: ActiveModel = found.into();
    am.status = Set(status.value());
    am.updated_at = Set(Utc::now().into());
    am.update(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))?;
    Ok(true)
}

pub async fn soft_delete(db: &DatabaseConnection, id: i64) -> Result<bool, errors::ModelError> {
    let now: DateTimeWithTimeZone = Utc::now().into();
    let res = Entity::update_many()
        .col_expr(Column::DeletedAt, Expr::value(now))
        .col_expr(Column::UpdatedAt, Expr::value(now))
        .filter(Column::Id.eq(id))
        .filter(Column::DeletedAt.is_null())
        .exec(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))?;
    Ok(res.rows_affected > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_is_normalized() {
        assert_eq!(validate_method(" get ").unwrap(), "GET");
        assert!(validate_method("FETCH").is_err());
    }

    #[test]
    fn name_rules() {
        assert!(validate_name("weather").is_ok());
        assert!(validate_name("   ").is_err());
        assert!(validate_name(&"x".repeat(NAME_MAX_CHARS)).is_ok());
        assert!(validate_name(&"x".repeat(NAME_MAX_CHARS + 1)).is_err());
        // counted in characters, not bytes
        assert!(validate_name(&"接".repeat(NAME_MAX_CHARS)).is_ok());
    }

    #[test]
    fn url_and_score_rules() {
        assert!(validate_url("https://api.example.com/weather").is_ok());
        assert!(validate_url("ftp://api.example.com").is_err());
        assert!(validate_reduce_score(0).is_ok());
        assert!(validate_reduce_score(-1).is_err());
    }

    #[test]
    fn lengths_fit_columns() {
        let url = |len: usize| format!("https://{}", "a".repeat(len - "https://".len()));
        assert!(validate_url(&url(URL_MAX_CHARS)).is_ok());
        assert!(validate_url(&url(URL_MAX_CHARS + 1)).is_err());
        assert!(validate_return_format(&"j".repeat(RETURN_FORMAT_MAX_CHARS)).is_ok());
        assert!(validate_return_format(&"j".repeat(RETURN_FORMAT_MAX_CHARS + 1)).is_err());
        assert!(validate_avatar_url(&"a".repeat(AVATAR_URL_MAX_CHARS)).is_ok());
        assert!(validate_avatar_url(&"a".repeat(AVATAR_URL_MAX_CHARS + 1)).is_err());
        // the method whitelist stays inside varchar(16)
        assert!(validate_method(&"G".repeat(17)).is_err());
    }

    #[test]
    fn status_roundtrip() {
        assert_eq!(InterfaceStatus::try_from(1).unwrap(), InterfaceStatus::Online);
        assert_eq!(InterfaceStatus::Offline.value(), 0);
        assert!(InterfaceStatus::try_from(7).is_err());
    }
}
