use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, Order, PaginatorTrait, QueryFilter, QueryOrder,
    Select, Set,
};
use sea_orm::sea_query::{LikeExpr, SimpleExpr};
use chrono::Utc;
use models::interface_info::{self, Column, Entity as InterfaceInfoEntity, InterfaceStatus, NewInterfaceInfo};

use crate::errors::ServiceError;
use crate::interface_info::domain::{InterfaceInfoFilter, InterfaceInfoPatch, TextMatch};
use crate::pagination::{Page, Pagination, SortField, SortOrder, SortSpec};

/// Insert a new interface after model validation.
pub async fn create_interface_info(db: &DatabaseConnection, input: NewInterfaceInfo) -> Result<interface_info::Model, ServiceError> {
    // validations are in models::interface_info
    let created = interface_info::create(db, input).await?;
    Ok(created)
}

/// Get a live interface by id.
pub async fn get_interface_info(db: &DatabaseConnection, id: i64) -> Result<Option<interface_info::Model>, ServiceError> {
    let found = interface_info::find_live().filter(Column::Id.eq(id)).one(db).await?;
    Ok(found)
}

/// Apply an already validated patch; returns false if there is no live row.
pub async fn update_interface_info(db: &DatabaseConnection, id: i64, patch: InterfaceInfoPatch) -> Result<bool, ServiceError> {
    let Some(existing) = get_interface_info(db, id).await? else { return Ok(false); };
    let mut am: interface_info::ActiveModel = existing.into();
    if let Some(v) = patch.name { am.name = Set(v); }
    if let Some(v) = patch.description { am.description = Set(Some(v)); }
    if let Some(v) = patch.url { am.url = Set(v); }
    if let Some(v) = patch.method { am.method = Set(v); }
    if let Some(v) = patch.request_params { am.request_params = Set(Some(v)); }
    if let Some(v) = patch.request_example { am.request_example = Set(Some(v)); }
    if let Some(v) = patch.request_header { am.request_header = Set(Some(v)); }
    if let Some(v) = patch.response_header { am.response_header = Set(Some(v)); }
    if let Some(v) = patch.return_format { am.return_format = Set(Some(v)); }
    if let Some(v) = patch.avatar_url { am.avatar_url = Set(Some(v)); }
    if let Some(v) = patch.reduce_score { am.reduce_score = Set(v); }
    am.updated_at = Set(Utc::now().into());
    am.update(db).await?;
    Ok(true)
}

/// Soft delete; returns true if a live row was deleted.
pub async fn delete_interface_info(db: &DatabaseConnection, id: i64) -> Result<bool, ServiceError> {
    Ok(interface_info::soft_delete(db, id).await?)
}

pub async fn set_interface_status(db: &DatabaseConnection, id: i64, status: InterfaceStatus) -> Result<bool, ServiceError> {
    Ok(interface_info::set_status(db, id, status).await?)
}

/// List all live interfaces matching the filter, ordered by id.
pub async fn list_interface_infos(db: &DatabaseConnection, filter: &InterfaceInfoFilter) -> Result<Vec<interface_info::Model>, ServiceError> {
    let rows = apply_filter(interface_info::find_live(), filter)
        .order_by_asc(Column::Id)
        .all(db)
        .await?;
    Ok(rows)
}

pub async fn page_interface_infos(
    db: &DatabaseConnection,
    filter: &InterfaceInfoFilter,
    sort: SortSpec,
    pagination: Pagination,
) -> Result<Page<interface_info::Model>, ServiceError> {
    let select = apply_sort(apply_filter(interface_info::find_live(), filter), sort);
    fetch_page(db, select, pagination).await
}

/// Name or description containing `text`; `None` matches everything.
pub async fn search_interface_infos(
    db: &DatabaseConnection,
    text: Option<&str>,
    sort: SortSpec,
    pagination: Pagination,
) -> Result<Page<interface_info::Model>, ServiceError> {
    let mut select = interface_info::find_live();
    if let Some(t) = text {
        select = select.filter(
            Condition::any()
                .add(contains_literal(Column::Name, t))
                .add(contains_literal(Column::Description, t)),
        );
    }
    fetch_page(db, apply_sort(select, sort), pagination).await
}

/// `LIKE '%text%'` with `%`, `_` and `\` in `text` matched literally.
fn contains_literal(column: Column, text: &str) -> SimpleExpr {
    column.like(LikeExpr::new(format!("%{}%", escape_like(text))).escape('\\'))
}

fn escape_like(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn apply_filter(mut select: Select<InterfaceInfoEntity>, f: &InterfaceInfoFilter) -> Select<InterfaceInfoEntity> {
    if let Some(id) = f.id { select = select.filter(Column::Id.eq(id)); }
    match f.text_match {
        TextMatch::Exact => {
            if let Some(v) = &f.name { select = select.filter(Column::Name.eq(v.as_str())); }
            if let Some(v) = &f.description { select = select.filter(Column::Description.eq(v.as_str())); }
        }
        TextMatch::Contains => {
            if let Some(v) = &f.name { select = select.filter(contains_literal(Column::Name, v)); }
            if let Some(v) = &f.description { select = select.filter(contains_literal(Column::Description, v)); }
        }
    }
    if let Some(v) = &f.url { select = select.filter(Column::Url.eq(v.as_str())); }
    if let Some(v) = &f.method { select = select.filter(Column::Method.eq(v.as_str())); }
    if let Some(v) = &f.return_format { select = select.filter(Column::ReturnFormat.eq(v.as_str())); }
    if let Some(v) = f.status { select = select.filter(Column::Status.eq(v)); }
    if let Some(v) = f.user_id { select = select.filter(Column::UserId.eq(v)); }
    select
}

fn apply_sort(select: Select<InterfaceInfoEntity>, sort: SortSpec) -> Select<InterfaceInfoEntity> {
    let order = match sort.order {
        SortOrder::Ascend => Order::Asc,
        SortOrder::Descend => Order::Desc,
    };
    let column = match sort.field {
        SortField::Id => Column::Id,
        SortField::Name => Column::Name,
        SortField::Status => Column::Status,
        SortField::ReduceScore => Column::ReduceScore,
        SortField::TotalInvokes => Column::TotalInvokes,
        SortField::CreatedAt => Column::CreatedAt,
        SortField::UpdatedAt => Column::UpdatedAt,
    };
    let select = select.order_by(column, order);
    // id as tie-breaker keeps pages stable
    if sort.field == SortField::Id { select } else { select.order_by_asc(Column::Id) }
}

async fn fetch_page(
    db: &DatabaseConnection,
    select: Select<InterfaceInfoEntity>,
    pagination: Pagination,
) -> Result<Page<interface_info::Model>, ServiceError> {
    let pagination = pagination.checked()?;
    let (page_idx, per_page) = pagination.normalize();
    let paginator = select.paginate(db, per_page);
    let total = paginator.num_items().await?;
    let records = paginator.fetch_page(page_idx).await?;
    Ok(Page::new(records, total, pagination))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;
    use models::user;
    use sea_orm::EntityTrait;
    use uuid::Uuid;

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("50%_off"), "50\\%\\_off");
        assert_eq!(escape_like("a\\b"), "a\\\\b");
        assert_eq!(escape_like("plain"), "plain");
    }

    #[tokio::test]
    async fn interface_info_crud_service() -> Result<(), anyhow::Error> {
        let Some(db) = get_db().await? else { return Ok(()); };

        let owner = user::create(&db, &format!("svc_owner_{}", Uuid::new_v4()), None, user::ROLE_ADMIN).await?;
        let marker = Uuid::new_v4().simple().to_string();
        let a = create_interface_info(&db, NewInterfaceInfo {
            name: format!("geo-{}", &marker[..12]),
            description: Some(format!("ip lookup {marker}")),
            url: "https://api.example.com/geo".into(),
            method: "GET".into(),
            user_id: owner.id,
            ..Default::default()
        }).await?;

        let found = get_interface_info(&db, a.id).await?.unwrap();
        assert_eq!(found.url, "https://api.example.com/geo");

        let patch = InterfaceInfoPatch { method: Some("POST".into()), reduce_score: Some(3), ..Default::default() };
        assert!(update_interface_info(&db, a.id, patch).await?);
        let found = get_interface_info(&db, a.id).await?.unwrap();
        assert_eq!(found.method, "POST");
        assert_eq!(found.reduce_score, 3);

        let filter = InterfaceInfoFilter { user_id: Some(owner.id), ..Default::default() };
        let listed = list_interface_infos(&db, &filter).await?;
        assert!(listed.iter().any(|x| x.id == a.id));

        let hits = search_interface_infos(&db, Some(marker.as_str()), SortSpec::default(), Pagination::default()).await?;
        assert_eq!(hits.total, 1);
        assert_eq!(hits.records[0].id, a.id);
        // wildcards in the search text are literal
        let wildcard = format!("{}%", &marker[..4]);
        let hits = search_interface_infos(&db, Some(wildcard.as_str()), SortSpec::default(), Pagination::default()).await?;
        assert_eq!(hits.total, 0);
        let past_end = Pagination { current: 50, page_size: 10 };
        let hits = search_interface_infos(&db, Some(marker.as_str()), SortSpec::default(), past_end).await?;
        assert_eq!(hits.total, 1);
        assert!(hits.records.is_empty());

        assert!(set_interface_status(&db, a.id, InterfaceStatus::Online).await?);
        let online = InterfaceInfoFilter { user_id: Some(owner.id), status: Some(1), text_match: TextMatch::Contains, ..Default::default() };
        let page = page_interface_infos(&db, &online, SortSpec::default(), Pagination::default()).await?;
        assert_eq!(page.total, 1);

        assert!(delete_interface_info(&db, a.id).await?);
        assert!(get_interface_info(&db, a.id).await?.is_none());
        assert!(!update_interface_info(&db, a.id, InterfaceInfoPatch::default()).await?);

        // cleanup
        InterfaceInfoEntity::delete_by_id(a.id).exec(&db).await?;
        user::hard_delete(&db, owner.id).await?;

        Ok(())
    }
}
