use async_trait::async_trait;
use sea_orm::DatabaseConnection;

use models::interface_info::{InterfaceStatus, Model, NewInterfaceInfo};

use super::domain::{InterfaceInfoFilter, InterfaceInfoPatch};
use crate::errors::ServiceError;
use crate::pagination::{Page, Pagination, SortSpec};

/// Storage for interface records. Soft-deleted rows are invisible to every method.
#[async_trait]
pub trait InterfaceInfoRepository: Send + Sync {
    async fn insert(&self, input: NewInterfaceInfo) -> Result<Model, ServiceError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Model>, ServiceError>;
    async fn update(&self, id: i64, patch: InterfaceInfoPatch) -> Result<bool, ServiceError>;
    async fn soft_delete(&self, id: i64) -> Result<bool, ServiceError>;
    async fn set_status(&self, id: i64, status: InterfaceStatus) -> Result<bool, ServiceError>;
    async fn list(&self, filter: &InterfaceInfoFilter) -> Result<Vec<Model>, ServiceError>;
    async fn page(&self, filter: &InterfaceInfoFilter, sort: SortSpec, pagination: Pagination) -> Result<Page<Model>, ServiceError>;
    async fn search(&self, text: Option<&str>, sort: SortSpec, pagination: Pagination) -> Result<Page<Model>, ServiceError>;
}

/// SeaORM-backed repository implementation.
pub struct SeaOrmInterfaceInfoRepository {
    pub db: DatabaseConnection,
}

#[async_trait]
impl InterfaceInfoRepository for SeaOrmInterfaceInfoRepository {
    async fn insert(&self, input: NewInterfaceInfo) -> Result<Model, ServiceError> {
        crate::db::interface_info_service::create_interface_info(&self.db, input).await
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Model>, ServiceError> {
        crate::db::interface_info_service::get_interface_info(&self.db, id).await
    }

    async fn update(&self, id: i64, patch: InterfaceInfoPatch) -> Result<bool, ServiceError> {
        crate::db::interface_info_service::update_interface_info(&self.db, id, patch).await
    }

    async fn soft_delete(&self, id: i64) -> Result<bool, ServiceError> {
        crate::db::interface_info_service::delete_interface_info(&self.db, id).await
    }

    async fn set_status(&self, id: i64, status: InterfaceStatus) -> Result<bool, ServiceError> {
        crate::db::interface_info_service::set_interface_status(&self.db, id, status).await
    }

    async fn list(&self, filter: &InterfaceInfoFilter) -> Result<Vec<Model>, ServiceError> {
        crate::db::interface_info_service::list_interface_infos(&self.db, filter).await
    }

    async fn page(&self, filter: &InterfaceInfoFilter, sort: SortSpec, pagination: Pagination) -> Result<Page<Model>, ServiceError> {
        crate::db::interface_info_service::page_interface_infos(&self.db, filter, sort, pagination).await
    }

    async fn search(&self, text: Option<&str>, sort: SortSpec, pagination: Pagination) -> Result<Page<Model>, ServiceError> {
        crate::db::interface_info_service::search_interface_infos(&self.db, text, sort, pagination).await
    }
}

/// In-memory repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::cmp::Ordering;
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    use chrono::Utc;
    use models::interface_info::{
        validate_avatar_url, validate_method, validate_name, validate_reduce_score, validate_return_format, validate_url,
    };

    use crate::interface_info::domain::TextMatch;
    use crate::pagination::{SortField, SortOrder};

    #[derive(Default)]
    struct Rows {
        next_id: i64,
        rows: BTreeMap<i64, Model>, // key: id
    }

    #[derive(Default)]
    pub struct MockInterfaceInfoRepository {
        inner: Mutex<Rows>,
    }

    impl MockInterfaceInfoRepository {
        /// Rows currently stored, deleted ones included
        pub fn raw(&self, id: i64) -> Option<Model> {
            self.inner.lock().unwrap().rows.get(&id).cloned()
        }

        fn live(&self) -> Vec<Model> {
            let inner = self.inner.lock().unwrap();
            inner.rows.values().filter(|m| m.deleted_at.is_none()).cloned().collect()
        }
    }

    fn matches(m: &Model, f: &InterfaceInfoFilter) -> bool {
        let text = |field: Option<&str>, want: &Option<String>| match want {
            None => true,
            Some(w) => match (f.text_match, field) {
                (_, None) => false,
                (TextMatch::Exact, Some(v)) => v == w,
                (TextMatch::Contains, Some(v)) => v.contains(w.as_str()),
            },
        };
        f.id.map_or(true, |id| m.id == id)
            && text(Some(m.name.as_str()), &f.name)
            && text(m.description.as_deref(), &f.description)
            && f.url.as_ref().map_or(true, |v| &m.url == v)
            && f.method.as_ref().map_or(true, |v| &m.method == v)
            && f.return_format.as_ref().map_or(true, |v| m.return_format.as_ref() == Some(v))
            && f.status.map_or(true, |v| m.status == v)
            && f.user_id.map_or(true, |v| m.user_id == v)
    }

    fn compare(a: &Model, b: &Model, sort: SortSpec) -> Ordering {
        let ord = match sort.field {
            SortField::Id => a.id.cmp(&b.id),
            SortField::Name => a.name.cmp(&b.name),
            SortField::Status => a.status.cmp(&b.status),
            SortField::ReduceScore => a.reduce_score.cmp(&b.reduce_score),
            SortField::TotalInvokes => a.total_invokes.cmp(&b.total_invokes),
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
            SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        };
        let ord = if sort.order == SortOrder::Descend { ord.reverse() } else { ord };
        ord.then(a.id.cmp(&b.id))
    }

    fn paged(mut rows: Vec<Model>, sort: SortSpec, pagination: Pagination) -> Page<Model> {
        rows.sort_by(|a, b| compare(a, b, sort));
        let (_, per_page) = pagination.normalize();
        let total = rows.len() as u64;
        let skip = pagination.offset().and_then(|o| usize::try_from(o).ok()).unwrap_or(usize::MAX);
        let records = rows.into_iter().skip(skip).take(per_page as usize).collect();
        Page::new(records, total, pagination)
    }

    #[async_trait]
    impl InterfaceInfoRepository for MockInterfaceInfoRepository {
        async fn insert(&self, input: NewInterfaceInfo) -> Result<Model, ServiceError> {
            validate_name(&input.name)?;
            validate_url(&input.url)?;
            let method = validate_method(&input.method)?;
            validate_reduce_score(input.reduce_score)?;
            if let Some(f) = &input.return_format { validate_return_format(f)?; }
            if let Some(u) = &input.avatar_url { validate_avatar_url(u)?; }

            let mut inner = self.inner.lock().unwrap();
            inner.next_id += 1;
            let now = Utc::now().into();
            let model = Model {
                id: inner.next_id,
                name: input.name,
                description: input.description,
                url: input.url,
                method,
                request_params: input.request_params,
                request_example: input.request_example,
                request_header: input.request_header,
                response_header: input.response_header,
                return_format: input.return_format,
                avatar_url: input.avatar_url,
                reduce_score: input.reduce_score,
                total_invokes: 0,
                status: InterfaceStatus::Offline.value(),
                user_id: input.user_id,
                created_at: now,
                updated_at: now,
                deleted_at: None,
            };
            inner.rows.insert(model.id, model.clone());
            Ok(model)
        }

        async fn find_by_id(&self, id: i64) -> Result<Option<Model>, ServiceError> {
            let inner = self.inner.lock().unwrap();
            Ok(inner.rows.get(&id).filter(|m| m.deleted_at.is_none()).cloned())
        }

        async fn update(&self, id: i64, patch: InterfaceInfoPatch) -> Result<bool, ServiceError> {
            let mut inner = self.inner.lock().unwrap();
            let Some(m) = inner.rows.get_mut(&id).filter(|m| m.deleted_at.is_none()) else { return Ok(false); };
            if let Some(v) = patch.name { m.name = v; }
            if let Some(v) = patch.description { m.description = Some(v); }
            if let Some(v) = patch.url { m.url = v; }
            if let Some(v) = patch.method { m.method = v; }
            if let Some(v) = patch.request_params { m.request_params = Some(v); }
            if let Some(v) = patch.request_example { m.request_example = Some(v); }
            if let Some(v) = patch.request_header { m.request_header = Some(v); }
            if let Some(v) = patch.response_header { m.response_header = Some(v); }
            if let Some(v) = patch.return_format { m.return_format = Some(v); }
            if let Some(v) = patch.avatar_url { m.avatar_url = Some(v); }
            if let Some(v) = patch.reduce_score { m.reduce_score = v; }
            m.updated_at = Utc::now().into();
            Ok(true)
        }

        async fn soft_delete(&self, id: i64) -> Result<bool, ServiceError> {
            let mut inner = self.inner.lock().unwrap();
            let Some(m) = inner.rows.get_mut(&id).filter(|m| m.deleted_at.is_none()) else { return Ok(false); };
            m.deleted_at = Some(Utc::now().into());
            Ok(true)
        }

        async fn set_status(&self, id: i64, status: InterfaceStatus) -> Result<bool, ServiceError> {
            let mut inner = self.inner.lock().unwrap();
            let Some(m) = inner.rows.get_mut(&id).filter(|m| m.deleted_at.is_none()) else { return Ok(false); };
            m.status = status.value();
            m.updated_at = Utc::now().into();
            Ok(true)
        }

        async fn list(&self, filter: &InterfaceInfoFilter) -> Result<Vec<Model>, ServiceError> {
            // BTreeMap iteration is already id order
            Ok(self.live().into_iter().filter(|m| matches(m, filter)).collect())
        }

        async fn page(&self, filter: &InterfaceInfoFilter, sort: SortSpec, pagination: Pagination) -> Result<Page<Model>, ServiceError> {
            let rows = self.live().into_iter().filter(|m| matches(m, filter)).collect();
            Ok(paged(rows, sort, pagination))
        }

        async fn search(&self, text: Option<&str>, sort: SortSpec, pagination: Pagination) -> Result<Page<Model>, ServiceError> {
            let rows = self
                .live()
                .into_iter()
                .filter(|m| match text {
                    None => true,
                    // literal match, same as the escaped LIKE in SQL
                    Some(t) => m.name.contains(t) || m.description.as_deref().is_some_and(|d| d.contains(t)),
                })
                .collect();
            Ok(paged(rows, sort, pagination))
        }
    }
}
