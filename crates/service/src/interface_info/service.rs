use std::sync::Arc;

use common::{guard, BusinessError, ErrorCode};
use models::interface_info::{self, InterfaceStatus, Model, NewInterfaceInfo};
use tracing::{info, instrument, warn};

use super::domain::{
    InterfaceInfoAddRequest, InterfaceInfoPatch, InterfaceInfoQueryRequest, InterfaceInfoSearchTextRequest,
    InterfaceInfoUpdateRequest, TextMatch,
};
use super::repository::InterfaceInfoRepository;
use crate::auth::domain::LoginUser;
use crate::errors::ServiceError;
use crate::pagination::Page;

/// Application service for interface records.
/// Field rules live here; request-shape guards stay in the HTTP layer.
pub struct InterfaceInfoService {
    repo: Arc<dyn InterfaceInfoRepository>,
}

impl InterfaceInfoService {
    pub fn new(repo: Arc<dyn InterfaceInfoRepository>) -> Self { Self { repo } }

    /// Register an interface owned by `login_user`; it starts offline.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use service::auth::domain::LoginUser;
    /// use service::interface_info::{domain::InterfaceInfoAddRequest, repository::mock::MockInterfaceInfoRepository, InterfaceInfoService};
    /// let svc = InterfaceInfoService::new(Arc::new(MockInterfaceInfoRepository::default()));
    /// let admin = LoginUser { id: 1, user_account: "root".into(), user_name: None, user_role: "admin".into() };
    /// let req = InterfaceInfoAddRequest {
    ///     name: Some("weather".into()),
    ///     url: Some("https://api.example.com/weather".into()),
    ///     method: Some("get".into()),
    ///     ..Default::default()
    /// };
    /// let id = tokio_test::block_on(svc.add(req, &admin)).unwrap();
    /// let saved = tokio_test::block_on(svc.get_by_id(id)).unwrap().unwrap();
    /// assert_eq!(saved.method, "GET");
    /// assert_eq!(saved.status, 0);
    /// ```
    #[instrument(skip(self, input, login_user), fields(user_id = login_user.id))]
    pub async fn add(&self, input: InterfaceInfoAddRequest, login_user: &LoginUser) -> Result<i64, ServiceError> {
        guard::is_any_blank(
            BusinessError::with_message(ErrorCode::ParamsError, "name, url and method are required"),
            &[input.name.as_deref(), input.url.as_deref(), input.method.as_deref()],
        )?;
        let name = input.name.unwrap_or_default().trim().to_string();
        let url = input.url.unwrap_or_default().trim().to_string();
        interface_info::validate_name(&name)?;
        interface_info::validate_url(&url)?;
        let method = interface_info::validate_method(input.method.as_deref().unwrap_or_default())?;
        let reduce_score = input.reduce_score.unwrap_or(0);
        interface_info::validate_reduce_score(reduce_score)?;
        if let Some(f) = &input.return_format {
            interface_info::validate_return_format(f)?;
        }
        if let Some(u) = &input.avatar_url {
            interface_info::validate_avatar_url(u)?;
        }

        let created = self
            .repo
            .insert(NewInterfaceInfo {
                name,
                description: input.description,
                url,
                method,
                request_params: input.request_params,
                request_example: input.request_example,
                request_header: input.request_header,
                response_header: input.response_header,
                return_format: input.return_format,
                avatar_url: input.avatar_url,
                reduce_score,
                user_id: login_user.id,
            })
            .await?;
        info!(id = created.id, name = %created.name, "interface_created");
        Ok(created.id)
    }

    #[instrument(skip(self))]
    pub async fn remove_by_id(&self, id: i64) -> Result<bool, ServiceError> {
        let removed = self.repo.soft_delete(id).await?;
        if removed {
            info!(id, "interface_deleted");
        }
        Ok(removed)
    }

    #[instrument(skip(self, avatar_url))]
    pub async fn update_avatar(&self, id: i64, avatar_url: &str) -> Result<bool, ServiceError> {
        interface_info::validate_avatar_url(avatar_url)?;
        let patch = InterfaceInfoPatch { avatar_url: Some(avatar_url.to_string()), ..Default::default() };
        self.repo.update(id, patch).await
    }

    /// Write only the fields present in the request.
    #[instrument(skip(self, input), fields(id = ?input.id))]
    pub async fn update(&self, input: InterfaceInfoUpdateRequest) -> Result<bool, ServiceError> {
        let id = match input.id {
            Some(id) if id > 0 => id,
            _ => return Err(ServiceError::Validation("id must be positive".into())),
        };
        let patch = Self::validated_patch(input)?;
        if patch.is_empty() {
            warn!(id, "update without changes");
        }
        self.repo.update(id, patch).await
    }

    /// Same rules as `add`: name and url are trimmed, then validated.
    fn validated_patch(input: InterfaceInfoUpdateRequest) -> Result<InterfaceInfoPatch, ServiceError> {
        let name = input.name.map(|s| s.trim().to_string());
        let url = input.url.map(|s| s.trim().to_string());
        if let Some(name) = &name {
            interface_info::validate_name(name)?;
        }
        if let Some(url) = &url {
            interface_info::validate_url(url)?;
        }
        let method = input.method.as_deref().map(interface_info::validate_method).transpose()?;
        if let Some(score) = input.reduce_score {
            interface_info::validate_reduce_score(score)?;
        }
        if let Some(f) = &input.return_format {
            interface_info::validate_return_format(f)?;
        }
        if let Some(u) = &input.avatar_url {
            interface_info::validate_avatar_url(u)?;
        }
        Ok(InterfaceInfoPatch {
            name,
            description: input.description,
            url,
            method,
            request_params: input.request_params,
            request_example: input.request_example,
            request_header: input.request_header,
            response_header: input.response_header,
            return_format: input.return_format,
            avatar_url: input.avatar_url,
            reduce_score: input.reduce_score,
        })
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<Model>, ServiceError> { self.repo.find_by_id(id).await }

    /// Every field given in the query must match exactly.
    pub async fn list(&self, query: &InterfaceInfoQueryRequest) -> Result<Vec<Model>, ServiceError> {
        self.repo.list(&query.filter(TextMatch::Exact)).await
    }

    /// Name and description match by substring, other fields exactly.
    #[instrument(skip(self, query))]
    pub async fn page(&self, query: &InterfaceInfoQueryRequest) -> Result<Page<Model>, ServiceError> {
        let pagination = query.pagination().checked()?;
        self.repo.page(&query.filter(TextMatch::Contains), query.sort(), pagination).await
    }

    #[instrument(skip(self, query))]
    pub async fn search_text_page(&self, query: &InterfaceInfoSearchTextRequest) -> Result<Page<Model>, ServiceError> {
        let pagination = query.pagination().checked()?;
        let text = query.text();
        self.repo.search(text.as_deref(), query.sort(), pagination).await
    }

    /// Publish or withdraw an interface. An unknown id is a parameter error.
    #[instrument(skip(self))]
    pub async fn set_status(&self, id: i64, status: InterfaceStatus) -> Result<bool, ServiceError> {
        let found = self.repo.find_by_id(id).await?;
        guard::is_null(found, BusinessError::with_message(ErrorCode::ParamsError, "interface does not exist"))?;
        let changed = self.repo.set_status(id, status).await?;
        info!(id, status = status.value(), "interface_status_changed");
        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interface_info::repository::mock::MockInterfaceInfoRepository;
    use crate::pagination::DEFAULT_PAGE_SIZE;

    fn svc() -> InterfaceInfoService { InterfaceInfoService::new(Arc::new(MockInterfaceInfoRepository::default())) }

    fn admin() -> LoginUser {
        LoginUser { id: 42, user_account: "root".into(), user_name: None, user_role: "admin".into() }
    }

    fn add_req(name: &str, description: &str) -> InterfaceInfoAddRequest {
        InterfaceInfoAddRequest {
            name: Some(name.into()),
            description: Some(description.into()),
            url: Some(format!("https://api.example.com/{name}")),
            method: Some("post".into()),
            ..Default::default()
        }
    }

    fn params_error(err: ServiceError) -> bool {
        BusinessError::from(err).code == ErrorCode::ParamsError
    }

    #[tokio::test]
    async fn add_sets_owner_and_offline_status() {
        let svc = svc();
        let id = svc.add(add_req("weather", "forecast"), &admin()).await.unwrap();
        let saved = svc.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(saved.user_id, 42);
        assert_eq!(saved.status, InterfaceStatus::Offline.value());
        assert_eq!(saved.method, "POST");
        assert_eq!(saved.total_invokes, 0);
    }

    #[tokio::test]
    async fn add_requires_name_url_method() {
        let svc = svc();
        let mut req = add_req("weather", "forecast");
        req.url = Some("   ".into());
        assert!(params_error(svc.add(req, &admin()).await.unwrap_err()));

        let mut req = add_req("weather", "forecast");
        req.method = None;
        assert!(params_error(svc.add(req, &admin()).await.unwrap_err()));
    }

    #[tokio::test]
    async fn add_rejects_long_name_and_bad_url() {
        let svc = svc();
        let long = "n".repeat(51);
        assert!(params_error(svc.add(add_req(&long, "x"), &admin()).await.unwrap_err()));

        let mut req = add_req("weather", "forecast");
        req.url = Some("ftp://example.com".into());
        assert!(params_error(svc.add(req, &admin()).await.unwrap_err()));
    }

    #[tokio::test]
    async fn update_writes_only_present_fields() {
        let svc = svc();
        let id = svc.add(add_req("weather", "forecast"), &admin()).await.unwrap();
        let req = InterfaceInfoUpdateRequest { id: Some(id), method: Some("get".into()), ..Default::default() };
        assert!(svc.update(req).await.unwrap());
        let saved = svc.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(saved.method, "GET");
        assert_eq!(saved.name, "weather");
        assert_eq!(saved.description.as_deref(), Some("forecast"));
    }

    #[tokio::test]
    async fn update_checks_id_and_fields() {
        let svc = svc();
        let bad_id = InterfaceInfoUpdateRequest { id: Some(0), ..Default::default() };
        assert!(params_error(svc.update(bad_id).await.unwrap_err()));

        let id = svc.add(add_req("weather", "forecast"), &admin()).await.unwrap();
        let negative = InterfaceInfoUpdateRequest { id: Some(id), reduce_score: Some(-1), ..Default::default() };
        assert!(params_error(svc.update(negative).await.unwrap_err()));

        let missing = InterfaceInfoUpdateRequest { id: Some(999), name: Some("x".into()), ..Default::default() };
        assert!(!svc.update(missing).await.unwrap());
    }

    #[tokio::test]
    async fn removed_rows_disappear_everywhere() {
        let repo = Arc::new(MockInterfaceInfoRepository::default());
        let svc = InterfaceInfoService::new(repo.clone());
        let id = svc.add(add_req("weather", "forecast"), &admin()).await.unwrap();
        assert!(svc.remove_by_id(id).await.unwrap());
        // the row is kept with a deletion mark
        assert!(repo.raw(id).unwrap().deleted_at.is_some());
        assert!(!svc.remove_by_id(id).await.unwrap());
        assert!(svc.get_by_id(id).await.unwrap().is_none());
        assert!(svc.list(&InterfaceInfoQueryRequest::default()).await.unwrap().is_empty());
        assert!(!svc.update_avatar(id, "https://cdn.example.com/a.png").await.unwrap());
        assert!(params_error(svc.set_status(id, InterfaceStatus::Online).await.unwrap_err()));
    }

    #[tokio::test]
    async fn update_trims_like_add() {
        let svc = svc();
        let id = svc.add(add_req("weather", "forecast"), &admin()).await.unwrap();
        let padded_name = format!("  {}  ", "n".repeat(50));
        let req = InterfaceInfoUpdateRequest {
            id: Some(id),
            name: Some(padded_name),
            url: Some(" https://api.example.com/v2 ".into()),
            ..Default::default()
        };
        assert!(svc.update(req).await.unwrap());
        let saved = svc.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(saved.name, "n".repeat(50));
        assert_eq!(saved.url, "https://api.example.com/v2");

        let blank = InterfaceInfoUpdateRequest { id: Some(id), name: Some("   ".into()), ..Default::default() };
        assert!(params_error(svc.update(blank).await.unwrap_err()));
    }

    #[tokio::test]
    async fn long_fields_are_params_errors() {
        let svc = svc();
        let long_url = format!("https://api.example.com/{}", "p".repeat(600));

        let mut req = add_req("weather", "forecast");
        req.url = Some(long_url.clone());
        assert!(params_error(svc.add(req, &admin()).await.unwrap_err()));
        let mut req = add_req("weather", "forecast");
        req.return_format = Some("j".repeat(65));
        assert!(params_error(svc.add(req, &admin()).await.unwrap_err()));
        let mut req = add_req("weather", "forecast");
        req.avatar_url = Some("a".repeat(1025));
        assert!(params_error(svc.add(req, &admin()).await.unwrap_err()));

        let id = svc.add(add_req("weather", "forecast"), &admin()).await.unwrap();
        let req = InterfaceInfoUpdateRequest { id: Some(id), url: Some(long_url), ..Default::default() };
        assert!(params_error(svc.update(req).await.unwrap_err()));
        let req = InterfaceInfoUpdateRequest { id: Some(id), return_format: Some("j".repeat(65)), ..Default::default() };
        assert!(params_error(svc.update(req).await.unwrap_err()));
        assert!(params_error(svc.update_avatar(id, &"a".repeat(1025)).await.unwrap_err()));
        assert!(svc.update_avatar(id, &"a".repeat(1024)).await.unwrap());
    }

    #[tokio::test]
    async fn update_avatar_sets_url() {
        let svc = svc();
        let id = svc.add(add_req("weather", "forecast"), &admin()).await.unwrap();
        assert!(svc.update_avatar(id, "https://cdn.example.com/a.png").await.unwrap());
        let saved = svc.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(saved.avatar_url.as_deref(), Some("https://cdn.example.com/a.png"));
    }

    #[tokio::test]
    async fn online_then_offline() {
        let svc = svc();
        let id = svc.add(add_req("weather", "forecast"), &admin()).await.unwrap();
        assert!(svc.set_status(id, InterfaceStatus::Online).await.unwrap());
        assert_eq!(svc.get_by_id(id).await.unwrap().unwrap().status, 1);
        assert!(svc.set_status(id, InterfaceStatus::Offline).await.unwrap());
        assert_eq!(svc.get_by_id(id).await.unwrap().unwrap().status, 0);
    }

    #[tokio::test]
    async fn list_is_exact_and_page_is_fuzzy() {
        let svc = svc();
        svc.add(add_req("weather", "forecast"), &admin()).await.unwrap();
        svc.add(add_req("weather-pro", "forecast plus"), &admin()).await.unwrap();

        let q = InterfaceInfoQueryRequest { name: Some("weather".into()), ..Default::default() };
        assert_eq!(svc.list(&q).await.unwrap().len(), 1);
        let page = svc.page(&q).await.unwrap();
        assert_eq!(page.total, 2);
        assert_eq!(page.size, DEFAULT_PAGE_SIZE);
    }

    #[tokio::test]
    async fn page_sorts_and_slices() {
        let svc = svc();
        for name in ["a", "b", "c"] {
            svc.add(add_req(name, "x"), &admin()).await.unwrap();
        }
        let q = InterfaceInfoQueryRequest {
            current: Some(1),
            page_size: Some(2),
            sort_field: Some("name".into()),
            sort_order: Some("descend".into()),
            ..Default::default()
        };
        let page = svc.page(&q).await.unwrap();
        assert_eq!(page.total, 3);
        assert_eq!(page.pages, 2);
        let names: Vec<_> = page.records.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["c", "b"]);

        // unknown sort fields fall back to id order
        let q = InterfaceInfoQueryRequest { sort_field: Some("password".into()), ..Default::default() };
        let page = svc.page(&q).await.unwrap();
        let names: Vec<_> = page.records.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["a", "b", "c"]);
    }

    #[tokio::test]
    async fn page_past_the_end_is_empty() {
        let svc = svc();
        for name in ["a", "b", "c"] {
            svc.add(add_req(name, "x"), &admin()).await.unwrap();
        }
        let q = InterfaceInfoQueryRequest { current: Some(5), page_size: Some(2), ..Default::default() };
        let page = svc.page(&q).await.unwrap();
        assert!(page.records.is_empty());
        assert_eq!(page.total, 3);
        assert_eq!(page.pages, 2);
        assert_eq!(page.current, 5);
    }

    #[tokio::test]
    async fn huge_current_is_rejected() {
        let svc = svc();
        svc.add(add_req("weather", "forecast"), &admin()).await.unwrap();
        let q = InterfaceInfoQueryRequest { current: Some(u64::MAX), page_size: Some(50), ..Default::default() };
        assert!(params_error(svc.page(&q).await.unwrap_err()));
        let s = InterfaceInfoSearchTextRequest { current: Some(u64::MAX), ..Default::default() };
        assert!(params_error(svc.search_text_page(&s).await.unwrap_err()));
    }

    #[tokio::test]
    async fn search_text_matches_name_or_description() {
        let svc = svc();
        svc.add(add_req("weather", "daily forecast"), &admin()).await.unwrap();
        svc.add(add_req("ip", "geo lookup"), &admin()).await.unwrap();

        let q = InterfaceInfoSearchTextRequest { search_text: Some("geo".into()), ..Default::default() };
        let page = svc.search_text_page(&q).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.records[0].name, "ip");

        let blank = InterfaceInfoSearchTextRequest { search_text: Some(" ".into()), ..Default::default() };
        assert_eq!(svc.search_text_page(&blank).await.unwrap().total, 2);
    }

    #[tokio::test]
    async fn search_wildcards_are_literal() {
        let svc = svc();
        svc.add(add_req("rate_limit", "50% off"), &admin()).await.unwrap();
        svc.add(add_req("ratelimit", "500 off"), &admin()).await.unwrap();

        let q = |t: &str| InterfaceInfoSearchTextRequest { search_text: Some(t.into()), ..Default::default() };
        let page = svc.search_text_page(&q("rate_")).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.records[0].name, "rate_limit");
        assert_eq!(svc.search_text_page(&q("50%")).await.unwrap().total, 1);
        assert_eq!(svc.search_text_page(&q("%")).await.unwrap().total, 1);

        let fuzzy = InterfaceInfoQueryRequest { name: Some("e_l".into()), ..Default::default() };
        assert_eq!(svc.page(&fuzzy).await.unwrap().total, 1);
    }
}
