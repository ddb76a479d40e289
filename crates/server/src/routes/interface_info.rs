//! `/interfaceInfo/*` handlers.
//!
//! Request-shape guards run here; field rules live in `InterfaceInfoService`.

use axum::{
    extract::{rejection::{JsonRejection, QueryRejection}, Query, State},
    Extension, Json,
};
use common::{guard, BaseResponse, BusinessError, ErrorCode};
use models::interface_info::{InterfaceStatus, Model};
use serde::Deserialize;
use service::auth::domain::LoginUser;
use service::interface_info::domain::{
    IdRequest, InterfaceInfoAddRequest, InterfaceInfoQueryRequest, InterfaceInfoSearchTextRequest,
    InterfaceInfoUpdateAvatarRequest, InterfaceInfoUpdateRequest, InvokeRequest,
};
use service::pagination::Page;
use tracing::{info, warn};

use crate::errors::ApiError;
use crate::routes::auth::ServerState;

/// Page size cap on the public listing
pub const PAGE_SIZE_LIMIT: u64 = 50;
/// Page size cap on text search
pub const SEARCH_PAGE_SIZE_LIMIT: u64 = 100;

type ApiResult<T> = Result<Json<BaseResponse<T>>, ApiError>;

fn params_error() -> BusinessError { BusinessError::new(ErrorCode::ParamsError) }

/// Unwrap a JSON body; a malformed or `null` body is a parameter error.
fn body<T>(payload: Result<Json<Option<T>>, JsonRejection>) -> Result<T, ApiError> {
    let Json(value) = payload?;
    Ok(guard::is_null(value, params_error())?)
}

/// Present and positive
fn positive_id(id: Option<i64>) -> Result<i64, ApiError> {
    let id = guard::is_null(id, params_error())?;
    guard::is_true(id <= 0, params_error())?;
    Ok(id)
}

fn check_page_size(page_size: Option<u64>, limit: u64) -> Result<(), ApiError> {
    guard::is_true(
        page_size.is_some_and(|s| s > limit),
        BusinessError::with_message(ErrorCode::ParamsError, format!("pageSize must not exceed {limit}")),
    )?;
    Ok(())
}

#[derive(Debug, Deserialize)]
pub struct GetByIdQuery {
    pub id: Option<i64>,
}

#[utoipa::path(
    post, path = "/interfaceInfo/add", tag = "interfaceInfo",
    request_body = crate::openapi::InterfaceInfoAddRequestDoc,
    responses(
        (status = 200, description = "Created; data is the new id", body = crate::openapi::IdResponseDoc),
        (status = 400, description = "Invalid parameters"),
        (status = 401, description = "Not logged in"),
        (status = 403, description = "Not an admin")
    )
)]
pub async fn add(
    State(state): State<ServerState>,
    login_user: Option<Extension<LoginUser>>,
    payload: Result<Json<Option<InterfaceInfoAddRequest>>, JsonRejection>,
) -> ApiResult<i64> {
    let req = body(payload)?;
    let Extension(user) = guard::is_null(login_user, BusinessError::new(ErrorCode::OperationError))?;
    let id = state.interface_info.add(req, &user).await?;
    Ok(Json(BaseResponse::success(id)))
}

#[utoipa::path(
    post, path = "/interfaceInfo/delete", tag = "interfaceInfo",
    request_body = crate::openapi::IdRequestDoc,
    responses((status = 200, description = "data is true when a row was deleted", body = crate::openapi::BoolResponseDoc))
)]
pub async fn delete(
    State(state): State<ServerState>,
    payload: Result<Json<Option<IdRequest>>, JsonRejection>,
) -> ApiResult<bool> {
    let req = body(payload)?;
    let id = positive_id(req.id)?;
    let removed = state.interface_info.remove_by_id(id).await?;
    Ok(Json(BaseResponse::success(removed)))
}

#[utoipa::path(
    post, path = "/interfaceInfo/updateInterfaceInfoAvatar", tag = "interfaceInfo",
    request_body = crate::openapi::InterfaceInfoUpdateAvatarRequestDoc,
    responses((status = 200, description = "data is true when the avatar was stored", body = crate::openapi::BoolResponseDoc))
)]
pub async fn update_avatar(
    State(state): State<ServerState>,
    payload: Result<Json<Option<InterfaceInfoUpdateAvatarRequest>>, JsonRejection>,
) -> ApiResult<bool> {
    let req = body(payload)?;
    guard::any_null(params_error(), &[&req.id as &dyn guard::Presence, &req.avatar_url])?;
    let id = positive_id(req.id)?;
    let avatar_url = req.avatar_url.unwrap_or_default();
    let updated = state.interface_info.update_avatar(id, &avatar_url).await?;
    Ok(Json(BaseResponse::success(updated)))
}

#[utoipa::path(
    post, path = "/interfaceInfo/update", tag = "interfaceInfo",
    request_body = crate::openapi::InterfaceInfoUpdateRequestDoc,
    responses((status = 200, description = "data is true when a row was updated", body = crate::openapi::BoolResponseDoc))
)]
pub async fn update(
    State(state): State<ServerState>,
    payload: Result<Json<Option<InterfaceInfoUpdateRequest>>, JsonRejection>,
) -> ApiResult<bool> {
    let req = body(payload)?;
    let updated = state.interface_info.update(req).await?;
    Ok(Json(BaseResponse::success(updated)))
}

#[utoipa::path(
    get, path = "/interfaceInfo/get", tag = "interfaceInfo",
    params(("id" = i64, Query, description = "Interface id")),
    responses(
        (status = 200, description = "OK; data is null when no live row has this id", body = crate::openapi::InterfaceInfoResponseDoc),
        (status = 400, description = "Missing or non-positive id")
    )
)]
pub async fn get_by_id(
    State(state): State<ServerState>,
    query: Result<Query<GetByIdQuery>, QueryRejection>,
) -> ApiResult<Option<Model>> {
    let Query(q) = query?;
    let id = positive_id(q.id)?;
    let found = state.interface_info.get_by_id(id).await?;
    Ok(Json(BaseResponse::success(found)))
}

#[utoipa::path(
    get, path = "/interfaceInfo/list", tag = "interfaceInfo",
    params(
        ("name" = Option<String>, Query, description = "Exact name"),
        ("method" = Option<String>, Query, description = "HTTP method"),
        ("status" = Option<i32>, Query, description = "0 offline, 1 online"),
        ("userId" = Option<i64>, Query, description = "Owner id")
    ),
    responses((status = 200, description = "OK"), (status = 403, description = "Not an admin"))
)]
pub async fn list(
    State(state): State<ServerState>,
    query: Result<Query<InterfaceInfoQueryRequest>, QueryRejection>,
) -> ApiResult<Vec<Model>> {
    let Query(q) = query?;
    let rows = state.interface_info.list(&q).await?;
    Ok(Json(BaseResponse::success(rows)))
}

#[utoipa::path(
    get, path = "/interfaceInfo/list/page", tag = "interfaceInfo",
    params(
        ("current" = Option<u64>, Query, description = "1-based page"),
        ("pageSize" = Option<u64>, Query, description = "At most 50"),
        ("sortField" = Option<String>, Query, description = "id, name, status, reduceScore, totalInvokes, createTime, updateTime"),
        ("sortOrder" = Option<String>, Query, description = "ascend or descend"),
        ("name" = Option<String>, Query, description = "Name contains"),
        ("description" = Option<String>, Query, description = "Description contains")
    ),
    responses((status = 200, description = "OK", body = crate::openapi::PageResponseDoc), (status = 400, description = "Page too large"))
)]
pub async fn list_page(
    State(state): State<ServerState>,
    query: Result<Query<InterfaceInfoQueryRequest>, QueryRejection>,
) -> ApiResult<Page<Model>> {
    let Query(q) = query?;
    check_page_size(q.page_size, PAGE_SIZE_LIMIT)?;
    let page = state.interface_info.page(&q).await?;
    Ok(Json(BaseResponse::success(page)))
}

#[utoipa::path(
    get, path = "/interfaceInfo/get/searchText", tag = "interfaceInfo",
    params(
        ("searchText" = Option<String>, Query, description = "Matched against name or description"),
        ("current" = Option<u64>, Query, description = "1-based page"),
        ("pageSize" = Option<u64>, Query, description = "At most 100")
    ),
    responses((status = 200, description = "OK", body = crate::openapi::PageResponseDoc), (status = 400, description = "Page too large"))
)]
pub async fn search_text(
    State(state): State<ServerState>,
    query: Result<Query<InterfaceInfoSearchTextRequest>, QueryRejection>,
) -> ApiResult<Page<Model>> {
    let Query(q) = query?;
    check_page_size(q.page_size, SEARCH_PAGE_SIZE_LIMIT)?;
    let page = state.interface_info.search_text_page(&q).await?;
    Ok(Json(BaseResponse::success(page)))
}

async fn change_status(state: &ServerState, payload: Result<Json<Option<IdRequest>>, JsonRejection>, status: InterfaceStatus) -> ApiResult<bool> {
    let req = body(payload)?;
    let id = positive_id(req.id)?;
    let changed = state.interface_info.set_status(id, status).await?;
    Ok(Json(BaseResponse::success(changed)))
}

#[utoipa::path(
    post, path = "/interfaceInfo/online", tag = "interfaceInfo",
    request_body = crate::openapi::IdRequestDoc,
    responses((status = 200, description = "Published", body = crate::openapi::BoolResponseDoc), (status = 400, description = "Unknown id"))
)]
pub async fn online(
    State(state): State<ServerState>,
    payload: Result<Json<Option<IdRequest>>, JsonRejection>,
) -> ApiResult<bool> {
    change_status(&state, payload, InterfaceStatus::Online).await
}

#[utoipa::path(
    post, path = "/interfaceInfo/offline", tag = "interfaceInfo",
    request_body = crate::openapi::IdRequestDoc,
    responses((status = 200, description = "Withdrawn", body = crate::openapi::BoolResponseDoc), (status = 400, description = "Unknown id"))
)]
pub async fn offline(
    State(state): State<ServerState>,
    payload: Result<Json<Option<IdRequest>>, JsonRejection>,
) -> ApiResult<bool> {
    change_status(&state, payload, InterfaceStatus::Offline).await
}

/// Accepted but not dispatched anywhere; answers with `data: null`.
#[utoipa::path(
    post, path = "/interfaceInfo/invoke", tag = "interfaceInfo",
    request_body = crate::openapi::InvokeRequestDoc,
    responses((status = 200, description = "Always succeeds with null data"))
)]
pub async fn invoke(payload: Result<Json<Option<InvokeRequest>>, JsonRejection>) -> Json<BaseResponse<()>> {
    match payload {
        Ok(Json(Some(req))) => warn!(id = ?req.id, "invoke requested; dispatch is not available"),
        Ok(Json(None)) => info!("invoke called without body"),
        Err(e) => info!(err = %e.body_text(), "invoke called with unreadable body"),
    }
    Json(BaseResponse::empty())
}
