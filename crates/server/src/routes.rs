pub mod auth;
pub mod interface_info;

use axum::{
    middleware,
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;

use crate::openapi::ApiDoc;
use auth::ServerState;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router: public reads, admin-gated writes, docs.
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    // Public routes
    let public = Router::new()
        .route("/health", get(health))
        .route("/interfaceInfo/get", get(interface_info::get_by_id))
        .route("/interfaceInfo/list/page", get(interface_info::list_page))
        .route("/interfaceInfo/get/searchText", get(interface_info::search_text))
        .route("/interfaceInfo/invoke", post(interface_info::invoke));

    // Admin routes
    let admin = Router::new()
        .route("/interfaceInfo/add", post(interface_info::add))
        .route("/interfaceInfo/delete", post(interface_info::delete))
        .route("/interfaceInfo/updateInterfaceInfoAvatar", post(interface_info::update_avatar))
        .route("/interfaceInfo/update", post(interface_info::update))
        .route("/interfaceInfo/list", get(interface_info::list))
        .route("/interfaceInfo/online", post(interface_info::online))
        .route("/interfaceInfo/offline", post(interface_info::offline))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_admin));

    // Compose
    public
        .merge(admin)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                // 每次请求创建 span，包含方法和路径等，日志级别为 INFO
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                // 响应返回时打点，包含状态码与耗时
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
