//! OpenAPI document served at `/api-docs/openapi.json`; Swagger UI at `/docs`.

use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct InterfaceInfoAddRequestDoc {
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
    pub reduce_score: Option<i64>,
}

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct InterfaceInfoUpdateRequestDoc {
    pub id: i64,
    pub name: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub method: Option<String>,
    pub request_params: Option<String>,
    pub request_example: Option<String>,
    pub request_header: Option<String>,
    pub response_header: Option<String>,
    pub return_format: Option<String>,
    pub avatar_url: Option<String>,
    pub reduce_score: Option<i64>,
}

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct InterfaceInfoUpdateAvatarRequestDoc { pub id: i64, pub avatar_url: String }

#[derive(ToSchema)]
pub struct IdRequestDoc { pub id: i64 }

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct InvokeRequestDoc { pub id: Option<i64>, pub user_request_params: Option<String> }

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct InterfaceInfoDoc {
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
    /// 0 offline, 1 online
    pub status: i32,
    pub user_id: i64,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(ToSchema)]
pub struct InterfaceInfoPageDoc {
    pub records: Vec<InterfaceInfoDoc>,
    pub total: u64,
    pub size: u64,
    pub current: u64,
    pub pages: u64,
}

/// Envelope carrying a new id
#[derive(ToSchema)]
pub struct IdResponseDoc { pub code: i32, pub data: Option<i64>, pub message: String }

#[derive(ToSchema)]
pub struct BoolResponseDoc { pub code: i32, pub data: Option<bool>, pub message: String }

#[derive(ToSchema)]
pub struct InterfaceInfoResponseDoc { pub code: i32, pub data: Option<InterfaceInfoDoc>, pub message: String }

#[derive(ToSchema)]
pub struct PageResponseDoc { pub code: i32, pub data: Option<InterfaceInfoPageDoc>, pub message: String }

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::interface_info::add,
        crate::routes::interface_info::delete,
        crate::routes::interface_info::update_avatar,
        crate::routes::interface_info::update,
        crate::routes::interface_info::get_by_id,
        crate::routes::interface_info::list,
        crate::routes::interface_info::list_page,
        crate::routes::interface_info::search_text,
        crate::routes::interface_info::online,
        crate::routes::interface_info::offline,
        crate::routes::interface_info::invoke,
    ),
    components(
        schemas(
            HealthResponse,
            InterfaceInfoAddRequestDoc,
            InterfaceInfoUpdateRequestDoc,
            InterfaceInfoUpdateAvatarRequestDoc,
            IdRequestDoc,
            InvokeRequestDoc,
            InterfaceInfoDoc,
            InterfaceInfoPageDoc,
            IdResponseDoc,
            BoolResponseDoc,
            InterfaceInfoResponseDoc,
            PageResponseDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "interfaceInfo")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<_> = doc.paths.paths.keys().cloned().collect();
        for p in ["/health", "/interfaceInfo/add", "/interfaceInfo/get/searchText", "/interfaceInfo/invoke"] {
            assert!(paths.iter().any(|x| x == p), "missing {p}");
        }
    }
}
