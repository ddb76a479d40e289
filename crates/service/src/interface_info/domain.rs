//! Request and filter shapes for interface management.
//!
//! Wire names are camelCase to stay compatible with the existing admin frontend.

use serde::{Deserialize, Serialize};

use crate::pagination::{Pagination, SortSpec};

/// 新增接口
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterfaceInfoAddRequest {
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

/// 更新接口：only fields that are present are written
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterfaceInfoUpdateRequest {
    pub id: Option<i64>,
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

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterfaceInfoUpdateAvatarRequest {
    pub id: Option<i64>,
    pub avatar_url: Option<String>,
}

/// Body of delete/online/offline calls
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdRequest {
    pub id: Option<i64>,
}

/// Body of the invoke call. Accepted and ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvokeRequest {
    pub id: Option<i64>,
    pub user_request_params: Option<String>,
}

/// Query string of `/list` and `/list/page`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InterfaceInfoQueryRequest {
    pub current: Option<u64>,
    pub page_size: Option<u64>,
    pub sort_field: Option<String>,
    pub sort_order: Option<String>,
    pub id: Option<i64>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub method: Option<String>,
    pub status: Option<i32>,
    pub user_id: Option<i64>,
    pub return_format: Option<String>,
}

impl InterfaceInfoQueryRequest {
    pub fn pagination(&self) -> Pagination { Pagination::from_request(self.current, self.page_size) }

    pub fn sort(&self) -> SortSpec { SortSpec::from_request(self.sort_field.as_deref(), self.sort_order.as_deref()) }

    pub fn filter(&self, text_match: TextMatch) -> InterfaceInfoFilter {
        InterfaceInfoFilter {
            id: self.id,
            name: non_blank(&self.name),
            description: non_blank(&self.description),
            url: non_blank(&self.url),
            method: non_blank(&self.method).map(|m| m.to_ascii_uppercase()),
            status: self.status,
            user_id: self.user_id,
            return_format: non_blank(&self.return_format),
            text_match,
        }
    }
}

/// Query string of `/get/searchText`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InterfaceInfoSearchTextRequest {
    pub current: Option<u64>,
    pub page_size: Option<u64>,
    pub sort_field: Option<String>,
    pub sort_order: Option<String>,
    pub search_text: Option<String>,
}

impl InterfaceInfoSearchTextRequest {
    pub fn pagination(&self) -> Pagination { Pagination::from_request(self.current, self.page_size) }

    pub fn sort(&self) -> SortSpec { SortSpec::from_request(self.sort_field.as_deref(), self.sort_order.as_deref()) }

    pub fn text(&self) -> Option<String> { non_blank(&self.search_text).map(|s| s.trim().to_string()) }
}

/// How text fields of a filter are compared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextMatch {
    /// `=` on every field
    #[default]
    Exact,
    /// `LIKE %v%` on name and description, `=` on the rest
    Contains,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InterfaceInfoFilter {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub method: Option<String>,
    pub status: Option<i32>,
    pub user_id: Option<i64>,
    pub return_format: Option<String>,
    pub text_match: TextMatch,
}

/// Validated column changes for an update
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InterfaceInfoPatch {
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

impl InterfaceInfoPatch {
    pub fn is_empty(&self) -> bool { *self == InterfaceInfoPatch::default() }
}

fn non_blank(v: &Option<String>) -> Option<String> {
    v.as_ref().filter(|s| !s.trim().is_empty()).cloned()
}
