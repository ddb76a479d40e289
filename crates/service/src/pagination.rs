//! Pagination utilities for service layer
//!
//! Provides `Pagination` input normalization, the `Page` result shape sent to
//! clients, and the whitelisted sort specification.

use serde::Serialize;

use crate::errors::ServiceError;

pub const DEFAULT_PAGE_SIZE: u64 = 10;
pub const MAX_PAGE_SIZE: u64 = 100;

/// Pagination parameters
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pagination {
    /// 1-based page index
    pub current: u64,
    /// items per page
    pub page_size: u64,
}

impl Pagination {
    pub fn from_request(current: Option<u64>, page_size: Option<u64>) -> Self {
        Self { current: current.unwrap_or(1), page_size: page_size.unwrap_or(DEFAULT_PAGE_SIZE) }
    }

    /// Clamp to sane defaults and return `(zero_based_page, per_page)`
    pub fn normalize(self) -> (u64, u64) {
        let current = if self.current == 0 { 1 } else { self.current };
        let per_page = self.page_size.clamp(1, MAX_PAGE_SIZE);
        (current - 1, per_page)
    }

    /// Rows skipped before the requested page, or `None` when the offset does
    /// not fit a signed 64-bit SQL `OFFSET`.
    pub fn offset(self) -> Option<u64> {
        let (idx, per_page) = self.normalize();
        idx.checked_mul(per_page).filter(|o| i64::try_from(*o).is_ok())
    }

    /// Reject a page whose offset cannot be expressed.
    pub fn checked(self) -> Result<Self, ServiceError> {
        match self.offset() {
            Some(_) => Ok(self),
            None => Err(ServiceError::Validation("current is out of range".into())),
        }
    }
}

impl Default for Pagination {
    fn default() -> Self { Self { current: 1, page_size: DEFAULT_PAGE_SIZE } }
}

/// One page of results
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub records: Vec<T>,
    pub total: u64,
    pub size: u64,
    pub current: u64,
    pub pages: u64,
}

impl<T> Page<T> {
    pub fn new(records: Vec<T>, total: u64, pagination: Pagination) -> Self {
        let (idx, size) = pagination.normalize();
        let pages = if total == 0 { 0 } else { total.div_ceil(size) };
        Self { records, total, size, current: idx + 1, pages }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascend,
    Descend,
}

impl SortOrder {
    /// `descend` (any case) sorts descending, everything else ascending.
    pub fn parse(s: Option<&str>) -> Self {
        match s {
            Some(v) if v.eq_ignore_ascii_case("descend") || v.eq_ignore_ascii_case("desc") => SortOrder::Descend,
            _ => SortOrder::Ascend,
        }
    }
}

/// Columns clients may sort on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    Id,
    Name,
    Status,
    ReduceScore,
    TotalInvokes,
    CreatedAt,
    UpdatedAt,
}

impl SortField {
    /// Unknown names yield `None` and are ignored by callers.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "id" => Some(SortField::Id),
            "name" => Some(SortField::Name),
            "status" => Some(SortField::Status),
            "reduceScore" => Some(SortField::ReduceScore),
            "totalInvokes" => Some(SortField::TotalInvokes),
            "createdAt" | "createTime" => Some(SortField::CreatedAt),
            "updatedAt" | "updateTime" => Some(SortField::UpdatedAt),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct SortSpec {
    pub field: SortField,
    pub order: SortOrder,
}

impl SortSpec {
    pub fn from_request(field: Option<&str>, order: Option<&str>) -> Self {
        match field.and_then(SortField::parse) {
            Some(field) => Self { field, order: SortOrder::parse(order) },
            None => Self::default(),
        }
    }
}
