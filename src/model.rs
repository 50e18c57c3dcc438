//! Client entity, request payloads and the paging window.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

/// A persisted client row. Inactive rows are never returned by reads.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: Uuid,
    pub name: String,
    pub surname: String,
    pub email: String,
    pub birthdate: DateTime<Utc>,
    #[sqlx(rename = "isactive")]
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of create and update requests, before validation.
///
/// `birthdate` accepts an RFC 3339 timestamp, `YYYY-MM-DDTHH:MM:SS` (UTC) or `YYYY-MM-DD`.
#[derive(Clone, Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientPayload {
    /// Ignored on create; on update it must match the path id when present.
    pub id: Option<Uuid>,
    pub name: Option<String>,
    pub surname: Option<String>,
    pub email: Option<String>,
    pub birthdate: Option<String>,
}

/// Validated client fields, as written by create and update.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientDraft {
    pub name: String,
    pub surname: String,
    pub email: String,
    pub birthdate: DateTime<Utc>,
}

/// Raw `page` / `pageSize` query parameters.
#[derive(Clone, Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListParams {
    /// 1-based page number, default 1.
    pub page: Option<i64>,
    /// Rows per page, default 10, clamped to the configured maximum.
    pub page_size: Option<i64>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
}

impl Pagination {
    pub const DEFAULT_PAGE: u32 = 1;
    pub const DEFAULT_PAGE_SIZE: u32 = 10;

    pub fn limit(&self) -> i64 {
        i64::from(self.page_size)
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page.saturating_sub(1)) * i64::from(self.page_size)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Pagination {
            page: Self::DEFAULT_PAGE,
            page_size: Self::DEFAULT_PAGE_SIZE,
        }
    }
}
