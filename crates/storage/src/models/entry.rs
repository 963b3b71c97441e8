use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// A single mood journal entry. Immutable once created; removed only by id.
///
/// `created_ts` (milliseconds since epoch, UTC) is the canonical timestamp
/// used for range filtering and bucketing. `created_at` is the same instant
/// as an ISO-8601 string column, kept for human-readable exports.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Entry {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub created_ts: i64,
    pub score: i64,
    pub note: Option<String>,
}

/// Timestamp bounds of the journal, served as `/api/meta`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct EntryBounds {
    pub first_ts: Option<i64>,
    pub last_ts: Option<i64>,
    pub count: i64,
}
