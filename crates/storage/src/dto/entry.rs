use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Request payload for recording a mood entry
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEntryRequest {
    #[validate(range(
        min = -10,
        max = 10,
        message = "score must be an integer between -10 and 10"
    ))]
    pub score: i64,

    #[validate(length(max = 2000, message = "note must be at most 2000 characters"))]
    pub note: Option<String>,

    /// Optional backdated timestamp in milliseconds since epoch; defaults to
    /// the time of insertion.
    pub created_ts: Option<i64>,
}

impl CreateEntryRequest {
    /// Whitespace-trimmed note, with empty notes collapsed to `None`.
    pub fn trimmed_note(&self) -> Option<String> {
        self.note
            .as_deref()
            .map(str::trim)
            .filter(|note| !note.is_empty())
            .map(str::to_string)
    }
}

/// Query parameters accepted by the entry listing endpoint
#[derive(Debug, Clone, Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EntryListQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    pub from_ts: Option<i64>,
    pub to_ts: Option<i64>,
}

fn default_limit() -> i64 {
    500
}
