use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Query parameters accepted by the stats endpoint.
///
/// `granularity` is a free-form string so that unknown values can fall back
/// to daily buckets instead of failing deserialization. `days` overrides the
/// granularity-implied default window and only applies when no explicit
/// range is given.
#[derive(Debug, Clone, Default, Deserialize, Validate, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatsQuery {
    pub granularity: Option<String>,
    pub from_ts: Option<i64>,
    pub to_ts: Option<i64>,

    #[validate(range(min = 1, message = "days must be a positive number of days"))]
    pub days: Option<i64>,
}
