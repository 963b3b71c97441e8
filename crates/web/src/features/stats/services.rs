use chrono::Utc;
use sqlx::SqlitePool;
use storage::{
    dto::stats::StatsQuery,
    error::Result,
    repository::entry::{EntryFilter, EntryRepository},
    services::stats::{self, AggregateResult, Granularity, TimeRange},
};

/// Resolve the requested range and granularity, fetch a snapshot of the
/// matching entries, and aggregate them.
///
/// When no explicit range is given the window ends at `max(now, latest
/// entry)` so future-dated entries stay visible, and reaches back `days`
/// (or the granularity's display default) from there.
pub async fn get_stats(pool: &SqlitePool, query: &StatsQuery) -> Result<AggregateResult> {
    let repo = EntryRepository::new(pool);

    let granularity = Granularity::from_param(query.granularity.as_deref().unwrap_or("day"));
    let window_days = query.days.unwrap_or_else(|| granularity.default_window_days());
    let now_ms = Utc::now().timestamp_millis();

    let range = match (query.from_ts, query.to_ts) {
        (None, None) => {
            let bounds = repo.bounds().await?;
            TimeRange::default_for(now_ms, bounds.last_ts, window_days)
        }
        (from_ts, to_ts) => TimeRange {
            from_ts: from_ts.unwrap_or(i64::MIN),
            to_ts: to_ts.unwrap_or(i64::MAX),
        },
    };

    let entries = repo
        .list(&EntryFilter {
            from_ts: Some(range.from_ts),
            to_ts: Some(range.to_ts),
            limit: None,
        })
        .await?;

    Ok(stats::summarize(
        &entries,
        Some(range),
        granularity,
        window_days,
        now_ms,
    ))
}
