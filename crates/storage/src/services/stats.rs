//! Statistics aggregation over mood entries.
//!
//! Pure functions over an in-memory slice of [`Entry`] values: no pool
//! access, no shared state. The web layer fetches a consistent snapshot of
//! rows and hands it here together with the requested range and granularity.
//!
//! Buckets are calendar-aligned under UTC. Two timestamps share a bucket iff
//! they fall on the same UTC day, the same ISO-8601 week, or the same UTC
//! calendar month, depending on granularity. Week keys carry the ISO
//! week-year, not the calendar year, so late-December and early-January
//! entries sort and label correctly across year boundaries.

use std::collections::HashMap;

use chrono::{DateTime, Datelike, NaiveDate, Utc, Weekday};
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::Entry;

pub const MS_PER_DAY: i64 = 86_400_000;

/// Bucket width selector for the aggregation series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Day,
    Week,
    Month,
}

impl Granularity {
    /// Parse a query-string value. Anything unrecognized falls back to
    /// [`Granularity::Day`]; an odd granularity is never worth a 400.
    pub fn from_param(value: &str) -> Self {
        match value {
            "week" => Granularity::Week,
            "month" => Granularity::Month,
            _ => Granularity::Day,
        }
    }

    /// Display-tier lookback window used when the caller supplies no range.
    pub fn default_window_days(self) -> i64 {
        match self {
            Granularity::Day => 60,
            Granularity::Week => 182,
            Granularity::Month => 730,
        }
    }
}

/// Inclusive time range in milliseconds since epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub from_ts: i64,
    pub to_ts: i64,
}

impl TimeRange {
    /// Default range ending at `max(now, latest entry)` so future-dated
    /// entries stay visible, reaching back `window_days`. Saturating
    /// arithmetic: an absurdly large window clamps to an all-time range
    /// instead of overflowing.
    pub fn default_for(now_ms: i64, latest_ts: Option<i64>, window_days: i64) -> Self {
        let to_ts = latest_ts.map_or(now_ms, |ts| ts.max(now_ms));
        Self {
            from_ts: to_ts.saturating_sub(window_days.saturating_mul(MS_PER_DAY)),
            to_ts,
        }
    }

    pub fn contains(&self, ts: i64) -> bool {
        ts >= self.from_ts && ts <= self.to_ts
    }
}

/// One point of the aggregation series. `ts` is the canonical bucket start
/// (UTC midnight of the day, the ISO-week Monday, or the first of the month).
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BucketSummary {
    pub key: String,
    pub ts: i64,
    pub avg: f64,
    pub min: i64,
    pub max: i64,
}

/// Overall summary plus the per-bucket series, sorted ascending by bucket
/// start. All scalar fields are `null` when no entry falls in the range.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AggregateResult {
    pub count: i64,
    pub avg: Option<f64>,
    pub min: Option<i64>,
    pub max: Option<i64>,
    pub last: Option<Entry>,
    pub granularity: Granularity,
    pub series: Vec<BucketSummary>,
}

impl AggregateResult {
    fn empty(granularity: Granularity) -> Self {
        Self {
            count: 0,
            avg: None,
            min: None,
            max: None,
            last: None,
            granularity,
            series: Vec::new(),
        }
    }
}

fn utc_date(ts_ms: i64) -> NaiveDate {
    // Entry timestamps are validated at ingestion; out-of-range values
    // cannot reach this point, so the epoch fallback is unreachable.
    DateTime::<Utc>::from_timestamp_millis(ts_ms)
        .unwrap_or_default()
        .date_naive()
}

fn midnight_ms(date: NaiveDate) -> i64 {
    date.and_hms_opt(0, 0, 0)
        .unwrap_or_default()
        .and_utc()
        .timestamp_millis()
}

/// Calendar bucket key for a timestamp: `YYYY-MM-DD`, `YYYY-Www` (ISO
/// week-year and week number), or `YYYY-MM`.
pub fn bucket_key(ts_ms: i64, granularity: Granularity) -> String {
    let date = utc_date(ts_ms);
    match granularity {
        Granularity::Day => date.format("%Y-%m-%d").to_string(),
        Granularity::Week => {
            let week = date.iso_week();
            format!("{}-W{:02}", week.year(), week.week())
        }
        Granularity::Month => date.format("%Y-%m").to_string(),
    }
}

/// Canonical bucket start for a timestamp, at UTC midnight. For weeks this
/// is the Monday reconstructed from the ISO week-year and week number, which
/// keeps it consistent with [`bucket_key`] even when the ISO week-year
/// differs from the calendar year.
pub fn bucket_start_ts(ts_ms: i64, granularity: Granularity) -> i64 {
    let date = utc_date(ts_ms);
    let start = match granularity {
        Granularity::Day => date,
        Granularity::Week => {
            let week = date.iso_week();
            NaiveDate::from_isoywd_opt(week.year(), week.week(), Weekday::Mon).unwrap_or(date)
        }
        Granularity::Month => date.with_day(1).unwrap_or(date),
    };
    midnight_ms(start)
}

/// Aggregate `entries` over `range` at the requested granularity.
///
/// When `range` is `None` a default window of `default_window_days` ending
/// at `max(now_ms, latest entry)` is derived. Filtering is inclusive on both
/// ends; an inverted range simply matches nothing. Entries need not be
/// ordered: the bucket map is order-independent and the series is sorted by
/// bucket start before it is returned.
pub fn summarize(
    entries: &[Entry],
    range: Option<TimeRange>,
    granularity: Granularity,
    default_window_days: i64,
    now_ms: i64,
) -> AggregateResult {
    let range = range.unwrap_or_else(|| {
        let latest_ts = entries.iter().map(|e| e.created_ts).max();
        TimeRange::default_for(now_ms, latest_ts, default_window_days)
    });

    let filtered: Vec<&Entry> = entries
        .iter()
        .filter(|e| range.contains(e.created_ts))
        .collect();

    if filtered.is_empty() {
        return AggregateResult::empty(granularity);
    }

    let mut sum = 0i64;
    let mut min = filtered[0].score;
    let mut max = filtered[0].score;
    let mut last: &Entry = filtered[0];
    for &entry in &filtered {
        sum += entry.score;
        if entry.score < min {
            min = entry.score;
        }
        if entry.score > max {
            max = entry.score;
        }
        if entry.created_ts >= last.created_ts {
            last = entry;
        }
    }

    let mut buckets: HashMap<String, (i64, Vec<i64>)> = HashMap::new();
    for &entry in &filtered {
        let key = bucket_key(entry.created_ts, granularity);
        let start = bucket_start_ts(entry.created_ts, granularity);
        buckets
            .entry(key)
            .or_insert_with(|| (start, Vec::new()))
            .1
            .push(entry.score);
    }

    let mut series: Vec<BucketSummary> = buckets
        .into_iter()
        .map(|(key, (ts, scores))| {
            let total: i64 = scores.iter().sum();
            BucketSummary {
                key,
                ts,
                avg: total as f64 / scores.len() as f64,
                min: scores.iter().copied().min().unwrap_or(0),
                max: scores.iter().copied().max().unwrap_or(0),
            }
        })
        .collect();
    series.sort_by_key(|bucket| bucket.ts);

    let count = filtered.len() as i64;
    AggregateResult {
        count,
        avg: Some(sum as f64 / count as f64),
        min: Some(min),
        max: Some(max),
        last: Some(last.clone()),
        granularity,
        series,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ms(year: i32, month: u32, day: u32, hour: u32) -> i64 {
        Utc.with_ymd_and_hms(year, month, day, hour, 0, 0)
            .unwrap()
            .timestamp_millis()
    }

    fn entry(id: i64, ts: i64, score: i64) -> Entry {
        Entry {
            id,
            created_at: DateTime::from_timestamp_millis(ts).unwrap(),
            created_ts: ts,
            score,
            note: None,
        }
    }

    fn wide_range() -> Option<TimeRange> {
        Some(TimeRange {
            from_ts: i64::MIN,
            to_ts: i64::MAX,
        })
    }

    #[test]
    fn unknown_granularity_falls_back_to_day() {
        assert_eq!(Granularity::from_param("day"), Granularity::Day);
        assert_eq!(Granularity::from_param("week"), Granularity::Week);
        assert_eq!(Granularity::from_param("month"), Granularity::Month);
        assert_eq!(Granularity::from_param("fortnight"), Granularity::Day);
        assert_eq!(Granularity::from_param(""), Granularity::Day);
    }

    #[test]
    fn default_range_never_ends_before_latest_entry() {
        let now = ms(2024, 6, 1, 0);
        let future = ms(2024, 7, 1, 0);

        let range = TimeRange::default_for(now, Some(future), 60);
        assert_eq!(range.to_ts, future);
        assert_eq!(range.from_ts, future - 60 * MS_PER_DAY);

        let range = TimeRange::default_for(now, Some(ms(2024, 5, 1, 0)), 60);
        assert_eq!(range.to_ts, now);

        let range = TimeRange::default_for(now, None, 60);
        assert_eq!(range.to_ts, now);
    }

    #[test]
    fn oversized_window_saturates_instead_of_overflowing() {
        let now = ms(2024, 6, 1, 0);

        let range = TimeRange::default_for(now, None, 200_000_000_000);
        assert_eq!(range.to_ts, now);
        assert!(range.from_ts <= range.to_ts);

        let entries = vec![entry(1, ms(2024, 5, 30, 0), 3)];
        let result = summarize(&entries, None, Granularity::Day, 200_000_000_000, now);
        assert_eq!(result.count, 1);
    }

    #[test]
    fn day_bucket_key_and_start() {
        let ts = ms(2024, 3, 10, 15);
        assert_eq!(bucket_key(ts, Granularity::Day), "2024-03-10");
        assert_eq!(bucket_start_ts(ts, Granularity::Day), ms(2024, 3, 10, 0));
    }

    #[test]
    fn month_bucket_handles_leap_day() {
        let ts = ms(2024, 2, 29, 12);
        assert_eq!(bucket_key(ts, Granularity::Month), "2024-02");
        assert_eq!(bucket_start_ts(ts, Granularity::Month), ms(2024, 2, 1, 0));
    }

    #[test]
    fn iso_week_year_boundary_belongs_to_previous_year() {
        // 2021-01-01 is a Friday in ISO week 53 of week-year 2020.
        let ts = ms(2021, 1, 1, 0);
        assert_eq!(bucket_key(ts, Granularity::Week), "2020-W53");
        assert_eq!(bucket_start_ts(ts, Granularity::Week), ms(2020, 12, 28, 0));
    }

    #[test]
    fn iso_week_key_and_monday_agree_across_year_boundaries() {
        for year in 2015..=2035 {
            let mut date = NaiveDate::from_ymd_opt(year - 1, 12, 20).unwrap();
            let end = NaiveDate::from_ymd_opt(year, 1, 10).unwrap();
            while date <= end {
                let ts = midnight_ms(date) + 12 * 3_600_000;
                let key = bucket_key(ts, Granularity::Week);
                let start = bucket_start_ts(ts, Granularity::Week);

                // The Monday must carry the same key as the timestamp it
                // anchors, precede it by less than a week, and be a Monday.
                assert_eq!(bucket_key(start, Granularity::Week), key);
                assert!(start <= ts && ts - start < 7 * MS_PER_DAY);
                assert_eq!(utc_date(start).weekday(), Weekday::Mon);
                date = date.succ_opt().unwrap();
            }
        }
    }

    #[test]
    fn empty_input_yields_null_result() {
        let result = summarize(&[], wide_range(), Granularity::Day, 60, 0);
        assert_eq!(result.count, 0);
        assert_eq!(result.avg, None);
        assert_eq!(result.min, None);
        assert_eq!(result.max, None);
        assert!(result.last.is_none());
        assert!(result.series.is_empty());
    }

    #[test]
    fn inverted_range_yields_empty_result() {
        let entries = vec![entry(1, ms(2024, 3, 10, 0), 5)];
        let range = Some(TimeRange {
            from_ts: ms(2024, 4, 1, 0),
            to_ts: ms(2024, 3, 1, 0),
        });

        let result = summarize(&entries, range, Granularity::Day, 60, 0);
        assert_eq!(result.count, 0);
        assert!(result.series.is_empty());
    }

    #[test]
    fn range_bounds_are_inclusive() {
        let to_ts = ms(2024, 3, 10, 12);
        let entries = vec![
            entry(1, to_ts, 3),
            entry(2, to_ts + 1, 7),
        ];
        let range = Some(TimeRange {
            from_ts: 0,
            to_ts,
        });

        let result = summarize(&entries, range, Granularity::Day, 60, 0);
        assert_eq!(result.count, 1);
        assert_eq!(result.max, Some(3));
    }

    #[test]
    fn two_day_scenario_aggregates_per_bucket() {
        let day1 = ms(2024, 3, 10, 0);
        let day2 = ms(2024, 3, 11, 0);
        let entries = vec![
            entry(1, day1, -5),
            entry(2, day1 + 3_600_000, 5),
            entry(3, day2, 0),
        ];

        let result = summarize(&entries, wide_range(), Granularity::Day, 60, 0);
        assert_eq!(result.count, 3);
        assert_eq!(result.avg, Some(0.0));
        assert_eq!(result.min, Some(-5));
        assert_eq!(result.max, Some(5));
        assert_eq!(result.last.as_ref().map(|e| e.id), Some(3));

        assert_eq!(result.series.len(), 2);
        let first = &result.series[0];
        assert_eq!(first.key, "2024-03-10");
        assert_eq!(first.ts, day1);
        assert_eq!((first.avg, first.min, first.max), (0.0, -5, 5));

        let second = &result.series[1];
        assert_eq!(second.key, "2024-03-11");
        assert_eq!((second.avg, second.min, second.max), (0.0, 0, 0));
    }

    #[test]
    fn series_is_sorted_by_bucket_start_not_scan_order() {
        // Deliberately unordered input spanning three weeks.
        let entries = vec![
            entry(1, ms(2024, 3, 20, 9), 2),
            entry(2, ms(2024, 3, 4, 9), -3),
            entry(3, ms(2024, 3, 12, 9), 1),
            entry(4, ms(2024, 3, 6, 9), 4),
        ];

        let result = summarize(&entries, wide_range(), Granularity::Week, 182, 0);
        let starts: Vec<i64> = result.series.iter().map(|b| b.ts).collect();
        let mut sorted = starts.clone();
        sorted.sort_unstable();
        assert_eq!(starts, sorted);
        assert_eq!(result.series.len(), 3);

        let keys: Vec<&str> = result.series.iter().map(|b| b.key.as_str()).collect();
        assert_eq!(keys, vec!["2024-W10", "2024-W11", "2024-W12"]);
    }

    #[test]
    fn bucket_counts_sum_to_total_count() {
        let entries: Vec<Entry> = (0..50)
            .map(|i| entry(i, ms(2024, 1, 1, 0) + i * 7 * 3_600_000, (i % 21) - 10))
            .collect();

        for granularity in [Granularity::Day, Granularity::Week, Granularity::Month] {
            let result = summarize(&entries, wide_range(), granularity, 60, 0);
            assert_eq!(result.count, entries.len() as i64);

            // The buckets partition the input: one series point per distinct
            // key, no duplicates.
            let distinct_keys = entries
                .iter()
                .map(|e| bucket_key(e.created_ts, granularity))
                .collect::<std::collections::HashSet<_>>()
                .len();
            assert_eq!(result.series.len(), distinct_keys);
        }
    }

    #[test]
    fn summarize_is_idempotent() {
        let entries = vec![
            entry(1, ms(2024, 3, 10, 8), 2),
            entry(2, ms(2024, 3, 17, 8), -4),
        ];

        let a = summarize(&entries, wide_range(), Granularity::Week, 182, 0);
        let b = summarize(&entries, wide_range(), Granularity::Week, 182, 0);
        assert_eq!(serde_json::to_value(&a).unwrap(), serde_json::to_value(&b).unwrap());
    }

    #[test]
    fn default_range_keeps_future_entries_visible() {
        let now = ms(2024, 6, 1, 0);
        let entries = vec![
            entry(1, ms(2024, 5, 30, 0), 1),
            entry(2, ms(2024, 6, 15, 0), 9),
        ];

        let result = summarize(&entries, None, Granularity::Day, 60, now);
        assert_eq!(result.count, 2);
        assert_eq!(result.last.as_ref().map(|e| e.id), Some(2));
    }

    #[test]
    fn serializes_with_wire_field_names() {
        let entries = vec![entry(1, ms(2024, 3, 10, 0), 5)];
        let result = summarize(&entries, wide_range(), Granularity::Day, 60, 0);

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["granularity"], "day");
        assert_eq!(json["series"][0]["key"], "2024-03-10");
        assert_eq!(json["series"][0]["ts"], ms(2024, 3, 10, 0));

        let empty = serde_json::to_value(summarize(&[], wide_range(), Granularity::Day, 60, 0))
            .unwrap();
        assert!(empty["avg"].is_null());
        assert!(empty["last"].is_null());
    }
}
