use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::error::{Result, StorageError};
use crate::models::{Entry, EntryBounds};

/// Optional filters for listing entries. Bounds are inclusive milliseconds
/// since epoch; `limit` caps the result set after ordering.
#[derive(Debug, Clone, Copy, Default)]
pub struct EntryFilter {
    pub from_ts: Option<i64>,
    pub to_ts: Option<i64>,
    pub limit: Option<i64>,
}

pub struct EntryRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> EntryRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new entry. When `created_ts` is absent the current time is
    /// used; the ISO `created_at` column is always derived from `created_ts`
    /// so the two can never disagree.
    pub async fn insert(
        &self,
        score: i64,
        note: Option<&str>,
        created_ts: Option<i64>,
    ) -> Result<Entry> {
        let created_ts = created_ts.unwrap_or_else(|| Utc::now().timestamp_millis());
        let created_at = DateTime::<Utc>::from_timestamp_millis(created_ts).ok_or_else(|| {
            StorageError::ConstraintViolation(format!(
                "createdTs {} is outside the representable date range",
                created_ts
            ))
        })?;

        let entry = sqlx::query_as::<_, Entry>(
            r#"
            INSERT INTO entries (created_at, created_ts, score, note)
            VALUES (?, ?, ?, ?)
            RETURNING id, created_at, created_ts, score, note
            "#,
        )
        .bind(created_at)
        .bind(created_ts)
        .bind(score)
        .bind(note)
        .fetch_one(self.pool)
        .await?;

        Ok(entry)
    }

    /// List entries ascending by `created_ts`, optionally bounded by an
    /// inclusive time range.
    pub async fn list(&self, filter: &EntryFilter) -> Result<Vec<Entry>> {
        let mut query: QueryBuilder<Sqlite> =
            QueryBuilder::new("SELECT id, created_at, created_ts, score, note FROM entries");

        let mut prefix = " WHERE ";
        if let Some(from_ts) = filter.from_ts {
            query.push(prefix).push("created_ts >= ").push_bind(from_ts);
            prefix = " AND ";
        }
        if let Some(to_ts) = filter.to_ts {
            query.push(prefix).push("created_ts <= ").push_bind(to_ts);
        }

        query.push(" ORDER BY created_ts ASC");
        if let Some(limit) = filter.limit {
            query.push(" LIMIT ").push_bind(limit);
        }

        let entries = query
            .build_query_as::<Entry>()
            .fetch_all(self.pool)
            .await?;

        Ok(entries)
    }

    /// Delete an entry by id.
    pub async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM entries WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }

    /// Timestamp bounds and total count over the whole journal.
    pub async fn bounds(&self) -> Result<EntryBounds> {
        let bounds = sqlx::query_as::<_, EntryBounds>(
            r#"
            SELECT MIN(created_ts) AS first_ts,
                   MAX(created_ts) AS last_ts,
                   COUNT(*) AS count
            FROM entries
            "#,
        )
        .fetch_one(self.pool)
        .await?;

        Ok(bounds)
    }
}
