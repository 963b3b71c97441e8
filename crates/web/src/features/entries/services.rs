use sqlx::SqlitePool;
use storage::{
    dto::entry::{CreateEntryRequest, EntryListQuery},
    error::Result,
    models::Entry,
    repository::entry::{EntryFilter, EntryRepository},
};

/// List entries ascending by timestamp within the optional inclusive range.
/// A non-positive `limit` means no limit.
pub async fn list_entries(pool: &SqlitePool, query: &EntryListQuery) -> Result<Vec<Entry>> {
    let repo = EntryRepository::new(pool);
    repo.list(&EntryFilter {
        from_ts: query.from_ts,
        to_ts: query.to_ts,
        limit: (query.limit > 0).then_some(query.limit),
    })
    .await
}

/// Record a new entry
pub async fn create_entry(pool: &SqlitePool, request: &CreateEntryRequest) -> Result<Entry> {
    let repo = EntryRepository::new(pool);
    repo.insert(
        request.score,
        request.trimmed_note().as_deref(),
        request.created_ts,
    )
    .await
}

/// Delete an entry by id
pub async fn delete_entry(pool: &SqlitePool, id: i64) -> Result<()> {
    let repo = EntryRepository::new(pool);
    repo.delete(id).await
}
