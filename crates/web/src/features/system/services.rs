use sqlx::SqlitePool;
use storage::{error::Result, models::EntryBounds, repository::entry::EntryRepository};

/// Timestamp bounds and total count over the whole journal
pub async fn get_bounds(pool: &SqlitePool) -> Result<EntryBounds> {
    let repo = EntryRepository::new(pool);
    repo.bounds().await
}
