use axum::{
    Router,
    routing::{delete, get, post},
};
use storage::Database;

use super::handlers::{create_entry, delete_entry, list_entries};

pub fn routes() -> Router<Database> {
    Router::new()
        .route("/", get(list_entries))
        .route("/", post(create_entry))
        .route("/:id", delete(delete_entry))
}
