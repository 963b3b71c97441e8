use axum::{Router, routing::get};
use storage::Database;

use super::handlers::{health, meta};

pub fn routes() -> Router<Database> {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/meta", get(meta))
}
