use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde_json::json;
use storage::{Database, models::EntryBounds};

use crate::error::WebResult;

use super::services;

#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service is up")
    ),
    tag = "system"
)]
pub async fn health() -> Response {
    Json(json!({ "ok": true, "time": Utc::now().to_rfc3339() })).into_response()
}

#[utoipa::path(
    get,
    path = "/api/meta",
    responses(
        (status = 200, description = "Timestamp bounds and entry count of the journal", body = EntryBounds)
    ),
    tag = "system"
)]
pub async fn meta(State(db): State<Database>) -> WebResult<Response> {
    let bounds = services::get_bounds(db.pool()).await?;

    Ok(Json(bounds).into_response())
}
