use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use storage::{
    Database,
    dto::entry::{CreateEntryRequest, EntryListQuery},
    models::Entry,
};
use validator::Validate;

use crate::error::WebResult;

use super::services;

#[utoipa::path(
    get,
    path = "/api/entries",
    params(EntryListQuery),
    responses(
        (status = 200, description = "Entries in the requested range, ascending by timestamp", body = Vec<Entry>)
    ),
    tag = "entries"
)]
pub async fn list_entries(
    State(db): State<Database>,
    Query(query): Query<EntryListQuery>,
) -> WebResult<Response> {
    let entries = services::list_entries(db.pool(), &query).await?;

    Ok(Json(entries).into_response())
}

#[utoipa::path(
    post,
    path = "/api/entries",
    request_body = CreateEntryRequest,
    responses(
        (status = 201, description = "Entry recorded successfully", body = Entry),
        (status = 400, description = "Score outside [-10, 10] or invalid timestamp")
    ),
    tag = "entries"
)]
pub async fn create_entry(
    State(db): State<Database>,
    Json(req): Json<CreateEntryRequest>,
) -> WebResult<Response> {
    req.validate()?;

    let entry = services::create_entry(db.pool(), &req).await?;

    Ok((StatusCode::CREATED, Json(entry)).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/entries/{id}",
    params(
        ("id" = i64, Path, description = "Entry id")
    ),
    responses(
        (status = 200, description = "Entry deleted"),
        (status = 404, description = "Entry not found")
    ),
    tag = "entries"
)]
pub async fn delete_entry(
    State(db): State<Database>,
    Path(id): Path<i64>,
) -> WebResult<Response> {
    services::delete_entry(db.pool(), id).await?;

    Ok(Json(json!({ "ok": true })).into_response())
}
