use axum::{
    Json,
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::stats::StatsQuery,
    services::stats::AggregateResult,
};
use validator::Validate;

use crate::error::WebResult;

use super::services;

#[utoipa::path(
    get,
    path = "/api/stats",
    params(StatsQuery),
    responses(
        (status = 200, description = "Aggregated statistics over the requested range", body = AggregateResult),
        (status = 400, description = "Invalid query parameters")
    ),
    tag = "stats"
)]
pub async fn get_stats(
    State(db): State<Database>,
    Query(query): Query<StatsQuery>,
) -> WebResult<Response> {
    query.validate()?;

    let stats = services::get_stats(db.pool(), &query).await?;

    Ok(Json(stats).into_response())
}
