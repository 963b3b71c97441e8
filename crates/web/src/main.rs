use anyhow::Context;
use axum::Router;
use storage::Database;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod config;
mod error;
mod features;

use config::Config;

#[derive(OpenApi)]
#[openapi(
    paths(
        features::entries::handlers::list_entries,
        features::entries::handlers::create_entry,
        features::entries::handlers::delete_entry,
        features::stats::handlers::get_stats,
        features::system::handlers::health,
        features::system::handlers::meta,
    ),
    components(
        schemas(
            storage::models::Entry,
            storage::models::EntryBounds,
            storage::dto::entry::CreateEntryRequest,
            storage::services::stats::Granularity,
            storage::services::stats::BucketSummary,
            storage::services::stats::AggregateResult,
        )
    ),
    tags(
        (name = "entries", description = "Mood journal entry endpoints"),
        (name = "stats", description = "Aggregated statistics endpoints"),
        (name = "system", description = "Health and metadata endpoints"),
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_target(true)
        .init();

    tracing::info!("Starting mood journal API");

    let config = Config::from_env().context("Failed to load API configuration")?;

    let db = Database::new(&config.database_url)
        .await
        .context("Failed to initialize database")?;
    tracing::info!("Database connection established");

    db.run_migrations()
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Database migrations completed");

    let app = Router::new()
        .nest("/api/entries", features::entries::routes())
        .nest("/api/stats", features::stats::routes())
        .merge(features::system::routes())
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(db);

    let bind_address = format!("{}:{}", config.host, config.port);
    tracing::info!("Listening on http://{}", bind_address);
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", bind_address);

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;
    axum::serve(listener, app).await?;

    Ok(())
}
