use anyhow::Context;
use std::sync::Arc;

use tweeter_api::config::{Config, StoreBackend};
use tweeter_api::domain::memory::MemoryTweetStore;
use tweeter_api::domain::store::{PgTweetStore, TweetStore};
use tweeter_api::services::db;
use tweeter_api::{AppState, build_app, telemetry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init();

    let config = Config::from_env()?;

    let store: Arc<dyn TweetStore> = match config.store {
        StoreBackend::Postgres => {
            let pool = db::connect(&config)
                .await
                .context("Failed to connect to database")?;
            Arc::new(PgTweetStore::new(pool))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory tweet store; data is lost on exit");
            Arc::new(MemoryTweetStore::new())
        }
    };

    let app = build_app(AppState {
        store,
        jwt_secret: config.jwt_secret.into_bytes(),
    });

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    tracing::info!("Listening on http://{}", addr);
    axum::serve(listener, app).await.context("Server failed")?;

    Ok(())
}
