pub mod config;
pub mod constants;
pub mod domain;
pub mod error;
pub mod routes;
pub mod services;
pub mod telemetry;
pub mod views;

use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use domain::store::TweetStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn TweetStore>,
    pub jwt_secret: Vec<u8>,
}

/// Build the full application router
pub fn build_app(state: AppState) -> Router {
    routes::build_routes()
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}
