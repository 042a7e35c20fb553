//! Route definitions

use super::{error::ServerError, handlers, state::AppState};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

async fn handle_404() -> ServerError {
    ServerError::NotFound(
        "Not found. Visit / for the web UI or /api/health to check API status.".to_string(),
    )
}

async fn handle_405() -> ServerError {
    ServerError::MethodNotAllowed("Method not allowed.".to_string())
}

/// Create the main application router
pub fn create_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/models", get(handlers::list_models))
        .route("/data/info", get(handlers::get_data_info))
        .route("/predict", post(handlers::predict))
        .fallback(handle_404)
        .method_not_allowed_fallback(handle_405);

    Router::new()
        .nest("/api", api_routes)
        .route("/", get(handlers::home))
        .route(
            "/predict",
            get(handlers::predict_page).post(handlers::predict_submit),
        )
        .route("/info", get(handlers::info_page))
        .route("/data", get(handlers::data_page))
        .fallback(handle_404)
        .method_not_allowed_fallback(handle_405)
        .with_state(state)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
}
