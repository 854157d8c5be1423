//! Axum router: maps all URL paths to handlers.

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    services::ServeDir,
    trace::TraceLayer,
};

use crate::handlers::{
    api::{api_fold, api_health, api_predict},
    pages::index,
    structures::{download_structure, next_structure, predict_structures, prev_structure},
    submit::{back, download_csv, submit},
};
use crate::session::session_layer;
use crate::state::SharedState;

/// Build and return the full Axum router.
pub fn build_router(state: SharedState) -> Router {
    let static_dir = state.config.server.static_dir.clone();
    let body_limit = state.config.server.max_upload_bytes;

    Router::new()
        // Pages
        .route("/",            get(index))
        .route("/submit",      post(submit))
        .route("/back",        post(back))
        .route("/results.csv", get(download_csv))

        // Structures
        .route("/structures",                 post(predict_structures))
        .route("/structures/next",            post(next_structure))
        .route("/structures/prev",            post(prev_structure))
        .route("/structures/{n}/download",    get(download_structure))

        // API endpoints
        .route("/api/health",  get(api_health))
        .route("/api/predict", post(api_predict))
        .route("/api/fold",    post(api_fold))

        // Sessions for the routes above; static files go without
        .route_layer(middleware::from_fn_with_state(state.clone(), session_layer))

        // Static files
        .nest_service("/static", ServeDir::new(static_dir))

        // Middleware
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
