//! ABP-Xplorer web server
//!
//! Run with: cargo run -p abpx-web

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use abpx_common::AppConfig;
use abpx_web::{
    router::build_router,
    session::spawn_session_sweeper,
    state::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialise structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("abpx=debug,info")),
        )
        .init();

    info!("🧪 ABP-Xplorer starting up...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let config = AppConfig::load()?;
    let addr = config.bind_address();
    info!(
        "Folding via {} ({} concurrent, {}s timeout)",
        config.folding.endpoint, config.folding.max_concurrency, config.folding.timeout_secs
    );

    let state = Arc::new(AppState::from_config(config)?);
    spawn_session_sweeper(state.clone());

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("🚀 Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
