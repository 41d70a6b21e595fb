pub mod chart;
pub mod config;
pub mod db;
pub mod error;
pub mod pdf;
pub mod routes;
pub mod state;
pub mod storage;
pub mod templates;

use axum::{
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::db::ReportStore;
use crate::state::AppState;

/// Creates the data directories and, when persistence is on, opens the store.
pub async fn init_state(
    config: Config,
) -> Result<Arc<AppState>, Box<dyn std::error::Error + Send + Sync>> {
    storage::ensure_dirs(&config.pdf_folder, &config.backup_folder)?;

    let store = if config.persistence {
        let store = ReportStore::open(&config.store_layout()).await?;
        tracing::info!("Report database: {:?}", store.path());
        Some(store)
    } else {
        None
    };

    Ok(Arc::new(AppState {
        store,
        config: Arc::new(config),
    }))
}

pub fn build_router(state: Arc<AppState>) -> Router {
    let mut app = Router::new()
        .route("/", get(routes::index))
        .route("/process", post(routes::process_submission))
        .route("/download/:filename", get(routes::download_report))
        .route("/remove_pdf/:filename", delete(routes::remove_report));

    if state.store.is_some() {
        app = app.route("/history", get(routes::history));
    }

    app.nest_service("/static", tower_http::services::ServeDir::new("static"))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
