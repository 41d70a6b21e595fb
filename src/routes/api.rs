use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use crate::state::AppState;
use crate::storage::{remove_report_file, resolve_report_path};

pub async fn download_report(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
) -> Response {
    let path = match resolve_report_path(&state.config.pdf_folder, &filename) {
        Some(path) if path.exists() => path,
        _ => return not_found(),
    };

    let content = tokio::fs::read(&path).await;

    // The report is single-use: it goes away whether or not the read worked.
    cleanup_report(&state, &filename).await;

    match content {
        Ok(content) => {
            let mime = mime_guess::from_path(&filename)
                .first_raw()
                .unwrap_or("application/octet-stream");
            (
                [
                    (header::CONTENT_TYPE, mime.to_string()),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("attachment; filename=\"{}\"", filename),
                    ),
                ],
                content,
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!("Failed to read report {}: {}", filename, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": "Failed to read file" })),
            )
                .into_response()
        }
    }
}

pub async fn remove_report(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
) -> Json<serde_json::Value> {
    cleanup_report(&state, &filename).await;
    Json(serde_json::json!({ "status": "ok" }))
}

pub async fn history(State(state): State<Arc<AppState>>) -> Response {
    let Some(store) = &state.store else {
        return StatusCode::NOT_FOUND.into_response();
    };

    match store.list_history().await {
        Ok(entries) => Json(entries).into_response(),
        Err(e) => {
            tracing::error!("Failed to load history: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": "Failed to load history" })),
            )
                .into_response()
        }
    }
}

/// Deletes the report file and its record. Failures are logged, never returned.
async fn cleanup_report(state: &AppState, filename: &str) {
    if let Some(path) = resolve_report_path(&state.config.pdf_folder, filename) {
        match remove_report_file(&path) {
            Ok(true) => tracing::info!("Removed report {}", filename),
            Ok(false) => {}
            Err(e) => tracing::error!("Failed to remove report {}: {}", filename, e),
        }
    }

    if let Some(store) = &state.store {
        if let Err(e) = store.delete_report(filename).await {
            tracing::error!("Failed to delete record for {}: {}", filename, e);
        }
    }
}

fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({ "error": "File not found" })),
    )
        .into_response()
}
