use axum::{
    extract::State,
    response::{Html, IntoResponse},
    Json,
};
use std::sync::Arc;
use tera::Context;

use crate::error::ReportError;
use crate::routes::SubmissionForm;
use crate::state::AppState;

pub async fn index(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let mut ctx = Context::new();
    ctx.insert("history_enabled", &state.store.is_some());
    render_template("index.html", ctx)
}

/// Builds the report for one submission and records it when a store is configured.
pub async fn process_submission(
    State(state): State<Arc<AppState>>,
    SubmissionForm(submission): SubmissionForm,
) -> Result<Json<serde_json::Value>, ReportError> {
    let pdf_dir = state.config.pdf_folder.clone();
    let job = submission.clone();
    let pdf_name =
        tokio::task::spawn_blocking(move || crate::pdf::generate_report(&job, &pdf_dir)).await??;

    tracing::info!("Generated report {} for {}", pdf_name, submission.name);

    if let Some(store) = &state.store {
        if let Err(e) = store.insert_report(&submission, &pdf_name).await {
            tracing::error!("Failed to record report {}: {}", pdf_name, e);
        }
    }

    Ok(Json(serde_json::json!({ "pdf_name": pdf_name })))
}

fn render_template(name: &str, ctx: Context) -> Html<String> {
    let tera = crate::templates::get_tera();
    let rendered = tera.render(name, &ctx).unwrap_or_else(|e| {
        tracing::error!("Template {} failed to render: {}", name, e);
        format!("Template error: {}", name)
    });
    Html(rendered)
}
