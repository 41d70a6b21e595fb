use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

/// Failures while producing a report file.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("chart rendering failed: {0}")]
    Chart(String),

    #[error("chart image could not be decoded: {0}")]
    Image(#[from] image::ImageError),

    #[error("PDF composition failed: {0}")]
    Pdf(String),

    #[error("report worker failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl ReportError {
    pub(crate) fn pdf(e: impl std::fmt::Debug) -> Self {
        ReportError::Pdf(format!("{:?}", e))
    }
}

impl IntoResponse for ReportError {
    fn into_response(self) -> Response {
        tracing::error!("Report generation failed: {}", self);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": self.to_string() })),
        )
            .into_response()
    }
}
