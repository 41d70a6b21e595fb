use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One form submission. Every field is required; nothing else is validated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    pub name: String,
    pub role: String,
    pub motivation: String,
    pub performance: String,
    pub objectives: String,
}

#[derive(Debug, FromRow, Serialize, Deserialize)]
pub struct ReportRecord {
    pub id: i64,
    pub name: String,
    pub role: String,
    pub motivation: String,
    pub performance: String,
    pub objectives: String,
    pub pdf_name: String,
    pub timestamp: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub name: String,
    pub role: String,
    pub pdf_name: String,
}
