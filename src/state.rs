use crate::config::Config;
use crate::db::ReportStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    /// Present only when persistence is enabled.
    pub store: Option<ReportStore>,
    pub config: Arc<Config>,
}
