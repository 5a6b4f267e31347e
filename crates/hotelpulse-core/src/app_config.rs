use std::path::PathBuf;

/// Runtime settings for a retrieval run, read from `HOTELPULSE_*` env vars.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub roster_path: PathBuf,
    /// Cumulative JSON Lines report; appended to by every run.
    pub report_path: PathBuf,
    /// Per-run CSV snapshot, overwritten after each run when set.
    pub csv_path: Option<PathBuf>,
    /// Directory for page-source dumps when extraction fails.
    pub debug_dir: Option<PathBuf>,
    pub max_concurrent_hotels: usize,
    /// Upper bound on open browser sessions. `0` means "same as concurrency".
    pub session_pool_size: usize,
    pub strategy_timeout_ms: u64,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub search_base_url: String,
    pub max_retries: u32,
    pub retry_backoff_base_ms: u64,
    pub rating_min: f64,
    pub rating_max: f64,
}

impl AppConfig {
    /// Session pool capacity for a run at the given concurrency ceiling.
    #[must_use]
    pub fn effective_pool_size(&self, concurrency: usize) -> usize {
        if self.session_pool_size == 0 {
            concurrency.max(1)
        } else {
            self.session_pool_size
        }
    }
}
