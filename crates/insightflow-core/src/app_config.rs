/// Application configuration for the insight pipeline.
///
/// Every field has a default, so a bare environment yields a working
/// configuration pointed at a local backend.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the analysis backend.
    pub api_base_url: String,
    /// Per-request deadline for the fetch client, in seconds.
    pub request_timeout_secs: u64,
    /// Cadence of the background poll loop, in milliseconds.
    pub poll_interval_ms: u64,
    /// Log filter passed to the tracing subscriber.
    pub log_level: String,
}
