#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    /// Absent for fixture-only runs; live runs require it.
    pub database_url: Option<String>,
    pub env: Environment,
    pub log_level: String,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    pub google_base_url: String,
    pub google_request_timeout_secs: u64,
    pub google_max_retries: u32,
    pub google_retry_backoff_base_ms: u64,
    pub provider_max_concurrent_units: usize,
    pub provider_call_timeout_secs: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field(
                "database_url",
                &self.database_url.as_ref().map(|_| "[redacted]"),
            )
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field("google_base_url", &self.google_base_url)
            .field(
                "google_request_timeout_secs",
                &self.google_request_timeout_secs,
            )
            .field("google_max_retries", &self.google_max_retries)
            .field(
                "google_retry_backoff_base_ms",
                &self.google_retry_backoff_base_ms,
            )
            .field(
                "provider_max_concurrent_units",
                &self.provider_max_concurrent_units,
            )
            .field(
                "provider_call_timeout_secs",
                &self.provider_call_timeout_secs,
            )
            .finish()
    }
}
