use std::{env, str::FromStr, time::Duration};

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server cache TTL in seconds (default: 30)
    pub cache_ttl_seconds: u64,
    /// Path to SQLite database file (default: "lessonbook.db")
    /// Note: Only used when the `sqlite` feature is enabled.
    #[allow(dead_code)]
    pub sqlite_path: String,
    /// Number of pooled store connections (default: 4)
    #[allow(dead_code)]
    pub store_pool_size: usize,
    /// Attempts made to open each store connection (default: 3)
    #[allow(dead_code)]
    pub store_connect_attempts: u32,
    /// Fixed delay between connection attempts in milliseconds (default: 1000)
    #[allow(dead_code)]
    pub store_connect_backoff_ms: u64,
    /// Request timeout in seconds (default: 10)
    pub request_timeout_seconds: u64,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `CACHE_TTL_SECONDS` - Cache TTL in seconds (default: 30)
    /// - `SQLITE_PATH` - SQLite database path (default: "lessonbook.db")
    /// - `STORE_POOL_SIZE` - Store connection pool size (default: 4)
    /// - `STORE_CONNECT_ATTEMPTS` - Connection attempts (default: 3)
    /// - `STORE_CONNECT_BACKOFF_MS` - Delay between attempts (default: 1000)
    /// - `REQUEST_TIMEOUT_SECONDS` - Request timeout (default: 10)
    pub fn from_env() -> Self {
        Self {
            cache_ttl_seconds: env_or("CACHE_TTL_SECONDS", 30),
            sqlite_path: env::var("SQLITE_PATH").unwrap_or_else(|_| "lessonbook.db".to_string()),
            store_pool_size: env_or("STORE_POOL_SIZE", 4).max(1),
            store_connect_attempts: env_or("STORE_CONNECT_ATTEMPTS", 3).max(1),
            store_connect_backoff_ms: env_or("STORE_CONNECT_BACKOFF_MS", 1_000),
            request_timeout_seconds: env_or("REQUEST_TIMEOUT_SECONDS", 10),
        }
    }

    /// Get cache TTL as a Duration.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_seconds)
    }

    /// Get the delay between store connection attempts.
    #[allow(dead_code)]
    pub fn store_connect_backoff(&self) -> Duration {
        Duration::from_millis(self.store_connect_backoff_ms)
    }

    /// Get the request timeout as a Duration.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
