//! Server configuration loaded from environment variables.

use std::time::Duration;

/// Runtime configuration for the web server.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP listener binds to.
    pub listen_addr: String,
    /// Path of the SQLite database file.
    pub db_path: String,
    /// Base URL of the external audit/event sink; unset disables dispatch.
    pub event_sink_url: Option<String>,
    /// Timeout for a single event publish.
    pub event_sink_timeout: Duration,
    /// Cadence of live summary subscriptions.
    pub stream_tick: Duration,
    /// Static bearer token protecting the API; unset leaves it open
    /// (trusted upstream handles authentication).
    pub api_token: Option<String>,
}

impl Config {
    /// Reads configuration from the environment, with defaults suitable for
    /// local development.
    pub fn from_env() -> Self {
        Self {
            listen_addr: env_or("TF_LISTEN_ADDR", "0.0.0.0:8080"),
            db_path: env_or("TF_DB_PATH", "techfolio.db"),
            event_sink_url: non_empty(std::env::var("TF_EVENT_SINK_URL").ok()),
            event_sink_timeout: Duration::from_millis(env_parsed(
                "TF_EVENT_SINK_TIMEOUT_MS",
                5_000,
            )),
            stream_tick: Duration::from_millis(env_parsed("TF_STREAM_TICK_MS", 2_000)),
            api_token: non_empty(std::env::var("TF_API_TOKEN").ok()),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parsed(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}
