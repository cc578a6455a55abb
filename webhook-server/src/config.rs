//! Configuration module for environment variable parsing.
//!
//! Everything is read once at startup. Missing LINE credentials are not fatal:
//! the server still starts and reports itself as uninitialized on the
//! webhook and send endpoints.

use std::env;
use std::time::Duration;

use tracing::warn;
use url::Url;

/// Default base URL of the LINE Messaging API.
pub const DEFAULT_LINE_API_BASE_URL: &str = "https://api.line.me";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the web server to listen on
    pub port: u16,

    /// LINE channel secret used to verify webhook signatures
    pub channel_secret: Option<String>,

    /// LINE channel access token used for the push API
    pub channel_token: Option<String>,

    /// Base URL of the Messaging API
    pub line_api_base_url: String,

    /// HTTP request timeout for the push API, in milliseconds
    pub request_timeout_ms: u64,

    /// When set, normalized messages are POSTed here
    pub notify_webhook_url: Option<Url>,

    /// When set, normalized messages are published to RabbitMQ
    pub notify_amqp_url: Option<String>,

    /// Upper bound on a single sink delivery, in milliseconds
    pub notify_timeout_ms: u64,
}

/// Channel credentials. Only constructed when both values are present.
#[derive(Clone)]
pub struct Credentials {
    pub channel_secret: String,
    pub channel_token: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("channel_secret", &"<redacted>")
            .field("channel_token", &"<redacted>")
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Config {
            port: parse_or("PORT", 8080),

            channel_secret: non_blank("LINE_CHANNEL_SECRET"),

            channel_token: non_blank("LINE_CHANNEL_TOKEN"),

            line_api_base_url: parse_url("LINE_API_BASE_URL")
                .map(|u| u.as_str().trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_LINE_API_BASE_URL.to_string()),

            request_timeout_ms: parse_or("REQUEST_TIMEOUT_MS", 8000),

            notify_webhook_url: parse_url("NOTIFY_WEBHOOK_URL"),

            notify_amqp_url: non_blank("NOTIFY_AMQP_URL"),

            notify_timeout_ms: parse_or("NOTIFY_TIMEOUT_MS", 5000),
        }
    }

    /// Both credentials, or `None` if either is missing.
    pub fn credentials(&self) -> Option<Credentials> {
        match (&self.channel_secret, &self.channel_token) {
            (Some(secret), Some(token)) => Some(Credentials {
                channel_secret: secret.clone(),
                channel_token: token.clone(),
            }),
            _ => None,
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn notify_timeout(&self) -> Duration {
        Duration::from_millis(self.notify_timeout_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8080,
            channel_secret: None,
            channel_token: None,
            line_api_base_url: DEFAULT_LINE_API_BASE_URL.to_string(),
            request_timeout_ms: 8000,
            notify_webhook_url: None,
            notify_amqp_url: None,
            notify_timeout_ms: 5000,
        }
    }
}

/// Parse a numeric variable, keeping the default when absent or invalid.
fn parse_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    let raw = match env::var(name) {
        Ok(v) => v,
        Err(_) => return default,
    };

    match raw.trim().parse() {
        Ok(v) => v,
        Err(_) => {
            warn!(env_var = name, value = %raw, "Invalid number, using default");
            default
        }
    }
}

/// Read a variable, treating blank values as unset.
fn non_blank(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_url(name: &str) -> Option<Url> {
    let raw = non_blank(name)?;
    match Url::parse(&raw) {
        Ok(url) => Some(url),
        Err(e) => {
            warn!(env_var = name, value = %raw, error = %e, "Invalid URL, ignoring");
            None
        }
    }
}
