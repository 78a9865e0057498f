//! Configuration module for environment variable parsing.
//!
//! Configuration is read once at startup and shared read-only afterwards.

use std::env;
use std::time::Duration;

use tracing::warn;
use url::Url;

/// Upstream tips API used when `TIPS_API_URL` is unset.
pub const DEFAULT_TIPS_API_URL: &str = "https://frog.tips/api/1/tips";

/// Slack OAuth v2 token endpoint used when `SLACK_OAUTH_ACCESS_URL` is unset.
pub const DEFAULT_OAUTH_ACCESS_URL: &str = "https://slack.com/api/oauth.v2.access";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Slack signing secret for request verification
    pub signing_secret: Option<String>,

    /// OAuth client id used by the install flow
    pub client_id: String,

    /// OAuth client secret used by the install flow
    pub client_secret: String,

    /// Redirect URI sent with the token exchange (may be empty)
    pub redirect_uri: String,

    /// Endpoint returning `{"tips": [...]}`
    pub tips_api_url: String,

    /// Token exchange endpoint for the install flow
    pub oauth_access_url: String,

    /// Maximum age in seconds for request timestamps, 0 disables the check
    pub signature_max_age: u64,

    /// HTTP request timeout in milliseconds for outbound calls
    pub request_timeout_ms: u64,

    /// Port for the web server to listen on
    pub port: u16,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let config = Config {
            signing_secret: first_var(&["SLACK_SIGNING_SECRET", "SLACK_SIGNING_SECRET_SHH"]),

            client_id: env::var("SLACK_CLIENT_ID").unwrap_or_default(),

            client_secret: env::var("SLACK_CLIENT_SECRET").unwrap_or_default(),

            redirect_uri: env::var("SLACK_REDIRECT_URI").unwrap_or_default(),

            tips_api_url: parse_url("TIPS_API_URL", DEFAULT_TIPS_API_URL),

            oauth_access_url: parse_url("SLACK_OAUTH_ACCESS_URL", DEFAULT_OAUTH_ACCESS_URL),

            signature_max_age: parse_number("SLACK_SIGNATURE_MAX_AGE", 300), // 5 minutes

            request_timeout_ms: parse_number("REQUEST_TIMEOUT_MS", 8000),

            port: parse_number("PORT", 8080),
        };

        if !config.has_signing_secret() {
            warn!("slack_signing_secret_missing");
        }
        if config.client_id.is_empty() || config.client_secret.is_empty() {
            warn!(
                has_client_id = !config.client_id.is_empty(),
                has_client_secret = !config.client_secret.is_empty(),
                "slack_oauth_credentials_missing"
            );
        }

        config
    }

    /// Whether a non-blank signing secret is configured.
    pub fn has_signing_secret(&self) -> bool {
        self.signing_secret
            .as_ref()
            .map(|s| !s.trim().is_empty())
            .unwrap_or(false)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// Value of the first set variable among `names`.
fn first_var(names: &[&str]) -> Option<String> {
    names.iter().find_map(|name| env::var(name).ok())
}

/// Parse a numeric variable, falling back to `default` when unset or invalid.
fn parse_number<T: std::str::FromStr>(name: &str, default: T) -> T {
    let raw = match env::var(name) {
        Ok(v) => v,
        Err(_) => return default,
    };

    match raw.trim().parse::<T>() {
        Ok(v) => v,
        Err(_) => {
            warn!(env_var = name, value = %raw, "Invalid number, using default");
            default
        }
    }
}

/// Parse an absolute URL variable, falling back to `default` when unset or invalid.
fn parse_url(name: &str, default: &str) -> String {
    let raw = match env::var(name) {
        Ok(v) => v,
        Err(_) => return default.to_string(),
    };

    let trimmed = raw.trim();
    match Url::parse(trimmed) {
        Ok(_) => trimmed.to_string(),
        Err(e) => {
            warn!(env_var = name, value = %raw, error = %e, "Invalid URL, using default");
            default.to_string()
        }
    }
}
