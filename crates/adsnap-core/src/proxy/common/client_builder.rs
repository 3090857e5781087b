use std::time::Duration;

use tracing::warn;

/// Build HTTP client with the provider timeout applied.
pub fn build_http_client(timeout_secs: u64) -> Result<reqwest::Client, String> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs.max(5)))
        .tcp_nodelay(true)
        .user_agent(concat!("adsnap/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| format!("Failed to build HTTP client: {}", e))
}

/// Normalize a configured base URL, falling back to `default` when it is
/// blank or unparsable.
pub fn resolve_base_url(raw: &str, default: &str) -> String {
    let url = raw.trim().trim_end_matches('/');
    if url.is_empty() {
        return default.to_string();
    }
    if url::Url::parse(url).is_err() {
        warn!(configured = url, "Base URL is not a valid URL, using default");
        return default.to_string();
    }
    url.to_string()
}
