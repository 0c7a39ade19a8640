//! Server URL handling.
//!
//! Operators configure the xDome server loosely (`xdome.example.com`,
//! `https://xdome.example.com/`). The client normalizes it once:
//!
//! - `https://` is prepended when no `http://` or `https://` scheme is given
//! - trailing slashes are removed
//! - the result must parse as an absolute URL

use url::Url;

/// Normalize a configured server URL.
///
/// # Errors
///
/// Returns error if the normalized URL does not parse.
///
/// # Examples
///
/// ```
/// use xdome_client::normalize_base_url;
///
/// assert_eq!(
///     normalize_base_url("xdome.example.com/").unwrap(),
///     "https://xdome.example.com"
/// );
/// assert_eq!(
///     normalize_base_url("http://10.0.0.5:8080//").unwrap(),
///     "http://10.0.0.5:8080"
/// );
/// ```
pub fn normalize_base_url(raw: &str) -> Result<String, UrlError> {
    let trimmed = raw.trim();
    let with_scheme = if trimmed.starts_with("https://") || trimmed.starts_with("http://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };
    let normalized = with_scheme.trim_end_matches('/').to_string();

    let parsed = Url::parse(&normalized).map_err(|e| UrlError::Invalid {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;
    if parsed.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::Invalid {
            url: raw.to_string(),
            reason: "missing host".to_string(),
        });
    }

    Ok(normalized)
}

/// Join an API path onto a normalized base URL.
///
/// A missing leading `/` on `endpoint` is supplied.
#[must_use]
pub fn join_endpoint(base_url: &str, endpoint: &str) -> String {
    if endpoint.starts_with('/') {
        format!("{base_url}{endpoint}")
    } else {
        format!("{base_url}/{endpoint}")
    }
}

/// Errors that can occur while normalizing a URL.
#[derive(Debug, Clone, thiserror::Error)]
pub enum UrlError {
    /// The URL does not parse
    #[error("invalid server URL '{url}': {reason}")]
    Invalid {
        /// URL as configured
        url: String,
        /// Parser message
        reason: String,
    },
}
