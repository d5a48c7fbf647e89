//! Destination URL validation.
//!
//! Destinations are stored exactly as submitted; this module only decides whether
//! they are acceptable redirect targets.

use url::Url;

/// Reasons a destination URL is rejected.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum UrlValidationError {
    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    #[error("URL must include a host")]
    MissingHost,

    #[error("URL must not contain control characters")]
    ControlCharacter,
}

/// Checks that `input` is an absolute `http`/`https` URL with a host.
///
/// Rejects dangerous schemes such as `javascript:`, `data:` or `file:`.
///
/// # Errors
///
/// Returns [`UrlValidationError::InvalidFormat`] for malformed or relative URLs,
/// [`UrlValidationError::UnsupportedProtocol`] for non-HTTP(S) schemes,
/// [`UrlValidationError::MissingHost`] when the host is empty and
/// [`UrlValidationError::ControlCharacter`] for tabs, newlines and other control
/// characters, which the parser would otherwise drop silently.
pub fn validate_url(input: &str) -> Result<(), UrlValidationError> {
    if input.chars().any(char::is_control) {
        return Err(UrlValidationError::ControlCharacter);
    }

    let url = Url::parse(input.trim())
        .map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        _ => return Err(UrlValidationError::UnsupportedProtocol),
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(()),
        _ => Err(UrlValidationError::MissingHost),
    }
}

/// Serializes `url` for a `Location` header.
///
/// Non-ASCII characters are percent-encoded. Input that does not parse is returned
/// unchanged.
pub fn to_header_url(url: &str) -> String {
    Url::parse(url.trim())
        .map(String::from)
        .unwrap_or_else(|_| url.to_string())
}
