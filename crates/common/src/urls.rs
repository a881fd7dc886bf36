//! Attachment and avatar URL resolution.
//!
//! The server stores attachment paths relative to its own origin
//! (`/api/static/...`). Views resolve them against the configured API base
//! before rendering links.

/// Derive the server origin from an API base URL.
///
/// The origin is the base URL with any trailing slashes and the trailing
/// `/api` path segment removed, so `http://localhost:5001/api` becomes
/// `http://localhost:5001`.
#[must_use]
pub fn api_origin(base_url: &str) -> String {
    let trimmed = base_url.trim_end_matches('/');
    trimmed
        .strip_suffix("/api")
        .unwrap_or(trimmed)
        .to_string()
}

/// Resolve a possibly relative attachment path into an absolute URL.
///
/// Absolute URLs pass through unchanged; relative paths are prefixed with
/// the API origin.
#[must_use]
pub fn to_absolute_url(base_url: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }

    let origin = api_origin(base_url);
    if path.starts_with('/') {
        format!("{origin}{path}")
    } else {
        format!("{origin}/{path}")
    }
}

/// Return the download variant of an attachment URL.
///
/// The server serves the same file inline or as an attachment depending on
/// the `download=1` query parameter.
#[must_use]
pub fn download_url(url: &str) -> String {
    if url.contains('?') {
        format!("{url}&download=1")
    } else {
        format!("{url}?download=1")
    }
}
