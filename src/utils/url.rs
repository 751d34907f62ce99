//! URL helpers for building backend endpoints.
//!
//! The backend base URL comes from configuration or the command line, so it may
//! or may not carry a trailing slash; session ids are opaque and may contain
//! characters that are not valid inside a path segment.

use reqwest::Url;

/// Normalize a base URL by removing trailing slashes
///
/// # Examples
///
/// ```
/// use lanchat::utils::url::normalize_base_url;
///
/// assert_eq!(normalize_base_url("http://localhost:8000"), "http://localhost:8000");
/// assert_eq!(normalize_base_url("http://localhost:8000///"), "http://localhost:8000");
/// ```
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}

/// Construct a complete endpoint URL from a base URL and endpoint path
///
/// # Examples
///
/// ```
/// use lanchat::utils::url::construct_api_url;
///
/// assert_eq!(
///     construct_api_url("http://localhost:8000/", "/sessions"),
///     "http://localhost:8000/sessions"
/// );
/// ```
pub fn construct_api_url(base_url: &str, endpoint: &str) -> String {
    let normalized_base = normalize_base_url(base_url);
    let endpoint = endpoint.trim_start_matches('/');
    format!("{}/{}", normalized_base, endpoint)
}

/// URL for listing or appending messages of one session.
///
/// The session id is pushed as a single path segment, so characters such as
/// `/` or `?` inside it are escaped. Returns `None` when the base URL does not
/// parse or cannot carry a path.
///
/// # Examples
///
/// ```
/// use lanchat::utils::url::session_messages_url;
///
/// let url = session_messages_url("http://localhost:8000/", "a b").unwrap();
/// assert_eq!(url.as_str(), "http://localhost:8000/sessions/a%20b/messages");
/// ```
pub fn session_messages_url(base_url: &str, session_id: &str) -> Option<Url> {
    let mut url = Url::parse(&normalize_base_url(base_url)).ok()?;
    url.path_segments_mut()
        .ok()?
        .pop_if_empty()
        .extend(["sessions", session_id, "messages"]);
    Some(url)
}
