//! URL utilities for consistent URL handling
//!
//! The completion endpoint is configured as a base address; routes are
//! appended here so a trailing slash in config never produces `//chat`.

/// Normalize a base URL by removing trailing slashes
///
/// # Examples
///
/// ```
/// use tribe::utils::url::normalize_base_url;
///
/// assert_eq!(normalize_base_url("http://localhost:8000"), "http://localhost:8000");
/// assert_eq!(normalize_base_url("http://localhost:8000/"), "http://localhost:8000");
/// assert_eq!(normalize_base_url("http://localhost:8000///"), "http://localhost:8000");
/// ```
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim().trim_end_matches('/').to_string()
}

/// Construct a complete API URL from a base URL and a route
///
/// # Examples
///
/// ```
/// use tribe::utils::url::construct_api_url;
///
/// assert_eq!(
///     construct_api_url("http://localhost:8000", "chat"),
///     "http://localhost:8000/chat"
/// );
/// assert_eq!(
///     construct_api_url("https://mentors.example.com/api/", "/chat"),
///     "https://mentors.example.com/api/chat"
/// );
/// ```
pub fn construct_api_url(base_url: &str, endpoint: &str) -> String {
    let normalized_base = normalize_base_url(base_url);
    let endpoint = endpoint.trim_start_matches('/');
    format!("{}/{}", normalized_base, endpoint)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(
            normalize_base_url("http://localhost:8000"),
            "http://localhost:8000"
        );
        assert_eq!(
            normalize_base_url("http://localhost:8000/"),
            "http://localhost:8000"
        );
        // Surrounding whitespace from env vars
        assert_eq!(
            normalize_base_url("  http://localhost:8000/  "),
            "http://localhost:8000"
        );
        assert_eq!(
            normalize_base_url("https://mentors.example.com/api//"),
            "https://mentors.example.com/api"
        );
    }

    #[test]
    fn test_construct_api_url() {
        assert_eq!(
            construct_api_url("http://localhost:8000", "chat"),
            "http://localhost:8000/chat"
        );
        assert_eq!(
            construct_api_url("http://localhost:8000/", "chat"),
            "http://localhost:8000/chat"
        );
        assert_eq!(
            construct_api_url("http://localhost:8000", "/chat"),
            "http://localhost:8000/chat"
        );
        assert_eq!(
            construct_api_url("http://localhost:8000///", "///chat"),
            "http://localhost:8000/chat"
        );
    }
}
