//! URL utilities for consistent registry endpoint handling
//!
//! The registry base URL is user-configurable, so it may arrive with any
//! number of trailing slashes. Endpoints are always constructed from a
//! normalized base to avoid double slashes.

/// Normalize a base URL by removing trailing slashes
///
/// # Examples
///
/// ```
/// use forgeboard::utils::url::normalize_base_url;
///
/// assert_eq!(normalize_base_url("https://registry.smithery.ai"), "https://registry.smithery.ai");
/// assert_eq!(normalize_base_url("https://registry.smithery.ai/"), "https://registry.smithery.ai");
/// ```
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}

/// Construct a registry endpoint URL from a base URL and a path
///
/// The path may carry a leading slash or not; the result never contains
/// a double slash between base and path.
///
/// # Examples
///
/// ```
/// use forgeboard::utils::url::construct_endpoint;
///
/// assert_eq!(
///     construct_endpoint("https://registry.smithery.ai/", "servers"),
///     "https://registry.smithery.ai/servers"
/// );
/// ```
pub fn construct_endpoint(base_url: &str, path: &str) -> String {
    let normalized_base = normalize_base_url(base_url);
    let path = path.trim_start_matches('/');
    format!("{}/{}", normalized_base, path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(
            normalize_base_url("https://registry.example.com"),
            "https://registry.example.com"
        );
        assert_eq!(
            normalize_base_url("https://registry.example.com/"),
            "https://registry.example.com"
        );
        assert_eq!(
            normalize_base_url("https://registry.example.com///"),
            "https://registry.example.com"
        );
        assert_eq!(normalize_base_url(""), "");
    }

    #[test]
    fn test_construct_endpoint() {
        assert_eq!(
            construct_endpoint("https://registry.example.com", "servers"),
            "https://registry.example.com/servers"
        );
        assert_eq!(
            construct_endpoint("https://registry.example.com/", "/servers"),
            "https://registry.example.com/servers"
        );
        assert_eq!(
            construct_endpoint("https://registry.example.com///", "servers"),
            "https://registry.example.com/servers"
        );
    }
}
