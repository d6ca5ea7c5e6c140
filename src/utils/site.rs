//! Property URL derivation from a bare host path segment.

use crate::AppError;
use serde_json::json;

/// Turns `example.com` into the URL-prefix property `https://example.com/`.
///
/// # Errors
///
/// Returns [`AppError::Validation`] if the segment is empty or is not a bare
/// host (contains a scheme, a path or whitespace).
pub fn site_property(site: &str) -> Result<String, AppError> {
    let host = site.trim();

    if host.is_empty() {
        return Err(AppError::bad_request("Site must not be empty", json!({})));
    }

    if host.contains("://") || host.contains('/') || host.chars().any(char::is_whitespace) {
        return Err(AppError::bad_request(
            "Site must be a bare host such as example.com",
            json!({ "site": site }),
        ));
    }

    Ok(format!("https://{host}/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_site_property() {
        assert_eq!(site_property("example.com").unwrap(), "https://example.com/");
        assert_eq!(
            site_property("www.example.com").unwrap(),
            "https://www.example.com/"
        );
    }

    #[test]
    fn test_site_property_rejects_non_hosts() {
        assert!(site_property("").is_err());
        assert!(site_property("https://example.com").is_err());
        assert!(site_property("example.com/blog").is_err());
        assert!(site_property("exa mple.com").is_err());
    }
}
