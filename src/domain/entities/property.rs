//! Search Console property as listed by the connector.

use serde::{Deserialize, Serialize};

/// Kind of verified asset.
///
/// The connector labels URL-prefix properties `URL_PREFIX`; kinds it may add
/// later decode as [`PropertyType::Other`] instead of failing the listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PropertyType {
    #[serde(alias = "URL_PREFIX")]
    UrlProperty,
    DomainProperty,
    #[serde(other)]
    Other,
}

/// A verified web asset registered with Search Console.
///
/// Identified by `site_url` (e.g. `https://example.com/` or
/// `sc-domain:example.com`). Never created locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub site_url: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(rename = "type")]
    pub property_type: PropertyType,
}

/// Result of probing access to one property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessCheck {
    pub property: String,
    #[serde(rename = "hasAccess")]
    pub has_access: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// OAuth state of the connector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthStatus {
    pub authenticated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_from_wire() {
        let json = r#"{"site_url": "https://example.com/", "type": "URL_PROPERTY", "display_name": "Example"}"#;
        let property: Property = serde_json::from_str(json).unwrap();
        assert_eq!(property.site_url, "https://example.com/");
        assert_eq!(property.property_type, PropertyType::UrlProperty);
        assert_eq!(property.display_name.as_deref(), Some("Example"));
    }

    #[test]
    fn test_domain_property_without_display_name() {
        let json = r#"{"site_url": "sc-domain:example.com", "type": "DOMAIN_PROPERTY"}"#;
        let property: Property = serde_json::from_str(json).unwrap();
        assert_eq!(property.property_type, PropertyType::DomainProperty);
        assert!(property.display_name.is_none());
    }

    #[test]
    fn test_url_prefix_is_a_url_property() {
        let json = r#"{"site_url": "https://example.com/", "type": "URL_PREFIX", "display_name": "https://example.com/"}"#;
        let property: Property = serde_json::from_str(json).unwrap();
        assert_eq!(property.property_type, PropertyType::UrlProperty);
    }

    #[test]
    fn test_unknown_property_type_does_not_fail() {
        let json = r#"{"site_url": "x", "type": "APP_PROPERTY"}"#;
        let property: Property = serde_json::from_str(json).unwrap();
        assert_eq!(property.property_type, PropertyType::Other);
    }

    #[test]
    fn test_access_check_uses_wire_name() {
        let json = r#"{"success": true, "hasAccess": true, "property": "https://a.com/", "message": "Access confirmed"}"#;
        let check: AccessCheck = serde_json::from_str(json).unwrap();
        assert!(check.has_access);
        assert_eq!(check.property, "https://a.com/");
    }
}
