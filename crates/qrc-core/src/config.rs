//! Editor configuration, loaded from TOML

use crate::error::ConfigError;
use qrc_discount::DEFAULT_PAGE_SIZE;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Endpoints and limits for one editor deployment
///
/// ```toml
/// api_base_url = "https://qr.example.com"
/// storefront_origin = "https://shop.example.com"
/// catalog_endpoint = "https://shop.example.com/admin/api/graphql.json"
/// discount_page_size = 25
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Root of the QR code API
    pub api_base_url: String,
    /// Storefront that destination URLs point at
    pub storefront_origin: String,
    /// GraphQL endpoint for the discount catalog; discounts stay disabled without it
    pub catalog_endpoint: Option<String>,
    /// Discounts requested per catalog fetch
    pub discount_page_size: u32,
    /// Entries kept in the discount code cache
    pub discount_cache_capacity: u64,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
}

impl EditorConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With QR code API root
    #[must_use]
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// With storefront origin
    #[must_use]
    pub fn with_storefront_origin(mut self, origin: impl Into<String>) -> Self {
        self.storefront_origin = origin.into();
        self
    }

    /// With discount catalog endpoint
    #[must_use]
    pub fn with_catalog_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.catalog_endpoint = Some(endpoint.into());
        self
    }

    /// With discounts per fetch
    #[inline]
    #[must_use]
    pub fn with_discount_page_size(mut self, size: u32) -> Self {
        self.discount_page_size = size;
        self
    }

    /// With discount cache capacity
    #[inline]
    #[must_use]
    pub fn with_discount_cache_capacity(mut self, capacity: u64) -> Self {
        self.discount_cache_capacity = capacity;
        self
    }

    /// With request timeout
    #[inline]
    #[must_use]
    pub fn with_request_timeout_secs(mut self, secs: u64) -> Self {
        self.request_timeout_secs = secs;
        self
    }

    /// Parse and validate TOML text
    ///
    /// # Errors
    /// [`ConfigError::Parse`] on malformed TOML, otherwise whatever
    /// [`validate`](Self::validate) reports.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    ///
    /// # Errors
    /// [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`from_toml_str`](Self::from_toml_str).
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Check every setting
    ///
    /// # Errors
    /// The first invalid URL or out-of-range number.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.api_base_url()?;
        self.storefront_origin()?;
        self.catalog_endpoint()?;
        if self.discount_page_size == 0 {
            return Err(ConfigError::Invalid {
                field: "discount_page_size",
                reason: "must be greater than zero",
            });
        }
        if self.discount_cache_capacity == 0 {
            return Err(ConfigError::Invalid {
                field: "discount_cache_capacity",
                reason: "must be greater than zero",
            });
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "request_timeout_secs",
                reason: "must be greater than zero",
            });
        }
        Ok(())
    }

    /// Parsed API root
    ///
    /// # Errors
    /// [`ConfigError::InvalidUrl`] if it does not parse or cannot carry a path.
    pub fn api_base_url(&self) -> Result<Url, ConfigError> {
        parse_base("api_base_url", &self.api_base_url)
    }

    /// Parsed storefront origin
    ///
    /// # Errors
    /// [`ConfigError::InvalidUrl`] if it does not parse or cannot carry a path.
    pub fn storefront_origin(&self) -> Result<Url, ConfigError> {
        parse_base("storefront_origin", &self.storefront_origin)
    }

    /// Parsed catalog endpoint, `None` when unset
    ///
    /// # Errors
    /// [`ConfigError::InvalidUrl`] if set but unparseable.
    pub fn catalog_endpoint(&self) -> Result<Option<Url>, ConfigError> {
        self.catalog_endpoint
            .as_deref()
            .map(|raw| parse_base("catalog_endpoint", raw))
            .transpose()
    }

    /// Request timeout as a [`Duration`]
    #[inline]
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:3000".to_string(),
            storefront_origin: "http://localhost:3000".to_string(),
            catalog_endpoint: None,
            discount_page_size: DEFAULT_PAGE_SIZE,
            discount_cache_capacity: 1_000,
            request_timeout_secs: 30,
        }
    }
}

fn parse_base(field: &'static str, raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw).map_err(|e| ConfigError::InvalidUrl {
        field,
        reason: e.to_string(),
    })?;
    if url.cannot_be_a_base() {
        return Err(ConfigError::InvalidUrl {
            field,
            reason: "url cannot carry a path".to_string(),
        });
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_are_valid() {
        let config = EditorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.discount_page_size, 25);
        assert_eq!(config.discount_cache_capacity, 1_000);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = EditorConfig::from_toml_str(
            r#"
            api_base_url = "https://qr.example.com"
            storefront_origin = "https://shop.example.com"
            discount_page_size = 10
            "#,
        )
        .unwrap();

        assert_eq!(
            config,
            EditorConfig::new()
                .with_api_base_url("https://qr.example.com")
                .with_storefront_origin("https://shop.example.com")
                .with_discount_page_size(10)
        );
        assert_eq!(config.catalog_endpoint().unwrap(), None);
    }

    #[test]
    fn zero_page_size_is_rejected() {
        let err = EditorConfig::new()
            .with_discount_page_size(0)
            .validate()
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "discount_page_size",
                ..
            }
        ));
    }

    #[test]
    fn opaque_origin_is_rejected() {
        let err = EditorConfig::new()
            .with_storefront_origin("mailto:shop@example.com")
            .validate()
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidUrl {
                field: "storefront_origin",
                ..
            }
        ));
    }

    #[test]
    fn malformed_toml_is_parse_error() {
        let err = EditorConfig::from_toml_str("discount_page_size = \"many\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = EditorConfig::from_file("/nonexistent/qrc.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
