//! Configuration for the Admin GraphQL dispatcher.
//!
//! The three values the dispatcher needs (store domain, access token, API
//! version) are injected at process start and held read-only afterwards.
//! There is no global mutable state: construct an [`AdminConfig`] and hand it
//! to [`GraphqlDispatcher::new`](crate::GraphqlDispatcher::new).
//!
//! # Example
//!
//! ```rust
//! use shopify_admin_tools::{AccessToken, AdminConfig, ApiVersion, ShopDomain};
//!
//! let config = AdminConfig::builder()
//!     .store_domain(ShopDomain::new("my-store").unwrap())
//!     .access_token(AccessToken::new("shpat_example").unwrap())
//!     .api_version(ApiVersion::latest())
//!     .build()
//!     .unwrap();
//! ```

mod newtypes;
mod version;

pub use newtypes::{AccessToken, HostUrl, ShopDomain};
pub use version::ApiVersion;

use crate::error::ConfigError;

/// Configuration consumed by the request dispatcher.
///
/// Holds the store domain, Admin API access token, and API version, plus an
/// optional host override for proxies and mock servers.
///
/// # Thread Safety
///
/// `AdminConfig` is `Clone`, `Send`, and `Sync`; it is read-only after
/// construction and safe to share across async tasks.
#[derive(Clone, Debug)]
pub struct AdminConfig {
    store_domain: ShopDomain,
    access_token: AccessToken,
    api_version: ApiVersion,
    host: Option<HostUrl>,
}

impl AdminConfig {
    /// Creates a new builder for constructing an `AdminConfig`.
    #[must_use]
    pub fn builder() -> AdminConfigBuilder {
        AdminConfigBuilder::new()
    }

    /// Returns the store domain.
    #[must_use]
    pub const fn store_domain(&self) -> &ShopDomain {
        &self.store_domain
    }

    /// Returns the Admin API access token.
    #[must_use]
    pub const fn access_token(&self) -> &AccessToken {
        &self.access_token
    }

    /// Returns the API version.
    #[must_use]
    pub const fn api_version(&self) -> &ApiVersion {
        &self.api_version
    }

    /// Returns the host URL override, if configured.
    #[must_use]
    pub const fn host(&self) -> Option<&HostUrl> {
        self.host.as_ref()
    }
}

// Verify AdminConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<AdminConfig>();
};

/// Builder for constructing [`AdminConfig`] instances.
///
/// Required fields are `store_domain` and `access_token`.
///
/// # Defaults
///
/// - `api_version`: latest stable version
/// - `host`: `None`
#[derive(Debug, Default)]
pub struct AdminConfigBuilder {
    store_domain: Option<ShopDomain>,
    access_token: Option<AccessToken>,
    api_version: Option<ApiVersion>,
    host: Option<HostUrl>,
}

impl AdminConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the store domain (required).
    #[must_use]
    pub fn store_domain(mut self, domain: ShopDomain) -> Self {
        self.store_domain = Some(domain);
        self
    }

    /// Sets the Admin API access token (required).
    #[must_use]
    pub fn access_token(mut self, token: AccessToken) -> Self {
        self.access_token = Some(token);
        self
    }

    /// Sets the API version.
    #[must_use]
    pub fn api_version(mut self, version: ApiVersion) -> Self {
        self.api_version = Some(version);
        self
    }

    /// Sets a host URL override.
    ///
    /// Requests are sent to this host instead of the store domain. The
    /// endpoint path and headers are unchanged. Intended for proxies and
    /// mock servers in tests.
    #[must_use]
    pub fn host(mut self, host: HostUrl) -> Self {
        self.host = Some(host);
        self
    }

    /// Builds the [`AdminConfig`], validating that required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if `store_domain` or
    /// `access_token` are not set.
    pub fn build(self) -> Result<AdminConfig, ConfigError> {
        let store_domain = self.store_domain.ok_or(ConfigError::MissingRequiredField {
            field: "store_domain",
        })?;
        let access_token = self.access_token.ok_or(ConfigError::MissingRequiredField {
            field: "access_token",
        })?;

        Ok(AdminConfig {
            store_domain,
            access_token,
            api_version: self.api_version.unwrap_or_else(ApiVersion::latest),
            host: self.host,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_requires_store_domain() {
        let result = AdminConfigBuilder::new()
            .access_token(AccessToken::new("token").unwrap())
            .build();

        assert!(matches!(
            result,
            Err(ConfigError::MissingRequiredField {
                field: "store_domain"
            })
        ));
    }

    #[test]
    fn test_builder_requires_access_token() {
        let result = AdminConfigBuilder::new()
            .store_domain(ShopDomain::new("test-shop").unwrap())
            .build();

        assert!(matches!(
            result,
            Err(ConfigError::MissingRequiredField {
                field: "access_token"
            })
        ));
    }

    #[test]
    fn test_builder_defaults_to_latest_version() {
        let config = AdminConfig::builder()
            .store_domain(ShopDomain::new("test-shop").unwrap())
            .access_token(AccessToken::new("token").unwrap())
            .build()
            .unwrap();

        assert_eq!(config.api_version(), &ApiVersion::latest());
        assert!(config.host().is_none());
    }

    #[test]
    fn test_builder_with_all_fields() {
        let host = HostUrl::new("http://127.0.0.1:3000").unwrap();
        let config = AdminConfig::builder()
            .store_domain(ShopDomain::new("test-shop").unwrap())
            .access_token(AccessToken::new("token").unwrap())
            .api_version(ApiVersion::V2025_04)
            .host(host.clone())
            .build()
            .unwrap();

        assert_eq!(config.api_version(), &ApiVersion::V2025_04);
        assert_eq!(config.host(), Some(&host));
        assert_eq!(config.store_domain().shop_name(), "test-shop");
    }

    #[test]
    fn test_config_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<AdminConfig>();
    }

    #[test]
    fn test_debug_output_masks_token() {
        let config = AdminConfig::builder()
            .store_domain(ShopDomain::new("test-shop").unwrap())
            .access_token(AccessToken::new("shpat_secret").unwrap())
            .build()
            .unwrap();

        let debug_str = format!("{config:?}");
        assert!(!debug_str.contains("shpat_secret"));
    }
}
