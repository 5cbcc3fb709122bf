//! Configuration types for the paginator.
//!
//! # Overview
//!
//! - [`ClientConfig`]: where and how to reach the Admin GraphQL endpoint
//! - [`PaginationConfig`]: tuning for the adaptive batch-size and backoff logic
//! - [`AccessToken`], [`ShopDomain`], [`ApiHost`]: validated newtypes
//! - [`ApiVersion`]: the Admin API version to target
//!
//! # Example
//!
//! ```rust
//! use shopify_paginator::{AccessToken, ApiVersion, ClientConfig, ShopDomain};
//!
//! let config = ClientConfig::builder()
//!     .shop(ShopDomain::new("my-store").unwrap())
//!     .access_token(AccessToken::new("shpat_123").unwrap())
//!     .api_version(ApiVersion::V2025_07)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.graphql_path(), "/admin/api/2025-07/graphql.json");
//! ```

mod newtypes;
mod pagination;
mod version;

pub use newtypes::{AccessToken, ApiHost, ShopDomain};
pub use pagination::{PaginationConfig, PaginationConfigBuilder, API_MAX_PAGE_SIZE};
pub use version::ApiVersion;

use crate::error::ConfigError;

/// Connection settings for the Admin GraphQL endpoint.
///
/// `ClientConfig` is `Clone`, `Send`, and `Sync`.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    shop: ShopDomain,
    access_token: AccessToken,
    api_version: ApiVersion,
    api_host: Option<ApiHost>,
    user_agent_prefix: Option<String>,
}

impl ClientConfig {
    /// Creates a new builder for constructing a `ClientConfig`.
    #[must_use]
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }

    /// Returns the shop domain.
    #[must_use]
    pub const fn shop(&self) -> &ShopDomain {
        &self.shop
    }

    /// Returns the access token.
    #[must_use]
    pub const fn access_token(&self) -> &AccessToken {
        &self.access_token
    }

    /// Returns the API version.
    #[must_use]
    pub const fn api_version(&self) -> &ApiVersion {
        &self.api_version
    }

    /// Returns the API host override, if configured.
    #[must_use]
    pub const fn api_host(&self) -> Option<&ApiHost> {
        self.api_host.as_ref()
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }

    /// Returns the origin requests are sent to.
    ///
    /// This is the API host override when set, otherwise `https://{shop}`.
    #[must_use]
    pub fn base_uri(&self) -> String {
        self.api_host.as_ref().map_or_else(
            || format!("https://{}", self.shop.as_ref()),
            |host| host.origin().to_string(),
        )
    }

    /// Returns the path of the GraphQL endpoint for the configured version.
    #[must_use]
    pub fn graphql_path(&self) -> String {
        format!("/admin/api/{}/graphql.json", self.api_version)
    }

    /// Returns the full GraphQL endpoint URL.
    #[must_use]
    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_uri(), self.graphql_path())
    }
}

// Verify ClientConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ClientConfig>();
};

/// Builder for [`ClientConfig`].
///
/// `shop` and `access_token` are required. `api_version` defaults to
/// [`ApiVersion::latest`].
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    shop: Option<ShopDomain>,
    access_token: Option<AccessToken>,
    api_version: Option<ApiVersion>,
    api_host: Option<ApiHost>,
    user_agent_prefix: Option<String>,
}

impl ClientConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the shop domain (required).
    #[must_use]
    pub fn shop(mut self, shop: ShopDomain) -> Self {
        self.shop = Some(shop);
        self
    }

    /// Sets the access token (required).
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

    /// Sends requests to `host` instead of the shop's own domain.
    ///
    /// The shop domain is still sent in the `Host` header.
    #[must_use]
    pub fn api_host(mut self, host: ApiHost) -> Self {
        self.api_host = Some(host);
        self
    }

    /// Sets the user agent prefix for HTTP requests.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Builds the [`ClientConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if `shop` or
    /// `access_token` are not set.
    pub fn build(self) -> Result<ClientConfig, ConfigError> {
        let shop = self
            .shop
            .ok_or(ConfigError::MissingRequiredField { field: "shop" })?;
        let access_token = self
            .access_token
            .ok_or(ConfigError::MissingRequiredField {
                field: "access_token",
            })?;

        Ok(ClientConfig {
            shop,
            access_token,
            api_version: self.api_version.unwrap_or_default(),
            api_host: self.api_host,
            user_agent_prefix: self.user_agent_prefix,
        })
    }
}
