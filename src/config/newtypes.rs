//! Validated newtype wrappers for client configuration values.
//!
//! Each wrapper validates its contents on construction so that a
//! [`ClientConfig`](crate::ClientConfig) can never hold a malformed value.

use crate::error::ConfigError;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A validated Admin API access token.
///
/// The token is sent in the `X-Shopify-Access-Token` header. Its `Debug`
/// output is masked so that configs can be logged safely.
///
/// # Example
///
/// ```rust
/// use shopify_paginator::AccessToken;
///
/// let token = AccessToken::new("shpat_123").unwrap();
/// assert_eq!(token.as_ref(), "shpat_123");
/// assert_eq!(format!("{:?}", token), "AccessToken(*****)");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Creates a new validated access token.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyAccessToken`] if the token is empty or
    /// only whitespace.
    pub fn new(token: impl Into<String>) -> Result<Self, ConfigError> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(ConfigError::EmptyAccessToken);
        }
        Ok(Self(token))
    }
}

impl AsRef<str> for AccessToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(*****)")
    }
}

/// A validated Shopify shop domain, normalized to `shop-name.myshopify.com`.
///
/// # Example
///
/// ```rust
/// use shopify_paginator::ShopDomain;
///
/// let domain = ShopDomain::new("My-Store").unwrap();
/// assert_eq!(domain.as_ref(), "my-store.myshopify.com");
/// assert_eq!(domain.shop_name(), "my-store");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShopDomain {
    full_domain: String,
    shop_name_len: usize,
}

impl ShopDomain {
    const SUFFIX: &'static str = ".myshopify.com";

    /// Creates a new validated shop domain.
    ///
    /// Accepts either the bare shop name or the full `myshopify.com` domain.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidShopDomain`] if the domain is invalid.
    pub fn new(domain: impl Into<String>) -> Result<Self, ConfigError> {
        let domain = domain.into().trim().to_lowercase();

        let shop_name = match domain.strip_suffix(Self::SUFFIX) {
            Some(name) => name.to_string(),
            None if domain.contains('.') => {
                return Err(ConfigError::InvalidShopDomain { domain });
            }
            None => domain.clone(),
        };

        if !is_valid_shop_name(&shop_name) {
            return Err(ConfigError::InvalidShopDomain { domain });
        }

        Ok(Self {
            full_domain: format!("{shop_name}{}", Self::SUFFIX),
            shop_name_len: shop_name.len(),
        })
    }

    /// Returns the shop name portion of the domain.
    #[must_use]
    pub fn shop_name(&self) -> &str {
        &self.full_domain[..self.shop_name_len]
    }
}

fn is_valid_shop_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('-')
        && !name.ends_with('-')
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

impl AsRef<str> for ShopDomain {
    fn as_ref(&self) -> &str {
        &self.full_domain
    }
}

impl Serialize for ShopDomain {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.full_domain)
    }
}

impl<'de> Deserialize<'de> for ShopDomain {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::new(s).map_err(de::Error::custom)
    }
}

/// A validated API host override.
///
/// When set on a [`ClientConfig`](crate::ClientConfig), GraphQL requests are
/// sent to this origin instead of `https://{shop}`, which is how proxies and
/// local test servers are targeted. Only the scheme and authority are kept;
/// any path, query or fragment is rejected.
///
/// # Example
///
/// ```rust
/// use shopify_paginator::ApiHost;
///
/// let host = ApiHost::new("http://127.0.0.1:8080/").unwrap();
/// assert_eq!(host.origin(), "http://127.0.0.1:8080");
/// assert_eq!(host.host_name(), "127.0.0.1");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiHost {
    origin: String,
    host_start: usize,
    host_end: usize,
}

impl ApiHost {
    /// Creates a new validated API host.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidHostUrl`] if the value has no `http` or
    /// `https` scheme, no host, or carries a path or query.
    pub fn new(url: impl Into<String>) -> Result<Self, ConfigError> {
        let url = url.into();
        let trimmed = url.trim().trim_end_matches('/');
        let invalid = || ConfigError::InvalidHostUrl { url: url.clone() };

        let (scheme, authority) = trimmed.split_once("://").ok_or_else(invalid)?;
        if !matches!(scheme.to_ascii_lowercase().as_str(), "http" | "https") {
            return Err(invalid());
        }
        if authority.is_empty() || authority.contains(['/', '?', '#']) {
            return Err(invalid());
        }

        let host_len = authority.find(':').unwrap_or(authority.len());
        if host_len == 0 {
            return Err(invalid());
        }

        let host_start = scheme.len() + 3;
        Ok(Self {
            origin: trimmed.to_string(),
            host_start,
            host_end: host_start + host_len,
        })
    }

    /// Returns `scheme://host[:port]` without a trailing slash.
    #[must_use]
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Returns the host name without scheme or port.
    #[must_use]
    pub fn host_name(&self) -> &str {
        &self.origin[self.host_start..self.host_end]
    }
}

impl AsRef<str> for ApiHost {
    fn as_ref(&self) -> &str {
        &self.origin
    }
}
