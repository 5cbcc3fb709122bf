//! reqwest-backed [`GraphqlTransport`] for the Admin GraphQL endpoint.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::clients::errors::TransportError;
use crate::clients::http_response::HttpResponse;
use crate::clients::transport::{GraphqlRequest, GraphqlTransport};
use crate::config::ClientConfig;

/// Crate version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// HTTP transport that posts GraphQL requests to a shop's Admin API.
///
/// The transport handles:
/// - Endpoint construction from the shop domain or the `api_host` override
/// - Default headers including User-Agent and the access token
/// - Response header and body parsing
///
/// It performs no retries of its own; rate-limit handling belongs to the
/// pagination controller.
///
/// # Thread Safety
///
/// `HttpTransport` is `Send + Sync`, making it safe to share across async tasks.
///
/// # Example
///
/// ```rust
/// use shopify_paginator::{AccessToken, ClientConfig, ShopDomain};
/// use shopify_paginator::clients::HttpTransport;
///
/// let config = ClientConfig::builder()
///     .shop(ShopDomain::new("my-store").unwrap())
///     .access_token(AccessToken::new("shpat_123").unwrap())
///     .build()
///     .unwrap();
///
/// let transport = HttpTransport::new(&config);
/// assert!(transport.endpoint().ends_with("/graphql.json"));
/// ```
#[derive(Debug)]
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
    default_headers: HashMap<String, String>,
}

// Verify HttpTransport is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpTransport>();
};

impl HttpTransport {
    /// Creates a new transport for the given configuration.
    ///
    /// # Panics
    ///
    /// Panics if the underlying reqwest client cannot be created. This should
    /// only happen in extremely unusual circumstances (e.g., TLS initialization failure).
    #[must_use]
    pub fn new(config: &ClientConfig) -> Self {
        let user_agent_prefix = config
            .user_agent_prefix()
            .map_or(String::new(), |prefix| format!("{prefix} | "));
        let user_agent =
            format!("{user_agent_prefix}Shopify GraphQL Paginator v{SDK_VERSION} | Rust");

        let mut default_headers = HashMap::new();
        default_headers.insert("User-Agent".to_string(), user_agent);
        default_headers.insert("Accept".to_string(), "application/json".to_string());
        default_headers.insert("Content-Type".to_string(), "application/json".to_string());
        default_headers.insert(
            "X-Shopify-Access-Token".to_string(),
            config.access_token().as_ref().to_string(),
        );

        // Proxies route on the Host header
        if config.api_host().is_some() {
            default_headers.insert("Host".to_string(), config.shop().as_ref().to_string());
        }

        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            endpoint: config.endpoint(),
            default_headers,
        }
    }

    /// Returns the full GraphQL endpoint URL.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Returns the headers sent with every request.
    #[must_use]
    pub const fn default_headers(&self) -> &HashMap<String, String> {
        &self.default_headers
    }

    fn parse_response_headers(
        headers: &reqwest::header::HeaderMap,
    ) -> HashMap<String, Vec<String>> {
        let mut result: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in headers {
            let key = name.as_str().to_lowercase();
            let value = value.to_str().unwrap_or_default().to_string();
            result.entry(key).or_default().push(value);
        }
        result
    }

    /// Parses a response body.
    ///
    /// Error statuses tolerate empty or non-JSON bodies, which are kept as
    /// `raw_body` for diagnostics. A 2xx body must be JSON.
    fn parse_body(code: u16, body_text: String) -> Result<serde_json::Value, TransportError> {
        match serde_json::from_str(&body_text) {
            Ok(body) => Ok(body),
            Err(source) if (200..300).contains(&code) => {
                Err(TransportError::InvalidBody { code, source })
            }
            Err(_) if body_text.trim().is_empty() => Ok(serde_json::json!({})),
            Err(_) => Ok(serde_json::json!({ "raw_body": body_text })),
        }
    }
}

#[async_trait]
impl GraphqlTransport for HttpTransport {
    async fn post_graphql(&self, request: &GraphqlRequest) -> Result<HttpResponse, TransportError> {
        let body = serde_json::to_string(request)?;

        let mut req_builder = self.client.post(&self.endpoint);
        for (key, value) in &self.default_headers {
            req_builder = req_builder.header(key, value);
        }

        let res = req_builder.body(body).send().await?;

        let code = res.status().as_u16();
        let headers = Self::parse_response_headers(res.headers());
        let body_text = res.text().await?;
        let response = HttpResponse::new(code, headers, Self::parse_body(code, body_text)?);

        if let Some(reason) = response.deprecation_reason() {
            tracing::warn!(
                endpoint = %self.endpoint,
                "Deprecated request to Shopify Admin API, received reason: {}",
                reason
            );
        }

        Ok(response)
    }
}
