//! # Shopify GraphQL Paginator
//!
//! Cost-aware cursor pagination for the Shopify Admin GraphQL API.
//!
//! ## Overview
//!
//! This crate provides:
//! - Type-safe configuration via [`ClientConfig`] and [`PaginationConfig`]
//! - Validated newtypes for the shop domain, access token and API host
//! - A single-call [`RequestExecutor`] that classifies GraphQL, rate-limit,
//!   authentication and transport failures
//! - A [`PaginationController`] that sizes every page from the server's cost
//!   budget, pauses before the budget runs dry, and retries rate-limited pages
//! - A pluggable [`GraphqlTransport`] with a reqwest-based [`HttpTransport`]
//!
//! ## Quick Start
//!
//! ```rust
//! use shopify_paginator::{AccessToken, ApiVersion, ClientConfig, ShopDomain};
//!
//! let config = ClientConfig::builder()
//!     .shop(ShopDomain::new("my-store").unwrap())
//!     .access_token(AccessToken::new("shpat_example").unwrap())
//!     .api_version(ApiVersion::latest())
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(
//!     config.endpoint(),
//!     "https://my-store.myshopify.com/admin/api/2025-10/graphql.json"
//! );
//! ```
//!
//! ## Fetching a Connection
//!
//! ```rust,ignore
//! use shopify_paginator::{FetchOptions, PaginationController, RequestExecutor};
//! use serde_json::Map;
//!
//! let controller = PaginationController::new(RequestExecutor::from_config(&config));
//!
//! let query = r#"
//!     query($first: Int!, $after: String) {
//!       orders(first: $first, after: $after, query: "status:open") {
//!         nodes { id name }
//!         pageInfo { hasNextPage endCursor }
//!       }
//!     }
//! "#;
//!
//! let outcome = controller
//!     .fetch_all_with_summary("orders", query, Map::new(), FetchOptions::new())
//!     .await?;
//!
//! println!(
//!     "{} orders in {} pages ({:?} spent waiting on the budget)",
//!     outcome.items.len(),
//!     outcome.summary.pages_fetched,
//!     outcome.summary.throttle_wait,
//! );
//! ```
//!
//! ## Custom Transports
//!
//! Anything that can POST a GraphQL body can drive the controller:
//!
//! ```rust,ignore
//! use async_trait::async_trait;
//! use shopify_paginator::clients::{GraphqlRequest, GraphqlTransport, HttpResponse, TransportError};
//!
//! struct ProxyTransport { /* ... */ }
//!
//! #[async_trait]
//! impl GraphqlTransport for ProxyTransport {
//!     async fn post_graphql(&self, request: &GraphqlRequest) -> Result<HttpResponse, TransportError> {
//!         // forward `request` and wrap the reply
//!     }
//! }
//!
//! let executor = RequestExecutor::from_transport(ProxyTransport { /* ... */ });
//! ```
//!
//! ## Design Principles
//!
//! - **No global state**: Configuration and transports are passed explicitly
//! - **Fail-fast validation**: All newtypes and configs validate on construction
//! - **Thread-safe**: All public types are `Send + Sync`
//! - **Async-first**: Designed for use with Tokio async runtime
//! - **Independent sessions**: Concurrent fetches share no mutable state

pub mod clients;
pub mod config;
pub mod error;
pub mod pagination;

// Re-export public types at crate root for convenience
pub use config::{
    AccessToken, ApiHost, ApiVersion, ClientConfig, ClientConfigBuilder, PaginationConfig,
    PaginationConfigBuilder, ShopDomain,
};
pub use error::ConfigError;

// Re-export client types
pub use clients::graphql::{
    AuthenticationError, CostBudget, GraphqlApiError, GraphqlError, GraphqlResult, QueryCost,
    RateLimitError, RequestExecutor,
};
pub use clients::{
    GraphqlRequest, GraphqlTransport, HttpResponse, HttpResponseError, HttpTransport,
    TransportError,
};

// Re-export pagination types
pub use pagination::{
    FetchOptions, FetchOutcome, FetchSummary, MaxRateLimitRetriesExceededError,
    PaginationController, PaginationError, StopReason,
};
