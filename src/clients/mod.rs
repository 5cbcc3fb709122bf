//! Client types for Shopify Admin GraphQL communication.
//!
//! # Overview
//!
//! - [`GraphqlTransport`]: the one-method seam used to send a request
//! - [`HttpTransport`]: the reqwest implementation of that seam
//! - [`GraphqlRequest`]: the `{ query, variables }` body of one call
//! - [`HttpResponse`]: a raw response with parsed headers
//! - [`graphql::RequestExecutor`]: single-call execution and classification
//! - [`TransportError`] and [`HttpResponseError`]: failures below GraphQL
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use shopify_paginator::clients::{graphql::RequestExecutor, HttpTransport};
//!
//! let transport = Arc::new(HttpTransport::new(&config));
//! let executor = RequestExecutor::new(transport);
//! ```
//!
//! # Retry Behavior
//!
//! Nothing in this module retries. A 429 surfaces as
//! [`graphql::GraphqlError::RateLimited`] and the pagination controller
//! decides when to try again.

mod errors;
pub mod graphql;
mod http_client;
mod http_response;
mod transport;

pub use errors::{HttpResponseError, TransportError};
pub use http_client::{HttpTransport, SDK_VERSION};
pub use http_response::HttpResponse;
pub use transport::{GraphqlRequest, GraphqlTransport};

pub use graphql::{GraphqlError, RequestExecutor};
