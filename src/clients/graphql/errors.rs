//! GraphQL-level error types.
//!
//! [`RequestExecutor`](super::RequestExecutor) classifies every failed call
//! into exactly one [`GraphqlError`] variant:
//!
//! - [`GraphqlError::Api`]: the server ran the request but reported `errors`
//! - [`GraphqlError::RateLimited`]: HTTP 429 or a `THROTTLED` error payload
//! - [`GraphqlError::Authentication`]: HTTP 401 or 403
//! - [`GraphqlError::Transport`]: any other transport failure
//! - [`GraphqlError::InvalidRequest`]: the request was rejected before sending
//!
//! Only `RateLimited` is recoverable; see [`GraphqlError::is_recoverable`].

use serde_json::Value;
use thiserror::Error;

use crate::clients::TransportError;

/// The server executed the request but flagged semantic errors.
///
/// `message` joins every server message with `", "`; `errors` keeps the raw
/// error objects (locations, paths, extensions) for callers that need them.
///
/// # Example
///
/// ```rust
/// use shopify_paginator::clients::graphql::GraphqlApiError;
/// use serde_json::json;
///
/// let error = GraphqlApiError::from_errors(&[
///     json!({ "message": "Field 'foo' doesn't exist" }),
///     json!({ "message": "Variable $first is required" }),
/// ]);
/// assert_eq!(
///     error.message,
///     "Field 'foo' doesn't exist, Variable $first is required"
/// );
/// ```
#[derive(Debug, Error, Clone, PartialEq)]
#[error("GraphQL API error: {message}")]
pub struct GraphqlApiError {
    /// Server messages joined by `", "`.
    pub message: String,
    /// The raw `errors` array entries.
    pub errors: Vec<Value>,
}

impl GraphqlApiError {
    /// Builds the error from the entries of a response `errors` array.
    ///
    /// Entries without a string `message` are rendered as JSON.
    #[must_use]
    pub fn from_errors(errors: &[Value]) -> Self {
        let message = errors
            .iter()
            .map(|error| {
                error
                    .get("message")
                    .and_then(Value::as_str)
                    .map_or_else(|| error.to_string(), ToString::to_string)
            })
            .collect::<Vec<_>>()
            .join(", ");

        Self {
            message,
            errors: errors.to_vec(),
        }
    }
}

/// The server refused the request because the cost budget is exhausted.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("Rate limited by the GraphQL endpoint (HTTP {code}): {message}")]
pub struct RateLimitError {
    /// HTTP status of the response (429, or 200 for `THROTTLED` payloads).
    pub code: u16,
    /// Server-provided description.
    pub message: String,
    /// Seconds suggested by the `Retry-After` header, if any.
    pub retry_after: Option<f64>,
    /// Request id from the `X-Request-Id` header, if present.
    pub error_reference: Option<String>,
}

/// The credentials were rejected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Authentication failed (HTTP {code}): {message}")]
pub struct AuthenticationError {
    /// HTTP status of the response (401 or 403).
    pub code: u16,
    /// Serialized error details.
    pub message: String,
    /// Request id from the `X-Request-Id` header, if present.
    pub error_reference: Option<String>,
}

/// A request that failed validation before it was sent.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidGraphqlRequestError {
    /// The query document was empty.
    #[error("Cannot send an empty GraphQL query.")]
    EmptyQuery,
}

/// Error type for one GraphQL call.
#[derive(Debug, Error)]
pub enum GraphqlError {
    /// The server reported GraphQL errors.
    #[error(transparent)]
    Api(#[from] GraphqlApiError),

    /// The server throttled the request.
    #[error(transparent)]
    RateLimited(#[from] RateLimitError),

    /// The credentials were rejected.
    #[error(transparent)]
    Authentication(#[from] AuthenticationError),

    /// The transport failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The request was invalid.
    #[error(transparent)]
    InvalidRequest(#[from] InvalidGraphqlRequestError),
}

impl GraphqlError {
    /// Returns `true` if retrying the same request may succeed.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::RateLimited(_))
    }
}
