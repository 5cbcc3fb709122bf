//! Transport-level error types.
//!
//! These errors describe failures below the GraphQL layer: the request never
//! produced a usable HTTP response, or the response carried a status the
//! executor does not treat specially.
//!
//! - [`HttpResponseError`]: a non-2xx response with its status and body summary
//! - [`TransportError`]: unified transport failure type
//!
//! # Example
//!
//! ```rust,ignore
//! use shopify_paginator::clients::TransportError;
//!
//! match transport.post_graphql(&request).await {
//!     Ok(response) => println!("status {}", response.code),
//!     Err(TransportError::Network(e)) => println!("network error: {e}"),
//!     Err(other) => println!("transport failure: {other}"),
//! }
//! ```

use thiserror::Error;

/// Error returned when the endpoint answers with an unexpected status.
///
/// The message is a compact JSON rendering of the error fields found in the
/// body (`errors`, `error`, `error_description`) plus the request id, so it can
/// be logged or surfaced as-is.
///
/// # Example
///
/// ```rust
/// use shopify_paginator::clients::HttpResponseError;
///
/// let error = HttpResponseError {
///     code: 502,
///     message: r#"{"error":"Bad Gateway"}"#.to_string(),
///     error_reference: Some("req-1".to_string()),
/// };
/// assert!(error.to_string().contains("502"));
/// ```
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("HTTP {code}: {message}")]
pub struct HttpResponseError {
    /// The HTTP status code of the response.
    pub code: u16,
    /// Serialized error details.
    pub message: String,
    /// Request id from the `X-Request-Id` header, if present.
    pub error_reference: Option<String>,
}

/// Unified error type for failures below the GraphQL layer.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The server returned a status with no dedicated handling.
    #[error(transparent)]
    Response(#[from] HttpResponseError),

    /// The request could not be sent or the response could not be read.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The request body could not be encoded.
    #[error("Failed to encode GraphQL request: {0}")]
    Encode(#[from] serde_json::Error),

    /// A successful status carried a body that is not JSON.
    #[error("HTTP {code} response body is not valid JSON: {source}")]
    InvalidBody {
        /// The HTTP status code.
        code: u16,
        /// The parse failure.
        #[source]
        source: serde_json::Error,
    },

    /// A custom transport failed for its own reasons.
    #[error("Transport failure: {0}")]
    Other(String),
}

impl TransportError {
    /// Returns the HTTP status code when the failure carries one.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Response(e) => Some(e.code),
            Self::InvalidBody { code, .. } => Some(*code),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_response_error_includes_status_and_message() {
        let error = HttpResponseError {
            code: 500,
            message: r#"{"errors":"Internal"}"#.to_string(),
            error_reference: None,
        };
        assert_eq!(error.to_string(), r#"HTTP 500: {"errors":"Internal"}"#);
    }

    #[test]
    fn test_status_is_exposed_for_response_errors_only() {
        let response: TransportError = HttpResponseError {
            code: 503,
            message: "{}".to_string(),
            error_reference: None,
        }
        .into();
        assert_eq!(response.status(), Some(503));

        let other = TransportError::Other("socket closed".to_string());
        assert_eq!(other.status(), None);
        assert!(other.to_string().contains("socket closed"));
    }

    #[test]
    fn test_invalid_body_reports_its_status() {
        let source = serde_json::from_str::<serde_json::Value>("<html>").unwrap_err();
        let error = TransportError::InvalidBody { code: 200, source };
        assert_eq!(error.status(), Some(200));
        assert!(error.to_string().starts_with("HTTP 200 response body is not valid JSON"));
    }

    #[test]
    fn test_encode_error_converts() {
        let bad = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error: TransportError = bad.into();
        assert!(matches!(error, TransportError::Encode(_)));
    }
}
