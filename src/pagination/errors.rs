//! Errors that abort a pagination session.
//!
//! A missing connection is not an error: the fetch ends with the items
//! gathered so far.

use thiserror::Error;

use crate::clients::graphql::{GraphqlError, RateLimitError};

/// Error returned when one page keeps getting rate limited.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("Exceeded maximum rate-limit retry count of {retries} for one page of '{resource}'. Last error: {last_error}")]
pub struct MaxRateLimitRetriesExceededError {
    /// The resource being fetched.
    pub resource: String,
    /// Retries attempted for the failing page.
    pub retries: u32,
    /// Items accumulated before the failing page.
    pub total_fetched: usize,
    /// The final rate-limit error.
    pub last_error: RateLimitError,
}

/// Error type for [`PaginationController`](crate::PaginationController) operations.
///
/// Every variant aborts the session and discards the accumulated items.
#[derive(Debug, Error)]
pub enum PaginationError {
    /// A page request failed with a non-recoverable error.
    #[error(transparent)]
    Graphql(#[from] GraphqlError),

    /// A page stayed rate limited past the configured retry ceiling.
    #[error(transparent)]
    RateLimitRetriesExhausted(#[from] MaxRateLimitRetriesExceededError),

    /// The caller cancelled the session.
    #[error("Fetch of '{resource}' was cancelled after {fetched} items")]
    Cancelled {
        /// The resource being fetched.
        resource: String,
        /// Items accumulated before cancellation.
        fetched: usize,
    },

    /// An item did not match the requested type.
    #[error("Failed to deserialize '{resource}' item at index {index}: {source}")]
    Deserialize {
        /// The resource being fetched.
        resource: String,
        /// Position of the offending item in the result.
        index: usize,
        /// The underlying serde error.
        #[source]
        source: serde_json::Error,
    },

    /// The resource name was empty.
    #[error("Resource name cannot be empty.")]
    EmptyResource,
}
