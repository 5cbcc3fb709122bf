//! Per-call options and the summary reported after a fetch.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::clients::graphql::CostBudget;
use crate::config::API_MAX_PAGE_SIZE;

/// Options for one `fetch_all` call.
///
/// # Example
///
/// ```rust
/// use shopify_paginator::FetchOptions;
/// use tokio_util::sync::CancellationToken;
///
/// let token = CancellationToken::new();
/// let options = FetchOptions::new()
///     .batch_size(100)
///     .max_items(1_000)
///     .cancellation(token.clone());
///
/// assert_eq!(options.requested_batch_size(), 100);
/// assert_eq!(options.item_limit(), 1_000);
/// ```
#[derive(Clone, Debug)]
pub struct FetchOptions {
    requested_batch_size: u32,
    max_items: usize,
    cancellation: Option<CancellationToken>,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            requested_batch_size: API_MAX_PAGE_SIZE,
            max_items: 0,
            cancellation: None,
        }
    }
}

impl FetchOptions {
    /// Creates options with a 250-item batch hint and no item cap.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the preferred page size. The controller clamps it to
    /// `1..=max_page_size` and to the cost-derived ceiling.
    #[must_use]
    pub const fn batch_size(mut self, size: u32) -> Self {
        self.requested_batch_size = size;
        self
    }

    /// Caps the number of items returned. `0` means unlimited.
    #[must_use]
    pub const fn max_items(mut self, max: usize) -> Self {
        self.max_items = max;
        self
    }

    /// Lets the caller abandon the fetch between pages or during a wait.
    #[must_use]
    pub fn cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Returns the preferred page size.
    #[must_use]
    pub const fn requested_batch_size(&self) -> u32 {
        self.requested_batch_size
    }

    /// Returns the item cap (`0` for unlimited).
    #[must_use]
    pub const fn item_limit(&self) -> usize {
        self.max_items
    }

    /// Returns the cancellation token, if any.
    #[must_use]
    pub const fn cancellation_token(&self) -> Option<&CancellationToken> {
        self.cancellation.as_ref()
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
    }

    pub(crate) const fn limit_reached(&self, fetched: usize) -> bool {
        self.max_items > 0 && fetched >= self.max_items
    }
}

/// Why a fetch stopped requesting pages.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    /// The last page reported `hasNextPage: false`.
    NoNextPage,
    /// The caller's item cap was reached.
    MaxItemsReached,
    /// `data[resource]` or its edges/nodes were absent.
    ConnectionMissing,
    /// A page returned fewer items than requested.
    ShortPage,
    /// A page claimed more data but carried no `endCursor`.
    MissingCursor,
}

/// What happened during a fetch.
#[derive(Clone, Debug, PartialEq)]
pub struct FetchSummary {
    /// Successful page responses, including the final one.
    pub pages_fetched: usize,
    /// Rate-limit retries across all pages.
    pub rate_limit_retries: u32,
    /// Total time spent in proactive low-budget pauses.
    pub throttle_wait: Duration,
    /// Total time spent backing off after rate limits.
    pub backoff_wait: Duration,
    /// The budget as last known when the fetch ended.
    pub final_budget: CostBudget,
    /// Why the loop ended.
    pub stop_reason: StopReason,
}

/// Items plus the summary of how they were fetched.
#[derive(Clone, Debug, PartialEq)]
pub struct FetchOutcome {
    /// The fetched items, in server order.
    pub items: Vec<serde_json::Value>,
    /// How the fetch went.
    pub summary: FetchSummary,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = FetchOptions::default();
        assert_eq!(options.requested_batch_size(), 250);
        assert_eq!(options.item_limit(), 0);
        assert!(options.cancellation_token().is_none());
        assert!(!options.is_cancelled());
    }

    #[test]
    fn test_max_items_setter_is_read_back() {
        let options = FetchOptions::new().batch_size(50).max_items(1_000);
        assert_eq!(options.item_limit(), 1_000);
        assert_eq!(options.requested_batch_size(), 50);
    }

    #[test]
    fn test_limit_reached_only_with_cap() {
        let unlimited = FetchOptions::new();
        assert!(!unlimited.limit_reached(1_000_000));

        let capped = FetchOptions::new().max_items(10);
        assert!(!capped.limit_reached(9));
        assert!(capped.limit_reached(10));
        assert!(capped.limit_reached(11));
    }

    #[test]
    fn test_cancellation_is_observed() {
        let token = CancellationToken::new();
        let options = FetchOptions::new().cancellation(token.clone());
        assert!(!options.is_cancelled());
        token.cancel();
        assert!(options.is_cancelled());
    }
}
