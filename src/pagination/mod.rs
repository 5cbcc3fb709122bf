//! Cost-aware cursor pagination over Admin API connections.
//!
//! # Overview
//!
//! - [`PaginationController`]: drives `first`/`after` requests until a
//!   connection is exhausted
//! - [`FetchOptions`]: per-call page size hint, item cap and cancellation
//! - [`FetchOutcome`], [`FetchSummary`], [`StopReason`]: what a fetch did
//! - [`CostEstimator`]: per-item cost model used to size pages
//! - [`optimal_batch_size`], [`throttle_wait`], [`rate_limit_backoff`]: the
//!   budget arithmetic, exposed for callers that drive requests themselves
//! - [`PaginationError`]: failures that abort a fetch
//!
//! # Flow
//!
//! Each page goes through the same steps:
//!
//! 1. Pause when the known budget is under the low-water mark
//! 2. Size the page from the budget and the cost estimate
//! 3. Request it, retrying with backoff while rate limited
//! 4. Adopt the server's budget, append items and advance the cursor
//!
//! The loop stops at the last page, at the item cap, on a short page, or
//! when the connection is missing from the response.

mod budget;
mod controller;
mod errors;
mod options;
mod page;

pub use budget::{
    optimal_batch_size, rate_limit_backoff, throttle_wait, CostEstimator, FixedCostEstimator,
    DEFAULT_COST_PER_ITEM,
};
pub use controller::PaginationController;
pub use errors::{MaxRateLimitRetriesExceededError, PaginationError};
pub use options::{FetchOptions, FetchOutcome, FetchSummary, StopReason};
pub use page::PageResult;
