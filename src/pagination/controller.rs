//! The cost-aware fetch loop.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::clients::graphql::{CostBudget, GraphqlError, GraphqlResult, RequestExecutor};
use crate::config::PaginationConfig;
use crate::pagination::budget::{
    optimal_batch_size, rate_limit_backoff, throttle_wait, CostEstimator, FixedCostEstimator,
};
use crate::pagination::errors::{MaxRateLimitRetriesExceededError, PaginationError};
use crate::pagination::options::{FetchOptions, FetchOutcome, FetchSummary, StopReason};
use crate::pagination::page::PageResult;

/// Fetches every item of a connection, one cursor page at a time.
///
/// The controller sizes each page from the last known cost budget, pauses
/// when the budget runs low, and retries rate-limited pages with a backoff
/// that grows with the number of items already fetched.
///
/// The query must declare `$first: Int!` and `$after: String` and pass them to
/// the connection field named by `resource`. Both variables are set by the
/// controller on every request and override any caller value.
///
/// Each `fetch_*` call owns its own session state, so one controller can be
/// shared (`Arc<PaginationController>` or `&PaginationController`) across any
/// number of concurrent fetches.
///
/// # Example
///
/// ```rust,ignore
/// use shopify_paginator::{FetchOptions, PaginationController, RequestExecutor};
/// use serde_json::Map;
///
/// let controller = PaginationController::new(RequestExecutor::from_config(&config));
///
/// let query = r#"
///     query($first: Int!, $after: String) {
///       products(first: $first, after: $after) {
///         edges { node { id title } }
///         pageInfo { hasNextPage endCursor }
///       }
///     }
/// "#;
///
/// let products = controller
///     .fetch_all("products", query, Map::new(), FetchOptions::new().max_items(500))
///     .await?;
/// ```
#[derive(Clone)]
pub struct PaginationController {
    executor: RequestExecutor,
    config: PaginationConfig,
    cost_estimator: Arc<dyn CostEstimator>,
}

// Verify PaginationController is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<PaginationController>();
};

impl std::fmt::Debug for PaginationController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaginationController")
            .field("executor", &self.executor)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl PaginationController {
    /// Creates a controller with the default [`PaginationConfig`] and a
    /// fixed cost estimate of two points per item.
    #[must_use]
    pub fn new(executor: RequestExecutor) -> Self {
        Self::with_config(executor, PaginationConfig::default())
    }

    /// Creates a controller with explicit tuning.
    #[must_use]
    pub fn with_config(executor: RequestExecutor, config: PaginationConfig) -> Self {
        Self {
            executor,
            config,
            cost_estimator: Arc::new(FixedCostEstimator::default()),
        }
    }

    /// Replaces the per-item cost estimator.
    #[must_use]
    pub fn cost_estimator<E: CostEstimator + 'static>(mut self, estimator: E) -> Self {
        self.cost_estimator = Arc::new(estimator);
        self
    }

    /// Returns the tuning in effect.
    #[must_use]
    pub const fn config(&self) -> &PaginationConfig {
        &self.config
    }

    /// Returns the underlying executor.
    #[must_use]
    pub const fn executor(&self) -> &RequestExecutor {
        &self.executor
    }

    /// Fetches all items of `resource`, in server order.
    ///
    /// Returns at most `options.item_limit()` items when a cap is set. When a
    /// response lacks the `resource` connection the items gathered so far
    /// are returned.
    ///
    /// # Errors
    ///
    /// Returns [`PaginationError::Graphql`] for GraphQL, authentication and
    /// transport failures, [`PaginationError::RateLimitRetriesExhausted`]
    /// when one page stays rate limited past the retry ceiling, and
    /// [`PaginationError::Cancelled`] when the caller's token fires. Items
    /// gathered before the failure are discarded.
    pub async fn fetch_all(
        &self,
        resource: &str,
        query: &str,
        variables: Map<String, Value>,
        options: FetchOptions,
    ) -> Result<Vec<Value>, PaginationError> {
        self.fetch_all_with_summary(resource, query, variables, options)
            .await
            .map(|outcome| outcome.items)
    }

    /// Like [`fetch_all`](Self::fetch_all), deserializing every item into `T`.
    ///
    /// # Errors
    ///
    /// Everything [`fetch_all`](Self::fetch_all) returns, plus
    /// [`PaginationError::Deserialize`] for the first item that does not
    /// match `T`.
    pub async fn fetch_all_as<T: DeserializeOwned>(
        &self,
        resource: &str,
        query: &str,
        variables: Map<String, Value>,
        options: FetchOptions,
    ) -> Result<Vec<T>, PaginationError> {
        let items = self.fetch_all(resource, query, variables, options).await?;

        items
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                serde_json::from_value(item).map_err(|source| PaginationError::Deserialize {
                    resource: resource.to_string(),
                    index,
                    source,
                })
            })
            .collect()
    }

    /// Like [`fetch_all`](Self::fetch_all), also reporting pages, waits,
    /// retries and why the loop stopped.
    ///
    /// # Errors
    ///
    /// See [`fetch_all`](Self::fetch_all).
    pub async fn fetch_all_with_summary(
        &self,
        resource: &str,
        query: &str,
        variables: Map<String, Value>,
        options: FetchOptions,
    ) -> Result<FetchOutcome, PaginationError> {
        if resource.trim().is_empty() {
            return Err(PaginationError::EmptyResource);
        }

        let cost_per_item = self.cost_estimator.cost_per_item(resource, query);
        let mut session = FetchSession::new(resource, &options, self.config.initial_budget());

        let stop_reason = loop {
            if options.is_cancelled() {
                return Err(session.cancelled());
            }

            if let Some(wait) = throttle_wait(&session.budget, &self.config) {
                tracing::info!(
                    resource,
                    currently_available = session.budget.currently_available,
                    restore_rate = session.budget.restore_rate,
                    wait_ms = wait.as_millis(),
                    "Cost budget low, pausing before next page"
                );
                pause(wait, &session).await?;
                session.throttle_wait += wait;
            }

            let first = optimal_batch_size(
                &session.budget,
                options.requested_batch_size(),
                cost_per_item,
                &self.config,
            );
            let page_variables = page_variables(&variables, first, session.cursor.as_deref());

            let result = self.fetch_page(query, page_variables, &mut session).await?;
            session.pages_fetched += 1;

            let Some(page) = PageResult::from_result(result, resource) else {
                tracing::debug!(
                    resource,
                    page = session.pages_fetched,
                    "Connection missing from response, ending fetch"
                );
                break StopReason::ConnectionMissing;
            };

            if let Some(cost) = &page.cost {
                session.budget = cost.throttle_status;
            }

            let PageResult {
                items,
                received,
                has_next_page,
                end_cursor,
                ..
            } = page;

            session.items.extend(items);
            if options.item_limit() > 0 {
                session.items.truncate(options.item_limit());
            }
            session.cursor = end_cursor;

            tracing::debug!(
                resource,
                page = session.pages_fetched,
                first,
                received,
                total_fetched = session.items.len(),
                has_next_page,
                "Fetched page"
            );

            if options.limit_reached(session.items.len()) {
                break StopReason::MaxItemsReached;
            }
            if !has_next_page {
                break StopReason::NoNextPage;
            }
            if received < usize::try_from(first).unwrap_or(usize::MAX) {
                tracing::debug!(
                    resource,
                    first,
                    received,
                    "Short page despite hasNextPage, treating resource as exhausted"
                );
                break StopReason::ShortPage;
            }
            if session.cursor.is_none() {
                tracing::warn!(
                    resource,
                    page = session.pages_fetched,
                    "hasNextPage is true but endCursor is null, stopping"
                );
                break StopReason::MissingCursor;
            }
        };

        tracing::debug!(
            resource,
            items = session.items.len(),
            pages = session.pages_fetched,
            stop_reason = ?stop_reason,
            "Pagination finished"
        );

        Ok(session.finish(stop_reason))
    }

    /// Issues one page request, retrying it while it is rate limited.
    async fn fetch_page(
        &self,
        query: &str,
        variables: Map<String, Value>,
        session: &mut FetchSession<'_>,
    ) -> Result<GraphqlResult, PaginationError> {
        let mut retries = 0u32;

        loop {
            let error = match self.executor.execute(query, variables.clone()).await {
                Ok(result) => return Ok(result),
                Err(GraphqlError::RateLimited(error)) => error,
                Err(other) => return Err(other.into()),
            };

            if self
                .config
                .max_rate_limit_retries()
                .is_some_and(|max| retries >= max)
            {
                return Err(MaxRateLimitRetriesExceededError {
                    resource: session.resource.to_string(),
                    retries,
                    total_fetched: session.items.len(),
                    last_error: error,
                }
                .into());
            }

            retries += 1;
            session.rate_limit_retries += 1;

            let backoff = rate_limit_backoff(session.items.len(), &self.config);
            tracing::warn!(
                resource = session.resource,
                attempt = retries,
                total_fetched = session.items.len(),
                backoff_ms = backoff.as_millis(),
                error = %error,
                "Page request rate limited, retrying the same page"
            );

            pause(backoff, session).await?;
            session.backoff_wait += backoff;
        }
    }
}

/// State owned by one `fetch_*` call.
struct FetchSession<'a> {
    resource: &'a str,
    options: &'a FetchOptions,
    budget: CostBudget,
    cursor: Option<String>,
    items: Vec<Value>,
    pages_fetched: usize,
    rate_limit_retries: u32,
    throttle_wait: Duration,
    backoff_wait: Duration,
}

impl<'a> FetchSession<'a> {
    const fn new(resource: &'a str, options: &'a FetchOptions, budget: CostBudget) -> Self {
        Self {
            resource,
            options,
            budget,
            cursor: None,
            items: Vec::new(),
            pages_fetched: 0,
            rate_limit_retries: 0,
            throttle_wait: Duration::ZERO,
            backoff_wait: Duration::ZERO,
        }
    }

    fn cancelled(&self) -> PaginationError {
        tracing::debug!(
            resource = self.resource,
            fetched = self.items.len(),
            "Pagination cancelled"
        );
        PaginationError::Cancelled {
            resource: self.resource.to_string(),
            fetched: self.items.len(),
        }
    }

    fn finish(self, stop_reason: StopReason) -> FetchOutcome {
        FetchOutcome {
            items: self.items,
            summary: FetchSummary {
                pages_fetched: self.pages_fetched,
                rate_limit_retries: self.rate_limit_retries,
                throttle_wait: self.throttle_wait,
                backoff_wait: self.backoff_wait,
                final_budget: self.budget,
                stop_reason,
            },
        }
    }
}

/// Sleeps for `wait`, returning early with an error if the session is cancelled.
async fn pause(wait: Duration, session: &FetchSession<'_>) -> Result<(), PaginationError> {
    let Some(token) = session.options.cancellation_token() else {
        tokio::time::sleep(wait).await;
        return Ok(());
    };

    tokio::select! {
        biased;
        () = token.cancelled() => Err(session.cancelled()),
        () = tokio::time::sleep(wait) => Ok(()),
    }
}

/// Builds the variables of one page request from the caller's variables.
fn page_variables(base: &Map<String, Value>, first: u32, cursor: Option<&str>) -> Map<String, Value> {
    let mut variables = base.clone();
    variables.insert("first".to_string(), Value::from(first));
    variables.insert(
        "after".to_string(),
        cursor.map_or(Value::Null, Value::from),
    );
    variables
}
