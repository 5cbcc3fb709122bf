//! Cost-budget arithmetic: page sizing, proactive throttling and backoff.
//!
//! Everything here is a pure function of the current [`CostBudget`] and the
//! [`PaginationConfig`], which keeps the controller loop small and lets the
//! numbers be tested without a server.

use std::time::Duration;

use crate::clients::graphql::CostBudget;
use crate::config::PaginationConfig;

/// Cost assumed per returned item when nothing better is known.
pub const DEFAULT_COST_PER_ITEM: f64 = 2.0;

/// Estimates how many cost points one item of a connection consumes.
///
/// Real cost depends on the selected fields (variants, images, metafields),
/// so callers that know their query shape can supply a sharper estimate.
/// Any `Fn(&str, &str) -> f64` taking `(resource, query)` is an estimator.
///
/// # Example
///
/// ```rust
/// use shopify_paginator::pagination::CostEstimator;
///
/// let estimator = |_resource: &str, query: &str| {
///     if query.contains("variants") { 6.0 } else { 2.0 }
/// };
/// assert_eq!(estimator.cost_per_item("products", "{ products { nodes { id } } }"), 2.0);
/// ```
pub trait CostEstimator: Send + Sync {
    /// Returns the estimated cost of one item of `resource` fetched by `query`.
    ///
    /// Non-finite or non-positive estimates are replaced by
    /// [`DEFAULT_COST_PER_ITEM`].
    fn cost_per_item(&self, resource: &str, query: &str) -> f64;
}

impl<F> CostEstimator for F
where
    F: Fn(&str, &str) -> f64 + Send + Sync,
{
    fn cost_per_item(&self, resource: &str, query: &str) -> f64 {
        self(resource, query)
    }
}

/// A constant per-item cost.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedCostEstimator(pub f64);

impl Default for FixedCostEstimator {
    fn default() -> Self {
        Self(DEFAULT_COST_PER_ITEM)
    }
}

impl CostEstimator for FixedCostEstimator {
    fn cost_per_item(&self, _resource: &str, _query: &str) -> f64 {
        self.0
    }
}

/// Returns the page size to request given the current budget.
///
/// `min(requested, floor(floor(available * ratio) / cost_per_item), max_page_size)`,
/// never less than 1 so a collapsed budget still makes progress.
/// `requested` is clamped to `1..=max_page_size` first.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn optimal_batch_size(
    budget: &CostBudget,
    requested: u32,
    cost_per_item: f64,
    config: &PaginationConfig,
) -> u32 {
    let cost_per_item = sanitize_cost(cost_per_item);
    let ceiling = requested.clamp(1, config.max_page_size());

    let max_safe_cost = (budget.currently_available.max(0.0) * config.budget_safety_ratio()).floor();
    let max_items_for_cost = (max_safe_cost / cost_per_item).floor();

    if max_items_for_cost < 1.0 {
        1
    } else if max_items_for_cost >= f64::from(ceiling) {
        ceiling
    } else {
        // In [1, ceiling) here, so the cast is exact
        max_items_for_cost as u32
    }
}

/// Returns how long to pause before the next request, if at all.
///
/// Below the low-water mark the pause is the time the bucket needs to refill
/// to it: `ceil((low_water_mark - available) / restore_rate * 1000)` ms.
/// A non-positive restore rate waits [`PaginationConfig::max_backoff`].
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn throttle_wait(budget: &CostBudget, config: &PaginationConfig) -> Option<Duration> {
    let deficit = config.low_water_mark() - budget.currently_available;
    if deficit <= 0.0 {
        return None;
    }
    if budget.restore_rate <= 0.0 {
        return Some(config.max_backoff());
    }

    let millis = (deficit / budget.restore_rate * 1000.0).ceil();
    Some(Duration::from_millis(millis as u64))
}

/// Returns the backoff after a rate-limit response.
///
/// `min(max_backoff, base_backoff * 2^floor(total_fetched / backoff_item_step))`:
/// the longer a fetch has been running, the harder it backs off.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn rate_limit_backoff(total_fetched: usize, config: &PaginationConfig) -> Duration {
    let total_fetched = u64::try_from(total_fetched).unwrap_or(u64::MAX);
    let exponent = (total_fetched / config.backoff_item_step()).min(31) as u32;

    config
        .base_backoff()
        .saturating_mul(2u32.saturating_pow(exponent))
        .min(config.max_backoff())
}

fn sanitize_cost(cost_per_item: f64) -> f64 {
    if cost_per_item.is_finite() && cost_per_item > 0.0 {
        cost_per_item
    } else {
        DEFAULT_COST_PER_ITEM
    }
}
