//! Tuning knobs for [`PaginationController`](crate::PaginationController).

use std::time::Duration;

use crate::clients::graphql::CostBudget;
use crate::error::ConfigError;

/// Hard per-page ceiling enforced by the Admin API.
pub const API_MAX_PAGE_SIZE: u32 = 250;

/// Settings for the adaptive batch-size, throttle and backoff logic.
///
/// The defaults mirror the Admin API's published limits: pages of at most
/// 250 items, at most 80% of the known budget spent per request, a proactive
/// pause below 100 available points, and exponential backoff from one second
/// up to thirty seconds.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use shopify_paginator::PaginationConfig;
///
/// let config = PaginationConfig::builder()
///     .max_page_size(100)
///     .max_rate_limit_retries(Some(3))
///     .base_backoff(Duration::from_millis(500))
///     .build()
///     .unwrap();
///
/// assert_eq!(config.max_page_size(), 100);
/// assert_eq!(config.max_rate_limit_retries(), Some(3));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct PaginationConfig {
    max_page_size: u32,
    budget_safety_ratio: f64,
    low_water_mark: f64,
    base_backoff: Duration,
    max_backoff: Duration,
    backoff_item_step: u64,
    initial_budget: CostBudget,
    max_rate_limit_retries: Option<u32>,
}

impl PaginationConfig {
    /// Creates a new builder for constructing a `PaginationConfig`.
    #[must_use]
    pub fn builder() -> PaginationConfigBuilder {
        PaginationConfigBuilder::new()
    }

    /// Largest `first` value ever sent.
    #[must_use]
    pub const fn max_page_size(&self) -> u32 {
        self.max_page_size
    }

    /// Share of the currently available budget one request may spend.
    #[must_use]
    pub const fn budget_safety_ratio(&self) -> f64 {
        self.budget_safety_ratio
    }

    /// Available points below which the controller pauses before a request.
    #[must_use]
    pub const fn low_water_mark(&self) -> f64 {
        self.low_water_mark
    }

    /// Backoff applied to the first rate-limit step.
    #[must_use]
    pub const fn base_backoff(&self) -> Duration {
        self.base_backoff
    }

    /// Upper bound for any single wait.
    #[must_use]
    pub const fn max_backoff(&self) -> Duration {
        self.max_backoff
    }

    /// Number of fetched items after which the backoff doubles.
    #[must_use]
    pub const fn backoff_item_step(&self) -> u64 {
        self.backoff_item_step
    }

    /// Budget assumed before the server has reported one.
    #[must_use]
    pub const fn initial_budget(&self) -> CostBudget {
        self.initial_budget
    }

    /// Consecutive rate-limit retries allowed for a single page.
    ///
    /// `None` retries forever.
    #[must_use]
    pub const fn max_rate_limit_retries(&self) -> Option<u32> {
        self.max_rate_limit_retries
    }
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            max_page_size: API_MAX_PAGE_SIZE,
            budget_safety_ratio: 0.8,
            low_water_mark: 100.0,
            base_backoff: Duration::from_secs(1),
            max_backoff: Duration::from_secs(30),
            backoff_item_step: 1000,
            initial_budget: CostBudget::default(),
            max_rate_limit_retries: Some(5),
        }
    }
}

/// Builder for [`PaginationConfig`].
///
/// Every setting is optional; unset values keep their defaults.
#[derive(Debug, Default)]
pub struct PaginationConfigBuilder {
    max_page_size: Option<u32>,
    budget_safety_ratio: Option<f64>,
    low_water_mark: Option<f64>,
    base_backoff: Option<Duration>,
    max_backoff: Option<Duration>,
    backoff_item_step: Option<u64>,
    initial_budget: Option<CostBudget>,
    max_rate_limit_retries: Option<Option<u32>>,
}

impl PaginationConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the largest page size, between 1 and 250.
    #[must_use]
    pub const fn max_page_size(mut self, size: u32) -> Self {
        self.max_page_size = Some(size);
        self
    }

    /// Sets the budget share one request may spend, in `(0, 1]`.
    #[must_use]
    pub fn budget_safety_ratio(mut self, ratio: f64) -> Self {
        self.budget_safety_ratio = Some(ratio);
        self
    }

    /// Sets the proactive throttle threshold in cost points.
    #[must_use]
    pub fn low_water_mark(mut self, points: f64) -> Self {
        self.low_water_mark = Some(points);
        self
    }

    /// Sets the first-step rate-limit backoff.
    #[must_use]
    pub const fn base_backoff(mut self, backoff: Duration) -> Self {
        self.base_backoff = Some(backoff);
        self
    }

    /// Sets the cap applied to every wait.
    #[must_use]
    pub const fn max_backoff(mut self, backoff: Duration) -> Self {
        self.max_backoff = Some(backoff);
        self
    }

    /// Sets how many fetched items double the backoff.
    #[must_use]
    pub const fn backoff_item_step(mut self, items: u64) -> Self {
        self.backoff_item_step = Some(items);
        self
    }

    /// Sets the budget assumed before the first response.
    #[must_use]
    pub fn initial_budget(mut self, budget: CostBudget) -> Self {
        self.initial_budget = Some(budget);
        self
    }

    /// Sets the per-page rate-limit retry ceiling (`None` for unbounded).
    #[must_use]
    pub const fn max_rate_limit_retries(mut self, retries: Option<u32>) -> Self {
        self.max_rate_limit_retries = Some(retries);
        self
    }

    /// Builds the [`PaginationConfig`], validating every range.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::OutOfRange`] when a value is outside its
    /// allowed range, or when `base_backoff` exceeds `max_backoff`.
    pub fn build(self) -> Result<PaginationConfig, ConfigError> {
        let defaults = PaginationConfig::default();

        let max_page_size = self.max_page_size.unwrap_or(defaults.max_page_size);
        if !(1..=API_MAX_PAGE_SIZE).contains(&max_page_size) {
            return Err(ConfigError::OutOfRange {
                field: "max_page_size",
                value: f64::from(max_page_size),
                reason: "must be between 1 and 250",
            });
        }

        let budget_safety_ratio = self
            .budget_safety_ratio
            .unwrap_or(defaults.budget_safety_ratio);
        if !(budget_safety_ratio > 0.0 && budget_safety_ratio <= 1.0) {
            return Err(ConfigError::OutOfRange {
                field: "budget_safety_ratio",
                value: budget_safety_ratio,
                reason: "must be in (0, 1]",
            });
        }

        let low_water_mark = self.low_water_mark.unwrap_or(defaults.low_water_mark);
        if !(low_water_mark.is_finite() && low_water_mark >= 0.0) {
            return Err(ConfigError::OutOfRange {
                field: "low_water_mark",
                value: low_water_mark,
                reason: "must be a finite, non-negative number of points",
            });
        }

        let backoff_item_step = self.backoff_item_step.unwrap_or(defaults.backoff_item_step);
        if backoff_item_step == 0 {
            return Err(ConfigError::OutOfRange {
                field: "backoff_item_step",
                value: 0.0,
                reason: "must be greater than zero",
            });
        }

        let base_backoff = self.base_backoff.unwrap_or(defaults.base_backoff);
        let max_backoff = self.max_backoff.unwrap_or(defaults.max_backoff);
        if base_backoff > max_backoff {
            return Err(ConfigError::OutOfRange {
                field: "base_backoff",
                value: base_backoff.as_secs_f64(),
                reason: "must not exceed max_backoff",
            });
        }

        let initial_budget = self.initial_budget.unwrap_or(defaults.initial_budget);
        if !(initial_budget.maximum_available > 0.0 && initial_budget.restore_rate > 0.0) {
            return Err(ConfigError::OutOfRange {
                field: "initial_budget",
                value: initial_budget.maximum_available,
                reason: "maximum_available and restore_rate must be positive",
            });
        }

        Ok(PaginationConfig {
            max_page_size,
            budget_safety_ratio,
            low_water_mark,
            base_backoff,
            max_backoff,
            backoff_item_step,
            initial_budget,
            max_rate_limit_retries: self
                .max_rate_limit_retries
                .unwrap_or(defaults.max_rate_limit_retries),
        })
    }
}
