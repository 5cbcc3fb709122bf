//! Query cost telemetry reported in `extensions.cost`.
//!
//! The Admin API meters GraphQL traffic with a leaky bucket of cost points.
//! Every response reports what the query cost and how full the bucket is:
//!
//! ```json
//! "extensions": {
//!   "cost": {
//!     "requestedQueryCost": 101,
//!     "actualQueryCost": 46,
//!     "throttleStatus": {
//!       "maximumAvailable": 1000.0,
//!       "currentlyAvailable": 954,
//!       "restoreRate": 50.0
//!     }
//!   }
//! }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The server-reported rate-limit bucket.
///
/// Values are cost points; `restore_rate` is points regained per second.
/// Constructors clamp `currently_available` into
/// `0..=maximum_available`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostBudget {
    /// Points that can be spent right now.
    pub currently_available: f64,
    /// Bucket capacity.
    pub maximum_available: f64,
    /// Points regenerated per second.
    pub restore_rate: f64,
}

impl CostBudget {
    /// Creates a budget, clamping the available points into range.
    #[must_use]
    pub fn new(currently_available: f64, maximum_available: f64, restore_rate: f64) -> Self {
        Self {
            currently_available,
            maximum_available,
            restore_rate,
        }
        .normalized()
    }

    /// Returns a copy with `0 <= currently_available <= maximum_available`.
    ///
    /// Non-finite values collapse to zero.
    #[must_use]
    pub fn normalized(self) -> Self {
        let finite = |v: f64| if v.is_finite() { v.max(0.0) } else { 0.0 };
        let maximum_available = finite(self.maximum_available);
        Self {
            currently_available: finite(self.currently_available).min(maximum_available),
            maximum_available,
            restore_rate: finite(self.restore_rate),
        }
    }
}

impl Default for CostBudget {
    /// The conservative budget assumed before the server reports one.
    fn default() -> Self {
        Self {
            currently_available: 1000.0,
            maximum_available: 1000.0,
            restore_rate: 50.0,
        }
    }
}

/// Cost telemetry for one query.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryCost {
    /// Cost the server estimated before running the query.
    #[serde(default)]
    pub requested_query_cost: Option<f64>,
    /// Cost actually charged.
    #[serde(default)]
    pub actual_query_cost: Option<f64>,
    /// Bucket state after the query.
    pub throttle_status: CostBudget,
}

impl QueryCost {
    /// Reads cost telemetry from a response `extensions` object.
    ///
    /// Returns `None` when `cost.throttleStatus` is missing or malformed; the
    /// server is allowed to omit it.
    #[must_use]
    pub fn from_extensions(extensions: &Value) -> Option<Self> {
        let cost = extensions.get("cost")?;
        let mut parsed: Self = serde_json::from_value(cost.clone()).ok()?;
        parsed.throttle_status = parsed.throttle_status.normalized();
        Some(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_budget_is_conservative() {
        let budget = CostBudget::default();
        assert!((budget.currently_available - 1000.0).abs() < f64::EPSILON);
        assert!((budget.maximum_available - 1000.0).abs() < f64::EPSILON);
        assert!((budget.restore_rate - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_new_clamps_available_into_range() {
        let over = CostBudget::new(1500.0, 1000.0, 50.0);
        assert!((over.currently_available - 1000.0).abs() < f64::EPSILON);

        let negative = CostBudget::new(-5.0, 1000.0, 50.0);
        assert!(negative.currently_available.abs() < f64::EPSILON);

        let nan = CostBudget::new(f64::NAN, 1000.0, f64::INFINITY);
        assert!(nan.currently_available.abs() < f64::EPSILON);
        assert!(nan.restore_rate.abs() < f64::EPSILON);
    }

    #[test]
    fn test_from_extensions_reads_full_cost_block() {
        let extensions = json!({
            "cost": {
                "requestedQueryCost": 101,
                "actualQueryCost": 46,
                "throttleStatus": {
                    "maximumAvailable": 2000.0,
                    "currentlyAvailable": 1954,
                    "restoreRate": 100.0
                }
            }
        });

        let cost = QueryCost::from_extensions(&extensions).unwrap();
        assert_eq!(cost.requested_query_cost, Some(101.0));
        assert_eq!(cost.actual_query_cost, Some(46.0));
        assert_eq!(cost.throttle_status, CostBudget::new(1954.0, 2000.0, 100.0));
    }

    #[test]
    fn test_from_extensions_tolerates_missing_query_costs() {
        let extensions = json!({
            "cost": {
                "throttleStatus": {
                    "maximumAvailable": 1000.0,
                    "currentlyAvailable": 200,
                    "restoreRate": 50.0
                }
            }
        });

        let cost = QueryCost::from_extensions(&extensions).unwrap();
        assert!(cost.requested_query_cost.is_none());
        assert!(cost.actual_query_cost.is_none());
    }

    #[test]
    fn test_from_extensions_returns_none_without_throttle_status() {
        assert!(QueryCost::from_extensions(&json!({})).is_none());
        assert!(QueryCost::from_extensions(&json!({ "cost": {} })).is_none());
        assert!(QueryCost::from_extensions(&json!({
            "cost": { "throttleStatus": { "maximumAvailable": "lots" } }
        }))
        .is_none());
    }
}
