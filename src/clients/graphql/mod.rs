//! GraphQL execution for the Shopify Admin API.
//!
//! # Overview
//!
//! - [`RequestExecutor`]: performs one GraphQL call and classifies the outcome
//! - [`GraphqlResult`]: `data` plus optional cost telemetry
//! - [`CostBudget`] and [`QueryCost`]: the `extensions.cost` telemetry
//! - [`GraphqlError`] and its per-failure structs
//!
//! # Response Structure
//!
//! Admin API responses carry up to three members:
//!
//! - `data`: the query result
//! - `errors`: GraphQL errors, returned with HTTP 200
//! - `extensions`: query cost and throttle status
//!
//! # Example
//!
//! ```rust,ignore
//! use shopify_paginator::clients::graphql::{GraphqlError, RequestExecutor};
//! use serde_json::Map;
//!
//! let executor = RequestExecutor::from_config(&config);
//!
//! match executor.execute("query { shop { name } }", Map::new()).await {
//!     Ok(result) => {
//!         if let Some(cost) = result.cost {
//!             println!("{} points left", cost.throttle_status.currently_available);
//!         }
//!     }
//!     Err(GraphqlError::RateLimited(e)) => println!("back off: {e}"),
//!     Err(other) => return Err(other.into()),
//! }
//! ```

mod cost;
mod errors;
mod executor;

pub use cost::{CostBudget, QueryCost};
pub use errors::{
    AuthenticationError, GraphqlApiError, GraphqlError, InvalidGraphqlRequestError,
    RateLimitError,
};
pub use executor::{GraphqlResult, RequestExecutor};
