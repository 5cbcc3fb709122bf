//! Configuration error types for the paginator.
//!
//! Every configuration constructor and builder in this crate returns
//! `Result<T, ConfigError>` so that invalid settings are rejected before any
//! request is sent.
//!
//! # Example
//!
//! ```rust
//! use shopify_paginator::{AccessToken, ConfigError};
//!
//! let result = AccessToken::new("");
//! assert!(matches!(result, Err(ConfigError::EmptyAccessToken)));
//! ```

use thiserror::Error;

/// Errors that can occur while building client or pagination configuration.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    /// Access token cannot be empty.
    #[error("Access token cannot be empty. Please provide a valid Admin API access token.")]
    EmptyAccessToken,

    /// Shop domain is invalid.
    #[error("Invalid shop domain '{domain}'. Expected format: 'shop-name' or 'shop-name.myshopify.com'.")]
    InvalidShopDomain {
        /// The invalid domain that was provided.
        domain: String,
    },

    /// API version is invalid.
    #[error("Invalid API version '{version}'. Expected format: 'YYYY-MM' (e.g., '2025-01') or 'unstable'.")]
    InvalidApiVersion {
        /// The invalid version string that was provided.
        version: String,
    },

    /// A required field is missing.
    #[error("Missing required field: '{field}'. This field must be set before building the configuration.")]
    MissingRequiredField {
        /// The name of the missing field.
        field: &'static str,
    },

    /// Host URL is invalid.
    #[error("Invalid host URL '{url}'. Please provide a valid URL with scheme (e.g., 'https://proxy.example.com').")]
    InvalidHostUrl {
        /// The invalid URL that was provided.
        url: String,
    },

    /// A numeric pagination setting is outside its allowed range.
    #[error("Invalid value {value} for '{field}': {reason}")]
    OutOfRange {
        /// The name of the offending setting.
        field: &'static str,
        /// The rejected value.
        value: f64,
        /// What the setting must satisfy.
        reason: &'static str,
    },
}
