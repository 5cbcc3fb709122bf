//! Admin API version selection.

use crate::error::ConfigError;
use std::fmt;
use std::str::FromStr;

/// Shopify Admin API version used to build the GraphQL endpoint path.
///
/// Shopify releases versions quarterly. Named variants cover the versions
/// this crate has been exercised against; any other well-formed quarterly
/// version parses into [`ApiVersion::Custom`].
///
/// # Example
///
/// ```rust
/// use shopify_paginator::ApiVersion;
///
/// let version: ApiVersion = "2025-07".parse().unwrap();
/// assert_eq!(version, ApiVersion::V2025_07);
/// assert_eq!(version.to_string(), "2025-07");
///
/// let future: ApiVersion = "2026-04".parse().unwrap();
/// assert!(!future.is_stable());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ApiVersion {
    /// API version 2025-01
    V2025_01,
    /// API version 2025-04
    V2025_04,
    /// API version 2025-07
    V2025_07,
    /// API version 2025-10
    V2025_10,
    /// The unstable development version.
    Unstable,
    /// Any other `YYYY-MM` quarterly version.
    Custom(String),
}

impl ApiVersion {
    /// Returns the latest named stable version.
    #[must_use]
    pub const fn latest() -> Self {
        Self::V2025_10
    }

    /// Returns `true` for named stable versions.
    #[must_use]
    pub const fn is_stable(&self) -> bool {
        !matches!(self, Self::Unstable | Self::Custom(_))
    }

    /// Returns the path segment used in `/admin/api/{version}/graphql.json`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::V2025_01 => "2025-01",
            Self::V2025_04 => "2025-04",
            Self::V2025_07 => "2025-07",
            Self::V2025_10 => "2025-10",
            Self::Unstable => "unstable",
            Self::Custom(s) => s,
        }
    }

    fn is_quarterly_format(s: &str) -> bool {
        let Some((year, month)) = s.split_once('-') else {
            return false;
        };
        year.len() == 4
            && year.chars().all(|c| c.is_ascii_digit())
            && matches!(month, "01" | "04" | "07" | "10")
    }
}

impl Default for ApiVersion {
    fn default() -> Self {
        Self::latest()
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApiVersion {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        match s.as_str() {
            "2025-01" => Ok(Self::V2025_01),
            "2025-04" => Ok(Self::V2025_04),
            "2025-07" => Ok(Self::V2025_07),
            "2025-10" => Ok(Self::V2025_10),
            "unstable" => Ok(Self::Unstable),
            _ if Self::is_quarterly_format(&s) => Ok(Self::Custom(s)),
            _ => Err(ConfigError::InvalidApiVersion { version: s }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_versions_round_trip_through_strings() {
        for version in [
            ApiVersion::V2025_01,
            ApiVersion::V2025_04,
            ApiVersion::V2025_07,
            ApiVersion::V2025_10,
            ApiVersion::Unstable,
        ] {
            let parsed: ApiVersion = version.to_string().parse().unwrap();
            assert_eq!(parsed, version);
        }
    }

    #[test]
    fn test_unknown_quarterly_version_becomes_custom() {
        let version: ApiVersion = " 2026-01 ".parse().unwrap();
        assert_eq!(version, ApiVersion::Custom("2026-01".to_string()));
        assert_eq!(version.as_str(), "2026-01");
        assert!(!version.is_stable());
    }

    #[test]
    fn test_invalid_versions_are_rejected() {
        for bad in ["", "2025", "2025-02", "25-01", "abcd-01", "2025-01-01"] {
            assert!(
                matches!(
                    bad.parse::<ApiVersion>(),
                    Err(ConfigError::InvalidApiVersion { .. })
                ),
                "expected {bad:?} to be rejected"
            );
        }
    }

    #[test]
    fn test_default_is_latest() {
        assert_eq!(ApiVersion::default(), ApiVersion::latest());
        assert!(ApiVersion::latest().is_stable());
    }
}
