// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Remote lookups
//!
//! Identity (public IP), coarse geolocation by IP, and reverse geocoding by
//! coordinates. Every call is a single attempt: no retry, no backoff, no
//! cache.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::LookupError;
use crate::snapshot::{self, Coordinates};

pub mod http;

pub use http::HttpLookups;

/// Result of one remote lookup
pub type LookupResult<T> = std::result::Result<T, LookupError>;

/// City-level location resolved from an IP address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoarseLocation {
    pub city: String,
    pub region: String,
    pub country_name: String,
}

impl CoarseLocation {
    /// `city, region, country` as shown in the snapshot
    pub fn display(&self) -> String {
        snapshot::approximate_location(&self.city, &self.region, &self.country_name)
    }
}

/// The three remote services the aggregator depends on
#[async_trait]
pub trait Lookups: Send + Sync {
    /// Resolve the caller's public network address
    async fn public_ip(&self) -> LookupResult<String>;

    /// Resolve city, region and country for an address
    async fn coarse_location(&self, ip: &str) -> LookupResult<CoarseLocation>;

    /// Resolve a human-readable address for a position
    async fn reverse_geocode(&self, coords: Coordinates) -> LookupResult<String>;
}

/// Lookups for offline runs: every call reports [`LookupError::Disabled`]
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledLookups;

#[async_trait]
impl Lookups for DisabledLookups {
    async fn public_ip(&self) -> LookupResult<String> {
        Err(LookupError::Disabled)
    }

    async fn coarse_location(&self, _ip: &str) -> LookupResult<CoarseLocation> {
        Err(LookupError::Disabled)
    }

    async fn reverse_geocode(&self, _coords: Coordinates) -> LookupResult<String> {
        Err(LookupError::Disabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coarse_location_display() {
        let location = CoarseLocation {
            city: "Mountain View".into(),
            region: "CA".into(),
            country_name: "US".into(),
        };
        assert_eq!(location.display(), "Mountain View, CA, US");
    }

    #[tokio::test]
    async fn test_disabled_lookups() {
        let lookups = DisabledLookups;
        assert_eq!(lookups.public_ip().await, Err(LookupError::Disabled));
        assert_eq!(
            lookups.coarse_location("8.8.8.8").await,
            Err(LookupError::Disabled)
        );
        assert_eq!(
            lookups.reverse_geocode(Coordinates::new(0.0, 0.0)).await,
            Err(LookupError::Disabled)
        );
    }
}
