// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Settings management for envsnap
//!
//! Handles loading and saving settings from ~/.envsnap/settings.json

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::probes::GeolocationOptions;
use crate::snapshot::{Coordinates, ScreenSize};

mod io;
mod validation;

/// Main settings structure, stored in ~/.envsnap/settings.json
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Settings {
    /// Remote lookup endpoints
    #[serde(default)]
    pub lookups: LookupsConfig,

    /// Geolocation probe behavior
    #[serde(default)]
    pub geolocation: GeolocationConfig,

    /// Overrides for facts probed from the local host
    #[serde(default)]
    pub host: HostConfig,
}

/// Remote lookup endpoints
///
/// `geolocation_url` must contain `{ip}`; `reverse_geocoding_url` must
/// contain `{lat}` and `{lon}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LookupsConfig {
    /// Identity service, returns `{"ip": ...}`
    #[serde(default = "default_identity_url")]
    pub identity_url: String,

    /// Coarse geolocation service, keyed by IP
    #[serde(default = "default_geolocation_url")]
    pub geolocation_url: String,

    /// Reverse geocoding service, keyed by latitude/longitude
    #[serde(default = "default_reverse_geocoding_url")]
    pub reverse_geocoding_url: String,

    /// User-Agent header sent on every lookup
    #[serde(default = "default_lookup_user_agent")]
    pub user_agent: String,

    /// Client-level HTTP timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for LookupsConfig {
    fn default() -> Self {
        Self {
            identity_url: default_identity_url(),
            geolocation_url: default_geolocation_url(),
            reverse_geocoding_url: default_reverse_geocoding_url(),
            user_agent: default_lookup_user_agent(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

/// Geolocation probe configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeolocationConfig {
    /// Upper bound on the wait for a position
    #[serde(default = "default_geolocation_timeout_secs")]
    pub timeout_secs: u64,

    /// Prefer a high-accuracy fix
    #[serde(default = "default_true")]
    pub high_accuracy: bool,

    /// Fixed position reported by the host platform
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed: Option<Coordinates>,
}

impl GeolocationConfig {
    pub fn options(&self) -> GeolocationOptions {
        GeolocationOptions {
            timeout: Duration::from_secs(self.timeout_secs),
            high_accuracy: self.high_accuracy,
        }
    }
}

impl Default for GeolocationConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_geolocation_timeout_secs(),
            high_accuracy: true,
            fixed: None,
        }
    }
}

/// Overrides for host-probed facts
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct HostConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screen: Option<ScreenSize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
}

fn default_identity_url() -> String {
    "https://api.ipify.org?format=json".to_string()
}

fn default_geolocation_url() -> String {
    "https://ipapi.co/{ip}/json/".to_string()
}

fn default_reverse_geocoding_url() -> String {
    "https://nominatim.openstreetmap.org/reverse?format=json&lat={lat}&lon={lon}".to_string()
}

fn default_lookup_user_agent() -> String {
    format!("envsnap/{}", env!("CARGO_PKG_VERSION"))
}

fn default_request_timeout_secs() -> u64 {
    15
}

fn default_geolocation_timeout_secs() -> u64 {
    10
}

fn default_true() -> bool {
    true
}
