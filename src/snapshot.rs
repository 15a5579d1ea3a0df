// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Snapshot data model
//!
//! A [`Snapshot`] is a flat record of string fields. It starts out with
//! every field at [`LOADING`] and is replaced as a whole once acquisition
//! settles; fields that could not be obtained carry [`NOT_AVAILABLE`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder shown before acquisition has settled
pub const LOADING: &str = "Loading...";

/// Sentinel for data that could not be obtained
pub const NOT_AVAILABLE: &str = "Not available";

/// A WGS84 position reported by a geolocation capability
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Whether both components are inside their valid ranges
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Lat: {}, Long: {}", self.latitude, self.longitude)
    }
}

/// Network-quality descriptor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionInfo {
    /// Effective connection type, e.g. `4g`
    pub effective_type: String,
    /// Downlink estimate in Mbps
    pub downlink: f64,
    /// Round-trip time estimate in ms
    pub rtt: u32,
}

impl fmt::Display for ConnectionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Type: {}, Downlink: {} Mbps, RTT: {} ms",
            self.effective_type, self.downlink, self.rtt
        )
    }
}

/// Screen dimensions in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScreenSize {
    pub width: u32,
    pub height: u32,
}

impl ScreenSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_known(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}

impl fmt::Display for ScreenSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Merged record of all acquired environment attributes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub ip_address: String,
    pub approximate_location: String,
    pub precise_location: String,
    pub coordinates: String,
    pub address: String,
    pub device_category: String,
    pub browser_family: String,
    pub screen_resolution: String,
    pub language: String,
    pub time_zone: String,
    pub connection_info: String,
    pub battery_level: String,
    pub orientation: String,
}

impl Snapshot {
    /// A snapshot with every field at the loading placeholder
    pub fn placeholder() -> Self {
        let loading = || LOADING.to_string();
        Self {
            ip_address: loading(),
            approximate_location: loading(),
            precise_location: loading(),
            coordinates: loading(),
            address: loading(),
            device_category: loading(),
            browser_family: loading(),
            screen_resolution: loading(),
            language: loading(),
            time_zone: loading(),
            connection_info: loading(),
            battery_level: loading(),
            orientation: loading(),
        }
    }

    /// Labelled fields in display order
    pub fn entries(&self) -> [(&'static str, &str); 13] {
        [
            ("IP Address", self.ip_address.as_str()),
            ("Approximate Location", self.approximate_location.as_str()),
            ("Precise Location", self.precise_location.as_str()),
            ("Coordinates", self.coordinates.as_str()),
            ("Address", self.address.as_str()),
            ("Device", self.device_category.as_str()),
            ("Browser", self.browser_family.as_str()),
            ("Screen Resolution", self.screen_resolution.as_str()),
            ("Language", self.language.as_str()),
            ("Time Zone", self.time_zone.as_str()),
            ("Connection Info", self.connection_info.as_str()),
            ("Battery Level", self.battery_level.as_str()),
            ("Screen Orientation", self.orientation.as_str()),
        ]
    }

    /// True while every field still holds the loading placeholder
    pub fn is_placeholder(&self) -> bool {
        self.entries().iter().all(|(_, value)| *value == LOADING)
    }

    /// True once no field holds the loading placeholder
    pub fn is_resolved(&self) -> bool {
        self.entries().iter().all(|(_, value)| *value != LOADING)
    }
}

impl Default for Snapshot {
    fn default() -> Self {
        Self::placeholder()
    }
}

/// Render a battery charge fraction as a percentage string
///
/// Fractions are clamped to `0.0..=1.0`; the value is rounded to the
/// nearest whole percent.
pub fn battery_percentage(fraction: f64) -> String {
    let pct = (fraction.clamp(0.0, 1.0) * 100.0).round();
    format!("{}%", pct as u32)
}

/// Format a coarse location as `city, region, country`
pub fn approximate_location(city: &str, region: &str, country: &str) -> String {
    format!("{}, {}, {}", city, region, country)
}
