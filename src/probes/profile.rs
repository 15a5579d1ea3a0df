// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Client environments described by a JSON profile
//!
//! A profile is what a browser front-end would report about itself:
//!
//! ```json
//! {
//!   "userAgent": "Mozilla/5.0 (iPhone; CPU iPhone OS 14_0 like Mac OS X)",
//!   "screen": { "width": 390, "height": 844 },
//!   "language": "en-US",
//!   "timeZone": "America/Los_Angeles",
//!   "geolocation": { "denied": "User denied Geolocation" },
//!   "battery": 0.42
//! }
//! ```
//!
//! Optional capabilities that are left out behave as unsupported.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::{GeolocationOptions, Platform, ProbeResult};
use crate::error::{EnvSnapError, ProbeError, Result};
use crate::snapshot::{ConnectionInfo, Coordinates, ScreenSize};

/// Geolocation answer recorded in a profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GeolocationFixture {
    /// Permission granted with this position
    Position { latitude: f64, longitude: f64 },
    /// Permission refused, with the reason the client gave
    Denied { denied: String },
}

/// Serialized description of a client environment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientProfile {
    pub user_agent: String,

    #[serde(default)]
    pub ms_stream: bool,

    pub screen: ScreenSize,

    pub language: String,

    pub time_zone: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geolocation: Option<GeolocationFixture>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection: Option<ConnectionInfo>,

    /// Charge fraction in `0.0..=1.0`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub battery: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orientation: Option<String>,
}

impl ClientProfile {
    /// Minimal profile with every optional capability absent
    pub fn new(
        user_agent: impl Into<String>,
        screen: ScreenSize,
        language: impl Into<String>,
        time_zone: impl Into<String>,
    ) -> Self {
        Self {
            user_agent: user_agent.into(),
            ms_stream: false,
            screen,
            language: language.into(),
            time_zone: time_zone.into(),
            geolocation: None,
            connection: None,
            battery: None,
            orientation: None,
        }
    }

    /// Load a profile from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            EnvSnapError::InvalidInput(format!("profile {}: {}", path.display(), e))
        })
    }

    pub fn with_position(mut self, coords: Coordinates) -> Self {
        self.geolocation = Some(GeolocationFixture::Position {
            latitude: coords.latitude,
            longitude: coords.longitude,
        });
        self
    }

    pub fn with_geolocation_denied(mut self, reason: impl Into<String>) -> Self {
        self.geolocation = Some(GeolocationFixture::Denied {
            denied: reason.into(),
        });
        self
    }

    pub fn with_connection(mut self, connection: ConnectionInfo) -> Self {
        self.connection = Some(connection);
        self
    }

    pub fn with_battery(mut self, fraction: f64) -> Self {
        self.battery = Some(fraction);
        self
    }

    pub fn with_orientation(mut self, orientation: impl Into<String>) -> Self {
        self.orientation = Some(orientation.into());
        self
    }

    pub fn with_ms_stream(mut self, ms_stream: bool) -> Self {
        self.ms_stream = ms_stream;
        self
    }
}

/// Platform that answers from a [`ClientProfile`]
#[derive(Debug, Clone)]
pub struct ProfilePlatform {
    profile: ClientProfile,
}

impl ProfilePlatform {
    pub fn new(profile: ClientProfile) -> Self {
        Self { profile }
    }

    pub fn profile(&self) -> &ClientProfile {
        &self.profile
    }
}

#[async_trait]
impl Platform for ProfilePlatform {
    fn user_agent(&self) -> String {
        self.profile.user_agent.clone()
    }

    fn ms_stream(&self) -> bool {
        self.profile.ms_stream
    }

    fn screen(&self) -> ScreenSize {
        self.profile.screen
    }

    fn language(&self) -> String {
        self.profile.language.clone()
    }

    fn time_zone(&self) -> String {
        self.profile.time_zone.clone()
    }

    async fn current_position(&self, _options: &GeolocationOptions) -> ProbeResult<Coordinates> {
        match &self.profile.geolocation {
            Some(GeolocationFixture::Position {
                latitude,
                longitude,
            }) => Ok(Coordinates::new(*latitude, *longitude)),
            Some(GeolocationFixture::Denied { denied }) => Err(ProbeError::Denied(denied.clone())),
            None => Err(ProbeError::Unsupported("geolocation")),
        }
    }

    async fn connection(&self) -> ProbeResult<ConnectionInfo> {
        self.profile
            .connection
            .clone()
            .ok_or(ProbeError::Unsupported("network information"))
    }

    async fn battery_level(&self) -> ProbeResult<f64> {
        self.profile.battery.ok_or(ProbeError::Unsupported("battery"))
    }

    async fn orientation(&self) -> ProbeResult<String> {
        self.profile
            .orientation
            .clone()
            .ok_or(ProbeError::Unsupported("screen orientation"))
    }
}
