// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Capability probes
//!
//! A [`Platform`] is the client whose environment is being described. The
//! probe functions in this module wrap each optional capability, log the
//! failure under the `envsnap.probe` target and hand back a `Result` that
//! the aggregator turns into either a value or a sentinel. None of them
//! propagate past their own call.

use async_trait::async_trait;
use std::time::Duration;

use crate::error::ProbeError;
use crate::snapshot::{ConnectionInfo, Coordinates, ScreenSize};

pub mod host;
pub mod profile;

pub use host::HostPlatform;
pub use profile::{ClientProfile, GeolocationFixture, ProfilePlatform};

/// Default bound on a geolocation request
pub const DEFAULT_GEOLOCATION_TIMEOUT: Duration = Duration::from_secs(10);

/// Options passed to a geolocation request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeolocationOptions {
    /// Upper bound on the wait for a position
    pub timeout: Duration,
    /// Prefer a GPS-grade fix where the platform distinguishes
    pub high_accuracy: bool,
}

impl Default for GeolocationOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_GEOLOCATION_TIMEOUT,
            high_accuracy: true,
        }
    }
}

/// Access to the capabilities of the client being probed
///
/// The synchronous accessors are the always-available locale and display
/// facts. The async ones may suspend, be denied, or be missing entirely.
#[async_trait]
pub trait Platform: Send + Sync {
    /// Raw identification string (user agent)
    fn user_agent(&self) -> String;

    /// Whether the client exposes the MSStream desktop-emulation marker
    fn ms_stream(&self) -> bool {
        false
    }

    /// Screen dimensions
    fn screen(&self) -> ScreenSize;

    /// Negotiated language tag, e.g. `en-US`
    fn language(&self) -> String;

    /// Resolved IANA time zone, e.g. `Europe/Berlin`
    fn time_zone(&self) -> String;

    /// Request the current position
    async fn current_position(
        &self,
        options: &GeolocationOptions,
    ) -> ProbeResult<Coordinates>;

    /// Read the network-quality descriptor
    async fn connection(&self) -> ProbeResult<ConnectionInfo>;

    /// Read the battery charge as a fraction in `0.0..=1.0`
    async fn battery_level(&self) -> ProbeResult<f64>;

    /// Read the screen orientation type, e.g. `landscape-primary`
    async fn orientation(&self) -> ProbeResult<String>;
}

/// Result of one probe: the value, or the reason it fell back
pub type ProbeResult<T> = std::result::Result<T, ProbeError>;

/// Request the device position, bounded by `options.timeout`
pub async fn probe_geolocation(
    platform: &dyn Platform,
    options: &GeolocationOptions,
) -> ProbeResult<Coordinates> {
    let result = match tokio::time::timeout(options.timeout, platform.current_position(options))
        .await
    {
        Ok(Ok(coords)) if coords.is_valid() => Ok(coords),
        Ok(Ok(coords)) => Err(ProbeError::Failed(format!(
            "position out of range: {}",
            coords
        ))),
        Ok(Err(e)) => Err(e),
        Err(_) => Err(ProbeError::Timeout(options.timeout.as_millis() as u64)),
    };

    match &result {
        Ok(coords) => tracing::debug!(
            target: "envsnap.probe",
            probe = "geolocation",
            latitude = coords.latitude,
            longitude = coords.longitude,
            "position acquired"
        ),
        Err(e) => tracing::warn!(
            target: "envsnap.probe",
            probe = "geolocation",
            reason = %e,
            "geolocation not available"
        ),
    }
    result
}

/// Read the network-quality descriptor
pub async fn probe_connection(platform: &dyn Platform) -> ProbeResult<ConnectionInfo> {
    let result = platform.connection().await;
    log_outcome("connection", &result);
    result
}

/// Read the battery level
pub async fn probe_battery(platform: &dyn Platform) -> ProbeResult<f64> {
    let result = match platform.battery_level().await {
        Ok(level) if (0.0..=1.0).contains(&level) => Ok(level),
        Ok(level) => Err(ProbeError::Failed(format!(
            "charge fraction out of range: {}",
            level
        ))),
        Err(e) => Err(e),
    };
    log_outcome("battery", &result);
    result
}

/// Read the screen orientation type
pub async fn probe_orientation(platform: &dyn Platform) -> ProbeResult<String> {
    let result = match platform.orientation().await {
        Ok(kind) if kind.trim().is_empty() => {
            Err(ProbeError::Failed("empty orientation type".to_string()))
        }
        other => other,
    };
    log_outcome("orientation", &result);
    result
}

/// Always-available locale and display facts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFacts {
    pub user_agent: String,
    pub ms_stream: bool,
    pub screen: ScreenSize,
    pub language: String,
    pub time_zone: String,
}

/// Read the locale and display facts; these have no fallback
pub fn probe_local(platform: &dyn Platform) -> LocalFacts {
    LocalFacts {
        user_agent: platform.user_agent(),
        ms_stream: platform.ms_stream(),
        screen: platform.screen(),
        language: platform.language(),
        time_zone: platform.time_zone(),
    }
}

fn log_outcome<T: std::fmt::Debug>(probe: &'static str, result: &ProbeResult<T>) {
    match result {
        Ok(value) => tracing::debug!(target: "envsnap.probe", probe, value = ?value, "probe succeeded"),
        Err(ProbeError::Unsupported(_)) => {
            tracing::info!(target: "envsnap.probe", probe, "capability not supported")
        }
        Err(e) => tracing::warn!(target: "envsnap.probe", probe, reason = %e, "probe failed"),
    }
}
