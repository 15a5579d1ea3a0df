// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! `envsnap collect`: acquire one snapshot and print it

use std::io::Write;
use std::sync::Arc;

use crate::aggregator::{Aggregator, SnapshotState};
use crate::cli::{CollectArgs, OutputFormat};
use crate::config::Settings;
use crate::error::{EnvSnapError, Result};
use crate::lookup::{DisabledLookups, HttpLookups, Lookups};
use crate::probes::{ClientProfile, HostPlatform, Platform, ProfilePlatform};

/// Execute the collect command
pub async fn execute(args: &CollectArgs, settings: &Settings, format: OutputFormat) -> Result<()> {
    let state = run(args, settings).await?;
    let stdout = std::io::stdout();
    render(&state, format, &mut stdout.lock())
}

/// Build the aggregator for these arguments and run it once
pub async fn run(args: &CollectArgs, settings: &Settings) -> Result<SnapshotState> {
    let platform = build_platform(args, settings)?;
    let lookups = build_lookups(args, settings)?;

    let mut geolocation = settings.geolocation.options();
    if let Some(secs) = args.geo_timeout {
        if secs == 0 {
            return Err(EnvSnapError::InvalidInput(
                "geolocation timeout must be positive".to_string(),
            ));
        }
        geolocation.timeout = std::time::Duration::from_secs(secs);
    }

    let aggregator = Aggregator::new(platform, lookups, geolocation);
    aggregator.acquire().await
}

fn build_platform(args: &CollectArgs, settings: &Settings) -> Result<Arc<dyn Platform>> {
    match &args.profile {
        Some(path) => {
            let profile = ClientProfile::load(path)?;
            tracing::debug!(
                target: "envsnap.probe",
                path = %path.display(),
                "replaying client profile"
            );
            Ok(Arc::new(ProfilePlatform::new(profile)))
        }
        None => Ok(Arc::new(HostPlatform::from_settings(settings))),
    }
}

fn build_lookups(args: &CollectArgs, settings: &Settings) -> Result<Arc<dyn Lookups>> {
    if args.offline {
        tracing::debug!(target: "envsnap.lookup", "remote lookups disabled");
        return Ok(Arc::new(DisabledLookups));
    }
    Ok(Arc::new(HttpLookups::new(&settings.lookups)?))
}

/// Print the state as labelled lines or pretty JSON
pub fn render(state: &SnapshotState, format: OutputFormat, out: &mut impl Write) -> Result<()> {
    match format {
        OutputFormat::Json => {
            writeln!(out, "{}", serde_json::to_string_pretty(state)?)?;
        }
        OutputFormat::Text => {
            for (label, value) in state.snapshot.entries() {
                writeln!(out, "{}: {}", label, value)?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::AcquisitionState;
    use crate::snapshot::{ScreenSize, NOT_AVAILABLE};
    use tempfile::TempDir;

    const CHROME_WINDOWS: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

    fn write_profile(dir: &TempDir) -> std::path::PathBuf {
        let profile = ClientProfile::new(
            CHROME_WINDOWS,
            ScreenSize::new(1920, 1080),
            "en-US",
            "Europe/Berlin",
        )
        .with_battery(0.5);
        let path = dir.path().join("profile.json");
        std::fs::write(&path, serde_json::to_string(&profile).unwrap()).unwrap();
        path
    }

    #[tokio::test]
    async fn test_offline_profile_run() {
        let dir = TempDir::new().unwrap();
        let args = CollectArgs {
            profile: Some(write_profile(&dir)),
            offline: true,
            geo_timeout: Some(1),
        };

        let state = run(&args, &Settings::default()).await.unwrap();

        assert_eq!(state.state, AcquisitionState::Published);
        let snapshot = &state.snapshot;
        assert_eq!(snapshot.browser_family, "Chrome");
        assert_eq!(snapshot.device_category, "Windows Device");
        assert_eq!(snapshot.screen_resolution, "1920x1080");
        assert_eq!(snapshot.time_zone, "Europe/Berlin");
        assert_eq!(snapshot.battery_level, "50%");
        assert_eq!(snapshot.ip_address, NOT_AVAILABLE);
        assert_eq!(snapshot.approximate_location, NOT_AVAILABLE);
        assert_eq!(snapshot.coordinates, NOT_AVAILABLE);
        assert!(snapshot.is_resolved());
    }

    #[tokio::test]
    async fn test_missing_profile_is_an_error() {
        let dir = TempDir::new().unwrap();
        let args = CollectArgs {
            profile: Some(dir.path().join("absent.json")),
            offline: true,
            geo_timeout: None,
        };
        assert!(run(&args, &Settings::default()).await.is_err());
    }

    #[tokio::test]
    async fn test_zero_geo_timeout_rejected() {
        let dir = TempDir::new().unwrap();
        let args = CollectArgs {
            profile: Some(write_profile(&dir)),
            offline: true,
            geo_timeout: Some(0),
        };
        assert!(matches!(
            run(&args, &Settings::default()).await,
            Err(EnvSnapError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_render_text_lines() {
        let dir = TempDir::new().unwrap();
        let args = CollectArgs {
            profile: Some(write_profile(&dir)),
            offline: true,
            geo_timeout: Some(1),
        };
        let state = run(&args, &Settings::default()).await.unwrap();

        let mut out = Vec::new();
        render(&state, OutputFormat::Text, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(text.lines().count(), 13);
        assert!(text.contains("Browser: Chrome"));
        assert!(text.contains("IP Address: Not available"));
    }

    #[tokio::test]
    async fn test_render_json_includes_report() {
        let dir = TempDir::new().unwrap();
        let args = CollectArgs {
            profile: Some(write_profile(&dir)),
            offline: true,
            geo_timeout: Some(1),
        };
        let state = run(&args, &Settings::default()).await.unwrap();

        let mut out = Vec::new();
        render(&state, OutputFormat::Json, &mut out).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&out).unwrap();

        assert_eq!(json["state"], "published");
        assert_eq!(json["snapshot"]["browserFamily"], "Chrome");
        assert_eq!(json["snapshot"]["batteryLevel"], "50%");
        let branches = json["report"]["branches"].as_array().unwrap();
        assert_eq!(branches.len(), 6);
    }
}
