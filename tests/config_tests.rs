// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

use tempfile::TempDir;

use envsnap::cli::CollectArgs;
use envsnap::commands::collect;
use envsnap::config::Settings;
use envsnap::snapshot::{Coordinates, ScreenSize, NOT_AVAILABLE};

#[test]
fn test_settings_default_values() {
    let settings = Settings::default();

    assert_eq!(
        settings.lookups.identity_url,
        "https://api.ipify.org?format=json"
    );
    assert!(settings.lookups.geolocation_url.contains("{ip}"));
    assert_eq!(settings.lookups.request_timeout_secs, 15);
    assert_eq!(settings.geolocation.timeout_secs, 10);
    assert!(settings.geolocation.high_accuracy);
    assert!(settings.geolocation.fixed.is_none());
}

#[test]
fn test_settings_file_round_trip_through_disk() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("settings.json");

    let mut settings = Settings::default();
    settings.geolocation.fixed = Some(Coordinates::new(51.5007, -0.1246));
    settings.host.screen = Some(ScreenSize::new(2560, 1440));
    settings.save_to(&path).unwrap();

    let loaded = Settings::load_from(&path).unwrap();
    assert_eq!(loaded, settings);
    assert!(loaded.validate().is_ok());
}

#[test]
fn test_hand_written_settings_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(
        &path,
        r#"{
            "geolocation": { "timeout_secs": 3, "high_accuracy": false },
            "host": { "language": "pt-BR", "time_zone": "America/Sao_Paulo" }
        }"#,
    )
    .unwrap();

    let settings = Settings::load_from(&path).unwrap();
    assert_eq!(settings.geolocation.timeout_secs, 3);
    assert!(!settings.geolocation.high_accuracy);
    assert_eq!(settings.host.language.as_deref(), Some("pt-BR"));
    assert_eq!(settings.lookups, Default::default());
}

#[test]
fn test_invalid_settings_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(
        &path,
        r#"{ "lookups": { "geolocation_url": "https://ipapi.co/json/" } }"#,
    )
    .unwrap();

    let settings = Settings::load_from(&path).unwrap();
    assert!(settings.validate().is_err());
}

#[tokio::test]
async fn test_host_overrides_flow_into_offline_snapshot() {
    let mut settings = Settings::default();
    settings.host.user_agent =
        Some("Mozilla/5.0 (X11; Linux x86_64; rv:121.0) Gecko/20100101 Firefox/121.0".into());
    settings.host.screen = Some(ScreenSize::new(1366, 768));
    settings.host.language = Some("nl-NL".into());
    settings.host.time_zone = Some("Europe/Amsterdam".into());
    settings.geolocation.fixed = Some(Coordinates::new(52.3676, 4.9041));

    let args = CollectArgs {
        offline: true,
        ..CollectArgs::default()
    };
    let snapshot = collect::run(&args, &settings).await.unwrap().snapshot;

    assert_eq!(snapshot.browser_family, "Firefox");
    assert_eq!(snapshot.device_category, "Linux Device");
    assert_eq!(snapshot.screen_resolution, "1366x768");
    assert_eq!(snapshot.language, "nl-NL");
    assert_eq!(snapshot.time_zone, "Europe/Amsterdam");
    assert_eq!(snapshot.orientation, "landscape-primary");
    assert_eq!(snapshot.coordinates, "Lat: 52.3676, Long: 4.9041");
    // Reverse geocoding is offline, so the fix itself stands in.
    assert_eq!(snapshot.precise_location, snapshot.coordinates);
    assert_eq!(snapshot.address, NOT_AVAILABLE);
    assert_eq!(snapshot.ip_address, NOT_AVAILABLE);
    assert_eq!(snapshot.connection_info, NOT_AVAILABLE);
}
