// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

use std::sync::Arc;
use std::time::Duration;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use envsnap::aggregator::{
    AcquisitionState, Aggregator, BranchOutcome, BRANCH_BATTERY, BRANCH_NETWORK, BRANCH_POSITION,
};
use envsnap::config::LookupsConfig;
use envsnap::lookup::HttpLookups;
use envsnap::probes::{ClientProfile, GeolocationOptions, ProfilePlatform};
use envsnap::snapshot::{ConnectionInfo, Coordinates, ScreenSize, NOT_AVAILABLE};

const CHROME_WINDOWS: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
const SAFARI_IPHONE: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Mobile/15E148 Safari/604.1";

async fn mount_services(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/identity"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"ip": "8.8.8.8"})),
        )
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/geo/8.8.8.8/json/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "ip": "8.8.8.8",
            "city": "Mountain View",
            "region": "CA",
            "country_name": "US",
            "org": "GOOGLE"
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/reverse"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "display_name": "1600 Amphitheatre Parkway, Mountain View, CA, US"
        })))
        .mount(server)
        .await;
}

fn lookups_for(server: &MockServer) -> Arc<HttpLookups> {
    let config = LookupsConfig {
        identity_url: format!("{}/identity?format=json", server.uri()),
        geolocation_url: format!("{}/geo/{{ip}}/json/", server.uri()),
        reverse_geocoding_url: format!(
            "{}/reverse?format=json&lat={{lat}}&lon={{lon}}",
            server.uri()
        ),
        request_timeout_secs: 5,
        ..LookupsConfig::default()
    };
    Arc::new(HttpLookups::new(&config).unwrap())
}

fn options() -> GeolocationOptions {
    GeolocationOptions {
        timeout: Duration::from_secs(1),
        high_accuracy: true,
    }
}

#[tokio::test]
async fn test_desktop_snapshot_over_http() {
    let server = MockServer::start().await;
    mount_services(&server).await;

    let profile = ClientProfile::new(
        CHROME_WINDOWS,
        ScreenSize::new(1920, 1080),
        "en-US",
        "America/Los_Angeles",
    )
    .with_position(Coordinates::new(37.422, -122.084))
    .with_connection(ConnectionInfo {
        effective_type: "4g".into(),
        downlink: 10.0,
        rtt: 50,
    })
    .with_orientation("landscape-primary");

    let aggregator = Aggregator::new(
        Arc::new(ProfilePlatform::new(profile)),
        lookups_for(&server),
        options(),
    );
    let state = aggregator.acquire().await.unwrap();

    assert_eq!(state.state, AcquisitionState::Published);
    let snapshot = &state.snapshot;
    assert_eq!(snapshot.ip_address, "8.8.8.8");
    assert_eq!(snapshot.approximate_location, "Mountain View, CA, US");
    assert_eq!(snapshot.coordinates, "Lat: 37.422, Long: -122.084");
    assert_eq!(
        snapshot.precise_location,
        "1600 Amphitheatre Parkway, Mountain View, CA, US"
    );
    assert_eq!(snapshot.address, snapshot.precise_location);
    assert_eq!(snapshot.browser_family, "Chrome");
    assert_eq!(snapshot.device_category, "Windows Device");
    assert_eq!(snapshot.screen_resolution, "1920x1080");
    assert_eq!(snapshot.language, "en-US");
    assert_eq!(snapshot.time_zone, "America/Los_Angeles");
    assert_eq!(snapshot.connection_info, "Type: 4g, Downlink: 10 Mbps, RTT: 50 ms");
    assert_eq!(snapshot.battery_level, NOT_AVAILABLE);
    assert_eq!(snapshot.orientation, "landscape-primary");

    let report = state.report.unwrap();
    assert!(report.branch(BRANCH_NETWORK).unwrap().outcome.is_success());
    assert!(report.branch(BRANCH_POSITION).unwrap().outcome.is_success());
    assert!(matches!(
        report.branch(BRANCH_BATTERY).unwrap().outcome,
        BranchOutcome::Unavailable { .. }
    ));
}

#[tokio::test]
async fn test_phone_snapshot_without_location_permission() {
    let server = MockServer::start().await;
    mount_services(&server).await;

    let profile = ClientProfile::new(SAFARI_IPHONE, ScreenSize::new(390, 844), "en-US", "UTC")
        .with_geolocation_denied("User denied Geolocation")
        .with_battery(0.42);

    let aggregator = Aggregator::new(
        Arc::new(ProfilePlatform::new(profile)),
        lookups_for(&server),
        options(),
    );
    let snapshot = aggregator.acquire().await.unwrap().snapshot;

    assert_eq!(snapshot.browser_family, "Safari");
    assert_eq!(snapshot.device_category, "iOS Device");
    assert_eq!(snapshot.battery_level, "42%");
    assert_eq!(snapshot.approximate_location, "Mountain View, CA, US");
    assert_eq!(snapshot.precise_location, NOT_AVAILABLE);
    assert_eq!(snapshot.coordinates, NOT_AVAILABLE);
    assert_eq!(snapshot.address, NOT_AVAILABLE);
}

#[tokio::test]
async fn test_identity_outage_leaves_other_fields_intact() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/identity"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let profile = ClientProfile::new(
        CHROME_WINDOWS,
        ScreenSize::new(1280, 720),
        "de-DE",
        "Europe/Berlin",
    )
    .with_battery(1.0);

    let aggregator = Aggregator::new(
        Arc::new(ProfilePlatform::new(profile)),
        lookups_for(&server),
        options(),
    );
    let state = aggregator.acquire().await.unwrap();

    assert_eq!(state.snapshot.ip_address, NOT_AVAILABLE);
    assert_eq!(state.snapshot.approximate_location, NOT_AVAILABLE);
    assert_eq!(state.snapshot.language, "de-DE");
    assert_eq!(state.snapshot.battery_level, "100%");
    assert!(state.snapshot.is_resolved());

    let network = state.report.unwrap();
    let reason = network.branch(BRANCH_NETWORK).unwrap().outcome.reason().unwrap();
    assert!(reason.contains("500"));
}

#[tokio::test]
async fn test_observer_sees_placeholder_then_final() {
    let server = MockServer::start().await;
    mount_services(&server).await;

    let profile = ClientProfile::new(CHROME_WINDOWS, ScreenSize::new(800, 600), "en-GB", "UTC");
    let aggregator = Aggregator::new(
        Arc::new(ProfilePlatform::new(profile)),
        lookups_for(&server),
        options(),
    );

    let rx = aggregator.subscribe();
    assert!(rx.borrow().snapshot.is_placeholder());
    assert_eq!(rx.borrow().state, AcquisitionState::Uninitialized);

    aggregator.acquire().await.unwrap();

    assert_eq!(rx.borrow().state, AcquisitionState::Published);
    assert!(rx.borrow().snapshot.is_resolved());
    assert_eq!(aggregator.snapshot(), rx.borrow().snapshot);
}
