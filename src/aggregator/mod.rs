// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Snapshot aggregation
//!
//! The [`Aggregator`] runs every acquisition branch concurrently on the
//! caller's task, waits for all of them to settle, and publishes the merged
//! [`Snapshot`] with a single `watch` send. Observers holding a receiver
//! therefore see either the all-placeholder snapshot or the final one,
//! never a mix.
//!
//! Branches:
//! - `network`: identity lookup, then coarse geolocation of that address
//! - `position`: geolocation probe, then reverse geocoding of the fix
//! - `connection`, `battery`, `orientation`: one probe each
//! - `local`: classification, screen, language, time zone
//!
//! Each branch converts its own failures into sentinels. A panic escaping
//! a branch is caught once at the top, logged, and leaves the placeholder
//! snapshot in place with the state stuck at `Acquiring`.
//!
//! There is no cancellation handle: dropping the `acquire` future abandons
//! the in-flight branches and nothing is published.

use chrono::Utc;
use futures::FutureExt;
use serde::Serialize;
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;

use crate::classifier;
use crate::error::{EnvSnapError, LookupError, Result};
use crate::lookup::{CoarseLocation, LookupResult, Lookups};
use crate::probes::{self, GeolocationOptions, LocalFacts, Platform, ProbeResult};
use crate::snapshot::{battery_percentage, Coordinates, Snapshot, NOT_AVAILABLE};

mod report;

pub use report::{AcquisitionReport, BranchOutcome, BranchReport};

pub const BRANCH_NETWORK: &str = "network";
pub const BRANCH_POSITION: &str = "position";
pub const BRANCH_CONNECTION: &str = "connection";
pub const BRANCH_BATTERY: &str = "battery";
pub const BRANCH_ORIENTATION: &str = "orientation";
pub const BRANCH_LOCAL: &str = "local";

/// Lifecycle of an aggregator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum AcquisitionState {
    Uninitialized,
    Acquiring,
    Published,
}

/// What observers see: the current snapshot and, once published, the report
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotState {
    pub state: AcquisitionState,
    pub snapshot: Snapshot,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<AcquisitionReport>,
}

impl SnapshotState {
    fn initial() -> Self {
        Self {
            state: AcquisitionState::Uninitialized,
            snapshot: Snapshot::placeholder(),
            report: None,
        }
    }
}

/// Drives all probes and lookups and publishes one snapshot
pub struct Aggregator {
    platform: Arc<dyn Platform>,
    lookups: Arc<dyn Lookups>,
    geolocation: GeolocationOptions,
    started: AtomicBool,
    state_tx: watch::Sender<SnapshotState>,
}

impl Aggregator {
    pub fn new(
        platform: Arc<dyn Platform>,
        lookups: Arc<dyn Lookups>,
        geolocation: GeolocationOptions,
    ) -> Self {
        let (state_tx, _) = watch::channel(SnapshotState::initial());
        Self {
            platform,
            lookups,
            geolocation,
            started: AtomicBool::new(false),
            state_tx,
        }
    }

    /// Observer handle on the published state
    pub fn subscribe(&self) -> watch::Receiver<SnapshotState> {
        self.state_tx.subscribe()
    }

    pub fn state(&self) -> AcquisitionState {
        self.state_tx.borrow().state
    }

    /// Current snapshot: all placeholders until published
    pub fn snapshot(&self) -> Snapshot {
        self.state_tx.borrow().snapshot.clone()
    }

    /// Run the acquisition once and return the resulting state
    ///
    /// Branch failures never surface here; they become sentinel values and
    /// entries in the report. The only error is calling this twice.
    pub async fn acquire(&self) -> Result<SnapshotState> {
        if self.started.swap(true, Ordering::SeqCst) {
            return Err(EnvSnapError::AlreadyAcquired);
        }

        self.state_tx
            .send_modify(|current| current.state = AcquisitionState::Acquiring);
        tracing::debug!(target: "envsnap.aggregator", "acquisition started");

        let started_at = Utc::now();
        match AssertUnwindSafe(self.collect()).catch_unwind().await {
            Ok((snapshot, branches)) => {
                let report = AcquisitionReport {
                    started_at,
                    finished_at: Utc::now(),
                    branches,
                };
                let failed = report.failures().count();
                self.state_tx.send_replace(SnapshotState {
                    state: AcquisitionState::Published,
                    snapshot,
                    report: Some(report),
                });
                tracing::info!(
                    target: "envsnap.aggregator",
                    degraded_branches = failed,
                    "snapshot published"
                );
            }
            Err(panic) => {
                tracing::error!(
                    target: "envsnap.aggregator",
                    error = %panic_message(panic.as_ref()),
                    "acquisition aborted, snapshot left at placeholders"
                );
            }
        }

        Ok(self.state_tx.borrow().clone())
    }

    async fn collect(&self) -> (Snapshot, Vec<BranchReport>) {
        let platform = self.platform.as_ref();

        let (local, network, position, connection, battery, orientation) = tokio::join!(
            timed(async { probes::probe_local(platform) }),
            timed(self.network_branch()),
            timed(self.position_branch()),
            timed(probes::probe_connection(platform)),
            timed(probes::probe_battery(platform)),
            timed(probes::probe_orientation(platform)),
        );

        let mut snapshot = Snapshot::placeholder();
        let mut reports = Vec::with_capacity(6);
        let mut record = |branch: &str, outcome: BranchOutcome, elapsed_ms: u64| {
            reports.push(BranchReport {
                branch: branch.to_string(),
                outcome,
                elapsed_ms,
            })
        };

        record(BRANCH_LOCAL, merge_local(&mut snapshot, local.0), local.1);
        record(BRANCH_NETWORK, merge_network(&mut snapshot, network.0), network.1);
        record(BRANCH_POSITION, merge_position(&mut snapshot, position.0), position.1);

        let (value, outcome) = settle(connection.0, |c| c.to_string());
        snapshot.connection_info = value;
        record(BRANCH_CONNECTION, outcome, connection.1);

        let (value, outcome) = settle(battery.0, battery_percentage);
        snapshot.battery_level = value;
        record(BRANCH_BATTERY, outcome, battery.1);

        let (value, outcome) = settle(orientation.0, |o| o);
        snapshot.orientation = value;
        record(BRANCH_ORIENTATION, outcome, orientation.1);

        (snapshot, reports)
    }

    async fn network_branch(&self) -> NetworkResult {
        let ip = match self.lookups.public_ip().await {
            Ok(ip) => ip,
            Err(e) => return NetworkResult::NoAddress(e),
        };
        let location = self.lookups.coarse_location(&ip).await;
        NetworkResult::Address { ip, location }
    }

    async fn position_branch(&self) -> PositionResult {
        let coords =
            match probes::probe_geolocation(self.platform.as_ref(), &self.geolocation).await {
                Ok(coords) => coords,
                Err(e) => return PositionResult::NoFix(e.to_string()),
            };
        let address = self.lookups.reverse_geocode(coords).await;
        PositionResult::Fix { coords, address }
    }
}

enum NetworkResult {
    NoAddress(LookupError),
    Address {
        ip: String,
        location: LookupResult<CoarseLocation>,
    },
}

enum PositionResult {
    NoFix(String),
    Fix {
        coords: Coordinates,
        address: LookupResult<String>,
    },
}

async fn timed<F: Future>(future: F) -> (F::Output, u64) {
    let start = Instant::now();
    let output = future.await;
    (output, start.elapsed().as_millis() as u64)
}

fn non_blank(value: String) -> String {
    if value.trim().is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        value
    }
}

fn merge_local(snapshot: &mut Snapshot, facts: LocalFacts) -> BranchOutcome {
    let classification = classifier::classify(&facts.user_agent, facts.ms_stream);
    snapshot.browser_family = classification.browser_family.label().to_string();
    snapshot.device_category = classification.device_category.label().to_string();
    snapshot.screen_resolution = facts.screen.to_string();
    snapshot.language = non_blank(facts.language);
    snapshot.time_zone = non_blank(facts.time_zone);
    BranchOutcome::Succeeded
}

fn merge_network(snapshot: &mut Snapshot, result: NetworkResult) -> BranchOutcome {
    match result {
        NetworkResult::NoAddress(e) => {
            snapshot.ip_address = NOT_AVAILABLE.to_string();
            snapshot.approximate_location = NOT_AVAILABLE.to_string();
            BranchOutcome::Unavailable {
                reason: e.to_string(),
            }
        }
        NetworkResult::Address { ip, location } => {
            snapshot.ip_address = ip;
            match location {
                Ok(location) => {
                    snapshot.approximate_location = location.display();
                    BranchOutcome::Succeeded
                }
                Err(e) => {
                    snapshot.approximate_location = NOT_AVAILABLE.to_string();
                    BranchOutcome::Degraded {
                        reason: e.to_string(),
                    }
                }
            }
        }
    }
}

fn merge_position(snapshot: &mut Snapshot, result: PositionResult) -> BranchOutcome {
    match result {
        PositionResult::NoFix(reason) => {
            snapshot.precise_location = NOT_AVAILABLE.to_string();
            snapshot.coordinates = NOT_AVAILABLE.to_string();
            snapshot.address = NOT_AVAILABLE.to_string();
            BranchOutcome::Unavailable { reason }
        }
        PositionResult::Fix { coords, address } => {
            snapshot.coordinates = coords.to_string();
            match address {
                Ok(address) => {
                    snapshot.precise_location = address.clone();
                    snapshot.address = address;
                    BranchOutcome::Succeeded
                }
                Err(e) => {
                    snapshot.precise_location = coords.to_string();
                    snapshot.address = NOT_AVAILABLE.to_string();
                    BranchOutcome::Degraded {
                        reason: e.to_string(),
                    }
                }
            }
        }
    }
}

fn settle<T>(result: ProbeResult<T>, render: impl FnOnce(T) -> String) -> (String, BranchOutcome) {
    match result {
        Ok(value) => (render(value), BranchOutcome::Succeeded),
        Err(e) => (
            NOT_AVAILABLE.to_string(),
            BranchOutcome::Unavailable {
                reason: e.to_string(),
            },
        ),
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
