// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! envsnap - one-shot snapshot of the ambient client environment.
//!
//! This crate exposes the runtime used by the `envsnap` CLI (`src/main.rs`).
//!
//! Architecture highlights:
//! - `aggregator`: runs every probe and lookup concurrently and publishes one snapshot
//! - `probes`: the `Platform` seam plus host and replayed-profile implementations
//! - `lookup`: the `Lookups` seam for identity, coarse geolocation and reverse geocoding
//! - `classifier`: browser family and device category from a user-agent string
//! - `snapshot`: the published record, its sentinels and value formatting
//! - `config`, `cli`, `commands`: settings file, argument parsing, subcommands

pub mod aggregator;
pub mod classifier;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod lookup;
pub mod probes;
pub mod snapshot;

pub use error::{EnvSnapError, Result};
