// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Error types for envsnap
//!
//! Branch-level failures (`LookupError`, `ProbeError`) are contained by the
//! aggregator and turned into sentinel values. Only `EnvSnapError` ever
//! reaches the CLI.

use thiserror::Error;

/// Main error type for envsnap operations
#[derive(Error, Debug)]
pub enum EnvSnapError {
    /// Remote lookup errors
    #[error("Lookup error: {0}")]
    Lookup(#[from] LookupError),

    /// Capability probe errors
    #[error("Probe error: {0}")]
    Probe(#[from] ProbeError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP client construction errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// `acquire` was called on an aggregator that already left `Uninitialized`
    #[error("Snapshot acquisition already started")]
    AlreadyAcquired,

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Failures of a single remote lookup
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// Connection, DNS or transport failure
    #[error("Network error: {0}")]
    Network(String),

    /// Service answered with a non-2xx status
    #[error("{service} returned status {status}")]
    Status { service: &'static str, status: u16 },

    /// Body was not the JSON shape we expect
    #[error("Malformed {service} response: {detail}")]
    Malformed {
        service: &'static str,
        detail: String,
    },

    /// Remote lookups were switched off
    #[error("Remote lookups are disabled")]
    Disabled,
}

/// Failures of a single capability probe
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProbeError {
    /// The user (or policy) declined access
    #[error("Permission denied: {0}")]
    Denied(String),

    /// The platform does not expose the capability
    #[error("Capability not supported: {0}")]
    Unsupported(&'static str),

    /// The capability did not answer within the allotted time
    #[error("Timed out after {0} ms")]
    Timeout(u64),

    /// The capability exists but reading it failed
    #[error("Probe failed: {0}")]
    Failed(String),
}

/// Result type alias for envsnap operations
pub type Result<T> = std::result::Result<T, EnvSnapError>;
