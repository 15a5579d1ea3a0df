// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Per-branch outcome record published alongside the snapshot

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How one acquisition branch ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum BranchOutcome {
    /// Every field of the branch holds real data
    Succeeded,
    /// Some fields hold real data, the rest fell back to sentinels
    Degraded { reason: String },
    /// Every field of the branch fell back to sentinels
    Unavailable { reason: String },
}

impl BranchOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, BranchOutcome::Succeeded)
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            BranchOutcome::Succeeded => None,
            BranchOutcome::Degraded { reason } | BranchOutcome::Unavailable { reason } => {
                Some(reason)
            }
        }
    }
}

/// Outcome of one branch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchReport {
    pub branch: String,
    #[serde(flatten)]
    pub outcome: BranchOutcome,
    pub elapsed_ms: u64,
}

/// What happened during one acquisition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcquisitionReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub branches: Vec<BranchReport>,
}

impl AcquisitionReport {
    /// Look up the report for a branch by name
    pub fn branch(&self, name: &str) -> Option<&BranchReport> {
        self.branches.iter().find(|b| b.branch == name)
    }

    /// Branches that did not fully succeed
    pub fn failures(&self) -> impl Iterator<Item = &BranchReport> {
        self.branches.iter().filter(|b| !b.outcome.is_success())
    }

    pub fn is_complete_success(&self) -> bool {
        self.failures().next().is_none()
    }
}
