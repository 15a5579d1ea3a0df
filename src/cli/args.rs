// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! CLI argument definitions using Clap
//!
//! Defines all command-line arguments and subcommands for envsnap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// envsnap - snapshot of the ambient client environment
#[derive(Parser, Debug)]
#[command(name = "envsnap")]
#[command(version, about = "Snapshot of the ambient client environment")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Acquire and print a snapshot (default when no command given)
    Collect(CollectArgs),

    /// Classify a user-agent string
    Classify(ClassifyArgs),

    /// Show or reset configuration
    #[command(alias = "config")]
    Settings(SettingsArgs),
}

/// Arguments for the collect command
#[derive(Parser, Debug, Default)]
pub struct CollectArgs {
    /// Replay a JSON client profile instead of probing this host
    #[arg(long)]
    pub profile: Option<PathBuf>,

    /// Skip every remote lookup
    #[arg(long)]
    pub offline: bool,

    /// Geolocation timeout in seconds (overrides settings)
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub geo_timeout: Option<u64>,
}

/// Arguments for the classify command
#[derive(Parser, Debug)]
pub struct ClassifyArgs {
    /// User-agent string to classify
    pub user_agent: String,

    /// Client exposes the legacy MSStream marker
    #[arg(long)]
    pub ms_stream: bool,
}

/// Arguments for settings command
#[derive(Parser, Debug)]
pub struct SettingsArgs {
    #[command(subcommand)]
    pub command: Option<SettingsCommands>,
}

/// Settings subcommands
#[derive(Subcommand, Debug, PartialEq)]
pub enum SettingsCommands {
    /// Show current configuration
    Show,

    /// Print the settings file path
    Path,

    /// Reset configuration to defaults
    Reset,
}

/// Output format for responses
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq)]
pub enum OutputFormat {
    /// Plain text output
    #[default]
    Text,

    /// JSON output
    Json,
}
