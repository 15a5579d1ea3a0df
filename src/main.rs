// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! envsnap - snapshot of the ambient client environment
//!
//! Entry point for the envsnap CLI application.

use clap::Parser;
use std::path::Path;

use envsnap::cli::{Cli, CollectArgs, Commands};
use envsnap::commands;
use envsnap::config::Settings;
use envsnap::error::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries only command output.
    let mut env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::WARN.into());

    // `-v` raises every envsnap target without requiring users to know the
    // names. `RUST_LOG` still takes precedence.
    if cli.verbose > 0 {
        for directive in [
            "envsnap.probe=debug",
            "envsnap.lookup=debug",
            "envsnap.aggregator=debug",
        ] {
            if let Ok(parsed) = directive.parse() {
                env_filter = env_filter.add_directive(parsed);
            }
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let settings_path = cli.config.clone().unwrap_or_else(Settings::default_path);

    match cli.command {
        None => {
            let settings = load_validated(&settings_path)?;
            commands::collect::execute(&CollectArgs::default(), &settings, cli.format).await?;
        }
        Some(Commands::Collect(args)) => {
            let settings = load_validated(&settings_path)?;
            commands::collect::execute(&args, &settings, cli.format).await?;
        }
        Some(Commands::Classify(args)) => {
            commands::classify::execute(&args, cli.format)?;
        }
        Some(Commands::Settings(args)) => {
            // Only `show` parses the file.
            commands::settings::execute(&args, &settings_path)?;
        }
    }

    Ok(())
}

fn load_validated(path: &Path) -> Result<Settings> {
    let settings = Settings::load_from(path)?;
    settings.validate()?;
    Ok(settings)
}
