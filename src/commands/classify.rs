// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! `envsnap classify`: run the user-agent classifier on one string

use std::io::Write;

use crate::classifier::{self, Classification};
use crate::cli::{ClassifyArgs, OutputFormat};
use crate::error::{EnvSnapError, Result};

/// Execute the classify command
pub fn execute(args: &ClassifyArgs, format: OutputFormat) -> Result<()> {
    let stdout = std::io::stdout();
    run(args, format, &mut stdout.lock())
}

fn run(args: &ClassifyArgs, format: OutputFormat, out: &mut impl Write) -> Result<()> {
    if args.user_agent.trim().is_empty() {
        return Err(EnvSnapError::InvalidInput(
            "user agent must not be empty".to_string(),
        ));
    }

    let classification = classifier::classify(&args.user_agent, args.ms_stream);
    render(&classification, format, out)
}

fn render(classification: &Classification, format: OutputFormat, out: &mut impl Write) -> Result<()> {
    match format {
        OutputFormat::Json => {
            writeln!(out, "{}", serde_json::to_string_pretty(classification)?)?;
        }
        OutputFormat::Text => {
            writeln!(out, "Browser: {}", classification.browser_family)?;
            writeln!(out, "Device: {}", classification.device_category)?;
        }
    }
    Ok(())
}
