// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! `envsnap settings`: inspect or reset the settings file
//!
//! Only `show` parses the file; `path` and `reset` work on a corrupt one.

use std::io::Write;
use std::path::Path;

use crate::cli::{SettingsArgs, SettingsCommands};
use crate::config::Settings;
use crate::error::Result;

/// Execute the settings command against the file at `path`
pub fn execute(args: &SettingsArgs, path: &Path) -> Result<()> {
    let stdout = std::io::stdout();
    run(args, path, &mut stdout.lock())
}

fn run(args: &SettingsArgs, path: &Path, out: &mut impl Write) -> Result<()> {
    match args.command.as_ref().unwrap_or(&SettingsCommands::Show) {
        SettingsCommands::Show => {
            let settings = Settings::load_from(path)?;
            writeln!(out, "{}", serde_json::to_string_pretty(&settings)?)?;
        }
        SettingsCommands::Path => {
            writeln!(out, "{}", path.display())?;
        }
        SettingsCommands::Reset => {
            Settings::default().save_to(path)?;
            tracing::info!(path = %path.display(), "settings reset to defaults");
            writeln!(out, "Settings reset to defaults: {}", path.display())?;
        }
    }
    Ok(())
}
