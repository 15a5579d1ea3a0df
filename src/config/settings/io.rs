// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::error::Result;

use super::Settings;

impl Settings {
    /// Get the default settings file path.
    pub fn default_path() -> PathBuf {
        Self::envsnap_home().join("settings.json")
    }

    /// Load settings from a specific path. A missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&content)?;
        Ok(settings)
    }

    /// Write settings to a specific path, replacing whatever was there.
    /// The existing file is never parsed, so a corrupt file can be reset.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the envsnap home directory (~/.envsnap or $ENVSNAP_HOME).
    pub fn envsnap_home() -> PathBuf {
        home_from(std::env::var_os("ENVSNAP_HOME"), dirs::home_dir())
    }
}

fn home_from(override_dir: Option<OsString>, user_home: Option<PathBuf>) -> PathBuf {
    match override_dir {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => user_home
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".envsnap"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_home_override_wins() {
        let home = home_from(
            Some(OsString::from("/tmp/envsnap-home-test")),
            Some(PathBuf::from("/home/user")),
        );
        assert_eq!(home, PathBuf::from("/tmp/envsnap-home-test"));
    }

    #[test]
    fn test_home_defaults_under_user_home() {
        let home = home_from(None, Some(PathBuf::from("/home/user")));
        assert_eq!(home, PathBuf::from("/home/user/.envsnap"));
    }

    #[test]
    fn test_empty_override_is_ignored() {
        let home = home_from(Some(OsString::new()), Some(PathBuf::from("/home/user")));
        assert_eq!(home, PathBuf::from("/home/user/.envsnap"));
    }

    #[test]
    fn test_home_without_user_home() {
        assert_eq!(home_from(None, None), PathBuf::from("./.envsnap"));
    }

    #[test]
    fn test_save_replaces_corrupt_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("settings.json");
        std::fs::write(&path, "{ not json").unwrap();

        Settings::default().save_to(&path).unwrap();

        assert_eq!(Settings::load_from(&path).unwrap(), Settings::default());
    }
}
