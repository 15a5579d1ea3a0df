// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Probes for the machine envsnap runs on

use async_trait::async_trait;
use std::path::Path;
use sysinfo::System;

use super::{GeolocationOptions, Platform, ProbeResult};
use crate::config::{HostConfig, Settings};
use crate::error::ProbeError;
use crate::snapshot::{ConnectionInfo, Coordinates, ScreenSize};

const DEFAULT_LANGUAGE: &str = "en-US";
const DEFAULT_TIME_ZONE: &str = "UTC";

/// The local host, seen as a client
#[derive(Debug, Clone)]
pub struct HostPlatform {
    overrides: HostConfig,
    fixed_position: Option<Coordinates>,
}

impl HostPlatform {
    pub fn new(overrides: HostConfig, fixed_position: Option<Coordinates>) -> Self {
        Self {
            overrides,
            fixed_position,
        }
    }

    /// Build from the host and geolocation sections of the settings
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.host.clone(), settings.geolocation.fixed)
    }

    fn detect_screen() -> ScreenSize {
        #[cfg(target_os = "linux")]
        if let Ok(raw) = std::fs::read_to_string("/sys/class/graphics/fb0/virtual_size") {
            if let Some(size) = parse_fb_virtual_size(&raw) {
                return size;
            }
        }

        ScreenSize::default()
    }

    fn detect_language() -> String {
        ["LC_ALL", "LC_MESSAGES", "LANG"]
            .iter()
            .filter_map(|var| std::env::var(var).ok())
            .find_map(|raw| posix_locale_to_tag(&raw))
            .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string())
    }

    fn detect_time_zone() -> String {
        if let Ok(tz) = std::env::var("TZ") {
            let tz = tz.trim_start_matches(':').trim();
            if !tz.is_empty() {
                return tz.to_string();
            }
        }

        if let Ok(raw) = std::fs::read_to_string("/etc/timezone") {
            let tz = raw.trim();
            if !tz.is_empty() {
                return tz.to_string();
            }
        }

        if let Ok(target) = std::fs::read_link("/etc/localtime") {
            if let Some(tz) = zone_from_localtime_target(&target) {
                return tz;
            }
        }

        DEFAULT_TIME_ZONE.to_string()
    }
}

#[async_trait]
impl Platform for HostPlatform {
    fn user_agent(&self) -> String {
        if let Some(ref ua) = self.overrides.user_agent {
            return ua.clone();
        }
        synthesize_user_agent(
            std::env::consts::OS,
            System::os_version().as_deref(),
            std::env::consts::ARCH,
        )
    }

    fn screen(&self) -> ScreenSize {
        self.overrides.screen.unwrap_or_else(Self::detect_screen)
    }

    fn language(&self) -> String {
        self.overrides
            .language
            .clone()
            .unwrap_or_else(Self::detect_language)
    }

    fn time_zone(&self) -> String {
        self.overrides
            .time_zone
            .clone()
            .unwrap_or_else(Self::detect_time_zone)
    }

    async fn current_position(&self, options: &GeolocationOptions) -> ProbeResult<Coordinates> {
        tracing::debug!(
            target: "envsnap.probe",
            high_accuracy = options.high_accuracy,
            "host geolocation requested"
        );
        self.fixed_position
            .ok_or(ProbeError::Unsupported("geolocation"))
    }

    async fn connection(&self) -> ProbeResult<ConnectionInfo> {
        Err(ProbeError::Unsupported("network information"))
    }

    async fn battery_level(&self) -> ProbeResult<f64> {
        read_battery_level().await
    }

    async fn orientation(&self) -> ProbeResult<String> {
        orientation_for(self.screen())
    }
}

#[cfg(target_os = "linux")]
async fn read_battery_level() -> ProbeResult<f64> {
    let mut entries = match tokio::fs::read_dir("/sys/class/power_supply").await {
        Ok(entries) => entries,
        Err(_) => return Err(ProbeError::Unsupported("battery")),
    };

    while let Ok(Some(entry)) = entries.next_entry().await {
        if !entry.file_name().to_string_lossy().starts_with("BAT") {
            continue;
        }
        let raw = tokio::fs::read_to_string(entry.path().join("capacity"))
            .await
            .map_err(|e| ProbeError::Failed(e.to_string()))?;
        return parse_sysfs_capacity(&raw)
            .ok_or_else(|| ProbeError::Failed(format!("unreadable capacity {:?}", raw.trim())));
    }

    Err(ProbeError::Unsupported("battery"))
}

#[cfg(target_os = "macos")]
async fn read_battery_level() -> ProbeResult<f64> {
    let output = tokio::process::Command::new("pmset")
        .args(["-g", "batt"])
        .output()
        .await
        .map_err(|e| ProbeError::Failed(e.to_string()))?;
    if !output.status.success() {
        return Err(ProbeError::Failed("pmset exited with an error".to_string()));
    }
    parse_pmset_battery(&String::from_utf8_lossy(&output.stdout))
        .ok_or(ProbeError::Unsupported("battery"))
}

#[cfg(not(any(target_os = "linux", target_os = "macos")))]
async fn read_battery_level() -> ProbeResult<f64> {
    Err(ProbeError::Unsupported("battery"))
}

/// Build a browser-style identification string for the host OS
pub fn synthesize_user_agent(os: &str, os_version: Option<&str>, arch: &str) -> String {
    let product = format!("envsnap/{}", env!("CARGO_PKG_VERSION"));
    let version = os_version
        .and_then(|v| v.split_whitespace().next())
        .filter(|v| !v.is_empty());

    match os {
        "windows" => format!(
            "Mozilla/5.0 (Windows NT {}; {}) {}",
            version.unwrap_or("10.0"),
            arch,
            product
        ),
        "macos" => format!(
            "Mozilla/5.0 (Macintosh; Intel Mac OS X {}) {}",
            version.unwrap_or("10_15_7").replace('.', "_"),
            product
        ),
        "linux" => format!("Mozilla/5.0 (X11; Linux {}) {}", arch, product),
        "android" => format!(
            "Mozilla/5.0 (Linux; Android {}) {}",
            version.unwrap_or("14"),
            product
        ),
        "ios" => format!(
            "Mozilla/5.0 (iPhone; CPU iPhone OS {} like Mac OS X) {}",
            version.unwrap_or("17_0").replace('.', "_"),
            product
        ),
        other => format!("{} ({}; {})", product, other, arch),
    }
}

/// `en_US.UTF-8` -> `en-US`; `C` and `POSIX` carry no language
fn posix_locale_to_tag(raw: &str) -> Option<String> {
    let base = raw.split(['.', '@']).next()?.trim();
    if base.is_empty() || base == "C" || base == "POSIX" {
        return None;
    }
    Some(base.replace('_', "-"))
}

fn zone_from_localtime_target(target: &Path) -> Option<String> {
    let path = target.to_string_lossy();
    let (_, zone) = path.split_once("zoneinfo/")?;
    if zone.is_empty() {
        None
    } else {
        Some(zone.to_string())
    }
}

#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn parse_fb_virtual_size(raw: &str) -> Option<ScreenSize> {
    let (w, h) = raw.trim().split_once(',')?;
    let size = ScreenSize::new(w.trim().parse().ok()?, h.trim().parse().ok()?);
    size.is_known().then_some(size)
}

#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn parse_sysfs_capacity(raw: &str) -> Option<f64> {
    let pct: u8 = raw.trim().parse().ok()?;
    (pct <= 100).then(|| f64::from(pct) / 100.0)
}

#[cfg_attr(not(target_os = "macos"), allow(dead_code))]
fn parse_pmset_battery(output: &str) -> Option<f64> {
    output
        .lines()
        .filter(|line| line.contains("InternalBattery"))
        .find_map(|line| {
            line.split(|c: char| c.is_whitespace() || c == ';')
                .find_map(|token| token.strip_suffix('%'))
                .and_then(|pct| pct.parse::<u8>().ok())
        })
        .filter(|pct| *pct <= 100)
        .map(|pct| f64::from(pct) / 100.0)
}

fn orientation_for(screen: ScreenSize) -> ProbeResult<String> {
    if !screen.is_known() {
        return Err(ProbeError::Unsupported("screen orientation"));
    }
    let kind = if screen.width >= screen.height {
        "landscape-primary"
    } else {
        "portrait-primary"
    };
    Ok(kind.to_string())
}
