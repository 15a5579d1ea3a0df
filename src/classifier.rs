// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! User-agent classification
//!
//! Maps a raw identification string to a browser family and a device
//! category. Both tables are ordered and the first match wins: Chrome-based
//! agents also carry a `Safari/` token, and Windows Phone agents mention
//! Android, so moving an entry changes results.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

/// Browser family, in detection priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BrowserFamily {
    Firefox,
    Chrome,
    Safari,
    Opera,
    InternetExplorer,
    Unknown,
}

impl BrowserFamily {
    /// Display label used in snapshots
    pub fn label(&self) -> &'static str {
        match self {
            BrowserFamily::Firefox => "Firefox",
            BrowserFamily::Chrome => "Chrome",
            BrowserFamily::Safari => "Safari",
            BrowserFamily::Opera => "Opera",
            BrowserFamily::InternetExplorer => "Internet Explorer",
            BrowserFamily::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for BrowserFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Device category, in detection priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceCategory {
    Android,
    Ios,
    Windows,
    Mac,
    Linux,
    Unknown,
}

impl DeviceCategory {
    /// Display label used in snapshots
    pub fn label(&self) -> &'static str {
        match self {
            DeviceCategory::Android => "Android Device",
            DeviceCategory::Ios => "iOS Device",
            DeviceCategory::Windows => "Windows Device",
            DeviceCategory::Mac => "Mac Device",
            DeviceCategory::Linux => "Linux Device",
            DeviceCategory::Unknown => "Unknown Device",
        }
    }
}

impl fmt::Display for DeviceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Result of classifying one identification string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    pub browser_family: BrowserFamily,
    pub device_category: DeviceCategory,
}

// IE has two signatures: legacy `MSIE` and the Trident engine token of IE11.
static BROWSER_PATTERNS: LazyLock<Vec<(Regex, BrowserFamily)>> = LazyLock::new(|| {
    [
        (r"(?i)firefox", BrowserFamily::Firefox),
        (r"(?i)chrome", BrowserFamily::Chrome),
        (r"(?i)safari", BrowserFamily::Safari),
        (r"(?i)opera", BrowserFamily::Opera),
        (r"(?i)msie", BrowserFamily::InternetExplorer),
        (r"(?i)trident", BrowserFamily::InternetExplorer),
    ]
    .into_iter()
    .map(|(pattern, family)| (Regex::new(pattern).unwrap(), family))
    .collect()
});

static ANDROID_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)Android").unwrap());
static IOS_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"iPad|iPhone|iPod").unwrap());
static WINDOWS_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"Win").unwrap());
static MAC_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)Mac").unwrap());
static LINUX_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"Linux").unwrap());

/// Detect the browser family of a user agent
pub fn browser_family(user_agent: &str) -> BrowserFamily {
    BROWSER_PATTERNS
        .iter()
        .find(|(pattern, _)| pattern.is_match(user_agent))
        .map(|(_, family)| *family)
        .unwrap_or(BrowserFamily::Unknown)
}

/// Detect the device category of a user agent
///
/// `ms_stream` is the IE11-on-Windows-Phone marker: those agents claim
/// `iPhone` but must not be reported as iOS.
pub fn device_category(user_agent: &str, ms_stream: bool) -> DeviceCategory {
    if ANDROID_PATTERN.is_match(user_agent) {
        DeviceCategory::Android
    } else if IOS_PATTERN.is_match(user_agent) && !ms_stream {
        DeviceCategory::Ios
    } else if WINDOWS_PATTERN.is_match(user_agent) {
        DeviceCategory::Windows
    } else if MAC_PATTERN.is_match(user_agent) {
        DeviceCategory::Mac
    } else if LINUX_PATTERN.is_match(user_agent) {
        DeviceCategory::Linux
    } else {
        DeviceCategory::Unknown
    }
}

/// Classify a user agent into browser family and device category
pub fn classify(user_agent: &str, ms_stream: bool) -> Classification {
    Classification {
        browser_family: browser_family(user_agent),
        device_category: device_category(user_agent, ms_stream),
    }
}
