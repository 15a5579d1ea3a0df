// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

use crate::error::{EnvSnapError, Result};

use super::Settings;

impl Settings {
    /// Reject settings that would make every run degrade silently.
    pub fn validate(&self) -> Result<()> {
        let lookups = &self.lookups;

        for (name, url) in [
            ("lookups.identity_url", &lookups.identity_url),
            ("lookups.geolocation_url", &lookups.geolocation_url),
            ("lookups.reverse_geocoding_url", &lookups.reverse_geocoding_url),
        ] {
            if url.trim().is_empty() {
                return Err(config_error(format!("{} must not be empty", name)));
            }
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(config_error(format!(
                    "{} must be an http(s) URL, got {:?}",
                    name, url
                )));
            }
        }

        if !lookups.geolocation_url.contains("{ip}") {
            return Err(config_error(
                "lookups.geolocation_url must contain an {ip} placeholder",
            ));
        }

        if !lookups.reverse_geocoding_url.contains("{lat}")
            || !lookups.reverse_geocoding_url.contains("{lon}")
        {
            return Err(config_error(
                "lookups.reverse_geocoding_url must contain {lat} and {lon} placeholders",
            ));
        }

        if lookups.request_timeout_secs == 0 {
            return Err(config_error("lookups.request_timeout_secs must be positive"));
        }

        if self.geolocation.timeout_secs == 0 {
            return Err(config_error("geolocation.timeout_secs must be positive"));
        }

        if let Some(fixed) = self.geolocation.fixed {
            if !fixed.is_valid() {
                return Err(config_error(format!(
                    "geolocation.fixed is out of range ({})",
                    fixed
                )));
            }
        }

        Ok(())
    }
}

fn config_error(message: impl Into<String>) -> EnvSnapError {
    EnvSnapError::Config(message.into())
}
