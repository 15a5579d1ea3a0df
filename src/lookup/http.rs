// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! HTTP implementation of the remote lookups

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

use super::{CoarseLocation, LookupResult, Lookups};
use crate::config::LookupsConfig;
use crate::error::{LookupError, Result};
use crate::snapshot::Coordinates;

const IDENTITY: &str = "identity";
const GEOLOCATION: &str = "geolocation";
const REVERSE_GEOCODING: &str = "reverse geocoding";

#[derive(Debug, Deserialize)]
struct IdentityResponse {
    ip: String,
}

#[derive(Debug, Deserialize)]
struct ReverseGeocodeResponse {
    display_name: String,
}

/// Lookups against the configured HTTP services
pub struct HttpLookups {
    client: Client,
    identity_url: String,
    geolocation_url: String,
    reverse_geocoding_url: String,
}

impl HttpLookups {
    /// Build the shared client from the lookups section of the settings
    pub fn new(config: &LookupsConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            identity_url: config.identity_url.clone(),
            geolocation_url: config.geolocation_url.clone(),
            reverse_geocoding_url: config.reverse_geocoding_url.clone(),
        })
    }

    fn geolocation_url_for(&self, ip: &str) -> String {
        self.geolocation_url.replace("{ip}", ip)
    }

    fn reverse_geocoding_url_for(&self, coords: Coordinates) -> String {
        self.reverse_geocoding_url
            .replace("{lat}", &coords.latitude.to_string())
            .replace("{lon}", &coords.longitude.to_string())
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        service: &'static str,
        url: &str,
    ) -> LookupResult<T> {
        tracing::debug!(target: "envsnap.lookup", service, url, "request");

        let result = self.fetch(service, url).await;
        if let Err(ref e) = result {
            tracing::warn!(target: "envsnap.lookup", service, url, error = %e, "lookup failed");
        }
        result
    }

    async fn fetch<T: DeserializeOwned>(&self, service: &'static str, url: &str) -> LookupResult<T> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| LookupError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Status {
                service,
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| LookupError::Network(e.to_string()))?;

        serde_json::from_str(&body).map_err(|e| LookupError::Malformed {
            service,
            detail: e.to_string(),
        })
    }
}

fn require_non_empty(service: &'static str, field: &str, value: String) -> LookupResult<String> {
    if value.trim().is_empty() {
        Err(LookupError::Malformed {
            service,
            detail: format!("empty `{}`", field),
        })
    } else {
        Ok(value)
    }
}

#[async_trait]
impl Lookups for HttpLookups {
    async fn public_ip(&self) -> LookupResult<String> {
        let body: IdentityResponse = self.get_json(IDENTITY, &self.identity_url).await?;
        require_non_empty(IDENTITY, "ip", body.ip)
    }

    async fn coarse_location(&self, ip: &str) -> LookupResult<CoarseLocation> {
        let url = self.geolocation_url_for(ip);
        self.get_json(GEOLOCATION, &url).await
    }

    async fn reverse_geocode(&self, coords: Coordinates) -> LookupResult<String> {
        let url = self.reverse_geocoding_url_for(coords);
        let body: ReverseGeocodeResponse = self.get_json(REVERSE_GEOCODING, &url).await?;
        require_non_empty(REVERSE_GEOCODING, "display_name", body.display_name)
    }
}
