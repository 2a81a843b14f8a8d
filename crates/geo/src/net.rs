//! Network-backed sources: OSRM-style road routing and two reverse
//! geocoding providers. All of these plug into the timeout + fallback
//! machinery in `distance`/`namer`; none of their errors escape the crate.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use stockpilot_core::GeoPoint;

use crate::distance::{RouteLeg, RouteSource};
use crate::error::GeoError;
use crate::namer::{RateGate, ResolveStrategy};

fn network_err(e: reqwest::Error) -> GeoError {
    GeoError::Network(e.to_string())
}

/// Road router speaking the OSRM `/route/v1/driving` API.
pub struct OsrmRouteSource {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct OsrmResponse {
    code: String,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    /// Metres.
    distance: f64,
    /// Seconds.
    duration: f64,
}

impl OsrmRouteSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl RouteSource for OsrmRouteSource {
    async fn route(&self, a: GeoPoint, b: GeoPoint) -> Result<RouteLeg, GeoError> {
        // OSRM takes lng,lat pairs.
        let url = format!(
            "{}/route/v1/driving/{},{};{},{}?overview=false",
            self.base_url, a.lng, a.lat, b.lng, b.lat
        );
        let resp = self.client.get(&url).send().await.map_err(network_err)?;
        if !resp.status().is_success() {
            return Err(GeoError::Status(resp.status().as_u16()));
        }
        let body: OsrmResponse = resp
            .json()
            .await
            .map_err(|e| GeoError::Decode(e.to_string()))?;
        if body.code != "Ok" {
            return Err(GeoError::Decode(format!("osrm code {}", body.code)));
        }
        let route = body.routes.first().ok_or(GeoError::NoResult)?;
        Ok(RouteLeg {
            distance_km: route.distance / 1000.0,
            duration_minutes: route.duration / 60.0,
        })
    }
}

/// Primary reverse geocoder (Nominatim-style `reverse` endpoint).
///
/// Shares a [`RateGate`] so successive calls respect the provider's
/// rate-limit policy.
pub struct PrimaryGeocoder {
    client: reqwest::Client,
    base_url: String,
    gate: Arc<RateGate>,
}

#[derive(Debug, Deserialize)]
struct NominatimResponse {
    #[serde(default)]
    address: NominatimAddress,
}

#[derive(Debug, Default, Deserialize)]
struct NominatimAddress {
    #[serde(default)]
    neighbourhood: Option<String>,
    #[serde(default)]
    suburb: Option<String>,
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    town: Option<String>,
    #[serde(default)]
    village: Option<String>,
    #[serde(default)]
    state: Option<String>,
}

impl NominatimAddress {
    /// Short label: finest locality component, then the enclosing one.
    fn label(&self) -> Option<String> {
        let fine = self
            .neighbourhood
            .as_deref()
            .or(self.suburb.as_deref());
        let locality = self
            .city
            .as_deref()
            .or(self.town.as_deref())
            .or(self.village.as_deref())
            .or(self.state.as_deref());
        match (fine, locality) {
            (Some(f), Some(l)) => Some(format!("{f}, {l}")),
            (Some(f), None) => Some(f.to_string()),
            (None, Some(l)) => Some(l.to_string()),
            (None, None) => None,
        }
    }
}

impl PrimaryGeocoder {
    pub fn new(base_url: impl Into<String>, min_interval: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            gate: Arc::new(RateGate::new(min_interval)),
        }
    }
}

#[async_trait]
impl ResolveStrategy for PrimaryGeocoder {
    fn name(&self) -> &'static str {
        "primary-geocoder"
    }

    async fn resolve(&self, point: GeoPoint) -> Result<String, GeoError> {
        self.gate.pace().await;
        let url = format!(
            "{}/reverse?lat={}&lon={}&format=jsonv2",
            self.base_url, point.lat, point.lng
        );
        let resp = self
            .client
            .get(&url)
            .header(reqwest::header::USER_AGENT, "stockpilot-geo")
            .send()
            .await
            .map_err(network_err)?;
        if !resp.status().is_success() {
            return Err(GeoError::Status(resp.status().as_u16()));
        }
        let body: NominatimResponse = resp
            .json()
            .await
            .map_err(|e| GeoError::Decode(e.to_string()))?;
        body.address.label().ok_or(GeoError::NoResult)
    }
}

/// Secondary reverse geocoder (BigDataCloud-style client endpoint), used
/// as the second network attempt when the primary provider fails.
pub struct SecondaryGeocoder {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BdcResponse {
    #[serde(default)]
    locality: Option<String>,
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    principal_subdivision: Option<String>,
}

impl SecondaryGeocoder {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl ResolveStrategy for SecondaryGeocoder {
    fn name(&self) -> &'static str {
        "secondary-geocoder"
    }

    async fn resolve(&self, point: GeoPoint) -> Result<String, GeoError> {
        let url = format!(
            "{}/data/reverse-geocode-client?latitude={}&longitude={}&localityLanguage=en",
            self.base_url, point.lat, point.lng
        );
        let resp = self.client.get(&url).send().await.map_err(network_err)?;
        if !resp.status().is_success() {
            return Err(GeoError::Status(resp.status().as_u16()));
        }
        let body: BdcResponse = resp
            .json()
            .await
            .map_err(|e| GeoError::Decode(e.to_string()))?;
        let label = [body.locality, body.city, body.principal_subdivision]
            .into_iter()
            .flatten()
            .filter(|s| !s.trim().is_empty())
            .take(2)
            .collect::<Vec<_>>()
            .join(", ");
        if label.is_empty() {
            Err(GeoError::NoResult)
        } else {
            Ok(label)
        }
    }
}
