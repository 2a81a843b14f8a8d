//! Distance and travel-time estimation with degraded-mode fallback.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;

use stockpilot_core::{GeoPoint, PlannerConfig};

use crate::error::GeoError;

/// Outcome of one distance/duration estimation.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistanceEstimate {
    pub distance_km: f64,
    pub duration_minutes: f64,
    /// True when the road-routing path was attempted and failed, so this
    /// value is the great-circle fallback rather than a routed answer.
    pub degraded: bool,
}

/// One leg returned by a road-routing service.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RouteLeg {
    pub distance_km: f64,
    pub duration_minutes: f64,
}

/// Road-routing backend seam.
///
/// Implementations query an external service; tests inject recorded or
/// failing sources. The estimator owns the timeout, so implementations may
/// block on IO freely.
#[async_trait]
pub trait RouteSource: Send + Sync {
    async fn route(&self, a: GeoPoint, b: GeoPoint) -> Result<RouteLeg, GeoError>;
}

/// Geodesic/road distance estimation.
///
/// The baseline (Haversine + assumed average speed) is always computable;
/// an optional [`RouteSource`] supplies real road distance and duration
/// when available. `estimate` never returns an error.
pub struct DistanceEstimator {
    source: Option<Arc<dyn RouteSource>>,
    route_timeout: Duration,
    assumed_speed_kmh: f64,
}

impl DistanceEstimator {
    /// Baseline-only estimator: great-circle distance, fixed-speed ETA.
    pub fn haversine_only(config: &PlannerConfig) -> Self {
        Self {
            source: None,
            route_timeout: config.network.route_timeout(),
            assumed_speed_kmh: config.assumed_speed_kmh,
        }
    }

    /// Enhanced estimator backed by a road router, with the baseline as
    /// its fallback.
    pub fn with_route_source(config: &PlannerConfig, source: Arc<dyn RouteSource>) -> Self {
        Self {
            source: Some(source),
            route_timeout: config.network.route_timeout(),
            assumed_speed_kmh: config.assumed_speed_kmh,
        }
    }

    /// Estimate distance and travel time between two points.
    ///
    /// Any error, timeout, or bad response from the routing path falls back
    /// to the Haversine baseline with `degraded = true`.
    pub async fn estimate(&self, a: GeoPoint, b: GeoPoint) -> DistanceEstimate {
        let Some(source) = &self.source else {
            return self.baseline(a, b, false);
        };

        match tokio::time::timeout(self.route_timeout, source.route(a, b)).await {
            Ok(Ok(leg)) if Self::usable(&leg) => DistanceEstimate {
                distance_km: leg.distance_km,
                duration_minutes: leg.duration_minutes,
                degraded: false,
            },
            Ok(Ok(leg)) => {
                warn!(
                    distance_km = leg.distance_km,
                    duration_minutes = leg.duration_minutes,
                    "route source returned unusable leg"
                );
                self.baseline(a, b, true)
            }
            Ok(Err(err)) => {
                warn!(error = %err, "route source failed, using haversine fallback");
                self.baseline(a, b, true)
            }
            Err(_) => {
                warn!(timeout_ms = self.route_timeout.as_millis() as u64, "route source timed out, using haversine fallback");
                self.baseline(a, b, true)
            }
        }
    }

    fn usable(leg: &RouteLeg) -> bool {
        leg.distance_km.is_finite()
            && leg.distance_km >= 0.0
            && leg.duration_minutes.is_finite()
            && leg.duration_minutes >= 0.0
    }

    fn baseline(&self, a: GeoPoint, b: GeoPoint, degraded: bool) -> DistanceEstimate {
        let distance_km = a.haversine_km(&b);
        let duration_minutes = distance_km / self.assumed_speed_kmh * 60.0;
        DistanceEstimate {
            distance_km,
            duration_minutes,
            degraded,
        }
    }
}
