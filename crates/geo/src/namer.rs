//! Place-name resolution over a tiered strategy chain.
//!
//! The nested try/fallback cascade of ad hoc geocoding code is expressed
//! here as an ordered list of named strategies, each wrapped uniformly in
//! a timeout + error boundary. `name_of` walks the chain and terminates at
//! a coordinate-stamped placeholder, so it can never fail or come back
//! empty.

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

use stockpilot_core::{GeoPoint, PlannerConfig};

use crate::error::GeoError;
use crate::gazetteer::{Gazetteer, RegionTable};

/// One tier in the resolution chain.
#[async_trait]
pub trait ResolveStrategy: Send + Sync {
    /// Short name for logs/diagnostics.
    fn name(&self) -> &'static str;

    async fn resolve(&self, point: GeoPoint) -> Result<String, GeoError>;
}

/// Last-resort label, always available.
pub fn coordinate_label(point: GeoPoint) -> String {
    format!("Strategic Location {:.4},{:.4}", point.lat, point.lng)
}

/// Enforces a minimum spacing between successive outbound calls.
///
/// The external geocoders are rate-limited; this gate is the only
/// deliberate serialization point in the crate.
pub struct RateGate {
    min_interval: Duration,
    last_call: Mutex<Option<Instant>>,
}

impl RateGate {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_call: Mutex::new(None),
        }
    }

    /// Wait until at least `min_interval` has passed since the previous
    /// call, then reserve the current slot.
    pub async fn pace(&self) {
        let mut last = self.last_call.lock().await;
        if let Some(prev) = *last {
            let elapsed = prev.elapsed();
            if elapsed < self.min_interval {
                tokio::time::sleep(self.min_interval - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }
}

/// Resolves coordinates to a human-readable place label via tiered lookup.
pub struct LocationNamer {
    strategies: Vec<Box<dyn ResolveStrategy>>,
    tier_timeout: Duration,
}

impl LocationNamer {
    /// Offline chain: gazetteer, then region bounding boxes.
    ///
    /// Network tiers (the two reverse geocoders behind the `net` feature)
    /// slot in between via [`LocationNamer::with_strategies`].
    pub fn offline(config: &PlannerConfig) -> Self {
        Self::with_strategies(
            config,
            vec![
                Box::new(Gazetteer::default()),
                Box::new(RegionTable::default()),
            ],
        )
    }

    /// Full chain: gazetteer, both reverse geocoders, region bounding
    /// boxes. The coordinate placeholder terminates every chain, so this
    /// is the five-tier resolution order. The primary geocoder is paced
    /// by `geocode_min_interval`.
    #[cfg(feature = "net")]
    pub fn with_network(
        config: &PlannerConfig,
        primary_base: impl Into<String>,
        secondary_base: impl Into<String>,
    ) -> Self {
        use crate::net::{PrimaryGeocoder, SecondaryGeocoder};

        Self::with_strategies(
            config,
            vec![
                Box::new(Gazetteer::default()),
                Box::new(PrimaryGeocoder::new(
                    primary_base,
                    config.network.geocode_min_interval(),
                )),
                Box::new(SecondaryGeocoder::new(secondary_base)),
                Box::new(RegionTable::default()),
            ],
        )
    }

    pub fn with_strategies(
        config: &PlannerConfig,
        strategies: Vec<Box<dyn ResolveStrategy>>,
    ) -> Self {
        Self {
            strategies,
            tier_timeout: config.network.geocode_timeout(),
        }
    }

    /// Tier names in resolution order (diagnostics/tests).
    pub fn tiers(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Resolve a non-empty label for `point`. Total: every tier failing or
    /// timing out still ends at the coordinate placeholder.
    pub async fn name_of(&self, point: GeoPoint) -> String {
        for strategy in &self.strategies {
            match tokio::time::timeout(self.tier_timeout, strategy.resolve(point)).await {
                Ok(Ok(label)) if !label.trim().is_empty() => {
                    debug!(tier = strategy.name(), label = %label, "name resolved");
                    return label;
                }
                Ok(Ok(_)) => {
                    debug!(tier = strategy.name(), "tier returned empty label, trying next");
                }
                Ok(Err(err)) => {
                    debug!(tier = strategy.name(), error = %err, "tier failed, trying next");
                }
                Err(_) => {
                    debug!(tier = strategy.name(), "tier timed out, trying next");
                }
            }
        }
        coordinate_label(point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct AlwaysFails;

    #[async_trait]
    impl ResolveStrategy for AlwaysFails {
        fn name(&self) -> &'static str {
            "always-fails"
        }

        async fn resolve(&self, _point: GeoPoint) -> Result<String, GeoError> {
            Err(GeoError::Network("simulated outage".to_string()))
        }
    }

    struct Stalls;

    #[async_trait]
    impl ResolveStrategy for Stalls {
        fn name(&self) -> &'static str {
            "stalls"
        }

        async fn resolve(&self, _point: GeoPoint) -> Result<String, GeoError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            unreachable!("slept past the tier timeout")
        }
    }

    struct EmptyLabel;

    #[async_trait]
    impl ResolveStrategy for EmptyLabel {
        fn name(&self) -> &'static str {
            "empty-label"
        }

        async fn resolve(&self, _point: GeoPoint) -> Result<String, GeoError> {
            Ok("   ".to_string())
        }
    }

    fn config() -> PlannerConfig {
        PlannerConfig::default()
    }

    #[tokio::test]
    async fn gazetteer_hit_resolves_known_city() {
        let namer = LocationNamer::offline(&config());
        let label = namer.name_of(GeoPoint::new(28.6139, 77.2090)).await;
        assert_eq!(label, "Delhi");
    }

    #[tokio::test(start_paused = true)]
    async fn never_empty_with_all_tiers_failing() {
        let namer = LocationNamer::with_strategies(
            &config(),
            vec![Box::new(AlwaysFails), Box::new(Stalls), Box::new(EmptyLabel)],
        );
        let label = namer.name_of(GeoPoint::new(1.5, 2.5)).await;
        assert!(!label.is_empty());
        assert_eq!(label, "Strategic Location 1.5000,2.5000");
    }

    #[tokio::test]
    async fn empty_strategy_chain_falls_through_to_placeholder() {
        let namer = LocationNamer::with_strategies(&config(), vec![]);
        let label = namer.name_of(GeoPoint::new(-12.0, 130.9)).await;
        assert_eq!(label, "Strategic Location -12.0000,130.9000");
    }

    #[tokio::test]
    async fn failed_tier_falls_through_to_next() {
        let namer = LocationNamer::with_strategies(
            &config(),
            vec![Box::new(AlwaysFails), Box::new(Gazetteer::default())],
        );
        let label = namer.name_of(GeoPoint::new(19.0760, 72.8777)).await;
        assert_eq!(label, "Mumbai");
    }

    struct Recorder {
        tag: &'static str,
        log: std::sync::Arc<std::sync::Mutex<Vec<&'static str>>>,
        outcome: Result<&'static str, ()>,
    }

    #[async_trait]
    impl ResolveStrategy for Recorder {
        fn name(&self) -> &'static str {
            self.tag
        }

        async fn resolve(&self, _point: GeoPoint) -> Result<String, GeoError> {
            self.log.lock().unwrap().push(self.tag);
            self.outcome
                .map(str::to_string)
                .map_err(|()| GeoError::NoResult)
        }
    }

    #[tokio::test]
    async fn tiers_are_tried_in_insertion_order() {
        let log = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
        let namer = LocationNamer::with_strategies(
            &config(),
            vec![
                Box::new(Recorder {
                    tag: "first",
                    log: log.clone(),
                    outcome: Err(()),
                }),
                Box::new(Recorder {
                    tag: "second",
                    log: log.clone(),
                    outcome: Ok("Somewhere"),
                }),
                Box::new(Recorder {
                    tag: "third",
                    log: log.clone(),
                    outcome: Ok("Never reached"),
                }),
            ],
        );

        let label = namer.name_of(GeoPoint::new(10.0, 10.0)).await;
        assert_eq!(label, "Somewhere");
        assert_eq!(*log.lock().unwrap(), vec!["first", "second"]);
    }

    #[cfg(feature = "net")]
    #[tokio::test]
    async fn network_chain_assembles_all_tiers_in_documented_order() {
        let namer = LocationNamer::with_network(
            &config(),
            "http://localhost:18080",
            "http://localhost:18081",
        );
        assert_eq!(
            namer.tiers(),
            vec![
                "gazetteer",
                "primary-geocoder",
                "secondary-geocoder",
                "region-table",
            ],
        );
        // Tier 1 short-circuits for gazetteer hits; no network involved.
        let label = namer.name_of(GeoPoint::new(28.6139, 77.2090)).await;
        assert_eq!(label, "Delhi");
    }

    #[tokio::test(start_paused = true)]
    async fn rate_gate_spaces_successive_calls() {
        let gate = RateGate::new(Duration::from_millis(1000));
        let start = Instant::now();
        gate.pace().await;
        gate.pace().await;
        gate.pace().await;
        // Two enforced gaps of 1s each; the first call is immediate.
        assert!(start.elapsed() >= Duration::from_millis(2000));
    }
}
