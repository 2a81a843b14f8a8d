//! Planner configuration.
//!
//! Every tunable the scoring, clustering, and recommendation code reads
//! lives here with a named default, so behavior can be adjusted and tested
//! without touching algorithm code.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Weights for the warehouse suitability score.
///
/// The four factor weights are applied to sub-scores in [0, 100]; the
/// drone bonus is an additive flat amount, so the final score lies in
/// [0, 100 + drone_bonus].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub proximity: f64,
    pub stock: f64,
    pub efficiency: f64,
    pub load: f64,
    pub drone_bonus: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            proximity: 0.35,
            stock: 0.30,
            efficiency: 0.20,
            load: 0.15,
            drone_bonus: 10.0,
        }
    }
}

/// K-means settings for the cluster engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterSettings {
    /// Lloyd iteration cap.
    pub max_iterations: usize,
    /// Convergence threshold: max per-axis centroid movement in degrees.
    pub epsilon_deg: f64,
    /// Clusters with fewer members than this are discarded as noise.
    pub min_cluster_volume: usize,
}

impl Default for ClusterSettings {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            epsilon_deg: 0.001,
            min_cluster_volume: 5,
        }
    }
}

/// Weights and thresholds for the location recommender.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendSettings {
    pub delay_weight: f64,
    pub volume_weight: f64,
    pub value_weight: f64,
    /// Member count at which the volume bonus saturates.
    pub volume_saturation: usize,
    /// Total order value at which the value bonus saturates.
    pub value_saturation: f64,
    /// Reason thresholds.
    pub high_delay_threshold: f64,
    pub strong_volume_threshold: usize,
    pub time_savings_threshold_hours: f64,
    pub high_value_threshold: f64,
    pub category_share_threshold: f64,
    pub poor_coverage_km: f64,
    pub moderate_coverage_km: f64,
    /// Priority tier cutoffs.
    pub critical_score: f64,
    pub strategic_score: f64,
}

impl Default for RecommendSettings {
    fn default() -> Self {
        Self {
            delay_weight: 0.4,
            volume_weight: 0.3,
            value_weight: 0.3,
            volume_saturation: 20,
            value_saturation: 500_000.0,
            high_delay_threshold: 80.0,
            strong_volume_threshold: 10,
            time_savings_threshold_hours: 2.0,
            high_value_threshold: 200_000.0,
            category_share_threshold: 0.5,
            poor_coverage_km: 300.0,
            moderate_coverage_km: 200.0,
            critical_score: 80.0,
            strategic_score: 60.0,
        }
    }
}

/// Timeouts and pacing for the network-backed tiers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSettings {
    pub route_timeout_ms: u64,
    pub geocode_timeout_ms: u64,
    /// Minimum spacing between outbound geocoder calls (rate-limit respect).
    pub geocode_min_interval_ms: u64,
}

impl NetworkSettings {
    pub fn route_timeout(&self) -> Duration {
        Duration::from_millis(self.route_timeout_ms)
    }

    pub fn geocode_timeout(&self) -> Duration {
        Duration::from_millis(self.geocode_timeout_ms)
    }

    pub fn geocode_min_interval(&self) -> Duration {
        Duration::from_millis(self.geocode_min_interval_ms)
    }
}

impl Default for NetworkSettings {
    fn default() -> Self {
        Self {
            route_timeout_ms: 3_000,
            geocode_timeout_ms: 2_000,
            geocode_min_interval_ms: 1_000,
        }
    }
}

/// Top-level configuration for the planning core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub scoring: ScoringWeights,
    pub clustering: ClusterSettings,
    pub recommend: RecommendSettings,
    pub network: NetworkSettings,
    /// Distance at which the proximity sub-score reaches zero.
    pub max_reasonable_distance_km: f64,
    /// Average road speed assumed for degraded-mode ETAs and gap analysis.
    pub assumed_speed_kmh: f64,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            scoring: ScoringWeights::default(),
            clustering: ClusterSettings::default(),
            recommend: RecommendSettings::default(),
            network: NetworkSettings::default(),
            max_reasonable_distance_km: 2000.0,
            assumed_speed_kmh: 40.0,
        }
    }
}
