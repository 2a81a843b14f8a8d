//! Scoring and ranking cluster centroids as candidate warehouse sites.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::info;

use stockpilot_core::{GeoPoint, PlannerConfig, ProductCategory, RecommendSettings, Warehouse};
use stockpilot_geo::LocationNamer;

use crate::cluster::Cluster;

/// Coarse urgency bucket for a recommended site.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorityTier {
    CriticalGap,
    StrategicGap,
    FutureExpansion,
}

/// One ranked candidate site for a new (micro-)warehouse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendedLocation {
    pub cluster_id: usize,
    pub centroid: GeoPoint,
    pub name: String,
    /// Composite score in [0, 100].
    pub score: f64,
    pub member_count: usize,
    pub delivery_improvement_hours: f64,
    pub cost_savings_percent: f64,
    pub coverage_radius_km: f64,
    pub reasons: Vec<String>,
    pub priority: PriorityTier,
}

/// Scores and ranks surviving clusters against the existing network.
pub struct LocationRecommender {
    namer: LocationNamer,
    settings: RecommendSettings,
    assumed_speed_kmh: f64,
}

impl LocationRecommender {
    pub fn new(config: &PlannerConfig, namer: LocationNamer) -> Self {
        Self {
            namer,
            settings: config.recommend.clone(),
            assumed_speed_kmh: config.assumed_speed_kmh,
        }
    }

    /// Produce recommendations sorted descending by composite score.
    ///
    /// With no existing warehouses the baseline of the gap analysis is
    /// undefined: improvement is reported as zero and the coverage reason
    /// treats the nearest hub as infinitely far.
    pub async fn recommend(
        &self,
        clusters: &[Cluster],
        existing: &[Warehouse],
    ) -> Vec<RecommendedLocation> {
        let mut recommendations = Vec::with_capacity(clusters.len());
        for (cluster_id, cluster) in clusters.iter().enumerate() {
            if cluster.members.is_empty() {
                continue;
            }
            recommendations.push(self.assess(cluster_id, cluster, existing).await);
        }
        recommendations.sort_by(|a, b| b.score.total_cmp(&a.score));
        info!(count = recommendations.len(), "location recommendations ready");
        recommendations
    }

    async fn assess(
        &self,
        cluster_id: usize,
        cluster: &Cluster,
        existing: &[Warehouse],
    ) -> RecommendedLocation {
        let s = &self.settings;
        let n = cluster.members.len();
        let count = n as f64;

        let avg_delay = cluster.members.iter().map(|m| m.delay_score).sum::<f64>() / count;
        let total_value: f64 = cluster.members.iter().map(|m| m.order_value).sum();
        let avg_delivery_hours =
            cluster.members.iter().map(|m| m.delivery_time_hours).sum::<f64>() / count;

        // Gap analysis: each member's distance to its nearest existing
        // warehouse (baseline) versus to the proposed centroid.
        let (delivery_improvement_hours, nearest_hub_km) = if existing.is_empty() {
            (0.0, f64::INFINITY)
        } else {
            let avg_baseline = cluster
                .members
                .iter()
                .map(|m| nearest_warehouse_km(m.location, existing))
                .sum::<f64>()
                / count;
            let avg_centroid = cluster
                .members
                .iter()
                .map(|m| cluster.centroid.haversine_km(&m.location))
                .sum::<f64>()
                / count;
            let improvement =
                ((avg_baseline - avg_centroid) / self.assumed_speed_kmh).max(0.0);
            (improvement, nearest_warehouse_km(cluster.centroid, existing))
        };

        let cost_savings_percent = if avg_delivery_hours > 0.0 {
            delivery_improvement_hours / avg_delivery_hours * 100.0
        } else {
            0.0
        };

        let delay_penalty = avg_delay / 100.0;
        let volume_bonus = (count / s.volume_saturation as f64).min(1.0);
        let value_bonus = (total_value / s.value_saturation).min(1.0);
        let score = (delay_penalty * s.delay_weight
            + volume_bonus * s.volume_weight
            + value_bonus * s.value_weight)
            * 100.0;

        let mut reasons = Vec::new();
        if avg_delay > s.high_delay_threshold {
            reasons.push(format!(
                "high delay concentration (avg delay score {avg_delay:.0})"
            ));
        }
        if n > s.strong_volume_threshold {
            reasons.push(format!("strong order volume ({n} orders)"));
        }
        if delivery_improvement_hours > s.time_savings_threshold_hours {
            reasons.push(format!(
                "meaningful delivery time savings ({delivery_improvement_hours:.1} h)"
            ));
        }
        if total_value > s.high_value_threshold {
            reasons.push(format!(
                "high-value demand area (total order value {total_value:.0})"
            ));
        }
        if let Some((category, share)) = dominant_category(cluster) {
            if share > s.category_share_threshold {
                reasons.push(format!(
                    "category concentration: {:.0}% {category}",
                    share * 100.0
                ));
            }
        }
        if nearest_hub_km.is_infinite() {
            reasons.push("no existing warehouse coverage".to_string());
        } else if nearest_hub_km > s.poor_coverage_km {
            reasons.push(format!(
                "poor coverage: nearest hub {nearest_hub_km:.0} km away"
            ));
        } else if nearest_hub_km > s.moderate_coverage_km {
            reasons.push(format!(
                "moderate coverage: nearest hub {nearest_hub_km:.0} km away"
            ));
        }

        let priority = if score > s.critical_score {
            PriorityTier::CriticalGap
        } else if score > s.strategic_score {
            PriorityTier::StrategicGap
        } else {
            PriorityTier::FutureExpansion
        };

        let name = self.namer.name_of(cluster.centroid).await;

        RecommendedLocation {
            cluster_id,
            centroid: cluster.centroid,
            name,
            score,
            member_count: n,
            delivery_improvement_hours,
            cost_savings_percent,
            coverage_radius_km: cluster.coverage_radius_km(),
            reasons,
            priority,
        }
    }
}

fn nearest_warehouse_km(point: GeoPoint, warehouses: &[Warehouse]) -> f64 {
    warehouses
        .iter()
        .map(|w| w.location.haversine_km(&point))
        .fold(f64::INFINITY, f64::min)
}

/// The most common member category and its share of the cluster.
fn dominant_category(cluster: &Cluster) -> Option<(ProductCategory, f64)> {
    let mut counts: BTreeMap<ProductCategory, usize> = BTreeMap::new();
    for member in &cluster.members {
        *counts.entry(member.category).or_insert(0) += 1;
    }
    let total = cluster.members.len();
    counts
        .into_iter()
        .max_by_key(|(_, count)| *count)
        .map(|(category, count)| (category, count as f64 / total as f64))
}
