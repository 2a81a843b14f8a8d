//! Seeded K-means over historical order coordinates.

use std::collections::HashSet;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::index;
use serde::{Deserialize, Serialize};
use tracing::debug;

use stockpilot_core::{ClusterSettings, DomainError, DomainResult, GeoPoint, HistoricalOrder, PlannerConfig};

/// One geographic demand cluster. Transient: exists only as the output of
/// a single clustering run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    pub centroid: GeoPoint,
    pub members: Vec<HistoricalOrder>,
}

impl Cluster {
    /// Max member distance to the centroid.
    pub fn coverage_radius_km(&self) -> f64 {
        self.members
            .iter()
            .map(|m| self.centroid.haversine_km(&m.location))
            .fold(0.0, f64::max)
    }
}

/// Partitions historical order coordinates into k geographic clusters.
///
/// Randomness is injected: the caller supplies the seed, so runs over
/// identical input are bit-for-bit reproducible.
#[derive(Debug, Clone)]
pub struct ClusterEngine {
    settings: ClusterSettings,
}

impl ClusterEngine {
    pub fn new(config: &PlannerConfig) -> Self {
        Self {
            settings: config.clustering.clone(),
        }
    }

    /// Run K-means and return the surviving clusters.
    ///
    /// Structural misuse (`k == 0`, empty history, `k` above the number of
    /// distinct order locations) is rejected before any iteration. The
    /// post-filter drops clusters below the configured minimum volume;
    /// those orders are noise, not candidate sites.
    pub fn cluster(
        &self,
        orders: &[HistoricalOrder],
        k: usize,
        seed: u64,
    ) -> DomainResult<Vec<Cluster>> {
        if k == 0 {
            return Err(DomainError::validation("cluster count k must be > 0"));
        }
        if orders.is_empty() {
            return Err(DomainError::validation("order history is empty"));
        }
        for order in orders {
            order.validate()?;
        }

        let mut distinct: Vec<GeoPoint> = Vec::new();
        let mut seen = HashSet::new();
        for order in orders {
            let key = (order.location.lat.to_bits(), order.location.lng.to_bits());
            if seen.insert(key) {
                distinct.push(order.location);
            }
        }
        if k > distinct.len() {
            return Err(DomainError::validation(format!(
                "k = {k} exceeds the {} distinct order locations",
                distinct.len()
            )));
        }

        // Initialize centroids by sampling k distinct coordinates.
        let mut rng = StdRng::seed_from_u64(seed);
        let mut centroids: Vec<GeoPoint> = index::sample(&mut rng, distinct.len(), k)
            .iter()
            .map(|i| distinct[i])
            .collect();

        let mut assignments = vec![0usize; orders.len()];
        for iteration in 0..self.settings.max_iterations {
            for (slot, order) in assignments.iter_mut().zip(orders) {
                *slot = nearest_centroid(&centroids, order.location);
            }

            let mut max_moved_deg: f64 = 0.0;
            for (idx, centroid) in centroids.iter_mut().enumerate() {
                let mut count = 0usize;
                let mut lat_sum = 0.0;
                let mut lng_sum = 0.0;
                for (order, &assigned) in orders.iter().zip(&assignments) {
                    if assigned == idx {
                        count += 1;
                        lat_sum += order.location.lat;
                        lng_sum += order.location.lng;
                    }
                }
                // An emptied cluster keeps its previous centroid.
                if count == 0 {
                    continue;
                }
                let next = GeoPoint::new(lat_sum / count as f64, lng_sum / count as f64);
                max_moved_deg = max_moved_deg
                    .max((next.lat - centroid.lat).abs())
                    .max((next.lng - centroid.lng).abs());
                *centroid = next;
            }

            if max_moved_deg < self.settings.epsilon_deg {
                debug!(iteration, "k-means converged");
                break;
            }
        }

        // Settle memberships against the final centroids.
        for (slot, order) in assignments.iter_mut().zip(orders) {
            *slot = nearest_centroid(&centroids, order.location);
        }

        let mut groups: Vec<Vec<HistoricalOrder>> = vec![Vec::new(); k];
        for (order, &assigned) in orders.iter().zip(&assignments) {
            groups[assigned].push(order.clone());
        }

        let clusters: Vec<Cluster> = centroids
            .into_iter()
            .zip(groups)
            .filter(|(_, members)| members.len() >= self.settings.min_cluster_volume)
            .map(|(centroid, members)| Cluster { centroid, members })
            .collect();
        debug!(
            surviving = clusters.len(),
            min_volume = self.settings.min_cluster_volume,
            "clustering finished"
        );
        Ok(clusters)
    }
}

/// Index of the closest centroid; ties go to the lowest index so runs are
/// reproducible.
fn nearest_centroid(centroids: &[GeoPoint], point: GeoPoint) -> usize {
    let mut best = 0;
    let mut best_distance = f64::INFINITY;
    for (idx, centroid) in centroids.iter().enumerate() {
        let d = centroid.haversine_km(&point);
        if d < best_distance {
            best = idx;
            best_distance = d;
        }
    }
    best
}
