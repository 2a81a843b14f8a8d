//! Multi-factor suitability scoring for one (warehouse, order) pair.

use serde::{Deserialize, Serialize};

use stockpilot_core::{OrderRequest, PlannerConfig, ScoringWeights, Warehouse};
use stockpilot_geo::DistanceEstimate;

/// Sub-scores for one candidate. Each factor lies in [0, 100]; the drone
/// bonus is additive, so `final_score` lies in [0, 100 + drone_bonus]
/// ([0, 110] with default weights).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub proximity: f64,
    pub stock: f64,
    pub load: f64,
    pub efficiency: f64,
    pub drone_bonus: f64,
    /// Stock on hand divided by requested quantity.
    pub availability_ratio: f64,
    pub final_score: f64,
}

/// Computes the suitability score. All weights and caps come from
/// [`PlannerConfig`]; there are no embedded literals at the call sites.
#[derive(Debug, Clone)]
pub struct WarehouseScorer {
    weights: ScoringWeights,
    max_reasonable_distance_km: f64,
}

impl WarehouseScorer {
    pub fn new(config: &PlannerConfig) -> Self {
        Self {
            weights: config.scoring.clone(),
            max_reasonable_distance_km: config.max_reasonable_distance_km,
        }
    }

    /// Score one candidate against an order.
    ///
    /// Precondition (enforced by `OrderRequest::validate`): quantity > 0,
    /// so the availability ratio never divides by zero.
    pub fn score(
        &self,
        warehouse: &Warehouse,
        order: &OrderRequest,
        estimate: &DistanceEstimate,
    ) -> ScoreBreakdown {
        let proximity = (100.0
            - (estimate.distance_km / self.max_reasonable_distance_km) * 100.0)
            .clamp(0.0, 100.0);

        let availability_ratio =
            f64::from(warehouse.stock_of(order.category)) / f64::from(order.quantity);
        let stock = if availability_ratio >= 1.0 {
            (50.0 + (availability_ratio - 1.0) * 10.0).min(100.0)
        } else {
            availability_ratio * 50.0
        };

        let load = (100.0 - warehouse.load_percent).clamp(0.0, 100.0);
        let efficiency = warehouse.efficiency.clamp(0.0, 100.0);
        let drone_bonus = if warehouse.drone_ready {
            self.weights.drone_bonus
        } else {
            0.0
        };

        let final_score = proximity * self.weights.proximity
            + stock * self.weights.stock
            + efficiency * self.weights.efficiency
            + load * self.weights.load
            + drone_bonus;

        ScoreBreakdown {
            proximity,
            stock,
            load,
            efficiency,
            drone_bonus,
            availability_ratio,
            final_score,
        }
    }
}
