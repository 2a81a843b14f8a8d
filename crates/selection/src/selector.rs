//! The per-order decision procedure: filter, score, rank, classify.

use serde::{Deserialize, Serialize};
use tracing::info;

use stockpilot_core::{DomainError, DomainResult, OrderRequest, PlannerConfig, Warehouse};
use stockpilot_geo::DistanceEstimator;

use crate::scorer::{ScoreBreakdown, WarehouseScorer};

/// Outcome classification for one selection run.
///
/// `Partial` and `Unavailable` are business outcomes, not errors; both
/// carry actionable suggestions.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionStatus {
    Ok,
    Partial,
    Unavailable,
}

/// One scored candidate with its distance/ETA context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedCandidate {
    pub warehouse: Warehouse,
    pub breakdown: ScoreBreakdown,
    pub distance_km: f64,
    pub eta_minutes: f64,
    /// True when the distance came from the degraded (great-circle) path.
    pub degraded: bool,
}

/// Ranked decision returned to the host presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionResult {
    pub status: SelectionStatus,
    pub primary: Option<RankedCandidate>,
    /// Up to three runners-up.
    pub alternatives: Vec<RankedCandidate>,
    pub message: String,
    pub suggestions: Vec<String>,
}

const MAX_ALTERNATIVES: usize = 3;

/// Orchestrates scoring and distance estimation across all candidates.
pub struct WarehouseSelector {
    scorer: WarehouseScorer,
    estimator: DistanceEstimator,
}

impl WarehouseSelector {
    pub fn new(config: &PlannerConfig, estimator: DistanceEstimator) -> Self {
        Self {
            scorer: WarehouseScorer::new(config),
            estimator,
        }
    }

    /// Pick the best warehouse for `order` from the snapshot list.
    ///
    /// Structural misuse (invalid order, empty or invalid snapshot) is
    /// rejected with a validation error before any computation; stock
    /// shortfall is reported through [`SelectionStatus`], never as an
    /// error.
    pub async fn select(
        &self,
        order: &OrderRequest,
        warehouses: &[Warehouse],
    ) -> DomainResult<SelectionResult> {
        order.validate()?;
        if warehouses.is_empty() {
            return Err(DomainError::validation(
                "warehouse snapshot contains no candidates",
            ));
        }
        for warehouse in warehouses {
            warehouse.validate()?;
        }

        let stocked: Vec<&Warehouse> = warehouses
            .iter()
            .filter(|w| w.stock_of(order.category) > 0)
            .collect();

        if stocked.is_empty() {
            let message = format!("no warehouse currently stocks {}", order.category);
            info!(category = %order.category, "selection unavailable");
            return Ok(SelectionResult {
                status: SelectionStatus::Unavailable,
                primary: None,
                alternatives: Vec::new(),
                message,
                suggestions: vec![
                    "try an alternate product category".to_string(),
                    format!("await restock of {}", order.category),
                    "trigger emergency procurement".to_string(),
                ],
            });
        }

        // Candidates are independent; results are collected before sorting,
        // so evaluation order cannot affect the outcome.
        let mut ranked = Vec::with_capacity(stocked.len());
        for warehouse in stocked {
            let estimate = self
                .estimator
                .estimate(warehouse.location, order.destination)
                .await;
            let breakdown = self.scorer.score(warehouse, order, &estimate);
            ranked.push(RankedCandidate {
                warehouse: warehouse.clone(),
                breakdown,
                distance_km: estimate.distance_km,
                eta_minutes: estimate.duration_minutes,
                degraded: estimate.degraded,
            });
        }

        // Total order: score desc, then distance asc, then name, so equal
        // snapshots always rank identically.
        ranked.sort_by(|a, b| {
            b.breakdown
                .final_score
                .total_cmp(&a.breakdown.final_score)
                .then(a.distance_km.total_cmp(&b.distance_km))
                .then_with(|| a.warehouse.name.cmp(&b.warehouse.name))
        });

        let sufficient: Vec<RankedCandidate> = ranked
            .iter()
            .filter(|c| c.breakdown.availability_ratio >= 1.0)
            .cloned()
            .collect();

        if let Some(primary) = sufficient.first() {
            let primary = primary.clone();
            let alternatives: Vec<RankedCandidate> =
                sufficient.iter().skip(1).take(MAX_ALTERNATIVES).cloned().collect();
            let message = format!(
                "{} selected: {:.1} km away, {} of {} {} units in stock (score {:.1})",
                primary.warehouse.name,
                primary.distance_km,
                primary.warehouse.stock_of(order.category),
                order.quantity,
                order.category,
                primary.breakdown.final_score,
            );
            info!(
                warehouse = %primary.warehouse.name,
                score = primary.breakdown.final_score,
                distance_km = primary.distance_km,
                "selection ok"
            );
            return Ok(SelectionResult {
                status: SelectionStatus::Ok,
                primary: Some(primary),
                alternatives,
                message,
                suggestions: Vec::new(),
            });
        }

        // Every candidate is short; recommend the best of them anyway.
        let primary = ranked[0].clone();
        let available = primary.warehouse.stock_of(order.category);
        let alternatives: Vec<RankedCandidate> =
            ranked.iter().skip(1).take(MAX_ALTERNATIVES).cloned().collect();
        let message = format!(
            "{} can cover only {} of {} {} units ({:.1} km away, score {:.1})",
            primary.warehouse.name,
            available,
            order.quantity,
            order.category,
            primary.distance_km,
            primary.breakdown.final_score,
        );
        info!(
            warehouse = %primary.warehouse.name,
            available,
            requested = order.quantity,
            "selection partial"
        );
        Ok(SelectionResult {
            status: SelectionStatus::Partial,
            primary: Some(primary.clone()),
            alternatives,
            message,
            suggestions: vec![
                "split the order across multiple warehouses".to_string(),
                format!(
                    "reduce requested quantity to available stock ({available} units at {})",
                    primary.warehouse.name
                ),
            ],
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use stockpilot_core::{GeoPoint, ProductCategory, WarehouseId};

    use super::*;

    fn warehouse(
        name: &str,
        lat: f64,
        lng: f64,
        category: ProductCategory,
        stock: u32,
        load: f64,
        efficiency: f64,
    ) -> Warehouse {
        Warehouse {
            id: WarehouseId::new(),
            name: name.to_string(),
            location: GeoPoint::new(lat, lng),
            stock: BTreeMap::from([(category, stock)]),
            load_percent: load,
            efficiency,
            drone_ready: false,
        }
    }

    fn selector() -> WarehouseSelector {
        let config = PlannerConfig::default();
        WarehouseSelector::new(&config, DistanceEstimator::haversine_only(&config))
    }

    fn order(category: ProductCategory, quantity: u32) -> OrderRequest {
        OrderRequest {
            destination: GeoPoint::new(28.70, 77.10),
            category,
            quantity,
        }
    }

    #[tokio::test]
    async fn sole_sufficient_candidate_is_selected() {
        let a = warehouse("Delhi Hub", 28.61, 77.21, ProductCategory::Electronics, 200, 40.0, 95.0);
        let result = selector()
            .select(&order(ProductCategory::Electronics, 50), &[a])
            .await
            .unwrap();

        assert_eq!(result.status, SelectionStatus::Ok);
        let primary = result.primary.unwrap();
        assert_eq!(primary.warehouse.name, "Delhi Hub");
        // Ratio 4 under the surplus formula: 50 + (4 - 1) * 10.
        assert!((primary.breakdown.stock - 80.0).abs() < 1e-9);
        // ~14 km away: proximity barely dips below 100.
        assert!(primary.breakdown.proximity > 99.0);
        assert!(result.alternatives.is_empty());
        assert!(result.message.contains("Delhi Hub"));
        assert!(result.message.contains("200 of 50"));
    }

    #[tokio::test]
    async fn shortfall_everywhere_is_partial_with_split_hint() {
        let a = warehouse("North", 28.61, 77.21, ProductCategory::Food, 300, 40.0, 90.0);
        let b = warehouse("South", 12.97, 77.59, ProductCategory::Food, 200, 60.0, 70.0);
        let result = selector()
            .select(&order(ProductCategory::Food, 500), &[a, b])
            .await
            .unwrap();

        assert_eq!(result.status, SelectionStatus::Partial);
        // North is closer, less loaded, more efficient, and better stocked.
        assert_eq!(result.primary.as_ref().unwrap().warehouse.name, "North");
        assert_eq!(result.alternatives.len(), 1);
        assert!(
            result
                .suggestions
                .iter()
                .any(|s| s.contains("split the order"))
        );
        assert!(
            result
                .suggestions
                .iter()
                .any(|s| s.contains("300 units at North"))
        );
    }

    #[tokio::test]
    async fn no_stock_anywhere_is_unavailable() {
        let a = warehouse("North", 28.61, 77.21, ProductCategory::Electronics, 100, 40.0, 90.0);
        let result = selector()
            .select(&order(ProductCategory::Medical, 10), &[a])
            .await
            .unwrap();

        assert_eq!(result.status, SelectionStatus::Unavailable);
        assert!(result.primary.is_none());
        assert!(result.alternatives.is_empty());
        assert_eq!(result.suggestions.len(), 3);
        assert!(result.suggestions.iter().any(|s| s.contains("restock")));
    }

    #[tokio::test]
    async fn ok_alternatives_come_only_from_sufficient_pool() {
        let near_short =
            warehouse("Near Short", 28.70, 77.11, ProductCategory::Apparel, 5, 0.0, 100.0);
        let far_full =
            warehouse("Far Full", 19.07, 72.87, ProductCategory::Apparel, 100, 50.0, 60.0);
        let result = selector()
            .select(&order(ProductCategory::Apparel, 50), &[near_short, far_full])
            .await
            .unwrap();

        assert_eq!(result.status, SelectionStatus::Ok);
        assert_eq!(result.primary.unwrap().warehouse.name, "Far Full");
        // The insufficient candidate never appears as an alternative.
        assert!(result.alternatives.is_empty());
    }

    #[tokio::test]
    async fn alternatives_are_capped_at_three() {
        let mut fleet = Vec::new();
        for i in 0..6 {
            fleet.push(warehouse(
                &format!("W{i}"),
                28.0 + f64::from(i) * 0.1,
                77.0,
                ProductCategory::Industrial,
                100,
                10.0 * f64::from(i),
                80.0,
            ));
        }
        let result = selector()
            .select(&order(ProductCategory::Industrial, 10), &fleet)
            .await
            .unwrap();
        assert_eq!(result.status, SelectionStatus::Ok);
        assert_eq!(result.alternatives.len(), 3);
    }

    #[tokio::test]
    async fn degraded_estimates_are_flagged_on_candidates() {
        struct DeadRouter;

        #[async_trait::async_trait]
        impl stockpilot_geo::RouteSource for DeadRouter {
            async fn route(
                &self,
                _a: GeoPoint,
                _b: GeoPoint,
            ) -> Result<stockpilot_geo::RouteLeg, stockpilot_geo::GeoError> {
                Err(stockpilot_geo::GeoError::Network("down".to_string()))
            }
        }

        let config = PlannerConfig::default();
        let selector = WarehouseSelector::new(
            &config,
            DistanceEstimator::with_route_source(&config, std::sync::Arc::new(DeadRouter)),
        );
        let a = warehouse("North", 28.61, 77.21, ProductCategory::Food, 100, 40.0, 90.0);
        let result = selector
            .select(&order(ProductCategory::Food, 10), &[a])
            .await
            .unwrap();

        assert_eq!(result.status, SelectionStatus::Ok);
        assert!(result.primary.unwrap().degraded);
    }

    #[tokio::test]
    async fn empty_snapshot_is_a_validation_error() {
        let err = selector()
            .select(&order(ProductCategory::Food, 10), &[])
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn zero_quantity_is_a_validation_error() {
        let a = warehouse("North", 28.61, 77.21, ProductCategory::Food, 100, 40.0, 90.0);
        let err = selector()
            .select(&order(ProductCategory::Food, 0), &[a])
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn invalid_warehouse_snapshot_is_rejected_before_scoring() {
        let mut a = warehouse("North", 28.61, 77.21, ProductCategory::Food, 100, 40.0, 90.0);
        a.load_percent = 150.0;
        let err = selector()
            .select(&order(ProductCategory::Food, 10), &[a])
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }
}
