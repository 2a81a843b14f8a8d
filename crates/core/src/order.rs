//! Order snapshot types: the incoming request and the clustering history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::geo::GeoPoint;
use crate::id::WarehouseId;
use crate::warehouse::ProductCategory;

/// An incoming order to place against the warehouse catalogue.
///
/// Address-to-coordinate resolution is an external concern; by the time a
/// request reaches this core it already carries coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub destination: GeoPoint,
    pub category: ProductCategory,
    pub quantity: u32,
}

impl OrderRequest {
    /// Structural validation, run before any scoring begins.
    ///
    /// `quantity > 0` is the precondition that keeps the availability
    /// ratio free of division by zero.
    pub fn validate(&self) -> DomainResult<()> {
        self.destination.validate()?;
        if self.quantity == 0 {
            return Err(DomainError::validation("requested quantity must be > 0"));
        }
        Ok(())
    }
}

/// One fulfilled order from the host system's history. Immutable input to
/// clustering and gap analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalOrder {
    pub location: GeoPoint,
    pub category: ProductCategory,
    pub delivery_time_hours: f64,
    pub origin_warehouse: WarehouseId,
    /// Delay severity in [0, 100]; higher is worse.
    pub delay_score: f64,
    pub order_value: f64,
    pub placed_at: DateTime<Utc>,
}

impl HistoricalOrder {
    pub fn validate(&self) -> DomainResult<()> {
        self.location.validate()?;
        if !(0.0..=100.0).contains(&self.delay_score) || !self.delay_score.is_finite() {
            return Err(DomainError::validation(format!(
                "delay_score {} out of range [0, 100]",
                self.delay_score
            )));
        }
        if !(self.order_value.is_finite() && self.order_value > 0.0) {
            return Err(DomainError::validation("order_value must be positive"));
        }
        if !(self.delivery_time_hours.is_finite() && self.delivery_time_hours >= 0.0) {
            return Err(DomainError::validation(
                "delivery_time_hours must be non-negative",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_quantity_is_rejected() {
        let req = OrderRequest {
            destination: GeoPoint::new(28.70, 77.10),
            category: ProductCategory::Electronics,
            quantity: 0,
        };
        assert!(matches!(req.validate(), Err(DomainError::Validation(_))));
    }

    #[test]
    fn valid_request_passes() {
        let req = OrderRequest {
            destination: GeoPoint::new(28.70, 77.10),
            category: ProductCategory::Electronics,
            quantity: 50,
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn negative_order_value_is_rejected() {
        let order = HistoricalOrder {
            location: GeoPoint::new(28.46, 77.03),
            category: ProductCategory::Food,
            delivery_time_hours: 6.0,
            origin_warehouse: WarehouseId::new(),
            delay_score: 20.0,
            order_value: -1.0,
            placed_at: Utc::now(),
        };
        assert!(order.validate().is_err());
    }
}
