//! Warehouse snapshot types.
//!
//! Warehouses are mutated only by the host inventory/ops system; this core
//! treats every snapshot as read-only input.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::geo::GeoPoint;
use crate::id::WarehouseId;

/// Fixed product category set used for stock keys and order requests.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductCategory {
    Electronics,
    Food,
    Medical,
    Apparel,
    Industrial,
}

impl core::fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            ProductCategory::Electronics => "electronics",
            ProductCategory::Food => "food",
            ProductCategory::Medical => "medical",
            ProductCategory::Apparel => "apparel",
            ProductCategory::Industrial => "industrial",
        };
        f.write_str(s)
    }
}

/// Read-only warehouse snapshot supplied by the host system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Warehouse {
    pub id: WarehouseId,
    pub name: String,
    pub location: GeoPoint,
    /// Units on hand per category; absent categories hold zero stock.
    pub stock: BTreeMap<ProductCategory, u32>,
    /// Current utilization in [0, 100].
    pub load_percent: f64,
    /// Operational efficiency rating in [0, 100].
    pub efficiency: f64,
    pub drone_ready: bool,
}

impl Warehouse {
    /// Units on hand for `category` (zero when the key is absent).
    pub fn stock_of(&self, category: ProductCategory) -> u32 {
        self.stock.get(&category).copied().unwrap_or(0)
    }

    pub fn validate(&self) -> DomainResult<()> {
        self.location.validate()?;
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("warehouse name must not be empty"));
        }
        if !(0.0..=100.0).contains(&self.load_percent) || !self.load_percent.is_finite() {
            return Err(DomainError::validation(format!(
                "warehouse {}: load_percent {} out of range [0, 100]",
                self.name, self.load_percent
            )));
        }
        if !(0.0..=100.0).contains(&self.efficiency) || !self.efficiency.is_finite() {
            return Err(DomainError::validation(format!(
                "warehouse {}: efficiency {} out of range [0, 100]",
                self.name, self.efficiency
            )));
        }
        Ok(())
    }
}
