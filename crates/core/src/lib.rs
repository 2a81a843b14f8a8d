//! `stockpilot-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no IO, no HTTP, no
//! storage): geographic math, snapshot types supplied by the host system,
//! the planner configuration, and the domain error model.

pub mod config;
pub mod error;
pub mod geo;
pub mod id;
pub mod order;
pub mod warehouse;

pub use config::{ClusterSettings, NetworkSettings, PlannerConfig, RecommendSettings, ScoringWeights};
pub use error::{DomainError, DomainResult};
pub use geo::{EARTH_RADIUS_KM, GeoPoint};
pub use id::WarehouseId;
pub use order::{HistoricalOrder, OrderRequest};
pub use warehouse::{ProductCategory, Warehouse};
