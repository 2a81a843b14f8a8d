//! `stockpilot-geo`
//!
//! Distance estimation and place naming over unreliable external sources.
//!
//! Both entry points are **total**: `DistanceEstimator::estimate` always
//! returns a value (Haversine fallback, flagged `degraded` when the road
//! router failed) and `LocationNamer::name_of` always returns a non-empty
//! label (offline tiers plus a coordinate placeholder terminate the chain).
//! Network access lives behind the `net` feature; without it only the
//! offline tiers exist and nothing here performs IO.

pub mod distance;
pub mod error;
pub mod gazetteer;
pub mod namer;

#[cfg(feature = "net")]
pub mod net;

pub use distance::{DistanceEstimate, DistanceEstimator, RouteLeg, RouteSource};
pub use error::GeoError;
pub use gazetteer::{BoundingBox, Gazetteer, GazetteerEntry, RegionTable};
pub use namer::{LocationNamer, RateGate, ResolveStrategy, coordinate_label};
