//! `stockpilot-recommend`
//!
//! Where to put the next (micro-)warehouse: seeded K-means over historical
//! order coordinates, then gap analysis and composite scoring of the
//! surviving cluster centroids against the existing warehouse network.

pub mod cluster;
pub mod recommend;

pub use cluster::{Cluster, ClusterEngine};
pub use recommend::{LocationRecommender, PriorityTier, RecommendedLocation};
