//! `stockpilot-selection`
//!
//! Per-order warehouse selection: a bounded multi-factor suitability score
//! for each (warehouse, order) pair, and the decision procedure that ranks
//! candidates and classifies the outcome as fulfilled, partial, or
//! unavailable. Deterministic domain logic; distance estimation is the
//! only awaited dependency.

pub mod scorer;
pub mod selector;

pub use scorer::{ScoreBreakdown, WarehouseScorer};
pub use selector::{RankedCandidate, SelectionResult, SelectionStatus, WarehouseSelector};
