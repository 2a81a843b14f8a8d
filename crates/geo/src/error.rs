use thiserror::Error;

/// Failure of one external-source attempt (one routing call, one geocoder
/// tier). These never escape the crate's public entry points; they only
/// drive fallback to the next tier.
#[derive(Debug, Error)]
pub enum GeoError {
    #[error("network error: {0}")]
    Network(String),

    #[error("provider returned status {0}")]
    Status(u16),

    #[error("unusable provider response: {0}")]
    Decode(String),

    #[error("no result for coordinates")]
    NoResult,
}
