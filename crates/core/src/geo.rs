//! Geographic primitives: points and great-circle distance.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Mean Earth radius in kilometres (spherical approximation).
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Great-circle distance to `other` via the Haversine formula.
    ///
    /// Always computable for finite coordinates; this is the baseline every
    /// degraded-mode estimate falls back to.
    pub fn haversine_km(&self, other: &GeoPoint) -> f64 {
        let lat_a = self.lat.to_radians();
        let lat_b = other.lat.to_radians();
        let d_lat = (other.lat - self.lat).to_radians();
        let d_lng = (other.lng - self.lng).to_radians();

        let h = (d_lat / 2.0).sin().powi(2)
            + lat_a.cos() * lat_b.cos() * (d_lng / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_KM * h.sqrt().min(1.0).asin()
    }

    /// Reject non-finite or out-of-range coordinates.
    pub fn validate(&self) -> DomainResult<()> {
        if !self.lat.is_finite() || !self.lng.is_finite() {
            return Err(DomainError::validation("coordinates must be finite"));
        }
        if !(-90.0..=90.0).contains(&self.lat) {
            return Err(DomainError::validation(format!(
                "latitude {} out of range [-90, 90]",
                self.lat
            )));
        }
        if !(-180.0..=180.0).contains(&self.lng) {
            return Err(DomainError::validation(format!(
                "longitude {} out of range [-180, 180]",
                self.lng
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_to_self_is_zero() {
        let p = GeoPoint::new(28.61, 77.21);
        assert_eq!(p.haversine_km(&p), 0.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let delhi = GeoPoint::new(28.6139, 77.2090);
        let mumbai = GeoPoint::new(19.0760, 72.8777);
        let ab = delhi.haversine_km(&mumbai);
        let ba = mumbai.haversine_km(&delhi);
        assert!((ab - ba).abs() < 1e-9);
    }

    #[test]
    fn delhi_to_mumbai_is_roughly_1150_km() {
        let delhi = GeoPoint::new(28.6139, 77.2090);
        let mumbai = GeoPoint::new(19.0760, 72.8777);
        let d = delhi.haversine_km(&mumbai);
        assert!((1100.0..1200.0).contains(&d), "got {d}");
    }

    #[test]
    fn validate_rejects_out_of_range_latitude() {
        let p = GeoPoint::new(91.0, 0.0);
        assert!(matches!(p.validate(), Err(DomainError::Validation(_))));
    }

    #[test]
    fn validate_rejects_nan() {
        let p = GeoPoint::new(f64::NAN, 0.0);
        assert!(p.validate().is_err());
    }
}
