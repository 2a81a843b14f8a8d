//! Offline naming tiers: curated gazetteer and coarse region boxes.
//!
//! Coverage is intentionally metro-centric; these tables are curated
//! heuristics, not an authoritative geospatial dataset. Points outside
//! them fall through to later tiers.

use async_trait::async_trait;

use stockpilot_core::GeoPoint;

use crate::error::GeoError;
use crate::namer::ResolveStrategy;

/// One curated gazetteer entry: a labelled circle.
#[derive(Debug, Clone)]
pub struct GazetteerEntry {
    pub center: GeoPoint,
    pub radius_km: f64,
    pub label: String,
}

impl GazetteerEntry {
    pub fn new(center: GeoPoint, radius_km: f64, label: impl Into<String>) -> Self {
        Self {
            center,
            radius_km,
            label: label.into(),
        }
    }

    pub fn contains(&self, point: GeoPoint) -> bool {
        self.center.haversine_km(&point) <= self.radius_km
    }
}

/// First tier: curated table of (center, radius, label) circles.
///
/// The first containing entry wins, so tighter circles (satellite cities)
/// are listed before the metros that overlap them.
#[derive(Debug, Clone)]
pub struct Gazetteer {
    entries: Vec<GazetteerEntry>,
}

impl Gazetteer {
    pub fn new(entries: Vec<GazetteerEntry>) -> Self {
        Self { entries }
    }

    pub fn lookup(&self, point: GeoPoint) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.contains(point))
            .map(|e| e.label.as_str())
    }
}

impl Default for Gazetteer {
    fn default() -> Self {
        let entry = |lat: f64, lng: f64, radius_km: f64, label: &str| {
            GazetteerEntry::new(GeoPoint::new(lat, lng), radius_km, label)
        };
        Self::new(vec![
            entry(28.4595, 77.0266, 15.0, "Gurgaon"),
            entry(28.5355, 77.3910, 15.0, "Noida"),
            entry(28.6139, 77.2090, 25.0, "Delhi"),
            entry(19.0760, 72.8777, 30.0, "Mumbai"),
            entry(18.5204, 73.8567, 20.0, "Pune"),
            entry(12.9716, 77.5946, 30.0, "Bengaluru"),
            entry(13.0827, 80.2707, 25.0, "Chennai"),
            entry(22.5726, 88.3639, 25.0, "Kolkata"),
            entry(17.3850, 78.4867, 25.0, "Hyderabad"),
            entry(26.9124, 75.7873, 20.0, "Jaipur"),
            entry(23.0225, 72.5714, 20.0, "Ahmedabad"),
        ])
    }
}

#[async_trait]
impl ResolveStrategy for Gazetteer {
    fn name(&self) -> &'static str {
        "gazetteer"
    }

    async fn resolve(&self, point: GeoPoint) -> Result<String, GeoError> {
        self.lookup(point)
            .map(str::to_string)
            .ok_or(GeoError::NoResult)
    }
}

/// An axis-aligned lat/lng box with a label.
#[derive(Debug, Clone)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
    pub label: String,
}

impl BoundingBox {
    pub fn new(
        min_lat: f64,
        max_lat: f64,
        min_lng: f64,
        max_lng: f64,
        label: impl Into<String>,
    ) -> Self {
        Self {
            min_lat,
            max_lat,
            min_lng,
            max_lng,
            label: label.into(),
        }
    }

    pub fn contains(&self, point: GeoPoint) -> bool {
        (self.min_lat..=self.max_lat).contains(&point.lat)
            && (self.min_lng..=self.max_lng).contains(&point.lng)
    }
}

/// Coarse fallback tier: city-level boxes first, then state/region boxes.
#[derive(Debug, Clone)]
pub struct RegionTable {
    cities: Vec<BoundingBox>,
    regions: Vec<BoundingBox>,
}

impl RegionTable {
    pub fn new(cities: Vec<BoundingBox>, regions: Vec<BoundingBox>) -> Self {
        Self { cities, regions }
    }

    pub fn lookup(&self, point: GeoPoint) -> Option<&str> {
        self.cities
            .iter()
            .chain(self.regions.iter())
            .find(|b| b.contains(point))
            .map(|b| b.label.as_str())
    }
}

impl Default for RegionTable {
    fn default() -> Self {
        Self::new(
            vec![
                BoundingBox::new(28.2, 28.9, 76.8, 77.6, "Delhi NCR"),
                BoundingBox::new(18.9, 19.3, 72.7, 73.2, "Mumbai Metropolitan Region"),
            ],
            vec![
                BoundingBox::new(27.6, 30.9, 74.4, 77.6, "Haryana"),
                BoundingBox::new(23.0, 30.2, 69.5, 78.3, "Rajasthan"),
                BoundingBox::new(15.6, 22.0, 72.6, 80.9, "Maharashtra"),
                BoundingBox::new(11.5, 18.5, 74.0, 78.6, "Karnataka"),
                BoundingBox::new(8.0, 13.5, 76.2, 80.4, "Tamil Nadu"),
                BoundingBox::new(23.8, 30.4, 77.0, 84.7, "Uttar Pradesh"),
                BoundingBox::new(21.5, 27.3, 85.8, 89.9, "West Bengal"),
                BoundingBox::new(15.8, 19.9, 77.2, 81.8, "Telangana"),
                BoundingBox::new(20.1, 24.7, 68.1, 74.5, "Gujarat"),
            ],
        )
    }
}

#[async_trait]
impl ResolveStrategy for RegionTable {
    fn name(&self) -> &'static str {
        "region-table"
    }

    async fn resolve(&self, point: GeoPoint) -> Result<String, GeoError> {
        self.lookup(point)
            .map(str::to_string)
            .ok_or(GeoError::NoResult)
    }
}
