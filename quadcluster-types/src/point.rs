use geo::Point;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A geographic position in degrees.
///
/// Unlike `geo::Point`, fields are named in latitude/longitude order, which is
/// also the shape the cluster listing serializes to.
///
/// # Examples
///
/// ```
/// use quadcluster_types::point::GeoPoint;
///
/// let paris = GeoPoint::new(48.8566, 2.3522);
/// assert_eq!(paris.latitude, 48.8566);
///
/// let json = serde_json::to_string(&paris).unwrap();
/// assert_eq!(json, r#"{"latitude":48.8566,"longitude":2.3522}"#);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in degrees, positive north.
    pub latitude: f64,
    /// Longitude in degrees, positive east.
    pub longitude: f64,
}

impl GeoPoint {
    /// Create a point from latitude and longitude in degrees.
    ///
    /// No range checks happen here; the projection layer validates
    /// coordinates before they are indexed.
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Whether both coordinates are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }

    /// Convert to a `geo::Point` (x = longitude, y = latitude).
    pub fn to_point(&self) -> Point<f64> {
        Point::new(self.longitude, self.latitude)
    }

    /// Absolute per-axis difference to another point, as `(d_lat, d_lon)`.
    pub fn delta(&self, other: &GeoPoint) -> (f64, f64) {
        (
            (self.latitude - other.latitude).abs(),
            (self.longitude - other.longitude).abs(),
        )
    }
}

impl From<Point<f64>> for GeoPoint {
    fn from(point: Point<f64>) -> Self {
        Self::new(point.y(), point.x())
    }
}

impl From<GeoPoint> for Point<f64> {
    fn from(point: GeoPoint) -> Self {
        point.to_point()
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.latitude, self.longitude)
    }
}
