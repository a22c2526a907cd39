use crate::point::GeoPoint;
use geo::Rect;
use serde::{Deserialize, Serialize};

/// A geographic bounding box given by its south-west and north-east corners.
///
/// This is the shape map clients send when asking for the clusters in view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    /// South-west corner (minimum latitude and longitude)
    pub sw: GeoPoint,
    /// North-east corner (maximum latitude and longitude)
    pub ne: GeoPoint,
}

impl GeoBounds {
    /// Create a bounding box from its corners.
    ///
    /// # Examples
    ///
    /// ```
    /// use quadcluster_types::bbox::GeoBounds;
    /// use quadcluster_types::point::GeoPoint;
    ///
    /// let bounds = GeoBounds::new(GeoPoint::new(40.7, -74.0), GeoPoint::new(40.8, -73.9));
    /// assert!((bounds.height() - 0.1).abs() < 1e-9);
    /// ```
    pub const fn new(sw: GeoPoint, ne: GeoPoint) -> Self {
        Self { sw, ne }
    }

    /// Bounding box covering the whole Web Mercator world.
    pub fn world(max_latitude: f64) -> Self {
        Self::new(
            GeoPoint::new(-max_latitude, -180.0),
            GeoPoint::new(max_latitude, 180.0),
        )
    }

    /// Create a bounding box from a `geo::Rect` (x = longitude, y = latitude).
    pub fn from_rect(rect: Rect) -> Self {
        Self::new(
            GeoPoint::new(rect.min().y, rect.min().x),
            GeoPoint::new(rect.max().y, rect.max().x),
        )
    }

    /// Convert to a `geo::Rect`.
    pub fn to_rect(&self) -> Rect {
        Rect::new(
            geo::coord! { x: self.sw.longitude, y: self.sw.latitude },
            geo::coord! { x: self.ne.longitude, y: self.ne.latitude },
        )
    }

    /// Arithmetic midpoint of the two corners.
    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(
            (self.sw.latitude + self.ne.latitude) / 2.0,
            (self.sw.longitude + self.ne.longitude) / 2.0,
        )
    }

    /// Longitude span in degrees.
    pub fn width(&self) -> f64 {
        self.ne.longitude - self.sw.longitude
    }

    /// Latitude span in degrees.
    pub fn height(&self) -> f64 {
        self.ne.latitude - self.sw.latitude
    }

    /// Check if a point lies inside the box or on its edge.
    pub fn contains(&self, point: &GeoPoint) -> bool {
        point.latitude >= self.sw.latitude
            && point.latitude <= self.ne.latitude
            && point.longitude >= self.sw.longitude
            && point.longitude <= self.ne.longitude
    }

    /// Check if a point lies strictly inside the box.
    ///
    /// Points on an edge do not qualify; this matches how stored locations
    /// are selected for a map viewport.
    pub fn contains_strict(&self, point: &GeoPoint) -> bool {
        point.latitude > self.sw.latitude
            && point.latitude < self.ne.latitude
            && point.longitude > self.sw.longitude
            && point.longitude < self.ne.longitude
    }

    /// Check if another box lies completely inside this one, allowing
    /// `tolerance` degrees of floating point slack on each edge.
    pub fn encloses(&self, other: &GeoBounds, tolerance: f64) -> bool {
        other.sw.latitude >= self.sw.latitude - tolerance
            && other.sw.longitude >= self.sw.longitude - tolerance
            && other.ne.latitude <= self.ne.latitude + tolerance
            && other.ne.longitude <= self.ne.longitude + tolerance
    }
}
