//! Validation for geographic coordinates.

use crate::error::{QuadclusterError, Result};
use crate::geodesy::MERCATOR_LATITUDE_LIMIT;
use quadcluster_types::{GeoBounds, GeoPoint};

/// Validates a point has a finite latitude in [-90.0, 90.0] and longitude in
/// [-180.0, 180.0].
///
/// # Examples
///
/// ```
/// use quadcluster::validation::validate_geo_point;
/// use quadcluster::GeoPoint;
///
/// assert!(validate_geo_point(&GeoPoint::new(40.7128, -74.0060)).is_ok());
/// assert!(validate_geo_point(&GeoPoint::new(40.0, 200.0)).is_err());
/// assert!(validate_geo_point(&GeoPoint::new(95.0, -74.0)).is_err());
/// ```
pub fn validate_geo_point(point: &GeoPoint) -> Result<()> {
    let GeoPoint {
        latitude,
        longitude,
    } = *point;

    if !latitude.is_finite() {
        return Err(QuadclusterError::InvalidCoordinate(format!(
            "Latitude must be finite, got: {}",
            latitude
        )));
    }

    if !longitude.is_finite() {
        return Err(QuadclusterError::InvalidCoordinate(format!(
            "Longitude must be finite, got: {}",
            longitude
        )));
    }

    if !(-90.0..=90.0).contains(&latitude) {
        return Err(QuadclusterError::InvalidCoordinate(format!(
            "Latitude out of range [-90.0, 90.0]: {}",
            latitude
        )));
    }

    if !(-180.0..=180.0).contains(&longitude) {
        return Err(QuadclusterError::InvalidCoordinate(format!(
            "Longitude out of range [-180.0, 180.0]: {}",
            longitude
        )));
    }

    Ok(())
}

/// Validates a point can be placed on the Web Mercator plane.
///
/// On top of [`validate_geo_point`], the latitude must lie within
/// ±[`MERCATOR_LATITUDE_LIMIT`]. The limit itself is accepted.
pub fn validate_mercator_point(point: &GeoPoint) -> Result<()> {
    validate_geo_point(point)?;

    if point.latitude.abs() > MERCATOR_LATITUDE_LIMIT {
        return Err(QuadclusterError::InvalidCoordinate(format!(
            "Latitude out of Mercator range [-{limit}, {limit}]: {}",
            point.latitude,
            limit = MERCATOR_LATITUDE_LIMIT
        )));
    }

    Ok(())
}

/// Validates both corners of a bounding box and their ordering.
pub fn validate_bounds(bounds: &GeoBounds) -> Result<()> {
    validate_geo_point(&bounds.sw).map_err(|e| with_corner("South-west corner", e))?;
    validate_geo_point(&bounds.ne).map_err(|e| with_corner("North-east corner", e))?;

    if bounds.sw.latitude > bounds.ne.latitude {
        return Err(QuadclusterError::InvalidCoordinate(format!(
            "South-west latitude {} is north of north-east latitude {}",
            bounds.sw.latitude, bounds.ne.latitude
        )));
    }

    if bounds.sw.longitude > bounds.ne.longitude {
        return Err(QuadclusterError::InvalidCoordinate(format!(
            "South-west longitude {} is east of north-east longitude {}",
            bounds.sw.longitude, bounds.ne.longitude
        )));
    }

    Ok(())
}

fn with_corner(corner: &str, err: QuadclusterError) -> QuadclusterError {
    match err {
        QuadclusterError::InvalidCoordinate(msg) => {
            QuadclusterError::InvalidCoordinate(format!("{}: {}", corner, msg))
        }
        other => other,
    }
}
