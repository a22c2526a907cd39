//! Spherical (Web) Mercator projection between geographic coordinates and
//! the pixel/tile plane.
//!
//! At zoom `z` the whole world maps to a square of `TILE_SIZE * 2^z` pixels,
//! with pixel `(0, 0)` at the north-west corner. Tiles are `TILE_SIZE`
//! pixel squares indexed from the same corner.

use crate::error::Result;
use crate::quadkey::TileCoordinate;
use crate::validation::validate_mercator_point;
use crate::zoom::ZoomLevel;
use quadcluster_types::{GeoBounds, GeoPoint};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Side of a map tile in pixels.
pub const TILE_SIZE: u32 = 256;

/// Latitude at which the Mercator square closes (`atan(sinh(π))` in degrees).
pub const MERCATOR_MAX_LATITUDE: f64 = 85.05112877980659;

/// Largest latitude magnitude accepted for projection. Values between
/// [`MERCATOR_MAX_LATITUDE`] and this limit are clamped.
pub const MERCATOR_LATITUDE_LIMIT: f64 = 85.05113;

/// A position on the projected map, in pixels at some zoom level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelCoordinate {
    pub x: f64,
    pub y: f64,
}

impl PixelCoordinate {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn midpoint(&self, other: &PixelCoordinate) -> PixelCoordinate {
        PixelCoordinate::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

/// Side of the whole world map in pixels at `zoom`.
pub fn map_size(zoom: ZoomLevel) -> f64 {
    (TILE_SIZE as u64 * zoom.grid_size() as u64) as f64
}

/// Projects a geographic point to pixel coordinates at `zoom`.
///
/// Fails with `InvalidCoordinate` for non-finite values, longitudes outside
/// [-180, 180] and latitudes beyond ±[`MERCATOR_LATITUDE_LIMIT`].
///
/// # Examples
///
/// ```
/// use quadcluster::geodesy::{project, map_size};
/// use quadcluster::{GeoPoint, ZoomLevel};
///
/// let zoom = ZoomLevel::new(1).unwrap();
/// let pixel = project(&GeoPoint::new(0.0, 0.0), zoom).unwrap();
/// assert_eq!(pixel.x, map_size(zoom) / 2.0);
/// assert!((pixel.y - map_size(zoom) / 2.0).abs() < 1e-9);
/// ```
pub fn project(point: &GeoPoint, zoom: ZoomLevel) -> Result<PixelCoordinate> {
    validate_mercator_point(point)?;

    let size = map_size(zoom);
    let latitude = point
        .latitude
        .clamp(-MERCATOR_MAX_LATITUDE, MERCATOR_MAX_LATITUDE);

    let x = (point.longitude + 180.0) / 360.0 * size;

    let sin_latitude = latitude.to_radians().sin();
    let y = (0.5 - ((1.0 + sin_latitude) / (1.0 - sin_latitude)).ln() / (4.0 * PI)) * size;

    Ok(PixelCoordinate::new(x.clamp(0.0, size), y.clamp(0.0, size)))
}

/// Inverse of [`project`]. Pixels outside the map are clamped to its edge.
pub fn unproject(pixel: &PixelCoordinate, zoom: ZoomLevel) -> GeoPoint {
    let size = map_size(zoom);
    let x = pixel.x.clamp(0.0, size) / size - 0.5;
    let y = 0.5 - pixel.y.clamp(0.0, size) / size;

    let latitude = 90.0 - 360.0 * (-y * 2.0 * PI).exp().atan() / PI;
    let longitude = 360.0 * x;

    GeoPoint::new(latitude, longitude)
}

/// Tile containing `pixel`, clamped to the grid of `zoom`.
///
/// `tile_size` must be the pixel size the coordinates were produced with.
pub fn pixel_to_tile(pixel: &PixelCoordinate, zoom: ZoomLevel, tile_size: u32) -> TileCoordinate {
    let max_index = zoom.max_tile_index() as f64;
    let tile_size = tile_size as f64;

    let x = (pixel.x / tile_size).floor().clamp(0.0, max_index) as u32;
    let y = (pixel.y / tile_size).floor().clamp(0.0, max_index) as u32;

    TileCoordinate::from_parts(x, y, zoom)
}

/// Top-left and bottom-right pixel corners of `tile`.
pub fn tile_to_pixel_bounds(
    tile: &TileCoordinate,
    tile_size: u32,
) -> (PixelCoordinate, PixelCoordinate) {
    let size = tile_size as f64;
    let left = tile.x() as f64 * size;
    let top = tile.y() as f64 * size;

    (
        PixelCoordinate::new(left, top),
        PixelCoordinate::new(left + size, top + size),
    )
}

/// Tile containing `point` at `zoom`.
pub fn tile_for(point: &GeoPoint, zoom: ZoomLevel) -> Result<TileCoordinate> {
    let pixel = project(point, zoom)?;
    Ok(pixel_to_tile(&pixel, zoom, TILE_SIZE))
}

/// Geographic bounds of `tile`.
pub fn tile_bounds(tile: &TileCoordinate) -> GeoBounds {
    let (top_left, bottom_right) = tile_to_pixel_bounds(tile, TILE_SIZE);
    let north_west = unproject(&top_left, tile.zoom());
    let south_east = unproject(&bottom_right, tile.zoom());

    GeoBounds::new(
        GeoPoint::new(south_east.latitude, north_west.longitude),
        GeoPoint::new(north_west.latitude, south_east.longitude),
    )
}

/// Geographic position of the pixel midpoint of `tile`.
///
/// This is where a cluster marker for the tile is placed. Because of the
/// projection it is not the arithmetic midpoint of the tile's latitudes.
pub fn tile_center(tile: &TileCoordinate) -> GeoPoint {
    let (top_left, bottom_right) = tile_to_pixel_bounds(tile, TILE_SIZE);
    unproject(&top_left.midpoint(&bottom_right), tile.zoom())
}
