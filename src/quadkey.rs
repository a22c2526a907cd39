//! Quadkey tile addressing.
//!
//! A quadkey names a tile by the path taken from the whole-world tile down to
//! it: one base-4 digit per zoom level, most significant level first. Each
//! digit packs the tile's y and x bits for that level as `2 * y + x`:
//!
//! ```text
//! +---+---+
//! | 0 | 1 |
//! +---+---+
//! | 2 | 3 |
//! +---+---+
//! ```
//!
//! Truncating a quadkey to `m` digits therefore yields the ancestor tile at
//! zoom `m`, which is what makes prefix grouping a valid way to coarsen.

use crate::error::{QuadclusterError, Result};
use crate::geodesy::{tile_bounds, tile_center, tile_for};
use crate::zoom::{MAX_ZOOM, ZoomLevel};
use quadcluster_types::{GeoBounds, GeoPoint};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

/// One cell of the `2^zoom x 2^zoom` tile grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TileCoordinate {
    x: u32,
    y: u32,
    zoom: ZoomLevel,
}

impl TileCoordinate {
    /// Create a tile coordinate, checking it lies on the grid of `zoom`.
    pub fn new(x: u32, y: u32, zoom: ZoomLevel) -> Result<Self> {
        let max_index = zoom.max_tile_index();
        if x > max_index || y > max_index {
            return Err(QuadclusterError::InvalidCoordinate(format!(
                "Tile ({}, {}) is outside the {}x{} grid at {}",
                x,
                y,
                zoom.grid_size(),
                zoom.grid_size(),
                zoom
            )));
        }
        Ok(Self::from_parts(x, y, zoom))
    }

    pub(crate) const fn from_parts(x: u32, y: u32, zoom: ZoomLevel) -> Self {
        Self { x, y, zoom }
    }

    pub const fn x(&self) -> u32 {
        self.x
    }

    pub const fn y(&self) -> u32 {
        self.y
    }

    pub const fn zoom(&self) -> ZoomLevel {
        self.zoom
    }

    /// The ancestor tile at the coarser level `zoom`.
    ///
    /// Fails with `InvalidZoom` when `zoom` is finer than this tile's level.
    pub fn coarsen(&self, zoom: ZoomLevel) -> Result<Self> {
        if zoom > self.zoom {
            return Err(QuadclusterError::InvalidZoom(format!(
                "Cannot coarsen a {} tile to the finer level {}",
                self.zoom, zoom
            )));
        }

        let shift = self.zoom.value() - zoom.value();
        Ok(Self::from_parts(self.x >> shift, self.y >> shift, zoom))
    }

    /// The enclosing tile one level up, or `None` for the world tile.
    pub fn parent(&self) -> Option<Self> {
        let zoom = self.zoom.value().checked_sub(1)?;
        self.coarsen(ZoomLevel::clamped(zoom)).ok()
    }

    /// Whether `other` is this tile or one of its descendants.
    pub fn contains(&self, other: &TileCoordinate) -> bool {
        other
            .coarsen(self.zoom)
            .is_ok_and(|ancestor| ancestor == *self)
    }

    pub fn quad_key(&self) -> QuadKey {
        encode(self)
    }
}

impl fmt::Display for TileCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.zoom.value(), self.x, self.y)
    }
}

/// A validated quadkey: up to `MAX_ZOOM` digits from `0..=3`.
///
/// Serializes as a plain string, so it can key a JSON object.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct QuadKey(String);

impl QuadKey {
    /// Parses and validates a quadkey.
    ///
    /// # Examples
    ///
    /// ```
    /// use quadcluster::QuadKey;
    ///
    /// let key = QuadKey::parse("0231").unwrap();
    /// assert_eq!(key.zoom().value(), 4);
    /// assert!(QuadKey::parse("0241").is_err());
    /// ```
    pub fn parse<S: Into<String>>(key: S) -> Result<Self> {
        let key = key.into();

        if key.len() > MAX_ZOOM as usize {
            return Err(QuadclusterError::InvalidQuadKey(format!(
                "'{}' has {} digits, at most {} are allowed",
                key,
                key.len(),
                MAX_ZOOM
            )));
        }

        if let Some((position, digit)) = key
            .char_indices()
            .find(|(_, c)| !matches!(c, '0'..='3'))
        {
            return Err(QuadclusterError::InvalidQuadKey(format!(
                "'{}' has invalid digit '{}' at position {}",
                key, digit, position
            )));
        }

        Ok(Self(key))
    }

    /// The key for the whole-world tile at zoom 0.
    pub fn root() -> Self {
        Self(String::new())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Zoom level of the tile, equal to the number of digits.
    pub fn zoom(&self) -> ZoomLevel {
        ZoomLevel::clamped(self.0.len() as u8)
    }

    /// The ancestor key at `zoom`, i.e. the first `zoom` digits.
    ///
    /// Fails with `InvalidZoom` when the key is shorter than `zoom`.
    pub fn truncate(&self, zoom: ZoomLevel) -> Result<QuadKey> {
        let length = zoom.value() as usize;
        if length > self.0.len() {
            return Err(QuadclusterError::InvalidZoom(format!(
                "Cannot truncate the {}-digit key '{}' to {}",
                self.0.len(),
                self.0,
                zoom
            )));
        }
        Ok(Self(self.0[..length].to_string()))
    }

    /// Whether `other` names this tile or one of its descendants.
    pub fn contains(&self, other: &QuadKey) -> bool {
        other.0.starts_with(&self.0)
    }

    /// Decodes the key back into grid coordinates.
    pub fn tile_coordinate(&self) -> TileCoordinate {
        let mut x = 0u32;
        let mut y = 0u32;

        for digit in self.0.bytes().map(|b| b - b'0') {
            x = (x << 1) | (digit & 1) as u32;
            y = (y << 1) | (digit >> 1) as u32;
        }

        TileCoordinate::from_parts(x, y, self.zoom())
    }

    /// Geometry of the tile this key names.
    pub fn tile(&self) -> Tile {
        let coordinate = self.tile_coordinate();
        Tile {
            quad_key: self.clone(),
            bounds: tile_bounds(&coordinate),
            center: tile_center(&coordinate),
        }
    }
}

impl TryFrom<String> for QuadKey {
    type Error = QuadclusterError;

    fn try_from(key: String) -> Result<Self> {
        Self::parse(key)
    }
}

impl From<QuadKey> for String {
    fn from(key: QuadKey) -> Self {
        key.0
    }
}

impl FromStr for QuadKey {
    type Err = QuadclusterError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl AsRef<str> for QuadKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for QuadKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QuadKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A tile's address together with its geographic extent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tile {
    pub quad_key: QuadKey,
    pub bounds: GeoBounds,
    /// Geographic position of the tile's pixel midpoint
    pub center: GeoPoint,
}

/// Encodes a tile coordinate as a quadkey with `tile.zoom()` digits.
///
/// # Examples
///
/// ```
/// use quadcluster::quadkey::{encode, TileCoordinate};
/// use quadcluster::ZoomLevel;
///
/// let tile = TileCoordinate::new(3, 5, ZoomLevel::new(3).unwrap()).unwrap();
/// assert_eq!(encode(&tile).as_str(), "213");
/// ```
pub fn encode(tile: &TileCoordinate) -> QuadKey {
    let zoom = tile.zoom.value();
    let mut key = String::with_capacity(zoom as usize);

    for level in (0..zoom).rev() {
        let mask = 1u32 << level;
        let mut digit = 0u8;
        if tile.x & mask != 0 {
            digit += 1;
        }
        if tile.y & mask != 0 {
            digit += 2;
        }
        key.push(char::from(b'0' + digit));
    }

    QuadKey(key)
}

/// Decodes a quadkey string into its tile coordinate.
///
/// Fails with `InvalidQuadKey` on any digit outside `0..=3`.
pub fn decode(key: &str) -> Result<TileCoordinate> {
    Ok(QuadKey::parse(key)?.tile_coordinate())
}

/// Decodes a quadkey string and computes its tile geometry.
pub fn tile_of(key: &str) -> Result<Tile> {
    Ok(QuadKey::parse(key)?.tile())
}

/// Quadkey of the tile containing `point` at `zoom`.
///
/// This is what gets persisted alongside each location, at
/// [`STORAGE_ZOOM`](crate::zoom::STORAGE_ZOOM).
pub fn quad_key_for(point: &GeoPoint, zoom: ZoomLevel) -> Result<QuadKey> {
    Ok(encode(&tile_for(point, zoom)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zoom(value: i32) -> ZoomLevel {
        ZoomLevel::new(value).unwrap()
    }

    #[test]
    fn test_encode_reference_tiles() {
        let cases = [
            (0, 0, 0, ""),
            (0, 0, 1, "0"),
            (1, 0, 1, "1"),
            (0, 1, 1, "2"),
            (1, 1, 1, "3"),
            (3, 5, 3, "213"),
            (35210, 21493, 16, "1202102332221212"),
        ];

        for (x, y, z, expected) in cases {
            let tile = TileCoordinate::new(x, y, zoom(z)).unwrap();
            assert_eq!(encode(&tile).as_str(), expected, "tile {}", tile);
        }
    }

    #[test]
    fn test_decode_reference_keys() {
        let tile = decode("213").unwrap();
        assert_eq!((tile.x(), tile.y(), tile.zoom().value()), (3, 5, 3));

        let root = decode("").unwrap();
        assert_eq!((root.x(), root.y(), root.zoom()), (0, 0, ZoomLevel::MIN));
    }

    #[test]
    fn test_decode_rejects_bad_digits() {
        for key in ["4", "01a", "0 1", "-1", "٣"] {
            assert!(
                matches!(decode(key), Err(QuadclusterError::InvalidQuadKey(_))),
                "key {:?}",
                key
            );
        }

        let too_long = "0".repeat(MAX_ZOOM as usize + 1);
        assert!(matches!(
            decode(&too_long),
            Err(QuadclusterError::InvalidQuadKey(_))
        ));
    }

    #[test]
    fn test_roundtrip_exhaustive_low_zoom() {
        for z in 0..=5 {
            let level = zoom(z);
            for x in 0..level.grid_size() {
                for y in 0..level.grid_size() {
                    let tile = TileCoordinate::new(x, y, level).unwrap();
                    let key = encode(&tile);
                    assert_eq!(key.len(), z as usize);
                    assert_eq!(decode(key.as_str()).unwrap(), tile);
                }
            }
        }
    }

    #[test]
    fn test_tile_coordinate_bounds_check() {
        assert!(TileCoordinate::new(7, 7, zoom(3)).is_ok());
        assert!(matches!(
            TileCoordinate::new(8, 0, zoom(3)),
            Err(QuadclusterError::InvalidCoordinate(_))
        ));
        assert!(TileCoordinate::new(0, 1, ZoomLevel::MIN).is_err());
    }

    #[test]
    fn test_coarsen_and_parent() {
        let tile = TileCoordinate::new(35210, 21493, zoom(16)).unwrap();
        let ancestor = tile.coarsen(zoom(10)).unwrap();
        assert_eq!((ancestor.x(), ancestor.y()), (35210 >> 6, 21493 >> 6));
        assert!(ancestor.contains(&tile));
        assert!(!tile.contains(&ancestor));

        assert_eq!(tile.parent().unwrap(), tile.coarsen(zoom(15)).unwrap());
        assert!(tile.coarsen(zoom(17)).is_err());
        assert!(
            TileCoordinate::new(0, 0, ZoomLevel::MIN)
                .unwrap()
                .parent()
                .is_none()
        );
    }

    #[test]
    fn test_truncate() {
        let key = QuadKey::parse("1202102332221212").unwrap();
        assert_eq!(key.truncate(zoom(4)).unwrap().as_str(), "1202");
        assert_eq!(key.truncate(ZoomLevel::MIN).unwrap(), QuadKey::root());
        assert_eq!(key.truncate(key.zoom()).unwrap(), key);
        assert!(matches!(
            key.truncate(zoom(17)),
            Err(QuadclusterError::InvalidZoom(_))
        ));

        let prefix = key.truncate(zoom(7)).unwrap();
        assert!(prefix.contains(&key));
        assert!(!key.contains(&prefix));
    }

    #[test]
    fn test_tile_geometry() {
        let tile = tile_of("3").unwrap();
        assert_eq!(tile.bounds.sw.longitude, 0.0);
        assert_eq!(tile.bounds.ne.longitude, 180.0);
        assert!(tile.bounds.ne.latitude.abs() < 1e-9);
        assert!(tile.bounds.contains(&tile.center));
        assert!(tile.center.latitude < 0.0 && tile.center.longitude > 0.0);
    }

    #[test]
    fn test_quad_key_for_point() {
        let key = quad_key_for(&GeoPoint::new(47.6062, -122.3321), zoom(3)).unwrap();
        assert_eq!(key.tile_coordinate(), TileCoordinate::new(1, 2, zoom(3)).unwrap());
        assert_eq!(key.as_str(), "021");

        assert!(quad_key_for(&GeoPoint::new(0.0, 181.0), zoom(3)).is_err());
    }

    #[test]
    fn test_quad_key_serde() {
        let key = QuadKey::parse("0123").unwrap();
        assert_eq!(serde_json::to_string(&key).unwrap(), "\"0123\"");
        assert_eq!(serde_json::from_str::<QuadKey>("\"0123\"").unwrap(), key);
        assert!(serde_json::from_str::<QuadKey>("\"0129\"").is_err());
    }
}
