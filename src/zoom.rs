//! Validated zoom levels.
//!
//! A zoom level selects one of the `2^zoom x 2^zoom` tile grids covering the
//! projected world. Every stored location carries its quadkey at
//! [`STORAGE_ZOOM`], so clustering can only ever ask for that level or a
//! coarser one.

use crate::error::{QuadclusterError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Finest zoom level a quadkey can address.
pub const MAX_ZOOM: u8 = 23;

/// Zoom level at which each location's quadkey is computed and stored.
pub const STORAGE_ZOOM: u8 = 19;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct ZoomLevel(u8);

impl ZoomLevel {
    pub const MIN: ZoomLevel = ZoomLevel(0);
    pub const MAX: ZoomLevel = ZoomLevel(MAX_ZOOM);
    pub const STORAGE: ZoomLevel = ZoomLevel(STORAGE_ZOOM);

    /// Validates `value` as a zoom level in `[0, MAX_ZOOM]`.
    ///
    /// # Examples
    ///
    /// ```
    /// use quadcluster::ZoomLevel;
    ///
    /// assert_eq!(ZoomLevel::new(12).unwrap().value(), 12);
    /// assert!(ZoomLevel::new(-1).is_err());
    /// assert!(ZoomLevel::new(24).is_err());
    /// ```
    pub fn new(value: i32) -> Result<Self> {
        if value < 0 || value > MAX_ZOOM as i32 {
            return Err(QuadclusterError::InvalidZoom(format!(
                "{} is outside [0, {}]",
                value, MAX_ZOOM
            )));
        }
        Ok(Self(value as u8))
    }

    /// Validates `value` as a zoom level that clusters can be built at,
    /// i.e. no finer than [`STORAGE_ZOOM`].
    pub fn for_clustering(value: i32) -> Result<Self> {
        let zoom = Self::new(value)?;
        zoom.ensure_storable()?;
        Ok(zoom)
    }

    /// Fails with `InvalidZoom` when this level is finer than the storage
    /// resolution.
    pub fn ensure_storable(self) -> Result<()> {
        if self > Self::STORAGE {
            return Err(QuadclusterError::InvalidZoom(format!(
                "{} is finer than the storage resolution {}",
                self,
                Self::STORAGE
            )));
        }
        Ok(())
    }

    /// Caps `value` at `MAX_ZOOM`; used where the value is already known valid.
    pub(crate) const fn clamped(value: u8) -> Self {
        if value > MAX_ZOOM {
            Self(MAX_ZOOM)
        } else {
            Self(value)
        }
    }

    pub const fn value(self) -> u8 {
        self.0
    }

    /// Number of tiles along each axis of this level's grid.
    pub const fn grid_size(self) -> u32 {
        1u32 << self.0
    }

    /// Largest valid tile index along either axis.
    pub const fn max_tile_index(self) -> u32 {
        self.grid_size() - 1
    }

    pub fn is_coarser_than(self, other: ZoomLevel) -> bool {
        self < other
    }

    /// All levels from 0 up to and including this one.
    pub fn levels_up_to(self) -> impl Iterator<Item = ZoomLevel> {
        (0..=self.0).map(ZoomLevel)
    }
}

impl Default for ZoomLevel {
    fn default() -> Self {
        Self::STORAGE
    }
}

impl TryFrom<u8> for ZoomLevel {
    type Error = QuadclusterError;

    fn try_from(value: u8) -> Result<Self> {
        Self::new(value as i32)
    }
}

impl TryFrom<i32> for ZoomLevel {
    type Error = QuadclusterError;

    fn try_from(value: i32) -> Result<Self> {
        Self::new(value)
    }
}

impl From<ZoomLevel> for u8 {
    fn from(zoom: ZoomLevel) -> Self {
        zoom.0
    }
}

impl fmt::Display for ZoomLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Z{}", self.0)
    }
}
