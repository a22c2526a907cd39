//! Sources of per-tile point counts.
//!
//! The clustering service does not care where counts come from: a SQL
//! `GROUP BY SUBSTRING(quad_key, 1, zoom)` and an in-memory scan are
//! interchangeable behind [`TileCountSource`]. [`MemoryLocationStore`] is the
//! in-memory implementation, backed by an R-tree for the viewport filter.

use crate::cluster::{TileCounts, group_by_prefix};
use crate::error::{QuadclusterError, Result};
use crate::quadkey::{QuadKey, quad_key_for};
use crate::validation::validate_bounds;
use crate::zoom::ZoomLevel;
use geo::Point;
use parking_lot::RwLock;
use quadcluster_types::{GeoBounds, GeoPoint};
use rstar::{AABB, RTree, RTreeObject};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Supplies point counts grouped by quadkey prefix.
pub trait TileCountSource: Send + Sync {
    /// Count the points lying strictly inside `bounds`, grouped by the first
    /// `zoom` digits of their stored quadkey.
    ///
    /// Failures of the underlying storage are reported as
    /// [`QuadclusterError::Storage`].
    fn counts_within(&self, bounds: &GeoBounds, zoom: ZoomLevel) -> Result<TileCounts>;
}

impl<S: TileCountSource + ?Sized> TileCountSource for Arc<S> {
    fn counts_within(&self, bounds: &GeoBounds, zoom: ZoomLevel) -> Result<TileCounts> {
        (**self).counts_within(bounds, zoom)
    }
}

impl<S: TileCountSource + ?Sized> TileCountSource for &S {
    fn counts_within(&self, bounds: &GeoBounds, zoom: ZoomLevel) -> Result<TileCounts> {
        (**self).counts_within(bounds, zoom)
    }
}

/// Sources whose stored quadkeys can be recomputed in place.
pub trait QuadKeyMaintenance: TileCountSource {
    /// Recompute every stored quadkey from its position, `batch_size`
    /// records at a time, returning the number of records processed.
    fn reindex(&self, batch_size: usize) -> Result<usize>;
}

impl<S: QuadKeyMaintenance + ?Sized> QuadKeyMaintenance for Arc<S> {
    fn reindex(&self, batch_size: usize) -> Result<usize> {
        (**self).reindex(batch_size)
    }
}

/// A stored point with its precomputed storage-resolution quadkey.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: u64,
    pub name: String,
    pub position: GeoPoint,
    /// Quadkey at [`STORAGE_ZOOM`](crate::zoom::STORAGE_ZOOM)
    pub quad_key: QuadKey,
}

/// R-tree entry pointing back at a location.
#[derive(Debug, Clone, PartialEq)]
struct IndexedLocation {
    id: u64,
    position: GeoPoint,
}

impl RTreeObject for IndexedLocation {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        let point: Point<f64> = self.position.into();
        AABB::from_point([point.x(), point.y()])
    }
}

#[derive(Default)]
struct StoreInner {
    tree: RTree<IndexedLocation>,
    locations: BTreeMap<u64, Location>,
    next_id: u64,
}

impl StoreInner {
    fn push(&mut self, name: String, position: GeoPoint, quad_key: QuadKey) -> u64 {
        self.next_id += 1;
        let id = self.next_id;

        self.tree.insert(IndexedLocation { id, position });
        self.locations.insert(
            id,
            Location {
                id,
                name,
                position,
                quad_key,
            },
        );
        id
    }
}

/// Thread-safe in-memory location table.
///
/// # Examples
///
/// ```
/// use quadcluster::{GeoBounds, GeoPoint, MemoryLocationStore, TileCountSource, ZoomLevel};
///
/// let store = MemoryLocationStore::new();
/// store.insert("Louvre", GeoPoint::new(48.8606, 2.3376))?;
/// store.insert("Notre-Dame", GeoPoint::new(48.8530, 2.3499))?;
///
/// let paris = GeoBounds::new(GeoPoint::new(48.8, 2.2), GeoPoint::new(48.9, 2.5));
/// let counts = store.counts_within(&paris, ZoomLevel::new(10)?)?;
/// assert_eq!(counts.values().sum::<u64>(), 2);
/// # Ok::<(), quadcluster::QuadclusterError>(())
/// ```
#[derive(Default)]
pub struct MemoryLocationStore {
    inner: RwLock<StoreInner>,
}

impl MemoryLocationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a location, computing its quadkey at the storage resolution.
    ///
    /// Returns the id assigned to the new location.
    pub fn insert(&self, name: impl Into<String>, position: GeoPoint) -> Result<u64> {
        let quad_key = quad_key_for(&position, ZoomLevel::STORAGE)?;
        let name = name.into();

        log::debug!("Storing location '{}' at {} as {}", name, position, quad_key);

        Ok(self.inner.write().push(name, position, quad_key))
    }

    /// Store several locations at once. Either all are stored or, if any
    /// position is invalid, none are.
    pub fn insert_batch<I, S>(&self, entries: I) -> Result<Vec<u64>>
    where
        I: IntoIterator<Item = (S, GeoPoint)>,
        S: Into<String>,
    {
        let prepared = entries
            .into_iter()
            .enumerate()
            .map(|(idx, (name, position))| {
                let quad_key = quad_key_for(&position, ZoomLevel::STORAGE).map_err(|e| {
                    QuadclusterError::InvalidCoordinate(format!("Entry at index {}: {}", idx, e))
                })?;
                Ok((name.into(), position, quad_key))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut inner = self.inner.write();
        let ids = prepared
            .into_iter()
            .map(|(name, position, quad_key)| inner.push(name, position, quad_key))
            .collect::<Vec<_>>();

        log::debug!("Stored a batch of {} locations", ids.len());
        Ok(ids)
    }

    /// Store a location with a quadkey computed elsewhere, as an import from
    /// another system would.
    ///
    /// The key is trusted as long as it has exactly `STORAGE_ZOOM` digits;
    /// [`reindex`](Self::reindex) recomputes it from the position.
    pub fn import(
        &self,
        name: impl Into<String>,
        position: GeoPoint,
        quad_key: QuadKey,
    ) -> Result<u64> {
        if quad_key.zoom() != ZoomLevel::STORAGE {
            return Err(QuadclusterError::InvalidQuadKey(format!(
                "Stored quadkeys need {} digits, '{}' has {}",
                ZoomLevel::STORAGE.value(),
                quad_key,
                quad_key.len()
            )));
        }
        crate::validation::validate_mercator_point(&position)?;

        Ok(self.inner.write().push(name.into(), position, quad_key))
    }

    pub fn get(&self, id: u64) -> Option<Location> {
        self.inner.read().locations.get(&id).cloned()
    }

    /// All locations, ordered by id.
    pub fn locations(&self) -> Vec<Location> {
        self.inner.read().locations.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.inner.read().locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().locations.is_empty()
    }

    /// Recompute every location's quadkey from its position, `batch_size`
    /// locations at a time.
    ///
    /// Each batch is applied under one write lock, so readers may observe a
    /// partially re-indexed table between batches but never a half-written
    /// batch. Returns the number of locations processed.
    pub fn reindex(&self, batch_size: usize) -> Result<usize> {
        if batch_size == 0 {
            return Err(QuadclusterError::Config(
                "Re-index batch size must be greater than zero".to_string(),
            ));
        }

        let ids: Vec<u64> = self.inner.read().locations.keys().copied().collect();
        let mut processed = 0;
        let mut changed = 0;

        for (page, batch) in ids.chunks(batch_size).enumerate() {
            let mut inner = self.inner.write();

            let recomputed = batch
                .iter()
                .filter_map(|id| inner.locations.get(id))
                .map(|location| {
                    quad_key_for(&location.position, ZoomLevel::STORAGE)
                        .map(|quad_key| (location.id, quad_key))
                })
                .collect::<Result<Vec<_>>>()?;

            for (id, quad_key) in recomputed {
                if let Some(location) = inner.locations.get_mut(&id) {
                    if location.quad_key != quad_key {
                        changed += 1;
                    }
                    location.quad_key = quad_key;
                    processed += 1;
                }
            }

            log::debug!("Re-indexed page {} ({} locations)", page, batch.len());
        }

        log::info!(
            "Updated the quad keys for {} locations ({} changed)",
            processed,
            changed
        );
        Ok(processed)
    }
}

impl TileCountSource for MemoryLocationStore {
    fn counts_within(&self, bounds: &GeoBounds, zoom: ZoomLevel) -> Result<TileCounts> {
        validate_bounds(bounds)?;
        zoom.ensure_storable()?;

        let inner = self.inner.read();
        let rect = bounds.to_rect();
        let envelope: AABB<[f64; 2]> =
            AABB::from_corners(rect.min().x_y().into(), rect.max().x_y().into());

        let matching = inner
            .tree
            .locate_in_envelope(&envelope)
            .filter(|entry| bounds.contains_strict(&entry.position))
            .filter_map(|entry| inner.locations.get(&entry.id))
            .map(|location| (&location.quad_key, 1u64));

        group_by_prefix(matching, zoom)
    }
}

impl QuadKeyMaintenance for MemoryLocationStore {
    fn reindex(&self, batch_size: usize) -> Result<usize> {
        MemoryLocationStore::reindex(self, batch_size)
    }
}
