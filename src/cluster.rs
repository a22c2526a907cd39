//! Turning per-tile point counts into cluster markers.
//!
//! Counts keyed by storage-resolution quadkeys are grouped by their prefix at
//! the requested zoom, and each non-empty group becomes one [`Cluster`]
//! placed at the center of the group's tile. A source that already grouped
//! its counts at the requested zoom yields the same result.

use crate::error::{QuadclusterError, Result};
use crate::quadkey::QuadKey;
use crate::zoom::ZoomLevel;
use quadcluster_types::GeoPoint;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Number of points per tile, keyed by quadkey.
pub type TileCounts = FxHashMap<QuadKey, u64>;

/// Clusters keyed by the quadkey of the tile they summarize.
///
/// Serializes as `{ "<quadkey>": { "center": {...}, "count": n }, ... }`.
pub type ClusterMap = FxHashMap<QuadKey, Cluster>;

/// Aggregate marker for the points inside one tile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    pub center: GeoPoint,
    pub count: u64,
}

/// Sums counts by the first `zoom` digits of each key.
///
/// Fails with `InvalidQuadKey` if a key has fewer than `zoom` digits, since
/// it cannot be placed in a tile at that level.
pub fn group_by_prefix<'a, I>(counts: I, zoom: ZoomLevel) -> Result<TileCounts>
where
    I: IntoIterator<Item = (&'a QuadKey, u64)>,
{
    let mut grouped = TileCounts::default();

    for (key, count) in counts {
        let prefix = key.truncate(zoom).map_err(|_| {
            QuadclusterError::InvalidQuadKey(format!(
                "'{}' is too short to group at {}",
                key, zoom
            ))
        })?;
        let total = grouped.entry(prefix).or_insert(0);
        *total = total.saturating_add(count);
    }

    Ok(grouped)
}

/// Builds the clusters for `target_zoom` from per-tile counts.
///
/// Tiles whose total is zero are left out. Fails with `InvalidZoom` when
/// `target_zoom` is finer than the storage resolution.
///
/// # Examples
///
/// ```
/// use quadcluster::{cluster, QuadKey, TileCounts, ZoomLevel};
///
/// let mut counts = TileCounts::default();
/// counts.insert(QuadKey::parse("000").unwrap(), 2);
/// counts.insert(QuadKey::parse("001").unwrap(), 3);
/// counts.insert(QuadKey::parse("010").unwrap(), 1);
///
/// let clusters = cluster(&counts, ZoomLevel::new(2).unwrap()).unwrap();
/// assert_eq!(clusters["00"].count, 5);
/// assert_eq!(clusters["01"].count, 1);
/// ```
pub fn cluster(counts: &TileCounts, target_zoom: ZoomLevel) -> Result<ClusterMap> {
    target_zoom.ensure_storable()?;

    let grouped = group_by_prefix(counts.iter().map(|(key, count)| (key, *count)), target_zoom)?;

    let clusters: ClusterMap = grouped
        .into_iter()
        .filter(|(_, count)| *count > 0)
        .map(|(prefix, count)| {
            let center = prefix.tile().center;
            (prefix, Cluster { center, count })
        })
        .collect();

    log::debug!(
        "Built {} clusters at {} from {} tile counts",
        clusters.len(),
        target_zoom,
        counts.len()
    );

    Ok(clusters)
}
