//! Cluster listing for a map viewport.
//!
//! [`ClusterService`] validates a viewport request, asks its
//! [`TileCountSource`] for per-tile counts and turns them into clusters. It
//! holds no mutable state, so one instance can serve concurrent requests.

use crate::cluster::{ClusterMap, cluster};
use crate::config::Config;
use crate::error::{QuadclusterError, Result};
use crate::source::{QuadKeyMaintenance, TileCountSource};
use crate::validation::validate_bounds;
use crate::zoom::ZoomLevel;
use quadcluster_types::{GeoBounds, GeoPoint};

/// Serves cluster listings for map viewports from a [`TileCountSource`].
///
/// Requests are validated against the service [`Config`] before the source
/// is queried.
pub struct ClusterService<S> {
    source: S,
    config: Config,
}

impl<S: TileCountSource> ClusterService<S> {
    /// Create a service with the default configuration.
    pub fn new(source: S) -> Self {
        Self {
            source,
            config: Config::default(),
        }
    }

    /// Create a service with a custom configuration.
    pub fn with_config(source: S, config: Config) -> Result<Self> {
        config.validate().map_err(QuadclusterError::Config)?;
        Ok(Self { source, config })
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Clusters of the points strictly inside the `sw`/`ne` viewport at
    /// `zoom`.
    ///
    /// # Errors
    ///
    /// * `InvalidZoom` if `zoom` is negative, finer than the storage
    ///   resolution, or finer than `max_cluster_zoom`
    /// * `InvalidCoordinate` for out-of-range or misordered corners
    /// * whatever the source reports, unchanged
    ///
    /// # Examples
    ///
    /// ```
    /// use quadcluster::{ClusterService, GeoPoint, MemoryLocationStore};
    ///
    /// let store = MemoryLocationStore::new();
    /// store.insert("a", GeoPoint::new(10.0, 10.0))?;
    /// store.insert("b", GeoPoint::new(10.1, 10.1))?;
    ///
    /// let service = ClusterService::new(store);
    /// let clusters = service.clusters_within(
    ///     GeoPoint::new(0.0, 0.0),
    ///     GeoPoint::new(20.0, 20.0),
    ///     2,
    /// )?;
    /// assert_eq!(clusters.len(), 1);
    /// assert_eq!(clusters.values().next().unwrap().count, 2);
    /// # Ok::<(), quadcluster::QuadclusterError>(())
    /// ```
    pub fn clusters_within(&self, sw: GeoPoint, ne: GeoPoint, zoom: i32) -> Result<ClusterMap> {
        log::info!("Getting clusters in bounds {} - {} at zoom {}", sw, ne, zoom);

        let zoom = self.resolve_zoom(zoom)?;
        let bounds = GeoBounds::new(sw, ne);
        validate_bounds(&bounds)?;

        let counts = self.source.counts_within(&bounds, zoom).inspect_err(|e| {
            log::warn!("Tile count query failed for {} - {}: {}", sw, ne, e);
        })?;

        log::debug!("Got back cluster counts {:?}", counts);

        cluster(&counts, zoom)
    }

    /// Same as [`clusters_within`](Self::clusters_within), serialized as the
    /// JSON listing `{ "<quadkey>": { "center": {...}, "count": n } }`.
    pub fn clusters_json(&self, sw: GeoPoint, ne: GeoPoint, zoom: i32) -> Result<String> {
        let clusters = self.clusters_within(sw, ne, zoom)?;
        Ok(serde_json::to_string(&clusters)?)
    }

    /// Recompute the source's stored quadkeys in batches of
    /// `reindex_batch_size`.
    pub fn reindex(&self) -> Result<usize>
    where
        S: QuadKeyMaintenance,
    {
        log::info!(
            "Re-indexing stored quad keys in batches of {}",
            self.config.reindex_batch_size
        );
        self.source.reindex(self.config.reindex_batch_size)
    }

    fn resolve_zoom(&self, zoom: i32) -> Result<ZoomLevel> {
        let zoom = ZoomLevel::for_clustering(zoom)?;
        if zoom > self.config.max_cluster_zoom {
            return Err(QuadclusterError::InvalidZoom(format!(
                "{} is finer than the configured maximum {}",
                zoom, self.config.max_cluster_zoom
            )));
        }
        Ok(zoom)
    }
}
