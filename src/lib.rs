//! Quadkey tile indexing and per-tile clustering for zoomable maps.
//!
//! Every stored point carries its quadkey at [`STORAGE_ZOOM`]. Asking for
//! the clusters of a viewport at a coarser zoom is then a matter of grouping
//! those keys by prefix and placing one marker per non-empty tile.
//!
//! ```rust
//! use quadcluster::{ClusterService, GeoPoint, MemoryLocationStore};
//!
//! let store = MemoryLocationStore::new();
//! store.insert("Brandenburg Gate", GeoPoint::new(52.5163, 13.3777))?;
//! store.insert("Alexanderplatz", GeoPoint::new(52.5219, 13.4132))?;
//! store.insert("Sydney Opera House", GeoPoint::new(-33.8568, 151.2153))?;
//!
//! let service = ClusterService::new(store);
//! let clusters = service.clusters_within(
//!     GeoPoint::new(-60.0, -170.0),
//!     GeoPoint::new(60.0, 170.0),
//!     1,
//! )?;
//! assert_eq!(clusters["1"].count, 2);
//! assert_eq!(clusters["3"].count, 1);
//! # Ok::<(), quadcluster::QuadclusterError>(())
//! ```

pub mod cluster;
pub mod config;
pub mod error;
pub mod geodesy;
pub mod quadkey;
pub mod service;
pub mod source;
pub mod validation;
pub mod zoom;

pub use cluster::{Cluster, ClusterMap, TileCounts, cluster, group_by_prefix};
pub use config::Config;
pub use error::{QuadclusterError, Result};
pub use geodesy::{PixelCoordinate, TILE_SIZE};
pub use quadkey::{QuadKey, Tile, TileCoordinate, decode, encode, quad_key_for, tile_of};
pub use service::ClusterService;
pub use source::{Location, MemoryLocationStore, QuadKeyMaintenance, TileCountSource};
pub use zoom::{MAX_ZOOM, STORAGE_ZOOM, ZoomLevel};

pub use quadcluster_types::{GeoBounds, GeoPoint};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {

    pub use crate::{ClusterService, Config, QuadclusterError, Result};

    pub use crate::{GeoBounds, GeoPoint};

    pub use crate::{Cluster, ClusterMap, QuadKey, Tile, TileCoordinate, TileCounts, ZoomLevel};

    pub use crate::{MemoryLocationStore, QuadKeyMaintenance, TileCountSource};
}
