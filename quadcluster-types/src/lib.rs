//! # quadcluster-types
//!
//! Geographic value types for the quadcluster crates.
//!
//! - **Point types**: `GeoPoint`
//! - **Bounding boxes**: `GeoBounds`
//!
//! Both types are plain `Copy` values, serializable with Serde, and convert
//! to and from the `geo` crate's primitives.
//!
//! ## Examples
//!
//! ```rust
//! use quadcluster_types::bbox::GeoBounds;
//! use quadcluster_types::point::GeoPoint;
//!
//! let berlin = GeoPoint::new(52.52, 13.405);
//! let bounds = GeoBounds::new(GeoPoint::new(52.3, 13.0), GeoPoint::new(52.7, 13.8));
//! assert!(bounds.contains_strict(&berlin));
//! ```

pub mod bbox;
pub mod point;

pub use bbox::GeoBounds;
pub use point::GeoPoint;
