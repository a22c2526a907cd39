//! Configuration for the clustering service.
//!
//! Kept small and serializable so it can be loaded from JSON or, with the
//! `toml` feature, from TOML.

use crate::zoom::{STORAGE_ZOOM, ZoomLevel};
use serde::de::Error;
use serde::{Deserialize, Serialize};

/// Clustering service configuration
///
/// # Example
///
/// ```rust
/// use quadcluster::Config;
///
/// let config = Config::default();
/// assert_eq!(config.reindex_batch_size, 1000);
///
/// let json = r#"{ "max_cluster_zoom": 16 }"#;
/// let config = Config::from_json(json).unwrap();
/// assert_eq!(config.max_cluster_zoom.value(), 16);
/// assert_eq!(config.reindex_batch_size, 1000);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Finest zoom the service builds clusters at (at most `STORAGE_ZOOM`)
    #[serde(default = "Config::default_max_cluster_zoom")]
    pub max_cluster_zoom: ZoomLevel,

    /// Number of locations re-indexed per batch during maintenance
    #[serde(default = "Config::default_reindex_batch_size")]
    pub reindex_batch_size: usize,
}

impl Config {
    const fn default_max_cluster_zoom() -> ZoomLevel {
        ZoomLevel::STORAGE
    }

    const fn default_reindex_batch_size() -> usize {
        1000
    }

    pub fn with_max_cluster_zoom(mut self, zoom: ZoomLevel) -> Self {
        self.max_cluster_zoom = zoom;
        self
    }

    pub fn with_reindex_batch_size(mut self, batch_size: usize) -> Self {
        assert!(batch_size > 0, "Re-index batch size must be greater than zero");
        self.reindex_batch_size = batch_size;
        self
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.max_cluster_zoom.value() > STORAGE_ZOOM {
            return Err(format!(
                "Max cluster zoom {} is finer than the storage zoom {}",
                self.max_cluster_zoom.value(),
                STORAGE_ZOOM
            ));
        }

        if self.reindex_batch_size == 0 {
            return Err("Re-index batch size must be greater than zero".to_string());
        }

        Ok(())
    }

    /// Load configuration from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let config: Config = serde_json::from_str(json)?;
        if let Err(e) = config.validate() {
            return Err(Error::custom(e));
        }
        Ok(config)
    }

    /// Save configuration as JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load configuration from TOML string (requires toml feature)
    #[cfg(feature = "toml")]
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        let config: Config = toml::from_str(toml_str)?;
        if let Err(e) = config.validate() {
            return Err(toml::de::Error::custom(e));
        }
        Ok(config)
    }

    /// Save configuration as TOML string (requires toml feature)
    #[cfg(feature = "toml")]
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_cluster_zoom: Self::default_max_cluster_zoom(),
            reindex_batch_size: Self::default_reindex_batch_size(),
        }
    }
}
