#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Map registry and `GeoJSON` data loading for field maps.
//!
//! Map definitions are TOML files embedded at compile time, following the
//! same registry pattern as the classifier definitions. Each map reads a
//! boundary and a sample collection from bundled fixtures, local files or
//! plain static-file HTTP endpoints. Loads are tagged with a
//! [`generation::LoadTicket`] so results that arrive after the map was
//! unmounted or reloaded can be discarded.

pub mod bundled;
pub mod generation;
pub mod loader;
pub mod registry;

use thiserror::Error;

/// Errors that can occur while resolving or loading map data.
#[derive(Debug, Error)]
pub enum MapsError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Static-file endpoint answered with a non-success status.
    #[error("Request to {url} failed with status {status}")]
    Status {
        /// Requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
    },

    /// Reading a local file failed.
    #[error("Failed to read {path}: {source}")]
    Io {
        /// File path.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A bundled fixture does not exist.
    #[error("Bundled data file not found: {path}")]
    NotFound {
        /// Requested path.
        path: String,
    },

    /// The payload is not valid `GeoJSON`.
    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),

    /// The loaded data violates a geometric expectation.
    #[error("Geography error: {0}")]
    Geography(#[from] fieldmap_geography::GeographyError),

    /// No map is registered under the given id.
    #[error("Unknown map: {id}")]
    UnknownMap {
        /// Requested map id.
        id: String,
    },
}
