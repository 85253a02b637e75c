//! Loads boundary and sample collections for a map.
//!
//! Remote sources are plain static-file GET requests with no query
//! parameters or authentication. Failures are reported once; there is no
//! retry, the caller surfaces a "failed to load" state instead.

use std::path::PathBuf;

use fieldmap_geography_models::FieldDataset;
use fieldmap_maps_models::{DataSourceConfig, MapDefinition};
use geojson::{Feature, FeatureCollection, GeoJson};

use crate::{MapsError, bundled};

/// Default directory for [`DataSourceConfig::File`] sources.
pub const DEFAULT_DATA_DIR: &str = "data";

/// Reads `GeoJSON` collections from bundled fixtures, disk or HTTP.
#[derive(Debug, Clone)]
pub struct DataLoader {
    client: reqwest::Client,
    data_dir: PathBuf,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new(reqwest::Client::new(), DEFAULT_DATA_DIR)
    }
}

impl DataLoader {
    /// Creates a loader resolving relative file paths against `data_dir`.
    #[must_use]
    pub fn new(client: reqwest::Client, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            client,
            data_dir: data_dir.into(),
        }
    }

    /// Creates a loader whose data directory comes from
    /// `FIELDMAP_DATA_DIR`, falling back to [`DEFAULT_DATA_DIR`].
    #[must_use]
    pub fn from_env() -> Self {
        let data_dir =
            std::env::var("FIELDMAP_DATA_DIR").unwrap_or_else(|_| DEFAULT_DATA_DIR.to_string());
        Self::new(reqwest::Client::new(), data_dir)
    }

    /// Loads a single collection.
    ///
    /// # Errors
    ///
    /// Returns [`MapsError`] if the source cannot be read or does not
    /// contain `GeoJSON`.
    pub async fn load_collection(
        &self,
        source: &DataSourceConfig,
    ) -> Result<FeatureCollection, MapsError> {
        log::debug!("Loading GeoJSON from {source}");

        let collection = match source {
            DataSourceConfig::Bundled { path } => parse_collection(bundled::read(path)?)?,
            DataSourceConfig::File { path } => {
                let full_path = self.data_dir.join(path);
                let body = tokio::fs::read_to_string(&full_path)
                    .await
                    .map_err(|source| MapsError::Io {
                        path: full_path.display().to_string(),
                        source,
                    })?;
                parse_collection(&body)?
            }
            DataSourceConfig::Url { url } => parse_collection(&self.fetch(url).await?)?,
        };

        log::debug!(
            "Loaded {} features from {source}",
            collection.features.len()
        );
        Ok(collection)
    }

    /// Loads the boundary and sample collections of `map` concurrently and
    /// checks that the boundary is a single polygon.
    ///
    /// # Errors
    ///
    /// Returns [`MapsError`] if either collection fails to load or the
    /// boundary is malformed.
    pub async fn load_dataset(&self, map: &MapDefinition) -> Result<FieldDataset, MapsError> {
        let (boundary, samples) = futures::try_join!(
            self.load_collection(&map.boundary),
            self.load_collection(&map.samples),
        )?;

        fieldmap_geography::boundary_feature(&boundary)?;

        log::info!(
            "Loaded map '{}': {} sample features",
            map.id,
            samples.features.len()
        );

        Ok(FieldDataset { boundary, samples })
    }

    async fn fetch(&self, url: &str) -> Result<String, MapsError> {
        let resp = self.client.get(url).send().await?;
        if !resp.status().is_success() {
            return Err(MapsError::Status {
                url: url.to_string(),
                status: resp.status().as_u16(),
            });
        }
        Ok(resp.text().await?)
    }
}

/// Parses a `GeoJSON` document into a feature collection.
///
/// A lone `Feature` or `Geometry` is wrapped into a one-feature collection,
/// since boundary files are frequently stored that way.
///
/// # Errors
///
/// Returns [`MapsError::GeoJson`] if `body` is not valid `GeoJSON`.
pub fn parse_collection(body: &str) -> Result<FeatureCollection, MapsError> {
    let features = match body.parse::<GeoJson>()? {
        GeoJson::FeatureCollection(collection) => return Ok(collection),
        GeoJson::Feature(feature) => vec![feature],
        GeoJson::Geometry(geometry) => vec![Feature::from(geometry)],
    };

    Ok(FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    })
}
