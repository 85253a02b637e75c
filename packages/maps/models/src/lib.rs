#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Map definition types.
//!
//! Defines the TOML schema for one interactive field map: where its
//! boundary and sample collections come from, which properties can be
//! classified, how the viewport behaves and which fields the popup shows.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// A field map, deserialized from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapDefinition {
    /// Unique map identifier (e.g., `"soil_sampling"`).
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// What the map visualizes.
    pub kind: MapKind,
    /// Short description shown next to the map.
    #[serde(default)]
    pub description: String,
    /// Where the single-polygon field boundary comes from.
    pub boundary: DataSourceConfig,
    /// Where the sample points or trial plots come from.
    pub samples: DataSourceConfig,
    /// Properties the user can switch between.
    pub properties: Vec<PropertyLayer>,
    /// Property selected when the map first renders. Defaults to the first
    /// entry of `properties`.
    #[serde(default)]
    pub default_property: Option<String>,
    /// Viewport behaviour.
    #[serde(default)]
    pub viewport: ViewportConfig,
    /// Popup contents for sample features.
    #[serde(default)]
    pub popup: PopupTemplate,
}

impl MapDefinition {
    /// Returns the property layer keyed by `key`.
    #[must_use]
    pub fn property(&self, key: &str) -> Option<&PropertyLayer> {
        self.properties.iter().find(|p| p.key == key)
    }

    /// Returns the property that should be selected on first render.
    #[must_use]
    pub fn initial_property(&self) -> Option<&PropertyLayer> {
        self.default_property
            .as_deref()
            .and_then(|key| self.property(key))
            .or_else(|| self.properties.first())
    }
}

/// The kinds of field map the site shows.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MapKind {
    /// Grid or zone soil sampling points.
    FieldSampling,
    /// Nutrient levels interpolated to sampling zones.
    Nutrient,
    /// NDVI readings per trial plot over several flights.
    NdviTemporal,
    /// Yield results of an on-farm trial.
    OnFarmTrial,
    /// Seeding-rate trial design.
    TrialLayout,
    /// Lab report values per sample point.
    SampleReport,
}

impl MapKind {
    /// Returns a display label for the map kind.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::FieldSampling => "Field Sampling",
            Self::Nutrient => "Nutrient Map",
            Self::NdviTemporal => "NDVI Over Time",
            Self::OnFarmTrial => "On-Farm Trial",
            Self::TrialLayout => "Trial Layout",
            Self::SampleReport => "Sample Report",
        }
    }
}

/// Where a `GeoJSON` collection is read from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DataSourceConfig {
    /// Fixture compiled into the binary, path relative to the bundled
    /// `data/` directory.
    Bundled {
        /// Relative path (e.g., `"north40/boundary.geojson"`).
        path: String,
    },
    /// File on disk, relative to the configured data directory.
    File {
        /// Relative or absolute path.
        path: String,
    },
    /// Static file served over plain HTTP GET.
    Url {
        /// Full URL returning `GeoJSON`.
        url: String,
    },
}

impl std::fmt::Display for DataSourceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bundled { path } => write!(f, "bundled:{path}"),
            Self::File { path } => write!(f, "file:{path}"),
            Self::Url { url } => f.write_str(url),
        }
    }
}

/// A selectable property bound to a classifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyLayer {
    /// Feature property key (e.g., `"P_M3_ppm"`).
    pub key: String,
    /// Label shown in the property selector.
    pub label: String,
    /// Classifier id from the classifier registry.
    pub classifier: String,
}

/// Viewport behaviour for one map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    /// Initial zoom before the viewport is fitted to the boundary.
    pub zoom: f64,
    /// Minimum zoom.
    pub min_zoom: f64,
    /// Maximum zoom.
    pub max_zoom: f64,
    /// Degrees added around the boundary bounding box for pan bounds.
    pub bounds_buffer: f64,
    /// Whether the mouse wheel zooms. Off by default so embedded maps do
    /// not capture page scrolling.
    pub scroll_wheel_zoom: bool,
    /// Whether the map can be dragged.
    pub dragging: bool,
    /// Whether double-click zooms.
    pub double_click_zoom: bool,
    /// Base tile layer.
    pub basemap: Basemap,
    /// Whether a scale control is shown.
    pub scale_control: bool,
    /// Where the legend control is placed.
    pub legend_position: ControlPosition,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            zoom: 16.0,
            min_zoom: 13.0,
            max_zoom: 19.0,
            bounds_buffer: 0.002,
            scroll_wheel_zoom: false,
            dragging: true,
            double_click_zoom: true,
            basemap: Basemap::Satellite,
            scale_control: true,
            legend_position: ControlPosition::BottomRight,
        }
    }
}

/// Base tile layer choice.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Basemap {
    /// Esri World Imagery satellite tiles.
    #[default]
    Satellite,
    /// `OpenStreetMap` street tiles.
    Street,
}

impl Basemap {
    /// Returns the tile server configuration for this basemap.
    #[must_use]
    pub fn tile_layer(self) -> TileLayerConfig {
        match self {
            Self::Satellite => TileLayerConfig {
                url_template: "https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/{z}/{y}/{x}".to_string(),
                attribution: "Tiles &copy; Esri".to_string(),
                max_zoom: 19.0,
            },
            Self::Street => TileLayerConfig {
                url_template: "https://tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
                attribution: "&copy; OpenStreetMap contributors".to_string(),
                max_zoom: 19.0,
            },
        }
    }
}

/// A raster tile source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileLayerConfig {
    /// URL template with `{z}`, `{x}` and `{y}` placeholders.
    pub url_template: String,
    /// Attribution HTML.
    pub attribution: String,
    /// Maximum zoom served by the tile source.
    pub max_zoom: f64,
}

/// Corner of the map a control is anchored to.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ControlPosition {
    /// Top left corner.
    TopLeft,
    /// Top right corner.
    TopRight,
    /// Bottom left corner.
    BottomLeft,
    /// Bottom right corner.
    #[default]
    BottomRight,
}

/// Popup contents for a sample feature.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopupTemplate {
    /// Fixed popup title used when `title_field` is unset or missing.
    #[serde(default)]
    pub title: String,
    /// Property whose value becomes the popup title (e.g., a sample id).
    #[serde(default)]
    pub title_field: Option<String>,
    /// Rows shown in the popup, in order.
    #[serde(default)]
    pub fields: Vec<PopupField>,
}

/// One row of a popup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopupField {
    /// Feature property key.
    pub key: String,
    /// Row label.
    pub label: String,
    /// Unit appended to the value.
    #[serde(default)]
    pub unit: Option<String>,
    /// Fixed number of decimals for numeric values.
    #[serde(default)]
    pub decimals: Option<u8>,
    /// How the raw value is rendered.
    #[serde(default)]
    pub format: FieldFormat,
}

/// How a popup value is rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldFormat {
    /// Numeric value, optionally rounded.
    #[default]
    Number,
    /// Verbatim text.
    Text,
    /// ISO-8601 date or date-time, rendered as a calendar date.
    Date,
}
