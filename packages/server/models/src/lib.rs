#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the fieldmap server.
//!
//! These types are serialized to JSON for the REST API. They are separate
//! from the map and classifier definitions so the API contract can evolve
//! independently of the TOML schema.

use fieldmap_classify::{ClassifierSpec, LegendEntry};
use fieldmap_geography_models::LatLng;
use fieldmap_maps_models::{MapDefinition, MapKind};
use serde::{Deserialize, Serialize};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the server is healthy.
    pub healthy: bool,
    /// Server version.
    pub version: String,
}

/// A map as listed by `GET /api/maps`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiMapSummary {
    pub id: String,
    pub name: String,
    pub kind: MapKind,
    /// Display label of `kind`.
    pub kind_label: String,
    pub description: String,
    /// Selectable properties, in selector order.
    pub properties: Vec<ApiPropertyOption>,
    /// Property shown on first render.
    pub default_property: Option<String>,
}

impl ApiMapSummary {
    /// Builds a summary, resolving each property's unit through `lookup`.
    #[must_use]
    pub fn new(def: &MapDefinition, lookup: impl Fn(&str) -> Option<ClassifierSpec>) -> Self {
        Self {
            id: def.id.clone(),
            name: def.name.clone(),
            kind: def.kind,
            kind_label: def.kind.label().to_string(),
            description: def.description.clone(),
            properties: def
                .properties
                .iter()
                .map(|p| ApiPropertyOption {
                    key: p.key.clone(),
                    label: p.label.clone(),
                    classifier: p.classifier.clone(),
                    unit: lookup(&p.classifier)
                        .map(|spec| spec.unit().to_string())
                        .unwrap_or_default(),
                })
                .collect(),
            default_property: def.initial_property().map(|p| p.key.clone()),
        }
    }
}

/// One entry of a map's property selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiPropertyOption {
    pub key: String,
    pub label: String,
    pub classifier: String,
    pub unit: String,
}

/// Query parameters for the scene and legend endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneQueryParams {
    /// Property to classify by. Defaults to the map's initial property.
    pub property: Option<String>,
}

/// Legend for one classified property.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiLegend {
    pub classifier: String,
    pub property: String,
    pub title: String,
    pub unit: String,
    pub no_data_color: String,
    pub entries: Vec<ApiLegendEntry>,
    /// Pre-rendered legend control HTML.
    pub html: String,
}

/// One swatch row of a legend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiLegendEntry {
    pub color: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub min: f64,
    pub max: Option<f64>,
}

impl From<LegendEntry> for ApiLegendEntry {
    fn from(entry: LegendEntry) -> Self {
        Self {
            color: entry.color,
            label: entry.label,
            name: entry.name,
            min: entry.min,
            max: entry.max,
        }
    }
}

/// Popup HTML for a single sample feature.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiPopup {
    pub map_id: String,
    pub index: usize,
    pub html: String,
    /// Where the popup opens: the sample point, or a polygon's centroid.
    pub anchor: Option<LatLng>,
}

/// Query parameters for `GET /api/classify`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifyQueryParams {
    /// Classifier id.
    pub classifier: String,
    /// Raw value. Missing or non-numeric values classify as no data.
    pub value: Option<String>,
}

/// Result of classifying one value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiClassification {
    pub classifier: String,
    pub value: Option<f64>,
    /// Range index, `None` for no data.
    pub bucket: Option<usize>,
    pub color: String,
    /// Range label, `None` for no data.
    pub label: Option<String>,
}
