//! Per-feature styling for boundary and sample overlays.

use fieldmap_classify::ClassifierSpec;
use fieldmap_geography_models::{GeometryKind, numeric_property};
use geojson::Feature;
use serde::{Deserialize, Serialize};

const BOUNDARY_COLOR: &str = "#ffffff";
const POINT_STROKE: &str = "#ffffff";
const POLYGON_STROKE: &str = "#333333";
const POINT_RADIUS: f64 = 7.0;

/// Path options for one rendered feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureStyle {
    pub color: String,
    pub weight: f64,
    pub opacity: f64,
    pub fill_color: Option<String>,
    pub fill_opacity: f64,
    /// Set for point features, which render as circle markers.
    pub radius: Option<f64>,
    pub dash_array: Option<String>,
}

/// Unfilled dashed outline for the field boundary.
#[must_use]
pub fn boundary_style() -> FeatureStyle {
    FeatureStyle {
        color: BOUNDARY_COLOR.to_string(),
        weight: 3.0,
        opacity: 1.0,
        fill_color: None,
        fill_opacity: 0.0,
        radius: None,
        dash_array: Some("6 4".to_string()),
    }
}

/// Style for a sample feature filled with `fill`.
#[must_use]
pub fn classified_style(fill: &str, kind: GeometryKind) -> FeatureStyle {
    match kind {
        GeometryKind::Point => FeatureStyle {
            color: POINT_STROKE.to_string(),
            weight: 1.5,
            opacity: 1.0,
            fill_color: Some(fill.to_string()),
            fill_opacity: 0.9,
            radius: Some(POINT_RADIUS),
            dash_array: None,
        },
        GeometryKind::Polygon | GeometryKind::Other => FeatureStyle {
            color: POLYGON_STROKE.to_string(),
            weight: 1.0,
            opacity: 1.0,
            fill_color: Some(fill.to_string()),
            fill_opacity: 0.7,
            radius: None,
            dash_array: None,
        },
    }
}

/// Classifies `feature` by `property` and returns its style. Features
/// without a numeric value get the classifier's no-data color.
#[must_use]
pub fn sample_style(spec: &ClassifierSpec, property: &str, feature: &Feature) -> FeatureStyle {
    let value = numeric_property(feature, property);
    classified_style(spec.classify(value).color(), GeometryKind::of(feature))
}
