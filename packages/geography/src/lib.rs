#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Bounds, pan-bounds and boundary helpers over `GeoJSON` field data.
//!
//! `GeoJSON` geometries are converted to `geo` types for the bounding-box
//! and centroid math, the same conversion path the spatial index uses for
//! boundary polygons.

use fieldmap_geography_models::{BoundingBox, GeometryKind, LatLng, LatLngBounds};
use geo::{BoundingRect, Centroid};
use geojson::{Feature, FeatureCollection};
use thiserror::Error;

/// Errors that can occur while interpreting field geometry.
#[derive(Debug, Error)]
pub enum GeographyError {
    /// A boundary collection did not hold exactly one feature.
    #[error("Boundary must contain exactly one feature, found {count}")]
    BoundaryFeatureCount {
        /// Number of features found.
        count: usize,
    },

    /// The boundary feature is not a polygon.
    #[error("Boundary feature must be a Polygon or MultiPolygon")]
    BoundaryGeometry,

    /// No feature in the collection carried a usable geometry.
    #[error("Collection has no geometry to compute bounds from")]
    EmptyGeometry,
}

/// Converts the geometry of `feature` to a [`geo::Geometry`].
fn to_geo(feature: &Feature) -> Option<geo::Geometry<f64>> {
    let geometry = feature.geometry.clone()?;
    geometry.try_into().ok()
}

/// Computes the bounding box of a single feature.
#[must_use]
pub fn feature_bounds(feature: &Feature) -> Option<BoundingBox> {
    let rect = to_geo(feature)?.bounding_rect()?;
    Some(BoundingBox::new(
        rect.min().x,
        rect.min().y,
        rect.max().x,
        rect.max().y,
    ))
}

/// Computes the bounding box covering every geometry in `collection`.
///
/// Features without a geometry are skipped. Returns `None` when nothing
/// in the collection has a geometry.
#[must_use]
pub fn collection_bounds(collection: &FeatureCollection) -> Option<BoundingBox> {
    collection
        .features
        .iter()
        .filter_map(feature_bounds)
        .reduce(BoundingBox::union)
}

/// Returns the pan-restriction bounds for a viewport: the bounding box
/// grown by `buffer` degrees on every side.
#[must_use]
pub fn pan_bounds(bbox: &BoundingBox, buffer: f64) -> LatLngBounds {
    bbox.to_lat_lng_bounds().pad(buffer)
}

/// Computes pan bounds directly from a collection.
///
/// # Errors
///
/// Returns [`GeographyError::EmptyGeometry`] if the collection has no
/// geometry.
pub fn collection_pan_bounds(
    collection: &FeatureCollection,
    buffer: f64,
) -> Result<(BoundingBox, LatLngBounds), GeographyError> {
    let bbox = collection_bounds(collection).ok_or(GeographyError::EmptyGeometry)?;
    Ok((bbox, pan_bounds(&bbox, buffer)))
}

/// Returns the single polygon feature of a boundary collection.
///
/// # Errors
///
/// Returns [`GeographyError`] if the collection does not contain exactly
/// one feature or that feature is not a polygon.
pub fn boundary_feature(collection: &FeatureCollection) -> Result<&Feature, GeographyError> {
    let [feature] = collection.features.as_slice() else {
        return Err(GeographyError::BoundaryFeatureCount {
            count: collection.features.len(),
        });
    };

    if GeometryKind::of(feature) != GeometryKind::Polygon {
        return Err(GeographyError::BoundaryGeometry);
    }

    Ok(feature)
}

/// Returns where a popup for `feature` should open: the point itself, or
/// the centroid of a polygon.
#[must_use]
pub fn feature_anchor(feature: &Feature) -> Option<LatLng> {
    let point = to_geo(feature)?.centroid()?;
    Some(LatLng::new(point.y(), point.x()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collection(value: serde_json::Value) -> FeatureCollection {
        serde_json::from_value(value).unwrap()
    }

    fn square_boundary() -> FeatureCollection {
        collection(serde_json::json!({
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "properties": { "Field": "North 40" },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[
                        [-90.0, 40.0], [-89.99, 40.0], [-89.99, 40.01],
                        [-90.0, 40.01], [-90.0, 40.0]
                    ]]
                }
            }]
        }))
    }

    #[test]
    fn pan_bounds_adds_buffer_to_boundary_bbox() {
        let (bbox, bounds) = collection_pan_bounds(&square_boundary(), 0.002).unwrap();
        assert_eq!(bbox, BoundingBox::new(-90.0, 40.0, -89.99, 40.01));

        let expected = LatLngBounds::from([[39.998, -90.002], [40.012, -89.988]]);
        assert!((bounds.south_west.lat - expected.south_west.lat).abs() < 1e-9);
        assert!((bounds.south_west.lng - expected.south_west.lng).abs() < 1e-9);
        assert!((bounds.north_east.lat - expected.north_east.lat).abs() < 1e-9);
        assert!((bounds.north_east.lng - expected.north_east.lng).abs() < 1e-9);
    }

    #[test]
    fn collection_bounds_spans_all_points() {
        let points = collection(serde_json::json!({
            "type": "FeatureCollection",
            "features": [
                { "type": "Feature", "properties": {},
                  "geometry": { "type": "Point", "coordinates": [-89.998, 40.002] } },
                { "type": "Feature", "properties": {},
                  "geometry": { "type": "Point", "coordinates": [-89.991, 40.009] } },
                { "type": "Feature", "properties": {}, "geometry": null }
            ]
        }));
        let bbox = collection_bounds(&points).unwrap();
        assert_eq!(bbox, BoundingBox::new(-89.998, 40.002, -89.991, 40.009));
    }

    #[test]
    fn empty_collection_has_no_bounds() {
        let empty = collection(serde_json::json!({
            "type": "FeatureCollection",
            "features": []
        }));
        assert!(collection_bounds(&empty).is_none());
        assert!(matches!(
            collection_pan_bounds(&empty, 0.002),
            Err(GeographyError::EmptyGeometry)
        ));
    }

    #[test]
    fn boundary_feature_requires_single_polygon() {
        assert!(boundary_feature(&square_boundary()).is_ok());

        let point = collection(serde_json::json!({
            "type": "FeatureCollection",
            "features": [{ "type": "Feature", "properties": {},
                "geometry": { "type": "Point", "coordinates": [-90.0, 40.0] } }]
        }));
        assert!(matches!(
            boundary_feature(&point),
            Err(GeographyError::BoundaryGeometry)
        ));

        let empty = collection(serde_json::json!({
            "type": "FeatureCollection",
            "features": []
        }));
        assert!(matches!(
            boundary_feature(&empty),
            Err(GeographyError::BoundaryFeatureCount { count: 0 })
        ));
    }

    #[test]
    fn polygon_anchor_is_centroid() {
        let boundary = square_boundary();
        let anchor = feature_anchor(&boundary.features[0]).unwrap();
        assert!((anchor.lat - 40.005).abs() < 1e-9);
        assert!((anchor.lng - -89.995).abs() < 1e-9);
    }
}
