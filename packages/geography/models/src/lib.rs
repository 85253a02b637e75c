#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Geographic coordinate, bounds and field dataset types.
//!
//! Field data is stored as standard `GeoJSON` (longitude/latitude order),
//! while map viewports speak latitude/longitude pairs. The types here keep
//! the two conventions apart: [`BoundingBox`] is always `west,south,east,north`
//! and [`LatLngBounds`] serializes as `[[lat, lng], [lat, lng]]`.

use geojson::{Feature, FeatureCollection};
use serde::{Deserialize, Serialize};

/// A single latitude/longitude position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
}

impl LatLng {
    /// Creates a new position.
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// A rectangular latitude/longitude region as understood by map viewports.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[[f64; 2]; 2]", into = "[[f64; 2]; 2]")]
pub struct LatLngBounds {
    /// South-west corner.
    pub south_west: LatLng,
    /// North-east corner.
    pub north_east: LatLng,
}

impl LatLngBounds {
    /// Creates bounds from two corners.
    #[must_use]
    pub const fn new(south_west: LatLng, north_east: LatLng) -> Self {
        Self {
            south_west,
            north_east,
        }
    }

    /// Returns these bounds grown by `buffer` degrees on every edge.
    #[must_use]
    pub fn pad(self, buffer: f64) -> Self {
        Self {
            south_west: LatLng::new(self.south_west.lat - buffer, self.south_west.lng - buffer),
            north_east: LatLng::new(self.north_east.lat + buffer, self.north_east.lng + buffer),
        }
    }

    /// Whether `point` lies inside the bounds (edges inclusive).
    #[must_use]
    pub fn contains(&self, point: &LatLng) -> bool {
        point.lat >= self.south_west.lat
            && point.lat <= self.north_east.lat
            && point.lng >= self.south_west.lng
            && point.lng <= self.north_east.lng
    }
}

impl From<[[f64; 2]; 2]> for LatLngBounds {
    fn from(corners: [[f64; 2]; 2]) -> Self {
        let [[south, west], [north, east]] = corners;
        Self::new(LatLng::new(south, west), LatLng::new(north, east))
    }
}

impl From<LatLngBounds> for [[f64; 2]; 2] {
    fn from(bounds: LatLngBounds) -> Self {
        [
            [bounds.south_west.lat, bounds.south_west.lng],
            [bounds.north_east.lat, bounds.north_east.lng],
        ]
    }
}

/// A geographic bounding box in WGS84 coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Western longitude boundary.
    pub west: f64,
    /// Southern latitude boundary.
    pub south: f64,
    /// Eastern longitude boundary.
    pub east: f64,
    /// Northern latitude boundary.
    pub north: f64,
}

impl BoundingBox {
    /// Creates a new bounding box from the given coordinates.
    #[must_use]
    pub const fn new(west: f64, south: f64, east: f64, north: f64) -> Self {
        Self {
            west,
            south,
            east,
            north,
        }
    }

    /// Returns the smallest box covering both `self` and `other`.
    #[must_use]
    pub fn union(self, other: Self) -> Self {
        Self {
            west: self.west.min(other.west),
            south: self.south.min(other.south),
            east: self.east.max(other.east),
            north: self.north.max(other.north),
        }
    }

    /// Converts to latitude/longitude bounds (`[[south, west], [north, east]]`).
    #[must_use]
    pub const fn to_lat_lng_bounds(self) -> LatLngBounds {
        LatLngBounds::new(
            LatLng::new(self.south, self.west),
            LatLng::new(self.north, self.east),
        )
    }
}

/// The two collections every field map works with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDataset {
    /// Single-feature collection outlining the field.
    pub boundary: FeatureCollection,
    /// One feature per sample point or trial plot.
    pub samples: FeatureCollection,
}

/// Coarse geometry classification used to pick a drawing style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeometryKind {
    /// `Point` or `MultiPoint`.
    Point,
    /// `Polygon` or `MultiPolygon`.
    Polygon,
    /// Lines, collections, or a missing geometry.
    Other,
}

impl GeometryKind {
    /// Classifies the geometry of `feature`.
    #[must_use]
    pub fn of(feature: &Feature) -> Self {
        use geojson::Value;

        match feature.geometry.as_ref().map(|g| &g.value) {
            Some(Value::Point(_) | Value::MultiPoint(_)) => Self::Point,
            Some(Value::Polygon(_) | Value::MultiPolygon(_)) => Self::Polygon,
            _ => Self::Other,
        }
    }
}

/// A borrowed view of one feature property.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PropertyValue<'a> {
    /// A JSON number.
    Number(f64),
    /// A JSON string (which may itself hold a number or a date).
    Text(&'a str),
    /// A boolean, array or object.
    Other(&'a serde_json::Value),
    /// Absent or `null`.
    Missing,
}

impl<'a> PropertyValue<'a> {
    /// Looks up `key` in the property bag of `feature`.
    #[must_use]
    pub fn of(feature: &'a Feature, key: &str) -> Self {
        match feature.property(key) {
            None | Some(serde_json::Value::Null) => Self::Missing,
            Some(serde_json::Value::Number(n)) => n.as_f64().map_or(Self::Missing, Self::Number),
            Some(serde_json::Value::String(s)) => Self::Text(s),
            Some(other) => Self::Other(other),
        }
    }

    /// Interprets the value as a finite number, parsing numeric strings.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        let value = match self {
            Self::Number(n) => *n,
            Self::Text(s) => s.trim().parse::<f64>().ok()?,
            Self::Other(_) | Self::Missing => return None,
        };
        value.is_finite().then_some(value)
    }
}

/// Returns the numeric value of property `key`, or `None` when it is missing
/// or not numeric. Callers decide what a missing value means; it is never
/// silently treated as zero.
#[must_use]
pub fn numeric_property(feature: &Feature, key: &str) -> Option<f64> {
    PropertyValue::of(feature, key).as_number()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feature(properties: serde_json::Value) -> Feature {
        serde_json::from_value(serde_json::json!({
            "type": "Feature",
            "geometry": { "type": "Point", "coordinates": [-89.995, 40.005] },
            "properties": properties,
        }))
        .unwrap()
    }

    #[test]
    fn lat_lng_bounds_serializes_as_nested_pairs() {
        let bounds = LatLngBounds::from([[40.0, -90.0], [40.01, -89.99]]);
        let json = serde_json::to_value(bounds).unwrap();
        assert_eq!(json, serde_json::json!([[40.0, -90.0], [40.01, -89.99]]));
        let back: LatLngBounds = serde_json::from_value(json).unwrap();
        assert_eq!(back, bounds);
    }

    #[test]
    fn pad_grows_every_edge() {
        let padded = LatLngBounds::from([[40.0, -90.0], [40.01, -89.99]]).pad(0.002);
        assert!((padded.south_west.lat - 39.998).abs() < 1e-9);
        assert!((padded.south_west.lng - -90.002).abs() < 1e-9);
        assert!((padded.north_east.lat - 40.012).abs() < 1e-9);
        assert!((padded.north_east.lng - -89.988).abs() < 1e-9);
    }

    #[test]
    fn bounding_box_union_and_conversion() {
        let a = BoundingBox::new(-90.0, 40.0, -89.995, 40.005);
        let b = BoundingBox::new(-89.998, 40.002, -89.99, 40.01);
        let bounds = a.union(b).to_lat_lng_bounds();
        assert_eq!(bounds, LatLngBounds::from([[40.0, -90.0], [40.01, -89.99]]));
        assert!(bounds.contains(&LatLng::new(40.005, -89.995)));
        assert!(!bounds.contains(&LatLng::new(40.02, -89.995)));
    }

    #[test]
    fn numeric_property_accepts_numbers_and_numeric_strings() {
        let f = feature(serde_json::json!({
            "P_M3_ppm": 23.5,
            "pH": " 6.4 ",
            "Sample_ID": "A-12",
            "OM": null,
            "flag": true,
        }));
        assert_eq!(numeric_property(&f, "P_M3_ppm"), Some(23.5));
        assert_eq!(numeric_property(&f, "pH"), Some(6.4));
        assert_eq!(numeric_property(&f, "Sample_ID"), None);
        assert_eq!(numeric_property(&f, "OM"), None);
        assert_eq!(numeric_property(&f, "flag"), None);
        assert_eq!(numeric_property(&f, "absent"), None);
    }

    #[test]
    fn geometry_kind_classifies_points() {
        let f = feature(serde_json::json!({}));
        assert_eq!(GeometryKind::of(&f), GeometryKind::Point);
        let bare: Feature = serde_json::from_value(serde_json::json!({
            "type": "Feature",
            "geometry": null,
            "properties": {},
        }))
        .unwrap();
        assert_eq!(GeometryKind::of(&bare), GeometryKind::Other);
    }
}
