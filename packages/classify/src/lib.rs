#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Threshold-based value classification for choropleth map styling.
//!
//! A [`ClassifierSpec`] is an ordered list of class breaks. Break `i`
//! covers `[min_i, min_{i+1})` and the last break is open-ended, so the
//! ranges are gapless by construction. Values below the first threshold
//! clamp to the first class; missing values get a dedicated no-data color
//! instead of being coerced into the lowest class.

pub mod registry;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Color used for features whose classified property is missing or not
/// numeric, unless a classifier overrides it.
pub const DEFAULT_NO_DATA_COLOR: &str = "#9e9e9e";

/// Errors raised when a classifier definition is malformed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClassifyError {
    /// The classifier has no ranges at all.
    #[error("Classifier '{id}' has no ranges")]
    Empty {
        /// Classifier identifier.
        id: String,
    },

    /// A threshold is `NaN` or infinite.
    #[error("Classifier '{id}' has a non-finite threshold at index {index}")]
    NonFinite {
        /// Classifier identifier.
        id: String,
        /// Index of the offending range.
        index: usize,
    },

    /// Thresholds are not strictly increasing.
    #[error("Classifier '{id}' thresholds are not strictly increasing at index {index}")]
    NotIncreasing {
        /// Classifier identifier.
        id: String,
        /// Index of the first out-of-order range.
        index: usize,
    },

    /// A range has an empty color string.
    #[error("Classifier '{id}' range {index} has no color")]
    EmptyColor {
        /// Classifier identifier.
        id: String,
        /// Index of the offending range.
        index: usize,
    },

    /// Threshold and color lists differ in length.
    #[error("Classifier '{id}' has {thresholds} thresholds but {colors} colors")]
    ColorCount {
        /// Classifier identifier.
        id: String,
        /// Number of thresholds supplied.
        thresholds: usize,
        /// Number of colors supplied.
        colors: usize,
    },
}

/// The lower edge of one class together with its display color.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassBreak {
    /// Inclusive lower bound of the class.
    pub min: f64,
    /// CSS color used for features in this class.
    pub color: String,
    /// Optional agronomic name for the class (e.g. "Optimum").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl ClassBreak {
    /// Creates an unlabeled break.
    #[must_use]
    pub fn new(min: f64, color: impl Into<String>) -> Self {
        Self {
            min,
            color: color.into(),
            label: None,
        }
    }

    /// Attaches a class name.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// Raw classifier definition as written in TOML, validated into a
/// [`ClassifierSpec`] on deserialization.
#[derive(Debug, Clone, Deserialize)]
pub struct ClassifierDef {
    id: String,
    title: String,
    #[serde(default)]
    unit: String,
    #[serde(default)]
    property: Option<String>,
    #[serde(default = "default_no_data_color")]
    no_data_color: String,
    ranges: Vec<ClassBreak>,
}

fn default_no_data_color() -> String {
    DEFAULT_NO_DATA_COLOR.to_string()
}

/// A validated classifier: ordered, gapless numeric ranges mapped to colors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ClassifierDef")]
pub struct ClassifierSpec {
    id: String,
    title: String,
    unit: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    property: Option<String>,
    no_data_color: String,
    ranges: Vec<ClassBreak>,
}

impl TryFrom<ClassifierDef> for ClassifierSpec {
    type Error = ClassifyError;

    fn try_from(def: ClassifierDef) -> Result<Self, Self::Error> {
        let mut spec = Self::new(def.id, def.title, def.unit, def.ranges)?;
        spec.property = def.property;
        spec.no_data_color = def.no_data_color;
        Ok(spec)
    }
}

impl ClassifierSpec {
    /// Creates a classifier from ordered class breaks.
    ///
    /// # Errors
    ///
    /// Returns [`ClassifyError`] if `ranges` is empty, any threshold is not
    /// finite, thresholds are not strictly increasing, or a color is empty.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        unit: impl Into<String>,
        ranges: Vec<ClassBreak>,
    ) -> Result<Self, ClassifyError> {
        let id = id.into();
        validate_ranges(&id, &ranges)?;

        Ok(Self {
            id,
            title: title.into(),
            unit: unit.into(),
            property: None,
            no_data_color: default_no_data_color(),
            ranges,
        })
    }

    /// Creates an untitled, unitless classifier from parallel threshold and
    /// color lists.
    ///
    /// # Errors
    ///
    /// Returns [`ClassifyError::ColorCount`] if the lists differ in length,
    /// or any error from [`ClassifierSpec::new`].
    pub fn from_thresholds(
        id: impl Into<String>,
        thresholds: &[f64],
        colors: &[&str],
    ) -> Result<Self, ClassifyError> {
        let id = id.into();
        if thresholds.len() != colors.len() {
            return Err(ClassifyError::ColorCount {
                id,
                thresholds: thresholds.len(),
                colors: colors.len(),
            });
        }

        let ranges = thresholds
            .iter()
            .zip(colors)
            .map(|(min, color)| ClassBreak::new(*min, *color))
            .collect();

        Self::new(id.clone(), id, "", ranges)
    }

    /// Overrides the color used for missing values.
    #[must_use]
    pub fn with_no_data_color(mut self, color: impl Into<String>) -> Self {
        self.no_data_color = color.into();
        self
    }

    /// Unique identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Human-readable title, used as the legend heading.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Display unit (may be empty).
    #[must_use]
    pub fn unit(&self) -> &str {
        &self.unit
    }

    /// Default feature property, if the classifier is tied to one.
    #[must_use]
    pub fn property(&self) -> Option<&str> {
        self.property.as_deref()
    }

    /// Color for missing or non-numeric values.
    #[must_use]
    pub fn no_data_color(&self) -> &str {
        &self.no_data_color
    }

    /// The ordered class breaks.
    #[must_use]
    pub fn ranges(&self) -> &[ClassBreak] {
        &self.ranges
    }

    /// Exclusive upper bound of range `index`, `None` for the open-ended
    /// last range.
    #[must_use]
    pub fn range_max(&self, index: usize) -> Option<f64> {
        self.ranges.get(index + 1).map(|next| next.min)
    }

    /// Returns the index of the range containing `value`.
    ///
    /// Scans the ranges in order and returns the first `[min_i, max_i)`
    /// containing the value. Values above every threshold land in the last
    /// range and values below the first threshold clamp to range 0. `NaN`
    /// has no range.
    #[must_use]
    pub fn bucket_index(&self, value: f64) -> Option<usize> {
        if value.is_nan() {
            return None;
        }

        for (index, range) in self.ranges.iter().enumerate() {
            let below_max = self.range_max(index).is_none_or(|max| value < max);
            if value >= range.min && below_max {
                return Some(index);
            }
        }

        Some(0)
    }

    /// Classifies an optional value. `None` (or `NaN`) yields
    /// [`Classification::NoData`].
    #[must_use]
    pub fn classify(&self, value: Option<f64>) -> Classification<'_> {
        match value.and_then(|v| self.bucket_index(v)) {
            Some(index) => Classification::Bucket {
                index,
                range: &self.ranges[index],
            },
            None => Classification::NoData {
                color: &self.no_data_color,
            },
        }
    }

    /// Returns the display color for `value`.
    #[must_use]
    pub fn color_for(&self, value: f64) -> &str {
        self.classify(Some(value)).color()
    }

    /// Formats the legend label of range `index`: `"{min}–{max} {unit}"`,
    /// or `"> {min} {unit}"` for the open-ended last range.
    #[must_use]
    pub fn range_label(&self, index: usize) -> Option<String> {
        let range = self.ranges.get(index)?;
        let text = match self.range_max(index) {
            Some(max) => format!("{}–{}", range.min, max),
            None => format!("> {}", range.min),
        };
        Some(with_unit(text, &self.unit))
    }

    /// One legend entry per range, in order.
    #[must_use]
    pub fn legend_entries(&self) -> Vec<LegendEntry> {
        self.ranges
            .iter()
            .enumerate()
            .map(|(index, range)| LegendEntry {
                color: range.color.clone(),
                label: self.range_label(index).unwrap_or_default(),
                name: range.label.clone(),
                min: range.min,
                max: self.range_max(index),
            })
            .collect()
    }
}

/// Result of classifying a single value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Classification<'a> {
    /// The value fell into range `index`.
    Bucket {
        /// Range index.
        index: usize,
        /// The matched range.
        range: &'a ClassBreak,
    },
    /// The value was missing.
    NoData {
        /// The classifier's no-data color.
        color: &'a str,
    },
}

impl<'a> Classification<'a> {
    /// Display color for the classified value.
    #[must_use]
    pub fn color(&self) -> &'a str {
        match self {
            Self::Bucket { range, .. } => &range.color,
            Self::NoData { color } => color,
        }
    }

    /// Range index, `None` for missing values.
    #[must_use]
    pub const fn index(&self) -> Option<usize> {
        match self {
            Self::Bucket { index, .. } => Some(*index),
            Self::NoData { .. } => None,
        }
    }
}

/// A single legend row derived from a classifier range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegendEntry {
    /// Swatch color.
    pub color: String,
    /// Formatted range text.
    pub label: String,
    /// Class name, if the range has one.
    pub name: Option<String>,
    /// Inclusive lower bound.
    pub min: f64,
    /// Exclusive upper bound (`None` for the last range).
    pub max: Option<f64>,
}

fn validate_ranges(id: &str, ranges: &[ClassBreak]) -> Result<(), ClassifyError> {
    if ranges.is_empty() {
        return Err(ClassifyError::Empty { id: id.to_string() });
    }

    for (index, range) in ranges.iter().enumerate() {
        if !range.min.is_finite() {
            return Err(ClassifyError::NonFinite {
                id: id.to_string(),
                index,
            });
        }
        if range.color.trim().is_empty() {
            return Err(ClassifyError::EmptyColor {
                id: id.to_string(),
                index,
            });
        }
        if index > 0 && range.min <= ranges[index - 1].min {
            return Err(ClassifyError::NotIncreasing {
                id: id.to_string(),
                index,
            });
        }
    }

    Ok(())
}

fn with_unit(text: String, unit: &str) -> String {
    if unit.is_empty() {
        text
    } else {
        format!("{text} {unit}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COLORS: [&str; 5] = ["c0", "c1", "c2", "c3", "c4"];

    fn five_bucket() -> ClassifierSpec {
        ClassifierSpec::from_thresholds("test", &[0.0, 20.0, 40.0, 60.0, 80.0], &COLORS).unwrap()
    }

    #[test]
    fn classifies_scenario_values() {
        let spec = five_bucket();
        assert_eq!(spec.color_for(15.0), "c0");
        assert_eq!(spec.color_for(20.0), "c1");
        assert_eq!(spec.color_for(79.0), "c3");
        assert_eq!(spec.color_for(95.0), "c4");
    }

    #[test]
    fn matches_manual_lookup_for_every_range() {
        let spec = five_bucket();
        let table = [
            (0.0, 0),
            (19.999, 0),
            (20.0, 1),
            (39.5, 1),
            (40.0, 2),
            (59.999, 2),
            (60.0, 3),
            (80.0, 4),
            (1.0e9, 4),
            (f64::INFINITY, 4),
        ];
        for (value, expected) in table {
            assert_eq!(
                spec.bucket_index(value),
                Some(expected),
                "value {value} should land in range {expected}"
            );
            assert_eq!(spec.color_for(value), COLORS[expected]);
        }
    }

    #[test]
    fn below_first_threshold_clamps_to_first_range() {
        let spec = ClassifierSpec::from_thresholds("t", &[5.0, 10.0], &["low", "high"]).unwrap();
        assert_eq!(spec.bucket_index(-3.0), Some(0));
        assert_eq!(spec.bucket_index(4.999), Some(0));
        assert_eq!(spec.bucket_index(f64::NEG_INFINITY), Some(0));
        assert_eq!(spec.color_for(-3.0), "low");
    }

    #[test]
    fn missing_values_use_no_data_color() {
        let spec = five_bucket().with_no_data_color("#000000");
        assert_eq!(
            spec.classify(None),
            Classification::NoData { color: "#000000" }
        );
        assert_eq!(spec.classify(Some(f64::NAN)).index(), None);
        assert_eq!(spec.classify(Some(f64::NAN)).color(), "#000000");
        assert_eq!(spec.classify(Some(0.0)).index(), Some(0));
    }

    #[test]
    fn single_range_classifies_everything() {
        let spec = ClassifierSpec::from_thresholds("one", &[10.0], &["only"]).unwrap();
        for value in [-100.0, 0.0, 10.0, 1000.0] {
            assert_eq!(spec.color_for(value), "only");
        }
    }

    #[test]
    fn legend_labels_follow_range_format() {
        let spec = ClassifierSpec::new(
            "p",
            "Phosphorus",
            "ppm",
            vec![
                ClassBreak::new(0.0, "#a").with_label("Low"),
                ClassBreak::new(12.5, "#b"),
                ClassBreak::new(25.0, "#c"),
            ],
        )
        .unwrap();

        let labels: Vec<String> = spec.legend_entries().into_iter().map(|e| e.label).collect();
        assert_eq!(labels, ["0–12.5 ppm", "12.5–25 ppm", "> 25 ppm"]);
        assert_eq!(spec.legend_entries()[0].name.as_deref(), Some("Low"));
        assert_eq!(spec.legend_entries()[2].max, None);
    }

    #[test]
    fn legend_without_unit_has_no_trailing_space() {
        let spec = ClassifierSpec::from_thresholds("ndvi", &[0.0, 0.5], &["a", "b"]).unwrap();
        assert_eq!(spec.range_label(0).unwrap(), "0–0.5");
        assert_eq!(spec.range_label(1).unwrap(), "> 0.5");
        assert!(spec.range_label(2).is_none());
    }

    #[test]
    fn legend_entries_are_idempotent() {
        let spec = five_bucket();
        assert_eq!(spec.legend_entries(), spec.legend_entries());
    }

    #[test]
    fn rejects_malformed_ranges() {
        assert_eq!(
            ClassifierSpec::from_thresholds("e", &[], &[]),
            Err(ClassifyError::Empty {
                id: "e".to_string()
            })
        );
        assert_eq!(
            ClassifierSpec::from_thresholds("d", &[0.0, 20.0, 20.0], &["a", "b", "c"]),
            Err(ClassifyError::NotIncreasing {
                id: "d".to_string(),
                index: 2
            })
        );
        assert_eq!(
            ClassifierSpec::from_thresholds("n", &[0.0, f64::NAN], &["a", "b"]),
            Err(ClassifyError::NonFinite {
                id: "n".to_string(),
                index: 1
            })
        );
        assert_eq!(
            ClassifierSpec::from_thresholds("c", &[0.0, 1.0], &["a", " "]),
            Err(ClassifyError::EmptyColor {
                id: "c".to_string(),
                index: 1
            })
        );
        assert!(matches!(
            ClassifierSpec::from_thresholds("m", &[0.0, 1.0], &["a"]),
            Err(ClassifyError::ColorCount {
                thresholds: 2,
                colors: 1,
                ..
            })
        ));
    }

    #[test]
    fn deserialization_validates() {
        let bad = serde_json::json!({
            "id": "bad",
            "title": "Bad",
            "ranges": [
                { "min": 10, "color": "#a" },
                { "min": 5, "color": "#b" }
            ]
        });
        assert!(serde_json::from_value::<ClassifierSpec>(bad).is_err());

        let good = serde_json::json!({
            "id": "good",
            "title": "Good",
            "unit": "ppm",
            "ranges": [{ "min": 0, "color": "#a" }]
        });
        let spec: ClassifierSpec = serde_json::from_value(good).unwrap();
        assert_eq!(spec.no_data_color(), DEFAULT_NO_DATA_COLOR);
    }
}
