//! Popup and tooltip fragments for sample features.

use chrono::{DateTime, NaiveDate};
use fieldmap_classify::ClassifierSpec;
use fieldmap_geography_models::PropertyValue;
use fieldmap_maps_models::{FieldFormat, PopupField, PopupTemplate, PropertyLayer};
use geojson::Feature;
use maud::{Markup, html};

/// Shown in place of a missing or unreadable property.
pub const PLACEHOLDER: &str = "N/A";

/// Builds the popup for `feature`: a title and one row per configured
/// field.
#[must_use]
pub fn build_popup(template: &PopupTemplate, feature: &Feature) -> Markup {
    let title = template
        .title_field
        .as_deref()
        .and_then(|key| property_text(feature, key))
        .unwrap_or_else(|| template.title.clone());

    html! {
        div class="map-popup" {
            @if !title.is_empty() {
                strong class="map-popup-title" { (title) }
            }
            table class="map-popup-fields" {
                @for field in &template.fields {
                    tr {
                        th { (field.label) }
                        td { (format_field(field, feature)) }
                    }
                }
            }
        }
    }
}

/// Builds the hover tooltip for the currently classified property, e.g.
/// `"Phosphorus: 23.5 ppm"`.
#[must_use]
pub fn build_tooltip(layer: &PropertyLayer, spec: &ClassifierSpec, feature: &Feature) -> Markup {
    let value = PropertyValue::of(feature, &layer.key)
        .as_number()
        .map_or_else(|| PLACEHOLDER.to_string(), |n| with_unit(n.to_string(), spec.unit()));

    html! {
        span class="map-tooltip" { (layer.label) ": " (value) }
    }
}

/// Formats one popup value, including its unit.
#[must_use]
pub fn format_field(field: &PopupField, feature: &Feature) -> String {
    let value = PropertyValue::of(feature, &field.key);

    let text = match field.format {
        FieldFormat::Number => value
            .as_number()
            .map(|n| format_number(n, field.decimals))
            .or_else(|| match value {
                PropertyValue::Text(s) if !s.trim().is_empty() => Some(s.to_string()),
                _ => None,
            }),
        FieldFormat::Text => property_text(feature, &field.key),
        FieldFormat::Date => match value {
            PropertyValue::Text(s) => Some(format_date(s)),
            _ => None,
        },
    };

    match (text, field.unit.as_deref()) {
        (Some(text), Some(unit)) => with_unit(text, unit),
        (Some(text), None) => text,
        (None, _) => PLACEHOLDER.to_string(),
    }
}

fn property_text(feature: &Feature, key: &str) -> Option<String> {
    match PropertyValue::of(feature, key) {
        PropertyValue::Number(n) => Some(n.to_string()),
        PropertyValue::Text(s) if !s.trim().is_empty() => Some(s.to_string()),
        PropertyValue::Other(v) => Some(v.to_string()),
        PropertyValue::Text(_) | PropertyValue::Missing => None,
    }
}

fn format_number(value: f64, decimals: Option<u8>) -> String {
    decimals.map_or_else(
        || value.to_string(),
        |d| format!("{value:.prec$}", prec = usize::from(d)),
    )
}

/// Renders `2024-10-02` or `2024-10-02T14:30:00Z` as `Oct 2, 2024`.
/// Unparseable text is returned unchanged.
fn format_date(raw: &str) -> String {
    let raw = raw.trim();
    let date = DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.date_naive())
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"));

    date.map_or_else(|_| raw.to_string(), |d| d.format("%b %-d, %Y").to_string())
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

    fn feature(properties: serde_json::Value) -> Feature {
        serde_json::from_value(serde_json::json!({
            "type": "Feature",
            "geometry": { "type": "Point", "coordinates": [-89.61, 40.50] },
            "properties": properties,
        }))
        .unwrap()
    }

    fn field(key: &str, label: &str, unit: Option<&str>, decimals: Option<u8>) -> PopupField {
        PopupField {
            key: key.to_string(),
            label: label.to_string(),
            unit: unit.map(str::to_string),
            decimals,
            format: FieldFormat::Number,
        }
    }

    fn template() -> PopupTemplate {
        PopupTemplate {
            title: "Soil Sample".to_string(),
            title_field: Some("Sample_ID".to_string()),
            fields: vec![
                field("P_M3_ppm", "Phosphorus", Some("ppm"), Some(1)),
                field("K_M3_ppm", "Potassium", Some("ppm"), Some(0)),
                PopupField {
                    format: FieldFormat::Date,
                    ..field("Date", "Sampled", None, None)
                },
            ],
        }
    }

    #[test]
    fn renders_fields_with_units_and_rounding() {
        let f = feature(serde_json::json!({
            "Sample_ID": "N40-03",
            "P_M3_ppm": 23.456,
            "K_M3_ppm": 151.6,
            "Date": "2024-10-14",
        }));
        let html = build_popup(&template(), &f).into_string();
        assert!(html.contains("<strong class=\"map-popup-title\">N40-03</strong>"));
        assert!(html.contains("<th>Phosphorus</th><td>23.5 ppm</td>"));
        assert!(html.contains("<th>Potassium</th><td>152 ppm</td>"));
        assert!(html.contains("<td>Oct 14, 2024</td>"));
    }

    #[test]
    fn missing_fields_use_placeholder() {
        let f = feature(serde_json::json!({ "P_M3_ppm": null }));
        let html = build_popup(&template(), &f).into_string();
        assert!(html.contains("<strong class=\"map-popup-title\">Soil Sample</strong>"));
        assert!(html.contains("<th>Phosphorus</th><td>N/A</td>"));
        assert!(html.contains("<th>Sampled</th><td>N/A</td>"));
    }

    #[test]
    fn property_text_is_escaped() {
        let f = feature(serde_json::json!({ "Sample_ID": "<b>x</b>" }));
        let html = build_popup(&template(), &f).into_string();
        assert!(html.contains("&lt;b&gt;x&lt;/b&gt;"));
        assert!(!html.contains("<b>x</b>"));
    }

    #[test]
    fn formats_date_times_and_passes_through_unknown_text() {
        assert_eq!(format_date("2024-10-02T14:30:00Z"), "Oct 2, 2024");
        assert_eq!(format_date("harvest week"), "harvest week");
    }

    #[test]
    fn text_fields_render_numbers_verbatim() {
        let f = feature(serde_json::json!({ "Treatment": "34000 seeds/ac", "Plot": 4 }));
        let treatment = PopupField {
            format: FieldFormat::Text,
            ..field("Treatment", "Treatment", None, None)
        };
        assert_eq!(format_field(&treatment, &f), "34000 seeds/ac");
        assert_eq!(format_field(&field("Plot", "Plot", None, Some(0)), &f), "4");
    }

    #[test]
    fn tooltip_shows_classified_value() {
        let spec = ClassifierSpec::from_thresholds("p", &[0.0, 20.0], &["#a", "#b"]).unwrap();
        let layer = PropertyLayer {
            key: "P_M3_ppm".to_string(),
            label: "Phosphorus".to_string(),
            classifier: "p".to_string(),
        };
        let html = build_tooltip(&layer, &spec, &feature(serde_json::json!({ "P_M3_ppm": 18 })))
            .into_string();
        assert_eq!(html, "<span class=\"map-tooltip\">Phosphorus: 18</span>");

        let missing = build_tooltip(&layer, &spec, &feature(serde_json::json!({}))).into_string();
        assert!(missing.contains("Phosphorus: N/A"));
    }
}
