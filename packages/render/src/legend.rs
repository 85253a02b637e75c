//! Legend panel listing a classifier's ranges.

use fieldmap_classify::ClassifierSpec;
use maud::{Markup, html};

/// Builds the legend panel for `spec`.
///
/// `title` overrides the classifier title (e.g. with the selected flight
/// date). Rows appear in range order: one color swatch and one
/// `"{min}–{max} {unit}"` label each, the last one as `"> {min} {unit}"`.
#[must_use]
pub fn build_legend(spec: &ClassifierSpec, title: Option<&str>) -> Markup {
    let entries = spec.legend_entries();
    let title = title.unwrap_or_else(|| spec.title());

    html! {
        div class="map-legend" data-classifier=(spec.id()) {
            h4 class="map-legend-title" { (title) }
            @for entry in &entries {
                div class="map-legend-row" {
                    i class="map-legend-swatch" style={ "background:" (entry.color) } {}
                    span class="map-legend-label" { (entry.label) }
                    @if let Some(name) = &entry.name {
                        span class="map-legend-name" { (name) }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldmap_classify::ClassBreak;

    fn spec() -> ClassifierSpec {
        ClassifierSpec::new(
            "phosphorus",
            "Phosphorus",
            "ppm",
            vec![
                ClassBreak::new(0.0, "#d73027").with_label("Low"),
                ClassBreak::new(20.0, "#fee08b"),
                ClassBreak::new(40.0, "#1a9850"),
            ],
        )
        .unwrap()
    }

    #[test]
    fn lists_every_range_in_order() {
        let html = build_legend(&spec(), None).into_string();
        assert!(html.contains("<h4 class=\"map-legend-title\">Phosphorus</h4>"));
        let first = html.find("0–20 ppm").unwrap();
        let second = html.find("20–40 ppm").unwrap();
        let last = html.find("&gt; 40 ppm").unwrap();
        assert!(first < second && second < last);
        assert!(html.contains("background:#d73027"));
        assert_eq!(html.matches("map-legend-row").count(), 3);
        assert!(html.contains("<span class=\"map-legend-name\">Low</span>"));
    }

    #[test]
    fn title_override_is_escaped() {
        let html = build_legend(&spec(), Some("P <Mehlich>")).into_string();
        assert!(html.contains("P &lt;Mehlich&gt;"));
    }

    #[test]
    fn building_twice_is_identical() {
        let spec = spec();
        assert_eq!(
            build_legend(&spec, None).into_string(),
            build_legend(&spec, None).into_string()
        );
    }
}
