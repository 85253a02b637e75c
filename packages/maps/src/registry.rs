//! Compile-time registry of map definitions.
//!
//! Each entry is a `(name, toml_content)` pair embedded via `include_str!`.
//! Adding a map requires creating a TOML file in `maps/` and adding a
//! corresponding entry here.

use fieldmap_maps_models::MapDefinition;

use crate::MapsError;

/// Number of registered maps. Enforced by a test.
#[cfg(test)]
const EXPECTED_MAP_COUNT: usize = 6;

const MAP_TOMLS: &[(&str, &str)] = &[
    ("soil_sampling", include_str!("../maps/soil_sampling.toml")),
    ("nutrient", include_str!("../maps/nutrient.toml")),
    ("sample_report", include_str!("../maps/sample_report.toml")),
    ("ndvi_temporal", include_str!("../maps/ndvi_temporal.toml")),
    ("on_farm_trial", include_str!("../maps/on_farm_trial.toml")),
    ("trial_layout", include_str!("../maps/trial_layout.toml")),
];

/// Returns all registered map definitions.
///
/// # Panics
///
/// Panics if any embedded TOML file fails to parse. Since these are
/// compile-time constants, parse failures indicate a development error
/// and are caught by the tests below.
#[must_use]
pub fn all_maps() -> Vec<MapDefinition> {
    MAP_TOMLS
        .iter()
        .map(|(name, toml_str)| {
            toml::de::from_str(toml_str)
                .unwrap_or_else(|e| panic!("Failed to parse map definition '{name}': {e}"))
        })
        .collect()
}

/// Looks up a map definition by id.
///
/// # Errors
///
/// Returns [`MapsError::UnknownMap`] if no map has that id.
pub fn map(id: &str) -> Result<MapDefinition, MapsError> {
    all_maps()
        .into_iter()
        .find(|m| m.id == id)
        .ok_or_else(|| MapsError::UnknownMap { id: id.to_string() })
}
