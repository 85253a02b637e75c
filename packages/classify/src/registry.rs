//! Compile-time registry of classifier definitions.
//!
//! Each classifier lives in a TOML file under `classifiers/` and is
//! embedded via `include_str!`. Map definitions refer to classifiers by id.

use crate::ClassifierSpec;

/// Number of registered classifiers. Enforced by a test.
#[cfg(test)]
const EXPECTED_CLASSIFIER_COUNT: usize = 7;

const CLASSIFIER_TOMLS: &[(&str, &str)] = &[
    ("phosphorus", include_str!("../classifiers/phosphorus.toml")),
    ("potassium", include_str!("../classifiers/potassium.toml")),
    ("ph", include_str!("../classifiers/ph.toml")),
    (
        "organic_matter",
        include_str!("../classifiers/organic_matter.toml"),
    ),
    ("ndvi", include_str!("../classifiers/ndvi.toml")),
    ("seed_rate", include_str!("../classifiers/seed_rate.toml")),
    ("yield", include_str!("../classifiers/yield.toml")),
];

/// Returns all registered classifiers.
///
/// # Panics
///
/// Panics if any embedded TOML file fails to parse or validate. Since
/// these are compile-time constants, a failure indicates a development
/// error and is caught by the tests below.
#[must_use]
pub fn all_classifiers() -> Vec<ClassifierSpec> {
    CLASSIFIER_TOMLS
        .iter()
        .map(|(name, toml_str)| {
            toml::de::from_str(toml_str)
                .unwrap_or_else(|e| panic!("Failed to parse classifier '{name}': {e}"))
        })
        .collect()
}

/// Looks up a classifier by id.
#[must_use]
pub fn classifier(id: &str) -> Option<ClassifierSpec> {
    all_classifiers().into_iter().find(|c| c.id() == id)
}
