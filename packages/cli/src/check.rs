//! `fieldmap check`: loads every map and reports classification coverage.

use fieldmap_classify::registry as classifiers;
use fieldmap_geography_models::numeric_property;
use fieldmap_maps::loader::DataLoader;
use fieldmap_maps::registry;

/// Loads each registered map, renders every property and prints how many
/// samples carry a value for it.
///
/// # Errors
///
/// Returns an error naming the failing maps if any map fails to load or
/// render.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let loader = DataLoader::from_env();
    let mut failures = Vec::new();

    for map in registry::all_maps() {
        let dataset = match loader.load_dataset(&map).await {
            Ok(dataset) => dataset,
            Err(e) => {
                log::error!("{}: failed to load: {e}", map.id);
                failures.push(map.id.clone());
                continue;
            }
        };

        println!(
            "{}: {} sample features",
            map.id,
            dataset.samples.features.len()
        );

        for layer in &map.properties {
            if classifiers::classifier(&layer.classifier).is_none() {
                log::error!("{}: unknown classifier '{}'", map.id, layer.classifier);
                failures.push(format!("{}/{}", map.id, layer.key));
                continue;
            }

            if let Err(e) = fieldmap_server::render_scene(&map, &dataset, Some(&layer.key)) {
                log::error!("{}: failed to render '{}': {e}", map.id, layer.key);
                failures.push(format!("{}/{}", map.id, layer.key));
                continue;
            }

            let with_value = dataset
                .samples
                .features
                .iter()
                .filter(|f| numeric_property(f, &layer.key).is_some())
                .count();
            println!(
                "  {:<12} {with_value}/{} with values",
                layer.key,
                dataset.samples.features.len()
            );
        }
    }

    if failures.is_empty() {
        println!("All maps OK");
        Ok(())
    } else {
        Err(format!("Check failed: {}", failures.join(", ")).into())
    }
}
