//! A field map component: data loading, overlays, property selection and
//! unmounting for one [`MapDefinition`].

use std::collections::BTreeMap;
use std::sync::Arc;

use fieldmap_classify::{ClassifierSpec, registry};
use fieldmap_geography_models::FieldDataset;
use fieldmap_maps::MapsError;
use fieldmap_maps::generation::{LoadGeneration, LoadTicket};
use fieldmap_maps::loader::DataLoader;
use fieldmap_maps_models::MapDefinition;
use fieldmap_render::{legend::build_legend, popup};
use geojson::FeatureCollection;
use serde::{Deserialize, Serialize};

use crate::scene::{MapScene, SceneRecorder};
use crate::style::{boundary_style, sample_style};
use crate::{
    MapContainer, MapInstance, MapLibraryProvider, OverlayInteraction, OverlayKind,
    ViewportError, ViewportOptions,
};

/// What the component currently shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ComponentStatus {
    Idle,
    Loading,
    Ready,
    Failed { message: String },
}

struct LoadedData {
    boundary: Arc<FeatureCollection>,
    samples: Arc<FeatureCollection>,
}

/// One interactive field map.
pub struct MapComponent<P: MapLibraryProvider> {
    definition: MapDefinition,
    classifiers: BTreeMap<String, ClassifierSpec>,
    instance: MapInstance<P>,
    generation: LoadGeneration,
    status: ComponentStatus,
    data: Option<LoadedData>,
    selected: Option<String>,
}

impl<P: MapLibraryProvider> MapComponent<P> {
    /// Creates a component for `definition`, resolving the classifier of
    /// every selectable property up front.
    ///
    /// # Errors
    ///
    /// * If a property refers to an unregistered classifier
    pub fn new(definition: MapDefinition, provider: P) -> Result<Self, ViewportError> {
        let classifiers = definition
            .properties
            .iter()
            .map(|layer| {
                registry::classifier(&layer.classifier)
                    .map(|spec| (layer.key.clone(), spec))
                    .ok_or_else(|| ViewportError::UnknownClassifier {
                        id: layer.classifier.clone(),
                    })
            })
            .collect::<Result<BTreeMap<_, _>, _>>()?;

        Ok(Self {
            definition,
            classifiers,
            instance: MapInstance::new(provider),
            generation: LoadGeneration::new(),
            status: ComponentStatus::Idle,
            data: None,
            selected: None,
        })
    }

    #[must_use]
    pub const fn definition(&self) -> &MapDefinition {
        &self.definition
    }

    #[must_use]
    pub const fn status(&self) -> &ComponentStatus {
        &self.status
    }

    #[must_use]
    pub fn selected_property(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    #[must_use]
    pub const fn instance(&self) -> &MapInstance<P> {
        &self.instance
    }

    /// A handle that can invalidate in-flight loads from elsewhere, e.g.
    /// when the page navigates away mid-fetch.
    #[must_use]
    pub fn generation(&self) -> LoadGeneration {
        self.generation.clone()
    }

    /// Marks a load as started and returns its ticket.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.status = ComponentStatus::Loading;
        self.generation.begin()
    }

    /// Loads the map data and renders it into `container`.
    ///
    /// A load invalidated through [`Self::generation`] while in flight
    /// leaves the component `Idle`.
    pub async fn mount(
        &mut self,
        container: &MapContainer,
        loader: &DataLoader,
    ) -> &ComponentStatus {
        let ticket = self.begin_load();
        let generation = self.generation.clone();
        match generation
            .guard(ticket, loader.load_dataset(&self.definition))
            .await
        {
            Some(result) => {
                self.apply_load(ticket, container, result);
            }
            None => {
                if self.status == ComponentStatus::Loading {
                    self.status = ComponentStatus::Idle;
                }
            }
        }
        &self.status
    }

    /// Applies the outcome of the load identified by `ticket`.
    ///
    /// Returns `false` without touching anything when a newer load started
    /// or the component was unmounted since the ticket was issued.
    pub fn apply_load(
        &mut self,
        ticket: LoadTicket,
        container: &MapContainer,
        result: Result<FieldDataset, MapsError>,
    ) -> bool {
        if !self.generation.is_current(ticket) {
            log::debug!(
                "Discarding stale load {} for map '{}'",
                ticket.generation(),
                self.definition.id
            );
            return false;
        }

        let dataset = match result {
            Ok(dataset) => dataset,
            Err(e) => {
                log::error!("Failed to load data for map '{}': {e}", self.definition.id);
                self.status = ComponentStatus::Failed {
                    message: format!("Could not load map data: {e}"),
                };
                return true;
            }
        };

        self.data = Some(LoadedData {
            boundary: Arc::new(dataset.boundary),
            samples: Arc::new(dataset.samples),
        });

        self.status = match self.render(container) {
            Ok(()) => ComponentStatus::Ready,
            Err(e) => {
                log::error!("Failed to render map '{}': {e}", self.definition.id);
                ComponentStatus::Failed {
                    message: e.to_string(),
                }
            }
        };
        true
    }

    fn render(&mut self, container: &MapContainer) -> Result<(), ViewportError> {
        // A reload replaces the whole viewport.
        self.instance.teardown();
        self.instance.reset();

        let options = ViewportOptions::from(&self.definition.viewport);
        self.instance.initialize(container, &options)?;

        let boundary = self
            .data
            .as_ref()
            .map(|d| Arc::clone(&d.boundary))
            .ok_or(ViewportError::NotLoaded)?;
        self.instance.attach_overlay(
            OverlayKind::Boundary,
            boundary,
            |_| boundary_style(),
            OverlayInteraction::none(),
        )?;

        self.selected = None;
        if let Some(layer) = self.definition.initial_property() {
            let key = layer.key.clone();
            self.select_property(&key)?;
        }

        Ok(())
    }

    /// Classifies the samples by `key` and rebuilds the sample overlay and
    /// legend.
    ///
    /// # Errors
    ///
    /// * If `key` is not a property of this map
    /// * If no data has been loaded or the viewport is not ready
    pub fn select_property(&mut self, key: &str) -> Result<(), ViewportError> {
        let unknown = || ViewportError::UnknownProperty {
            map_id: self.definition.id.clone(),
            key: key.to_string(),
        };
        let layer = self.definition.property(key).cloned().ok_or_else(unknown)?;
        let spec = self.classifiers.get(key).cloned().ok_or_else(unknown)?;
        let samples = self
            .data
            .as_ref()
            .map(|d| Arc::clone(&d.samples))
            .ok_or(ViewportError::NotLoaded)?;

        let template = self.definition.popup.clone();
        let tooltip_layer = layer.clone();
        let tooltip_spec = spec.clone();
        let interaction = OverlayInteraction::none()
            .with_popup(move |feature| popup::build_popup(&template, feature).into_string())
            .with_tooltip(move |feature| {
                popup::build_tooltip(&tooltip_layer, &tooltip_spec, feature).into_string()
            });

        self.instance.replace_overlay(
            OverlayKind::Samples,
            samples,
            |feature| sample_style(&spec, &layer.key, feature),
            interaction,
        )?;
        // The overlay already shows `key`, even if the legend fails below.
        self.selected = Some(layer.key.clone());

        let legend = build_legend(&spec, Some(&layer.label)).into_string();
        self.instance
            .attach_legend(&legend, self.definition.viewport.legend_position)?;

        log::debug!("Map '{}' now shows '{key}'", self.definition.id);
        Ok(())
    }

    /// Popup HTML for sample `index`, formatted on demand.
    #[must_use]
    pub fn popup(&self, index: usize) -> Option<String> {
        self.instance.popup(OverlayKind::Samples, index)
    }

    /// Invalidates in-flight loads and tears the viewport down. Safe to call
    /// repeatedly.
    pub fn unmount(&mut self) {
        self.generation.invalidate();
        self.instance.teardown();
        self.data = None;
        self.selected = None;
        self.status = ComponentStatus::Idle;
    }
}

impl MapComponent<SceneRecorder> {
    /// The recorded scene of the live viewport.
    #[must_use]
    pub fn scene(&self) -> Option<&MapScene> {
        self.instance
            .map()
            .and_then(|map| self.instance.provider().scene(map))
    }
}
