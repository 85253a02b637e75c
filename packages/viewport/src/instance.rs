//! A single map viewport and the overlays attached to it.

use std::sync::Arc;

use fieldmap_geography::collection_pan_bounds;
use fieldmap_geography_models::LatLngBounds;
use fieldmap_maps_models::ControlPosition;
use geojson::{Feature, FeatureCollection};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display};

use crate::ViewportError;
use crate::provider::{
    GeoJsonLayer, LayerHandle, MapContainer, MapHandle, MapLibraryProvider, OverlayKind,
    ViewportOptions,
};
use crate::style::FeatureStyle;

/// Lifecycle of a [`MapInstance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ViewportState {
    Uninitialized,
    Initializing,
    Ready,
    TornDown,
}

/// Formats the text for a single feature.
pub type FeatureFormatter = Box<dyn Fn(&Feature) -> String + Send + Sync>;

/// Hover and click behaviour of an overlay.
#[derive(Default)]
pub struct OverlayInteraction {
    popup: Option<FeatureFormatter>,
    tooltip: Option<FeatureFormatter>,
}

impl OverlayInteraction {
    /// No popups and no tooltips.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Opens a popup on click. The formatter runs only when a popup is
    /// requested.
    #[must_use]
    pub fn with_popup(
        mut self,
        formatter: impl Fn(&Feature) -> String + Send + Sync + 'static,
    ) -> Self {
        self.popup = Some(Box::new(formatter));
        self
    }

    /// Shows a tooltip on hover.
    #[must_use]
    pub fn with_tooltip(
        mut self,
        formatter: impl Fn(&Feature) -> String + Send + Sync + 'static,
    ) -> Self {
        self.tooltip = Some(Box::new(formatter));
        self
    }
}

impl std::fmt::Debug for OverlayInteraction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverlayInteraction")
            .field("popup", &self.popup.is_some())
            .field("tooltip", &self.tooltip.is_some())
            .finish()
    }
}

struct Overlay {
    kind: OverlayKind,
    layer: LayerHandle,
    collection: Arc<FeatureCollection>,
    popup: Option<FeatureFormatter>,
}

/// Owns one map viewport created through a [`MapLibraryProvider`].
///
/// Every layer and control added through the instance is tracked and
/// released again by [`MapInstance::teardown`], which also runs on drop.
pub struct MapInstance<P: MapLibraryProvider> {
    provider: P,
    state: ViewportState,
    map: Option<MapHandle>,
    base_layers: Vec<LayerHandle>,
    overlays: Vec<Overlay>,
    legend: Option<LayerHandle>,
    bounds_buffer: f64,
    max_bounds: Option<LatLngBounds>,
}

impl<P: MapLibraryProvider> MapInstance<P> {
    #[must_use]
    pub const fn new(provider: P) -> Self {
        Self {
            provider,
            state: ViewportState::Uninitialized,
            map: None,
            base_layers: Vec::new(),
            overlays: Vec::new(),
            legend: None,
            bounds_buffer: 0.0,
            max_bounds: None,
        }
    }

    #[must_use]
    pub const fn state(&self) -> ViewportState {
        self.state
    }

    #[must_use]
    pub const fn map(&self) -> Option<MapHandle> {
        self.map
    }

    #[must_use]
    pub const fn provider(&self) -> &P {
        &self.provider
    }

    /// Pan bounds set by the first boundary overlay.
    #[must_use]
    pub const fn max_bounds(&self) -> Option<LatLngBounds> {
        self.max_bounds
    }

    /// Whether an overlay of `kind` is attached.
    #[must_use]
    pub fn has_overlay(&self, kind: OverlayKind) -> bool {
        self.overlays.iter().any(|o| o.kind == kind)
    }

    /// Number of layers and controls currently held on the map.
    #[must_use]
    pub fn layer_count(&self) -> usize {
        self.base_layers.len() + self.overlays.len() + usize::from(self.legend.is_some())
    }

    /// Creates the viewport inside `container` with a base tile layer and
    /// an optional scale control.
    ///
    /// # Errors
    ///
    /// * If the instance is not `Uninitialized`
    /// * If the container is not attached or the library is not loaded
    /// * If the library fails to create the map or its base layers
    pub fn initialize(
        &mut self,
        container: &MapContainer,
        options: &ViewportOptions,
    ) -> Result<(), ViewportError> {
        if self.state != ViewportState::Uninitialized {
            return Err(ViewportError::InvalidState {
                expected: ViewportState::Uninitialized,
                actual: self.state,
            });
        }
        if !container.attached {
            log::warn!(
                "Map container '{}' is not attached, skipping initialization",
                container.element_id
            );
            return Err(ViewportError::ContainerNotReady {
                element_id: container.element_id.clone(),
            });
        }
        if !self.provider.is_available() {
            log::error!("Map library is not loaded");
            return Err(ViewportError::LibraryUnavailable);
        }

        self.state = ViewportState::Initializing;
        self.bounds_buffer = options.bounds_buffer;

        if let Err(e) = self.create(container, options) {
            log::error!("Failed to initialize map '{}': {e}", container.element_id);
            self.release();
            self.state = ViewportState::Uninitialized;
            return Err(e);
        }

        self.state = ViewportState::Ready;
        log::debug!("Map '{}' ready", container.element_id);
        Ok(())
    }

    fn create(
        &mut self,
        container: &MapContainer,
        options: &ViewportOptions,
    ) -> Result<(), ViewportError> {
        let map = self.provider.create_map(container, options)?;
        self.map = Some(map);

        let tiles = self.provider.add_tile_layer(map, &options.tile_layer)?;
        self.base_layers.push(tiles);

        if options.scale_control {
            let scale = self.provider.add_scale_control(map)?;
            self.base_layers.push(scale);
        }

        Ok(())
    }

    fn ready_map(&self) -> Result<MapHandle, ViewportError> {
        match (self.state, self.map) {
            (ViewportState::Ready, Some(map)) => Ok(map),
            (actual, _) => Err(ViewportError::InvalidState {
                expected: ViewportState::Ready,
                actual,
            }),
        }
    }

    /// Adds a `GeoJSON` overlay styled per feature by `style`.
    ///
    /// The first boundary overlay restricts panning to its bounding box
    /// plus the configured buffer and fits the viewport to it.
    ///
    /// # Errors
    ///
    /// * If the instance is not `Ready`
    /// * If the library rejects the layer
    pub fn attach_overlay<S>(
        &mut self,
        kind: OverlayKind,
        collection: Arc<FeatureCollection>,
        style: S,
        interaction: OverlayInteraction,
    ) -> Result<LayerHandle, ViewportError>
    where
        S: Fn(&Feature) -> FeatureStyle,
    {
        let map = self.ready_map()?;

        let styles = collection.features.iter().map(&style).collect::<Vec<_>>();
        let tooltips = interaction.tooltip.as_ref().map_or_else(Vec::new, |tooltip| {
            collection.features.iter().map(tooltip).collect()
        });

        let layer = self.provider.add_geojson_layer(
            map,
            &GeoJsonLayer {
                overlay: kind,
                collection: &collection,
                styles: &styles,
                tooltips: &tooltips,
                popups: interaction.popup.is_some(),
            },
        )?;

        if kind == OverlayKind::Boundary && self.max_bounds.is_none() {
            match collection_pan_bounds(&collection, self.bounds_buffer) {
                Ok((bbox, bounds)) => {
                    self.provider.set_max_bounds(map, bounds);
                    self.provider.fit_bounds(map, bbox.to_lat_lng_bounds());
                    self.max_bounds = Some(bounds);
                }
                Err(e) => log::warn!("Boundary has no usable bounds: {e}"),
            }
        }

        self.overlays.push(Overlay {
            kind,
            layer,
            collection,
            popup: interaction.popup,
        });

        Ok(layer)
    }

    /// Removes every overlay of `kind`.
    pub fn detach(&mut self, kind: OverlayKind) {
        let Some(map) = self.map else {
            return;
        };
        let (removed, kept) = std::mem::take(&mut self.overlays)
            .into_iter()
            .partition::<Vec<_>, _>(|o| o.kind == kind);
        self.overlays = kept;
        for overlay in removed {
            self.provider.remove_layer(map, overlay.layer);
        }
    }

    /// Removes the overlays of `kind` and attaches a new one in their
    /// place.
    ///
    /// # Errors
    ///
    /// * If the instance is not `Ready`
    /// * If the library rejects the layer
    pub fn replace_overlay<S>(
        &mut self,
        kind: OverlayKind,
        collection: Arc<FeatureCollection>,
        style: S,
        interaction: OverlayInteraction,
    ) -> Result<LayerHandle, ViewportError>
    where
        S: Fn(&Feature) -> FeatureStyle,
    {
        self.ready_map()?;
        self.detach(kind);
        self.attach_overlay(kind, collection, style, interaction)
    }

    /// Shows `html` in a legend control, replacing any previous legend.
    ///
    /// # Errors
    ///
    /// * If the instance is not `Ready`
    /// * If the library rejects the control
    pub fn attach_legend(
        &mut self,
        html: &str,
        position: ControlPosition,
    ) -> Result<LayerHandle, ViewportError> {
        let map = self.ready_map()?;
        if let Some(previous) = self.legend.take() {
            self.provider.remove_layer(map, previous);
        }
        let legend = self.provider.add_legend_control(map, html, position)?;
        self.legend = Some(legend);
        Ok(legend)
    }

    /// Formats the popup for feature `index` of the overlay of `kind`.
    /// Returns `None` when the overlay has no popups or no such feature.
    #[must_use]
    pub fn popup(&self, kind: OverlayKind, index: usize) -> Option<String> {
        let overlay = self.overlays.iter().find(|o| o.kind == kind)?;
        let formatter = overlay.popup.as_ref()?;
        let feature = overlay.collection.features.get(index)?;
        Some(formatter(feature))
    }

    /// Removes every overlay and control and destroys the map.
    ///
    /// Safe to call any number of times, including on an instance that was
    /// never initialized.
    pub fn teardown(&mut self) {
        if self.map.is_none() {
            return;
        }
        self.release();
        self.state = ViewportState::TornDown;
    }

    /// Returns a torn-down instance to `Uninitialized` so a remounted
    /// component can create a fresh viewport.
    pub fn reset(&mut self) {
        if self.state == ViewportState::TornDown {
            self.state = ViewportState::Uninitialized;
        }
    }

    fn release(&mut self) {
        let Some(map) = self.map.take() else {
            return;
        };
        for overlay in self.overlays.drain(..) {
            self.provider.remove_layer(map, overlay.layer);
        }
        if let Some(legend) = self.legend.take() {
            self.provider.remove_layer(map, legend);
        }
        for layer in self.base_layers.drain(..) {
            self.provider.remove_layer(map, layer);
        }
        self.provider.destroy_map(map);
        self.max_bounds = None;
        log::debug!("Destroyed map {map:?}");
    }
}

impl<P: MapLibraryProvider> Drop for MapInstance<P> {
    fn drop(&mut self) {
        self.teardown();
    }
}
