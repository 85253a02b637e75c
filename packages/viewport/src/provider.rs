//! The seam between map lifecycle code and the tile-map library.

use fieldmap_geography_models::{LatLng, LatLngBounds};
use fieldmap_maps_models::{ControlPosition, TileLayerConfig, ViewportConfig};
use geojson::FeatureCollection;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

use crate::ViewportError;
use crate::style::FeatureStyle;

/// Opaque handle to a map viewport created by a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MapHandle(pub u64);

/// Opaque handle to a layer or control added to a map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LayerHandle(pub u64);

/// The element a map renders into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapContainer {
    /// Element id.
    pub element_id: String,
    /// Whether the element is attached to the document.
    pub attached: bool,
}

impl MapContainer {
    /// A container that is ready to host a map.
    #[must_use]
    pub fn attached(element_id: impl Into<String>) -> Self {
        Self {
            element_id: element_id.into(),
            attached: true,
        }
    }

    /// A container that has not been attached yet.
    #[must_use]
    pub fn detached(element_id: impl Into<String>) -> Self {
        Self {
            element_id: element_id.into(),
            attached: false,
        }
    }
}

/// Options handed to [`MapLibraryProvider::create_map`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewportOptions {
    pub zoom: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub scroll_wheel_zoom: bool,
    pub dragging: bool,
    pub double_click_zoom: bool,
    /// Initial center, until the viewport is fitted to the boundary.
    pub center: Option<LatLng>,
    pub tile_layer: TileLayerConfig,
    pub scale_control: bool,
    /// Degrees added around the boundary when restricting panning.
    pub bounds_buffer: f64,
}

impl From<&ViewportConfig> for ViewportOptions {
    fn from(config: &ViewportConfig) -> Self {
        Self {
            zoom: config.zoom,
            min_zoom: config.min_zoom,
            max_zoom: config.max_zoom,
            scroll_wheel_zoom: config.scroll_wheel_zoom,
            dragging: config.dragging,
            double_click_zoom: config.double_click_zoom,
            center: None,
            tile_layer: config.basemap.tile_layer(),
            scale_control: config.scale_control,
            bounds_buffer: config.bounds_buffer,
        }
    }
}

/// Which overlay a `GeoJSON` layer represents.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum OverlayKind {
    /// The field outline.
    Boundary,
    /// Sample points or trial plots, styled by the selected property.
    Samples,
}

/// A `GeoJSON` layer ready to be added to a map.
#[derive(Debug)]
pub struct GeoJsonLayer<'a> {
    pub overlay: OverlayKind,
    pub collection: &'a FeatureCollection,
    /// One style per feature, in collection order.
    pub styles: &'a [FeatureStyle],
    /// One hover tooltip per feature, or empty when the layer has none.
    pub tooltips: &'a [String],
    /// Whether clicking a feature opens a popup.
    pub popups: bool,
}

/// A tile-map library able to host field maps.
///
/// Implementations own every map they create. Callers only ever hold the
/// returned handles and must hand each map back through
/// [`MapLibraryProvider::destroy_map`].
pub trait MapLibraryProvider {
    /// Whether the library has been loaded and can create maps.
    fn is_available(&self) -> bool;

    /// Creates a map inside `container`.
    ///
    /// # Errors
    ///
    /// * If the library cannot create the map
    fn create_map(
        &mut self,
        container: &MapContainer,
        options: &ViewportOptions,
    ) -> Result<MapHandle, ViewportError>;

    /// Adds the base tile layer.
    ///
    /// # Errors
    ///
    /// * If `map` is unknown to the provider
    fn add_tile_layer(
        &mut self,
        map: MapHandle,
        tiles: &TileLayerConfig,
    ) -> Result<LayerHandle, ViewportError>;

    /// Adds a scale control.
    ///
    /// # Errors
    ///
    /// * If `map` is unknown to the provider
    fn add_scale_control(&mut self, map: MapHandle) -> Result<LayerHandle, ViewportError>;

    /// Adds a styled `GeoJSON` layer.
    ///
    /// # Errors
    ///
    /// * If `map` is unknown to the provider
    fn add_geojson_layer(
        &mut self,
        map: MapHandle,
        layer: &GeoJsonLayer<'_>,
    ) -> Result<LayerHandle, ViewportError>;

    /// Adds a legend control holding pre-rendered HTML.
    ///
    /// # Errors
    ///
    /// * If `map` is unknown to the provider
    fn add_legend_control(
        &mut self,
        map: MapHandle,
        html: &str,
        position: ControlPosition,
    ) -> Result<LayerHandle, ViewportError>;

    /// Restricts panning to `bounds`.
    fn set_max_bounds(&mut self, map: MapHandle, bounds: LatLngBounds);

    /// Moves the viewport so `bounds` is fully visible.
    fn fit_bounds(&mut self, map: MapHandle, bounds: LatLngBounds);

    /// Removes a layer or control. Unknown handles are ignored.
    fn remove_layer(&mut self, map: MapHandle, layer: LayerHandle);

    /// Destroys a map and everything still attached to it.
    fn destroy_map(&mut self, map: MapHandle);
}
