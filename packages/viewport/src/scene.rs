//! A [`MapLibraryProvider`] that records maps as serializable scenes.
//!
//! The server builds maps against a [`SceneRecorder`] and ships the
//! resulting [`MapScene`] to the browser, which replays it with the real
//! tile-map library. The event log makes lifecycle behaviour observable in
//! tests.

use std::collections::BTreeMap;

use fieldmap_geography_models::LatLngBounds;
use fieldmap_maps_models::{ControlPosition, TileLayerConfig};
use geojson::FeatureCollection;
use serde::{Deserialize, Serialize};

use crate::ViewportError;
use crate::provider::{
    GeoJsonLayer, LayerHandle, MapContainer, MapHandle, MapLibraryProvider, OverlayKind,
    ViewportOptions,
};
use crate::style::FeatureStyle;

/// Everything needed to draw one map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapScene {
    pub container: String,
    pub options: ViewportOptions,
    pub max_bounds: Option<LatLngBounds>,
    pub fitted_bounds: Option<LatLngBounds>,
    /// Layers and controls in the order they were added.
    pub layers: Vec<SceneLayer>,
}

/// A recorded layer or control.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SceneLayer {
    Tiles {
        id: LayerHandle,
        tiles: TileLayerConfig,
    },
    Scale {
        id: LayerHandle,
    },
    #[serde(rename_all = "camelCase")]
    GeoJson {
        id: LayerHandle,
        overlay: OverlayKind,
        data: FeatureCollection,
        styles: Vec<FeatureStyle>,
        tooltips: Vec<String>,
        popups: bool,
    },
    Legend {
        id: LayerHandle,
        html: String,
        position: ControlPosition,
    },
}

impl SceneLayer {
    #[must_use]
    pub const fn id(&self) -> LayerHandle {
        match self {
            Self::Tiles { id, .. }
            | Self::Scale { id }
            | Self::GeoJson { id, .. }
            | Self::Legend { id, .. } => *id,
        }
    }
}

/// Provider calls, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum SceneEvent {
    MapCreated { map: MapHandle },
    LayerAdded { map: MapHandle, layer: LayerHandle },
    LayerRemoved { map: MapHandle, layer: LayerHandle },
    MaxBoundsSet { map: MapHandle },
    BoundsFitted { map: MapHandle },
    MapDestroyed { map: MapHandle },
}

/// Records maps instead of drawing them.
#[derive(Debug)]
pub struct SceneRecorder {
    available: bool,
    next_id: u64,
    maps: BTreeMap<MapHandle, MapScene>,
    events: Vec<SceneEvent>,
}

impl Default for SceneRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneRecorder {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            available: true,
            next_id: 1,
            maps: BTreeMap::new(),
            events: Vec::new(),
        }
    }

    /// A recorder that behaves like a library that failed to load.
    #[must_use]
    pub fn unavailable() -> Self {
        let mut recorder = Self::new();
        recorder.available = false;
        recorder
    }

    /// The current scene of a live map.
    #[must_use]
    pub fn scene(&self, map: MapHandle) -> Option<&MapScene> {
        self.maps.get(&map)
    }

    /// Number of maps created and not yet destroyed.
    #[must_use]
    pub fn live_maps(&self) -> usize {
        self.maps.len()
    }

    #[must_use]
    pub fn events(&self) -> &[SceneEvent] {
        &self.events
    }

    const fn next_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn push_layer(
        &mut self,
        map: MapHandle,
        build: impl FnOnce(LayerHandle) -> SceneLayer,
    ) -> Result<LayerHandle, ViewportError> {
        if !self.maps.contains_key(&map) {
            return Err(unknown_map(map));
        }
        let layer = LayerHandle(self.next_id());
        if let Some(scene) = self.maps.get_mut(&map) {
            scene.layers.push(build(layer));
        }
        self.events.push(SceneEvent::LayerAdded { map, layer });
        Ok(layer)
    }
}

fn unknown_map(map: MapHandle) -> ViewportError {
    ViewportError::Library {
        message: format!("unknown map {}", map.0),
    }
}

impl MapLibraryProvider for SceneRecorder {
    fn is_available(&self) -> bool {
        self.available
    }

    fn create_map(
        &mut self,
        container: &MapContainer,
        options: &ViewportOptions,
    ) -> Result<MapHandle, ViewportError> {
        if !self.available {
            return Err(ViewportError::LibraryUnavailable);
        }
        let map = MapHandle(self.next_id());
        self.maps.insert(
            map,
            MapScene {
                container: container.element_id.clone(),
                options: options.clone(),
                max_bounds: None,
                fitted_bounds: None,
                layers: Vec::new(),
            },
        );
        self.events.push(SceneEvent::MapCreated { map });
        Ok(map)
    }

    fn add_tile_layer(
        &mut self,
        map: MapHandle,
        tiles: &TileLayerConfig,
    ) -> Result<LayerHandle, ViewportError> {
        self.push_layer(map, |id| SceneLayer::Tiles {
            id,
            tiles: tiles.clone(),
        })
    }

    fn add_scale_control(&mut self, map: MapHandle) -> Result<LayerHandle, ViewportError> {
        self.push_layer(map, |id| SceneLayer::Scale { id })
    }

    fn add_geojson_layer(
        &mut self,
        map: MapHandle,
        layer: &GeoJsonLayer<'_>,
    ) -> Result<LayerHandle, ViewportError> {
        self.push_layer(map, |id| SceneLayer::GeoJson {
            id,
            overlay: layer.overlay,
            data: layer.collection.clone(),
            styles: layer.styles.to_vec(),
            tooltips: layer.tooltips.to_vec(),
            popups: layer.popups,
        })
    }

    fn add_legend_control(
        &mut self,
        map: MapHandle,
        html: &str,
        position: ControlPosition,
    ) -> Result<LayerHandle, ViewportError> {
        self.push_layer(map, |id| SceneLayer::Legend {
            id,
            html: html.to_string(),
            position,
        })
    }

    fn set_max_bounds(&mut self, map: MapHandle, bounds: LatLngBounds) {
        if let Some(scene) = self.maps.get_mut(&map) {
            scene.max_bounds = Some(bounds);
            self.events.push(SceneEvent::MaxBoundsSet { map });
        }
    }

    fn fit_bounds(&mut self, map: MapHandle, bounds: LatLngBounds) {
        if let Some(scene) = self.maps.get_mut(&map) {
            scene.fitted_bounds = Some(bounds);
            self.events.push(SceneEvent::BoundsFitted { map });
        }
    }

    fn remove_layer(&mut self, map: MapHandle, layer: LayerHandle) {
        let Some(scene) = self.maps.get_mut(&map) else {
            return;
        };
        let before = scene.layers.len();
        scene.layers.retain(|l| l.id() != layer);
        if scene.layers.len() != before {
            self.events.push(SceneEvent::LayerRemoved { map, layer });
        }
    }

    fn destroy_map(&mut self, map: MapHandle) {
        if self.maps.remove(&map).is_some() {
            self.events.push(SceneEvent::MapDestroyed { map });
        }
    }
}
