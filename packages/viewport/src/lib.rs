#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Map viewport lifecycle, overlay management and map components.
//!
//! The tile-map library itself is injected through [`MapLibraryProvider`].
//! A [`MapInstance`] owns exactly one viewport created through that
//! provider and walks it through
//! `Uninitialized → Initializing → Ready → TornDown`. A
//! [`component::MapComponent`] ties an instance to a map definition: it
//! loads the field data, draws the boundary, classifies the selected
//! property and rebuilds the sample overlay and legend when the selection
//! changes.
//!
//! [`scene::SceneRecorder`] is a provider that records a serializable
//! scene instead of drawing, which the server hands to the browser.

pub mod component;
pub mod instance;
pub mod provider;
pub mod scene;
pub mod style;

pub use instance::{MapInstance, OverlayInteraction, ViewportState};
pub use provider::{
    GeoJsonLayer, LayerHandle, MapContainer, MapHandle, MapLibraryProvider, OverlayKind,
    ViewportOptions,
};

use thiserror::Error;

/// Errors raised by viewport and component operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewportError {
    /// The container element is not attached to the document yet.
    #[error("Map container '{element_id}' is not attached")]
    ContainerNotReady {
        /// Container element id.
        element_id: String,
    },

    /// The map library has not been loaded.
    #[error("Map library is not available")]
    LibraryUnavailable,

    /// An operation was attempted in the wrong lifecycle state.
    #[error("Viewport is {actual}, expected {expected}")]
    InvalidState {
        /// Required state.
        expected: ViewportState,
        /// Current state.
        actual: ViewportState,
    },

    /// The map library rejected an operation.
    #[error("Map library error: {message}")]
    Library {
        /// Description of what went wrong.
        message: String,
    },

    /// The requested property is not selectable on this map.
    #[error("Unknown property '{key}' for map '{map_id}'")]
    UnknownProperty {
        /// Map id.
        map_id: String,
        /// Requested property key.
        key: String,
    },

    /// A property refers to a classifier that is not registered.
    #[error("Unknown classifier '{id}'")]
    UnknownClassifier {
        /// Classifier id.
        id: String,
    },

    /// Field data has not been loaded yet.
    #[error("Map data has not been loaded")]
    NotLoaded,
}
