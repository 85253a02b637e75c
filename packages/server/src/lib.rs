#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the fieldmap site.
//!
//! Serves the map registry, field data, recorded map scenes, legends and
//! popups for the browser front end, accepts contact requests, and serves
//! the built front end from `STATIC_DIR`. Field data is loaded on first
//! use and cached per map.

mod handlers;

use std::collections::BTreeMap;
use std::sync::Arc;

use actix_cors::Cors;
use actix_files::Files;
use actix_web::{App, HttpServer, middleware, web};
use fieldmap_contact::ContactService;
use fieldmap_geography_models::FieldDataset;
use fieldmap_maps::loader::DataLoader;
use fieldmap_maps::{MapsError, registry};
use fieldmap_maps_models::MapDefinition;
use fieldmap_viewport::component::{ComponentStatus, MapComponent};
use fieldmap_viewport::scene::{MapScene, SceneRecorder};
use fieldmap_viewport::{MapContainer, ViewportError};
use tokio::sync::RwLock;

/// Default directory of the built front end.
pub const DEFAULT_STATIC_DIR: &str = "app/dist";

/// Shared application state.
pub struct AppState {
    /// Registered map definitions, keyed by id.
    pub maps: BTreeMap<String, MapDefinition>,
    /// Field data of every map loaded so far.
    pub datasets: RwLock<BTreeMap<String, Arc<FieldDataset>>>,
    /// Reads bundled, on-disk and remote `GeoJSON`.
    pub loader: DataLoader,
    /// Contact form intake.
    pub contact: ContactService,
}

impl AppState {
    /// Creates state over every registered map.
    #[must_use]
    pub fn new(loader: DataLoader, contact: ContactService) -> Self {
        Self {
            maps: registry::all_maps()
                .into_iter()
                .map(|m| (m.id.clone(), m))
                .collect(),
            datasets: RwLock::new(BTreeMap::new()),
            loader,
            contact,
        }
    }

    /// Returns the cached dataset of `map`, loading it on first use.
    /// Failed loads are not cached.
    ///
    /// # Errors
    ///
    /// Returns [`MapsError`] if the data cannot be loaded.
    pub async fn dataset(&self, map: &MapDefinition) -> Result<Arc<FieldDataset>, MapsError> {
        if let Some(dataset) = self.datasets.read().await.get(&map.id) {
            return Ok(Arc::clone(dataset));
        }

        let dataset = Arc::new(self.loader.load_dataset(map).await?);
        self.datasets
            .write()
            .await
            .entry(map.id.clone())
            .or_insert_with(|| Arc::clone(&dataset));
        Ok(dataset)
    }
}

/// Renders `map` over `dataset` into a recorded scene, classified by
/// `property` or the map's initial property.
///
/// # Errors
///
/// Returns [`ViewportError`] if the property is unknown or the map cannot
/// be built.
pub fn render_scene(
    map: &MapDefinition,
    dataset: &FieldDataset,
    property: Option<&str>,
) -> Result<MapScene, ViewportError> {
    let mut component = MapComponent::new(map.clone(), SceneRecorder::new())?;
    let ticket = component.begin_load();
    component.apply_load(
        ticket,
        &MapContainer::attached(format!("map-{}", map.id)),
        Ok(dataset.clone()),
    );

    if let ComponentStatus::Failed { message } = component.status() {
        return Err(ViewportError::Library {
            message: message.clone(),
        });
    }

    if let Some(key) = property.filter(|key| component.selected_property() != Some(*key)) {
        component.select_property(key)?;
    }

    component.scene().cloned().ok_or(ViewportError::NotLoaded)
}

/// Starts the fieldmap API server.
///
/// Reads `BIND_ADDR`, `PORT`, `STATIC_DIR` and `FIELDMAP_DATA_DIR` from
/// the environment. The caller provides the async runtime (e.g. via
/// `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the HTTP server fails to bind or
/// encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server() -> std::io::Result<()> {
    let state = web::Data::new(AppState::new(
        DataLoader::from_env(),
        ContactService::default(),
    ));
    log::info!("Serving {} maps", state.maps.len());

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);
    let static_dir =
        std::env::var("STATIC_DIR").unwrap_or_else(|_| DEFAULT_STATIC_DIR.to_string());

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure_api)
            // Serve frontend static files (production)
            .service(Files::new("/", &static_dir).index_file("index.html"))
    })
    .bind((bind_addr, port))?
    .run()
    .await
}

/// Registers the `/api` routes.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/maps", web::get().to(handlers::maps))
            .route("/maps/{id}/boundary", web::get().to(handlers::boundary))
            .route("/maps/{id}/samples", web::get().to(handlers::samples))
            .route("/maps/{id}/scene", web::get().to(handlers::scene))
            .route("/maps/{id}/legend", web::get().to(handlers::legend))
            .route(
                "/maps/{id}/features/{index}/popup",
                web::get().to(handlers::popup),
            )
            .route("/classify", web::get().to(handlers::classify))
            .route("/contact", web::post().to(handlers::contact)),
    );
}
