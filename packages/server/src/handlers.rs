//! HTTP handler functions for the fieldmap API.

use actix_web::{HttpResponse, web};
use fieldmap_classify::registry as classifiers;
use fieldmap_contact_models::ContactForm;
use fieldmap_geography_models::FieldDataset;
use fieldmap_maps_models::MapDefinition;
use fieldmap_render::{legend::build_legend, popup::build_popup};
use fieldmap_server_models::{
    ApiClassification, ApiHealth, ApiLegend, ApiMapSummary, ApiPopup, ClassifyQueryParams,
    SceneQueryParams,
};
use fieldmap_viewport::ViewportError;
use std::sync::Arc;

use crate::{AppState, render_scene};

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/maps`
///
/// Lists every map with its selectable properties.
pub async fn maps(state: web::Data<AppState>) -> HttpResponse {
    let summaries: Vec<ApiMapSummary> = state
        .maps
        .values()
        .map(|m| ApiMapSummary::new(m, classifiers::classifier))
        .collect();
    HttpResponse::Ok().json(summaries)
}

/// `GET /api/maps/{id}/boundary`
pub async fn boundary(state: web::Data<AppState>, path: web::Path<String>) -> HttpResponse {
    match load(&state, &path).await {
        Ok((_, dataset)) => HttpResponse::Ok().json(&dataset.boundary),
        Err(resp) => resp,
    }
}

/// `GET /api/maps/{id}/samples`
pub async fn samples(state: web::Data<AppState>, path: web::Path<String>) -> HttpResponse {
    match load(&state, &path).await {
        Ok((_, dataset)) => HttpResponse::Ok().json(&dataset.samples),
        Err(resp) => resp,
    }
}

/// `GET /api/maps/{id}/scene`
///
/// Returns the recorded map scene, classified by `property` or the map's
/// default property.
pub async fn scene(
    state: web::Data<AppState>,
    path: web::Path<String>,
    params: web::Query<SceneQueryParams>,
) -> HttpResponse {
    let (map, dataset) = match load(&state, &path).await {
        Ok(loaded) => loaded,
        Err(resp) => return resp,
    };

    match render_scene(map, &dataset, params.property.as_deref()) {
        Ok(scene) => HttpResponse::Ok().json(scene),
        Err(e @ ViewportError::UnknownProperty { .. }) => {
            HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() }))
        }
        Err(e) => {
            log::error!("Failed to render scene for map '{}': {e}", map.id);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to render map"
            }))
        }
    }
}

/// `GET /api/maps/{id}/legend`
pub async fn legend(
    state: web::Data<AppState>,
    path: web::Path<String>,
    params: web::Query<SceneQueryParams>,
) -> HttpResponse {
    let Some(map) = state.maps.get(path.as_str()) else {
        return unknown_map(&path);
    };

    let layer = match params.property.as_deref() {
        Some(key) => map.property(key),
        None => map.initial_property(),
    };
    let Some(layer) = layer else {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": format!("Unknown property for map '{}'", map.id)
        }));
    };

    let Some(spec) = classifiers::classifier(&layer.classifier) else {
        log::error!(
            "Map '{}' refers to unknown classifier '{}'",
            map.id,
            layer.classifier
        );
        return HttpResponse::InternalServerError().json(serde_json::json!({
            "error": "Failed to build legend"
        }));
    };

    HttpResponse::Ok().json(ApiLegend {
        classifier: spec.id().to_string(),
        property: layer.key.clone(),
        title: layer.label.clone(),
        unit: spec.unit().to_string(),
        no_data_color: spec.no_data_color().to_string(),
        entries: spec.legend_entries().into_iter().map(Into::into).collect(),
        html: build_legend(&spec, Some(&layer.label)).into_string(),
    })
}

/// `GET /api/maps/{id}/features/{index}/popup`
pub async fn popup(state: web::Data<AppState>, path: web::Path<(String, usize)>) -> HttpResponse {
    let (id, index) = path.into_inner();
    let (map, dataset) = match load(&state, &id).await {
        Ok(loaded) => loaded,
        Err(resp) => return resp,
    };

    let Some(feature) = dataset.samples.features.get(index) else {
        return HttpResponse::NotFound().json(serde_json::json!({
            "error": format!("Map '{id}' has no feature {index}")
        }));
    };

    HttpResponse::Ok().json(ApiPopup {
        map_id: map.id.clone(),
        index,
        html: build_popup(&map.popup, feature).into_string(),
        anchor: fieldmap_geography::feature_anchor(feature),
    })
}

/// `GET /api/classify`
///
/// Classifies a single value. Missing or non-numeric values are reported
/// as no data.
pub async fn classify(params: web::Query<ClassifyQueryParams>) -> HttpResponse {
    let Some(spec) = classifiers::classifier(&params.classifier) else {
        return HttpResponse::NotFound().json(serde_json::json!({
            "error": format!("Unknown classifier: {}", params.classifier)
        }));
    };

    let value = params
        .value
        .as_deref()
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite());
    let classification = spec.classify(value);

    HttpResponse::Ok().json(ApiClassification {
        classifier: spec.id().to_string(),
        value,
        bucket: classification.index(),
        color: classification.color().to_string(),
        label: classification.index().and_then(|i| spec.range_label(i)),
    })
}

/// `POST /api/contact`
pub async fn contact(state: web::Data<AppState>, form: web::Json<ContactForm>) -> HttpResponse {
    let response = state.contact.handle(&form).await;

    if response.success {
        HttpResponse::Ok().json(response)
    } else if !response.errors.is_empty() {
        HttpResponse::BadRequest().json(response)
    } else {
        HttpResponse::InternalServerError().json(response)
    }
}

/// Resolves a map and its dataset, or the error response to send.
async fn load<'a>(
    state: &'a AppState,
    id: &str,
) -> Result<(&'a MapDefinition, Arc<FieldDataset>), HttpResponse> {
    let Some(map) = state.maps.get(id) else {
        return Err(unknown_map(id));
    };

    match state.dataset(map).await {
        Ok(dataset) => Ok((map, dataset)),
        Err(e) => {
            log::error!("Failed to load data for map '{id}': {e}");
            Err(HttpResponse::BadGateway().json(serde_json::json!({
                "error": "Failed to load map data"
            })))
        }
    }
}

fn unknown_map(id: &str) -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({
        "error": format!("Unknown map: {id}")
    }))
}

#[cfg(test)]
mod tests {
    use actix_web::{App, test, web};
    use fieldmap_contact::ContactService;
    use fieldmap_maps::loader::DataLoader;

    use crate::{AppState, configure_api};

    fn state() -> web::Data<AppState> {
        web::Data::new(AppState::new(
            DataLoader::default(),
            ContactService::default(),
        ))
    }

    macro_rules! app {
        () => {
            test::init_service(App::new().app_data(state()).configure(configure_api)).await
        };
    }

    #[actix_web::test]
    async fn health_is_ok() {
        let app = app!();
        let req = test::TestRequest::get().uri("/api/health").to_request();
        let resp: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(resp["healthy"], true);
    }

    #[actix_web::test]
    async fn lists_all_maps() {
        let app = app!();
        let req = test::TestRequest::get().uri("/api/maps").to_request();
        let resp: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(resp.as_array().unwrap().len(), 6);
    }

    #[actix_web::test]
    async fn boundary_is_a_single_feature() {
        let app = app!();
        let req = test::TestRequest::get()
            .uri("/api/maps/soil_sampling/boundary")
            .to_request();
        let resp: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(resp["type"], "FeatureCollection");
        assert_eq!(resp["features"].as_array().unwrap().len(), 1);
    }

    #[actix_web::test]
    async fn unknown_map_is_404() {
        let app = app!();
        let req = test::TestRequest::get()
            .uri("/api/maps/nope/samples")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 404);
    }

    #[actix_web::test]
    async fn scene_with_bad_property_is_400() {
        let app = app!();
        let req = test::TestRequest::get()
            .uri("/api/maps/soil_sampling/scene?property=Yield")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);
    }

    #[actix_web::test]
    async fn scene_has_pan_bounds() {
        let app = app!();
        let req = test::TestRequest::get()
            .uri("/api/maps/ndvi_temporal/scene?property=NDVI_M_2")
            .to_request();
        let resp: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert!(resp["maxBounds"].is_array());
        assert_eq!(resp["container"], "map-ndvi_temporal");
    }

    #[actix_web::test]
    async fn legend_lists_ranges() {
        let app = app!();
        let req = test::TestRequest::get()
            .uri("/api/maps/soil_sampling/legend?property=P_M3_ppm")
            .to_request();
        let resp: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        let entries = resp["entries"].as_array().unwrap();
        assert_eq!(entries.len(), 5);
        assert_eq!(entries[0]["color"], "#d73027");
        assert_eq!(entries[4]["label"], "> 50 ppm");
        assert!(resp["html"].as_str().unwrap().contains("map-legend"));
    }

    #[actix_web::test]
    async fn popup_renders_feature() {
        let app = app!();
        let req = test::TestRequest::get()
            .uri("/api/maps/soil_sampling/features/2/popup")
            .to_request();
        let resp: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert!(resp["html"].as_str().unwrap().contains("N40-03"));
        assert!(resp["anchor"]["lat"].as_f64().unwrap() > 0.0);
        assert!(resp["anchor"]["lng"].as_f64().unwrap() < 0.0);

        let req = test::TestRequest::get()
            .uri("/api/maps/soil_sampling/features/99/popup")
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 404);
    }

    #[actix_web::test]
    async fn classify_reports_bucket_and_no_data() {
        let app = app!();
        let req = test::TestRequest::get()
            .uri("/api/classify?classifier=phosphorus&value=25")
            .to_request();
        let resp: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(resp["bucket"], 2);
        assert_eq!(resp["color"], "#fee08b");

        let req = test::TestRequest::get()
            .uri("/api/classify?classifier=phosphorus&value=n%2Fa")
            .to_request();
        let resp: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert!(resp["bucket"].is_null());
        assert_eq!(resp["color"], "#9e9e9e");
    }

    #[actix_web::test]
    async fn contact_validation_failure_is_400() {
        let app = app!();
        let req = test::TestRequest::post()
            .uri("/api/contact")
            .set_json(serde_json::json!({ "name": "", "email": "a@b.com", "message": "hi" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["errors"][0]["field"], "name");
    }

    #[actix_web::test]
    async fn contact_success_returns_submission_id() {
        let app = app!();
        let req = test::TestRequest::post()
            .uri("/api/contact")
            .set_json(serde_json::json!({
                "name": "Dana",
                "email": "dana@example.com",
                "message": "Interested in grid sampling"
            }))
            .to_request();
        let resp: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(resp["success"], true);
        assert!(resp["submissionId"].is_string());
    }
}
