//! Assembly of the item service: one router per resource type, the API description,
//! metrics and cross-origin handling.

use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router, middleware};
use engine::metrics::{METRICS_PATH, track_http};
use items_core::{Entity, Field, ItemModel};
use items_routes::routes;
use items_routes::state::ItemAppState;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::CorsLayer;
use tower_http::normalize_path::NormalizePath;
use tracing::info;
use utoipa::OpenApi;

pub mod config;

pub const SERVICE_NAME: &str = "items";

pub const ENTITY_PATH: &str = "/api/entity";
pub const FIELD_PATH: &str = "/api/field";
pub const OPENAPI_PATH: &str = "/api/api-docs/openapi.json";

#[derive(OpenApi)]
#[openapi(info(
    title = "items",
    description = "Create, read, replace, update and delete entities and their fields"
))]
struct ApiDoc;

pub fn openapi() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
        .nest(ENTITY_PATH, routes::openapi())
        .nest(FIELD_PATH, routes::openapi())
}

/// Mount the entity and field routers. `metrics` is the handle of an installed
/// recorder; without one `/metrics` answers 503.
///
/// A trailing slash is trimmed before routing, so `/api/entity/` is the collection
/// root as well.
pub fn build_app<E, F>(entities: E, fields: F, metrics: Option<PrometheusHandle>) -> Router
where
    E: ItemModel<Schema = Entity>,
    F: ItemModel<Schema = Field>,
{
    let api = openapi();

    let router = Router::new()
        .nest(ENTITY_PATH, routes::build(ItemAppState::new(entities)))
        .nest(FIELD_PATH, routes::build(ItemAppState::new(fields)))
        .route(OPENAPI_PATH, get(move || async move { Json(api) }));

    let router = match metrics {
        Some(handle) => {
            info!("metrics enabled, serving them at {METRICS_PATH}");
            router
                .route(METRICS_PATH, get(move || async move { handle.render() }))
                .route_layer(middleware::from_fn(track_http))
        }
        None => {
            info!("metrics not enabled, setting up service unavailable metrics handler");
            router.route(
                METRICS_PATH,
                get(|| async {
                    (
                        StatusCode::SERVICE_UNAVAILABLE,
                        "Metrics endpoint is disabled. Metrics must be enabled and the service restarted",
                    )
                }),
            )
        }
    };

    Router::new().fallback_service(NormalizePath::trim_trailing_slash(
        router.layer(CorsLayer::permissive()),
    ))
}
