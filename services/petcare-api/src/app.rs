//! HTTP application wiring.
//!
//! # Purpose
//! Builds the Axum router, configures middleware, and defines the shared
//! application state injected into handlers.
use crate::api;
use crate::observability;
use crate::store::PetStore;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_opentelemetry::OpenTelemetrySpanExt;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn PetStore + Send + Sync>,
}

impl AppState {
    pub fn new(store: Arc<dyn PetStore + Send + Sync>) -> Self {
        Self { store }
    }
}

pub fn build_router(state: AppState) -> Router {
    let trace_layer =
        TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
            let parent = observability::trace_context_from_headers(request.headers());
            let span = tracing::info_span!(
                "http.request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version()
            );
            span.set_parent(parent);
            span
        });

    Router::new()
        .route(
            "/api/system/health",
            axum::routing::get(api::system::system_health),
        )
        .route(
            "/api/openapi.json",
            axum::routing::get(api::system::openapi_json),
        )
        .route(
            "/api/pets",
            axum::routing::get(api::pets::list_pets).post(api::pets::create_pet),
        )
        .route(
            "/api/pets/:id",
            axum::routing::get(api::pets::get_pet)
                .put(api::pets::update_pet)
                .delete(api::pets::delete_pet),
        )
        .layer(CorsLayer::permissive())
        .layer(trace_layer)
        .with_state(state)
}
