//! HTTP surface
//!
//! Thin plumbing: routes plus per-endpoint handlers that extract, call a
//! service, and map the result to a status code and JSON body.

pub mod handlers;

use axum::{
    http::{HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.server.cors_origins);

    Router::new()
        .route("/health", get(health))
        .route(
            "/profile",
            get(handlers::profile::get_profile).post(handlers::profile::save_profile),
        )
        .route("/conference", post(handlers::conference::create_conference))
        .route(
            "/conference/:websafe_conference_key",
            get(handlers::conference::get_conference),
        )
        .route(
            "/conference/:websafe_conference_key/registration",
            post(handlers::registration::register_for_conference)
                .delete(handlers::registration::unregister_from_conference),
        )
        .route(
            "/queryConferences",
            post(handlers::conference::query_conferences),
        )
        .route(
            "/getConferencesCreated",
            post(handlers::conference::get_conferences_created),
        )
        .route(
            "/getConferencesFiltered",
            post(handlers::conference::get_conferences_filtered),
        )
        .route(
            "/getConferencesToAttend",
            get(handlers::registration::get_conferences_to_attend),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers(Any);

    if origins.iter().any(|o| o == "*") {
        layer.allow_origin(Any)
    } else {
        let parsed: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        layer.allow_origin(AllowOrigin::list(parsed))
    }
}

async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "status": "ok" })))
}
