//! Conference and query handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::{
    auth::Principal,
    models::{ConferenceForm, ConferenceQueryForm},
    state::AppState,
    Result,
};

/// `POST /conference`
pub async fn create_conference(
    State(state): State<AppState>,
    principal: Principal,
    Json(form): Json<ConferenceForm>,
) -> Result<Response> {
    let conference = state
        .conference_service
        .create_conference(&principal, form)
        .await?;
    let mut views = state.query_service.to_views(vec![conference]).await?;
    // to_views preserves its input; exactly one element comes back.
    let view = views.remove(0);

    Ok((StatusCode::CREATED, Json(view)).into_response())
}

/// `GET /conference/{websafeConferenceKey}` - no authentication required.
pub async fn get_conference(
    State(state): State<AppState>,
    Path(websafe_conference_key): Path<String>,
) -> Result<Response> {
    let conference = state
        .conference_service
        .get_conference(&websafe_conference_key)
        .await?;
    let mut views = state.query_service.to_views(vec![conference]).await?;
    let view = views.remove(0);

    Ok((StatusCode::OK, Json(view)).into_response())
}

/// `POST /getConferencesCreated`
pub async fn get_conferences_created(
    State(state): State<AppState>,
    principal: Principal,
) -> Result<Response> {
    let conferences = state
        .conference_service
        .conferences_created(&principal)
        .await?;
    let views = state.query_service.to_views(conferences).await?;

    Ok((StatusCode::OK, Json(views)).into_response())
}

/// `POST /queryConferences` - no authentication required.
pub async fn query_conferences(
    State(state): State<AppState>,
    Json(form): Json<ConferenceQueryForm>,
) -> Result<Response> {
    let views = state.query_service.query(form).await?;
    Ok((StatusCode::OK, Json(views)).into_response())
}

/// `POST /getConferencesFiltered` - the fixed example query.
pub async fn get_conferences_filtered(State(state): State<AppState>) -> Result<Response> {
    let views = state.query_service.filtered_example().await?;
    Ok((StatusCode::OK, Json(views)).into_response())
}
