//! Profile handlers

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::{auth::Principal, models::ProfileForm, state::AppState, Error, Result};

/// `GET /profile`
pub async fn get_profile(State(state): State<AppState>, principal: Principal) -> Result<Response> {
    let profile = state
        .profile_service
        .get_profile(&principal)
        .await?
        .ok_or_else(|| Error::NotFound("Profile doesn't exist.".to_string()))?;

    Ok((StatusCode::OK, Json(profile)).into_response())
}

/// `POST /profile`
pub async fn save_profile(
    State(state): State<AppState>,
    principal: Principal,
    Json(form): Json<ProfileForm>,
) -> Result<Response> {
    let profile = state.profile_service.save_profile(&principal, form).await?;
    Ok((StatusCode::OK, Json(profile)).into_response())
}
