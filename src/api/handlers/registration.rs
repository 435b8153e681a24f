//! Registration handlers
//!
//! The service reports business outcomes as tagged variants; this layer
//! converts them into the wire contract: a `{result, reason}` body on
//! success and a typed error status otherwise.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::{
    auth::Principal,
    services::{RegistrationOutcome, UnregisterOutcome},
    state::AppState,
    Error, Result,
};

#[derive(Debug, Serialize)]
pub struct RegistrationResult {
    pub result: bool,
    pub reason: &'static str,
}

/// `POST /conference/{websafeConferenceKey}/registration`
pub async fn register_for_conference(
    State(state): State<AppState>,
    principal: Principal,
    Path(websafe_conference_key): Path<String>,
) -> Result<Response> {
    let outcome = state
        .registration_service
        .register(&principal, &websafe_conference_key)
        .await?;

    match outcome {
        RegistrationOutcome::Booked => Ok((
            StatusCode::OK,
            Json(RegistrationResult {
                result: true,
                reason: "Registration successful",
            }),
        )
            .into_response()),
        RegistrationOutcome::ConferenceNotFound => Err(Error::NotFound(format!(
            "No Conference found with key: {websafe_conference_key}"
        ))),
        RegistrationOutcome::AlreadyRegistered => {
            Err(Error::Conflict("You have already registered".to_string()))
        }
        RegistrationOutcome::NoSeats => {
            Err(Error::Conflict("There are no seats available".to_string()))
        }
    }
}

/// `DELETE /conference/{websafeConferenceKey}/registration`
pub async fn unregister_from_conference(
    State(state): State<AppState>,
    principal: Principal,
    Path(websafe_conference_key): Path<String>,
) -> Result<Response> {
    let outcome = state
        .registration_service
        .unregister(&principal, &websafe_conference_key)
        .await?;

    match outcome {
        UnregisterOutcome::Released => Ok((
            StatusCode::OK,
            Json(RegistrationResult {
                result: true,
                reason: "Unregistered",
            }),
        )
            .into_response()),
        UnregisterOutcome::ConferenceNotFound => Err(Error::NotFound(format!(
            "No Conference found with key: {websafe_conference_key}"
        ))),
        UnregisterOutcome::NotRegistered => {
            Err(Error::BadRequest("Invalid conferenceKey".to_string()))
        }
    }
}

/// `GET /getConferencesToAttend`
pub async fn get_conferences_to_attend(
    State(state): State<AppState>,
    principal: Principal,
) -> Result<Response> {
    let conferences = state
        .registration_service
        .conferences_to_attend(&principal)
        .await?;
    let views = state.query_service.to_views(conferences).await?;

    Ok((StatusCode::OK, Json(views)).into_response())
}
