mod matches;
mod names;
mod seed;
mod suggestions;
mod votes;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use libnamepicker::prelude::*;

use crate::api::{AppState, dto::HealthResponse, errors::AppError};

pub(super) use self::matches::list_matches;
pub(super) use self::names::{list_names, submit_name};
pub(super) use self::seed::seed;
pub(super) use self::suggestions::{alternatives, similar_vibes};
pub(super) use self::votes::{list_votes, vote};

pub async fn not_found() -> impl IntoResponse {
  AppError::ResourceNotFound
}

pub async fn health() -> Json<HealthResponse> {
  Json(HealthResponse { status: "ok" })
}

pub async fn healthz() -> StatusCode {
  StatusCode::OK
}

pub async fn readyz<S: Store, C: CandidateSource, G: Suggester>(State(state): State<AppState<S, C, G>>) -> StatusCode {
  match state.picker.health().await {
    Ok(true) => StatusCode::OK,
    Ok(false) => StatusCode::SERVICE_UNAVAILABLE,

    Err(err) => {
      tracing::warn!(error = %err, "could not check store health");

      StatusCode::SERVICE_UNAVAILABLE
    }
  }
}

pub async fn prometheus<S: Store, C: CandidateSource, G: Suggester>(State(state): State<AppState<S, C, G>>) -> Result<String, AppError> {
  match state.prometheus {
    Some(handle) => Ok(handle.render()),
    None => Err(AppError::ResourceNotFound),
  }
}
