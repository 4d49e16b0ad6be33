use axum::{Json, extract::State};
use libnamepicker::prelude::*;
use tracing::instrument;

use crate::api::{AppState, dto::SeedResponse, errors::AppError, middlewares::auth::Auth};

#[instrument(skip_all)]
pub async fn seed<S: Store, C: CandidateSource, G: Suggester>(State(state): State<AppState<S, C, G>>, _: Auth<S, C, G>) -> Result<Json<SeedResponse>, AppError> {
  let names = state.picker.seed().await?;

  Ok(Json(SeedResponse {
    added: names.len(),
    names: names.into_iter().map(|name| name.name).collect(),
  }))
}
