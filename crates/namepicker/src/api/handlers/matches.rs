use axum::{Json, extract::State};
use libnamepicker::prelude::*;
use tracing::instrument;

use crate::api::{AppState, dto::UserQuery, errors::AppError, middlewares::types::Query};

#[instrument(skip_all)]
pub async fn list_matches<S: Store, C: CandidateSource, G: Suggester>(State(state): State<AppState<S, C, G>>, Query(query): Query<UserQuery>) -> Result<Json<Vec<Name>>, AppError> {
  Ok(Json(state.picker.matches(&query.user_name).await?))
}
