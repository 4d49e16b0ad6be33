use axum::{Json, extract::State};
use libnamepicker::prelude::*;
use tracing::instrument;

use crate::api::{
  AppState,
  dto::{UserQuery, VotePayload, VoteResponse},
  errors::AppError,
  middlewares::{auth::Auth, json_rejection::TypedJson, types::Query},
};

#[instrument(skip_all)]
pub async fn vote<S: Store, C: CandidateSource, G: Suggester>(
  State(state): State<AppState<S, C, G>>,
  _: Auth<S, C, G>,
  TypedJson(body): TypedJson<VotePayload>,
) -> Result<Json<VoteResponse>, AppError> {
  let outcome = state.picker.vote(&body.user_name, &body.name_id, body.vote).await?;

  Ok(Json(VoteResponse {
    status: "voted",
    match_: outcome.is_match,
  }))
}

#[instrument(skip_all)]
pub async fn list_votes<S: Store, C: CandidateSource, G: Suggester>(State(state): State<AppState<S, C, G>>, Query(query): Query<UserQuery>) -> Result<Json<Vec<VotedName>>, AppError> {
  Ok(Json(state.picker.votes(&query.user_name).await?))
}
