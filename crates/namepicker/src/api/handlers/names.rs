use axum::{Json, extract::State, http::StatusCode};
use libnamepicker::prelude::*;
use tracing::instrument;

use crate::api::{
  AppState,
  dto::{SubmitNamePayload, SubmitResponse, UserQuery},
  errors::AppError,
  middlewares::{auth::Auth, json_rejection::TypedJson, types::Query},
};

#[instrument(skip_all)]
pub async fn list_names<S: Store, C: CandidateSource, G: Suggester>(State(state): State<AppState<S, C, G>>, Query(query): Query<UserQuery>) -> Result<Json<Vec<Name>>, AppError> {
  Ok(Json(state.picker.feed(&query.user_name).await?))
}

#[instrument(skip_all)]
pub async fn submit_name<S: Store, C: CandidateSource, G: Suggester>(
  State(state): State<AppState<S, C, G>>,
  _: Auth<S, C, G>,
  TypedJson(body): TypedJson<SubmitNamePayload>,
) -> Result<(StatusCode, Json<SubmitResponse>), AppError> {
  let submission = state.picker.submit_name(&body.name, body.gender, body.user_name.as_deref()).await?;

  let status = match submission.status {
    SubmitStatus::Created => StatusCode::CREATED,
    SubmitStatus::Merged => StatusCode::OK,
  };

  Ok((
    status,
    Json(SubmitResponse {
      id: submission.name.id,
      name: submission.name.name,
      status: submission.status,
    }),
  ))
}
