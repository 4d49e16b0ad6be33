use axum::{Json, extract::State};
use libnamepicker::prelude::*;
use tracing::instrument;

use crate::api::{
  AppState,
  dto::{SuggestionPayload, SuggestionsResponse},
  errors::AppError,
  middlewares::{auth::Auth, json_rejection::TypedJson},
};

#[instrument(skip_all)]
pub async fn alternatives<S: Store, C: CandidateSource, G: Suggester>(
  State(state): State<AppState<S, C, G>>,
  _: Auth<S, C, G>,
  TypedJson(body): TypedJson<SuggestionPayload>,
) -> Result<Json<SuggestionsResponse>, AppError> {
  suggest(&state, SuggestionKind::Alternatives, body).await
}

#[instrument(skip_all)]
pub async fn similar_vibes<S: Store, C: CandidateSource, G: Suggester>(
  State(state): State<AppState<S, C, G>>,
  _: Auth<S, C, G>,
  TypedJson(body): TypedJson<SuggestionPayload>,
) -> Result<Json<SuggestionsResponse>, AppError> {
  suggest(&state, SuggestionKind::SimilarVibes, body).await
}

async fn suggest<S: Store, C: CandidateSource, G: Suggester>(state: &AppState<S, C, G>, kind: SuggestionKind, body: SuggestionPayload) -> Result<Json<SuggestionsResponse>, AppError> {
  let alternatives = state.picker.suggest(kind, &body.name, body.gender).await?;

  Ok(Json(SuggestionsResponse { alternatives }))
}
