use libnamepicker::prelude::*;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UserQuery {
  #[validate(length(min = 1, max = 100, message = "userName must be between 1 and 100 characters"))]
  pub user_name: String,
}

#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SubmitNamePayload {
  #[validate(length(min = 1, max = 100, message = "name must be between 1 and 100 characters"))]
  pub name: String,
  pub gender: Gender,
  #[validate(length(min = 1, max = 100, message = "userName must be between 1 and 100 characters"))]
  pub user_name: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub(crate) struct VotePayload {
  #[validate(length(min = 1, message = "nameId must not be empty"))]
  pub name_id: String,
  pub vote: VoteValue,
  #[validate(length(min = 1, max = 100, message = "userName must be between 1 and 100 characters"))]
  pub user_name: String,
}

#[derive(Clone, Debug, Deserialize, Validate)]
pub(crate) struct SuggestionPayload {
  #[validate(length(min = 1, max = 100, message = "name must be between 1 and 100 characters"))]
  pub name: String,
  pub gender: Gender,
}

#[derive(Serialize)]
pub(super) struct HealthResponse {
  pub status: &'static str,
}

#[derive(Serialize)]
pub(super) struct SubmitResponse {
  pub id: String,
  pub name: String,
  pub status: SubmitStatus,
}

#[derive(Serialize)]
pub(super) struct VoteResponse {
  pub status: &'static str,
  #[serde(rename = "match")]
  pub match_: bool,
}

#[derive(Serialize)]
pub(super) struct SeedResponse {
  pub added: usize,
  pub names: Vec<String>,
}

#[derive(Serialize)]
pub(super) struct SuggestionsResponse {
  pub alternatives: Vec<String>,
}
