use axum::{extract::FromRequestParts, http::request::Parts};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::api::errors::AppError;

/// Query string extractor running the target's validation rules.
pub(crate) struct Query<T>(pub T);

impl<T, S> FromRequestParts<S> for Query<T>
where
  T: DeserializeOwned + Validate,
  S: Send + Sync,
{
  type Rejection = AppError;

  async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
    let axum_extra::extract::Query(query) = axum_extra::extract::Query::<T>::from_request_parts(parts, state).await?;

    query.validate()?;

    Ok(Query(query))
  }
}
