use std::marker::PhantomData;

use anyhow::Context;
use axum::{
  RequestPartsExt,
  extract::{FromRef, FromRequestParts},
  http::request::Parts,
};
use axum_extra::{
  TypedHeader,
  headers::{Authorization, authorization::Bearer},
};
use libnamepicker::prelude::*;

use crate::api::{AppState, errors::AppError};

/// Guard for mutating routes.
///
/// Lets every request through when no API key is configured, otherwise
/// requires it as a bearer token.
#[non_exhaustive]
pub(crate) struct Auth<S, C, G> {
  _marker: PhantomData<(S, C, G)>,
}

impl<T, S, C, G> FromRequestParts<T> for Auth<S, C, G>
where
  S: Store,
  C: CandidateSource,
  G: Suggester,
  T: Send + Sync,
  AppState<S, C, G>: FromRef<T>,
{
  type Rejection = AppError;

  async fn from_request_parts(parts: &mut Parts, state: &T) -> Result<Self, Self::Rejection> {
    let app_state = AppState::<S, C, G>::from_ref(state);

    let Some(api_key) = app_state.config.api_key else {
      return Ok(Auth { _marker: PhantomData });
    };

    let header = parts
      .extract::<TypedHeader<Authorization<Bearer>>>()
      .await
      .context("no authorization header found")
      .context(AppError::InvalidCredentials)?;

    if header.token() != api_key {
      return Err(AppError::InvalidCredentials);
    }

    Ok(Auth { _marker: PhantomData })
  }
}
