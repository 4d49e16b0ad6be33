use std::{borrow::Cow, error::Error};

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use libnamepicker::prelude::*;
use serde_json::json;
use tracing::*;
use validator::ValidationErrors;

pub(crate) struct ApiError(pub StatusCode, pub String, pub Option<Vec<String>>);

#[derive(Debug, thiserror::Error)]
pub enum AppError {
  #[error("invalid credentials")]
  InvalidCredentials,
  #[error("missing resource")]
  ResourceNotFound,
  #[error("server error, please check your logs for more information")]
  ServerError,
  #[error(transparent)]
  OtherError(#[from] anyhow::Error),

  #[error("invalid configuration: {0}")]
  ConfigError(String),
  #[error("invalid input: {0}")]
  InvalidInput(String),
  #[error("storage error: {0}")]
  StorageError(String),
  #[error("upstream service unavailable: {0}")]
  UpstreamError(String),

  #[error("invalid query parameter")]
  InvalidQuery(#[from] axum_extra::extract::QueryRejection),
  #[error("query failed validation")]
  ValidationFailed(#[from] ValidationErrors),
}

impl From<PickerError> for AppError {
  fn from(value: PickerError) -> Self {
    match value {
      PickerError::ConfigError(err) => AppError::ConfigError(err),
      PickerError::ValidationError(err) => AppError::InvalidInput(err),
      PickerError::ResourceNotFound => AppError::ResourceNotFound,
      PickerError::PersistenceError(err) => AppError::StorageError(err.to_string()),
      PickerError::UpstreamUnavailable(err) => AppError::UpstreamError(err),
      PickerError::OtherError(err) => AppError::OtherError(err),
    }
  }
}

pub(crate) fn validation_messages(errs: &ValidationErrors) -> Vec<String> {
  let mut messages: Vec<String> = errs
    .field_errors()
    .into_iter()
    .flat_map(|(_, f)| f.clone())
    .filter_map(|f| f.message.map(Cow::into_owned))
    .collect();

  messages.sort();
  messages
}

impl IntoResponse for AppError {
  fn into_response(self) -> Response {
    error!(error = self.source(), "{}", self.to_string());

    ApiError::from(&self).into_response()
  }
}

impl From<&AppError> for ApiError {
  fn from(value: &AppError) -> Self {
    match value {
      AppError::InvalidCredentials => ApiError(StatusCode::UNAUTHORIZED, value.to_string(), None),
      AppError::ResourceNotFound => ApiError(StatusCode::NOT_FOUND, value.to_string(), None),
      AppError::InvalidInput(err) => ApiError(StatusCode::UNPROCESSABLE_ENTITY, "payload failed validation".to_string(), Some(vec![err.clone()])),
      AppError::InvalidQuery(err) => ApiError(StatusCode::BAD_REQUEST, value.to_string(), Some(vec![err.to_string()])),
      AppError::ValidationFailed(errs) => ApiError(StatusCode::UNPROCESSABLE_ENTITY, value.to_string(), Some(validation_messages(errs))),
      AppError::OtherError(inner) if inner.is::<AppError>() => match inner.downcast_ref::<AppError>() {
        Some(inner) => inner.into(),
        _ => ApiError(StatusCode::INTERNAL_SERVER_ERROR, AppError::ServerError.to_string(), None),
      },
      _ => ApiError(StatusCode::INTERNAL_SERVER_ERROR, AppError::ServerError.to_string(), None),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let payload = match self.2 {
      Some(details) => json!({
          "message": self.1,
          "details": details,
      }),
      None => json!({
          "message": self.1,
      }),
    };

    (self.0, Json(payload)).into_response()
  }
}
