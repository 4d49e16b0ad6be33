#[derive(Debug, thiserror::Error)]
pub enum PickerError {
  #[error("invalid configuration: {0}")]
  ConfigError(String),
  #[error("invalid input: {0}")]
  ValidationError(String),
  #[error("resource not found")]
  ResourceNotFound,
  #[error(transparent)]
  PersistenceError(#[from] sqlx::Error),
  #[error("upstream service unavailable: {0}")]
  UpstreamUnavailable(String),
  #[error(transparent)]
  OtherError(#[from] anyhow::Error),
}

impl From<reqwest::Error> for PickerError {
  fn from(err: reqwest::Error) -> Self {
    PickerError::UpstreamUnavailable(err.to_string())
  }
}
