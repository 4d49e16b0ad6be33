pub mod gemini;
pub mod mock;
pub mod randomuser;

use std::{fmt::Display, time::Duration};

use crate::{
  error::PickerError,
  model::{Candidate, Gender},
};

pub(crate) const DEFAULT_UPSTREAM_TIMEOUT: Duration = Duration::from_secs(10);

/// External provider of raw candidate names.
#[allow(async_fn_in_trait)]
pub trait CandidateSource: Clone + Send + Sync + 'static {
  /// Fetch up to `count` candidates, with genders already mapped to
  /// [`Gender`].
  fn fetch(&self, count: usize) -> impl Future<Output = Result<Vec<Candidate>, PickerError>> + Send;
}

/// Flavor of name suggestions requested from a [`Suggester`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SuggestionKind {
  /// Alternative spellings or close variations of a name.
  Alternatives,
  /// Different names sharing the same style or feel.
  SimilarVibes,
}

impl Display for SuggestionKind {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      SuggestionKind::Alternatives => write!(f, "alternatives"),
      SuggestionKind::SimilarVibes => write!(f, "similar-vibes"),
    }
  }
}

/// External generative service producing name suggestions.
#[allow(async_fn_in_trait)]
pub trait Suggester: Clone + Send + Sync + 'static {
  fn suggest(&self, kind: SuggestionKind, name: &str, gender: Gender) -> impl Future<Output = Result<Vec<String>, PickerError>> + Send;
}

pub(crate) fn http_client(timeout: Duration) -> Result<reqwest::Client, PickerError> {
  reqwest::Client::builder()
    .timeout(timeout)
    .build()
    .map_err(|err| PickerError::ConfigError(format!("could not build HTTP client: {err}")))
}
