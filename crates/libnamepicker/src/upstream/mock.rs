use std::sync::{
  Arc,
  atomic::{AtomicUsize, Ordering},
};

use bon::bon;

use crate::{
  error::PickerError,
  model::{Candidate, Gender},
  upstream::{CandidateSource, SuggestionKind, Suggester},
};

/// In-memory candidate source, used in tests.
#[derive(Clone, Debug)]
pub struct MockedSource {
  candidates: Vec<Candidate>,
  available: bool,
  requested: Arc<AtomicUsize>,
}

#[bon]
impl MockedSource {
  #[builder]
  pub fn new(#[builder(default)] candidates: Vec<Candidate>, #[builder(default = true)] available: bool) -> MockedSource {
    MockedSource {
      candidates,
      available,
      requested: Arc::default(),
    }
  }

  /// Number of candidates asked for in the latest call.
  pub fn last_requested(&self) -> usize {
    self.requested.load(Ordering::SeqCst)
  }
}

impl Default for MockedSource {
  fn default() -> Self {
    MockedSource::builder().build()
  }
}

impl CandidateSource for MockedSource {
  async fn fetch(&self, count: usize) -> Result<Vec<Candidate>, PickerError> {
    self.requested.store(count, Ordering::SeqCst);

    if !self.available {
      return Err(PickerError::UpstreamUnavailable("mocked source is down".into()));
    }

    Ok(self.candidates.iter().take(count).cloned().collect())
  }
}

/// Suggester returning canned suggestions, used in tests.
#[derive(Clone, Debug)]
pub struct MockedSuggester {
  suggestions: Vec<String>,
  available: bool,
}

#[bon]
impl MockedSuggester {
  #[builder]
  pub fn new(#[builder(default)] suggestions: Vec<String>, #[builder(default = true)] available: bool) -> MockedSuggester {
    MockedSuggester { suggestions, available }
  }
}

impl Default for MockedSuggester {
  fn default() -> Self {
    MockedSuggester::builder().build()
  }
}

impl Suggester for MockedSuggester {
  async fn suggest(&self, kind: SuggestionKind, name: &str, _: Gender) -> Result<Vec<String>, PickerError> {
    if !self.available {
      return Err(PickerError::UpstreamUnavailable("mocked suggester is down".into()));
    }

    Ok(self.suggestions.iter().map(|suggestion| format!("{suggestion} ({kind} of {name})")).collect())
  }
}
