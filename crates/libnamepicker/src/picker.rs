use std::sync::Arc;

use bon::bon;
use metrics::counter;
use tokio::sync::Mutex;
use tracing::instrument;

use crate::{
  error::PickerError,
  feed,
  ledger::{self, Submission, required},
  matching,
  model::{Gender, Name, VoteValue, VotedName},
  seeder::{self, SeedParams},
  store::Store,
  upstream::{CandidateSource, SuggestionKind, Suggester},
};

#[derive(Clone, Debug, Default)]
pub struct PickerConfig {
  /// Parameters used by [`Picker::seed`].
  pub seed: SeedParams,
}

/// Result of casting a vote.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct VoteOutcome {
  /// What the user thought of the name before this vote.
  pub previous: Option<VoteValue>,
  /// Whether this vote turned the name into a match. Only a `like` can.
  pub is_match: bool,
}

/// The main entrypoint of the library.
///
/// A `Picker` ties together the name pool and votes held by a [`Store`], the
/// [`CandidateSource`] used to seed the pool and the [`Suggester`] asked for
/// related names. Every operation takes the acting user explicitly.
///
/// # Examples
///
/// ```rust
/// # use libnamepicker::prelude::*;
///
/// # tokio_test::block_on(async {
///   let source = MockedSource::builder().candidates(vec![Candidate::new("Alice", Gender::Girl, "GB")]).build();
///
///   let picker = Picker::new(MockedStore::default())
///     .source(source)
///     .suggester(MockedSuggester::default())
///     .build();
///
///   let names = picker.seed().await.unwrap();
///
///   picker.vote("Daric", &names[0].id, VoteValue::Like).await.unwrap();
///   let outcome = picker.vote("Megan", &names[0].id, VoteValue::Like).await.unwrap();
///
///   assert!(outcome.is_match);
/// # });
/// ```
#[derive(Clone, Debug)]
pub struct Picker<S: Store, C: CandidateSource, G: Suggester> {
  store: S,
  source: C,
  suggester: G,
  config: PickerConfig,
  // Shared by clones: submissions look up and insert in two steps.
  submissions: Arc<Mutex<()>>,
}

#[bon]
impl<S: Store, C: CandidateSource, G: Suggester> Picker<S, C, G> {
  /// Create a new Picker.
  ///
  /// The store is expected to be ready to use: its tables exist and it can
  /// be safely cloned and sent across threads, and so can the `Picker`.
  #[allow(clippy::new_ret_no_self)]
  #[builder(start_fn = new, finish_fn = build)]
  pub fn _new(#[builder(start_fn)] store: S, source: C, suggester: G, #[builder(default)] config: PickerConfig) -> Picker<S, C, G> {
    Picker {
      store,
      source,
      suggester,
      config,
      submissions: Arc::default(),
    }
  }
}

impl<S: Store, C: CandidateSource, G: Suggester> Picker<S, C, G> {
  /// Retrieve the backing store availability.
  pub async fn health(&self) -> Result<bool, PickerError> {
    self.store.health().await
  }

  /// Names to present to `user_name` next.
  pub async fn feed(&self, user_name: &str) -> Result<Vec<Name>, PickerError> {
    feed::next_batch(&self.store, user_name).await
  }

  /// Add a name to the pool, or fold it into an existing one.
  ///
  /// When `user_name` is given, that user ends up liking the name.
  /// Submissions going through the same `Picker` (or its clones) are
  /// serialized, so a name submitted twice at once is created only once.
  pub async fn submit_name(&self, name: &str, gender: Gender, user_name: Option<&str>) -> Result<Submission, PickerError> {
    let _guard = self.submissions.lock().await;

    ledger::submit_name(&self.store, name, gender, user_name).await
  }

  /// Record a vote, and tell whether it created a match.
  #[instrument(skip(self))]
  pub async fn vote(&self, user_name: &str, name_id: &str, value: VoteValue) -> Result<VoteOutcome, PickerError> {
    let previous = ledger::upsert_vote(&self.store, user_name, name_id, value).await?;

    let is_match = match value {
      VoteValue::Like => matching::is_match(&self.store, name_id.trim(), user_name.trim()).await?,
      _ => false,
    };

    if is_match {
      counter!("namepicker_matches_total").increment(1);

      tracing::info!("names matched");
    }

    Ok(VoteOutcome { previous, is_match })
  }

  /// Vote history of `user_name`, most recent first.
  pub async fn votes(&self, user_name: &str) -> Result<Vec<VotedName>, PickerError> {
    ledger::voted_names(&self.store, user_name).await
  }

  /// Names liked by `user_name` and by someone else.
  pub async fn matches(&self, user_name: &str) -> Result<Vec<Name>, PickerError> {
    matching::matches(&self.store, user_name).await
  }

  /// Grow the pool from the candidate source, with the configured parameters.
  pub async fn seed(&self) -> Result<Vec<Name>, PickerError> {
    self.seed_with(&self.config.seed).await
  }

  /// Grow the pool from the candidate source.
  ///
  /// Fails without touching the pool if the source cannot be reached.
  #[instrument(skip(self))]
  pub async fn seed_with(&self, params: &SeedParams) -> Result<Vec<Name>, PickerError> {
    let existing = self.store.list_names().await?;
    let candidates = self.source.fetch(params.candidates).await?;

    seeder::seed(&self.store, &existing, candidates, params).await
  }

  /// Ask the generative service for names related to `name`.
  #[instrument(skip(self))]
  pub async fn suggest(&self, kind: SuggestionKind, name: &str, gender: Gender) -> Result<Vec<String>, PickerError> {
    let name = required("name", name)?;

    self.suggester.suggest(kind, name, gender).await
  }
}

#[cfg(test)]
mod tests {
  use super::{Picker, PickerConfig};
  use crate::{
    error::PickerError,
    ledger::SubmitStatus,
    model::{Candidate, Gender, Name, VoteValue},
    seeder::SeedParams,
    store::{Store, mock::MockedStore},
    upstream::{
      SuggestionKind,
      mock::{MockedSource, MockedSuggester},
    },
  };

  fn picker(store: MockedStore) -> Picker<MockedStore, MockedSource, MockedSuggester> {
    Picker::new(store).source(MockedSource::default()).suggester(MockedSuggester::default()).build()
  }

  fn alice() -> Name {
    Name::builder().id("alice").name("Alice").gender(Gender::Girl).build()
  }

  #[tokio::test]
  async fn like_like_is_a_match() {
    let store = MockedStore::builder().names(vec![alice()]).build();
    let picker = picker(store);

    let outcome = picker.vote("Daric", "alice", VoteValue::Like).await.unwrap();

    assert_eq!(outcome.previous, None);
    assert!(!outcome.is_match);

    let outcome = picker.vote("Megan", "alice", VoteValue::Like).await.unwrap();

    assert!(outcome.is_match);

    let matches = picker.matches("Daric").await.unwrap();

    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].name, "Alice");
  }

  #[tokio::test]
  async fn only_likes_report_matches() {
    let store = MockedStore::builder().names(vec![alice()]).build();
    let picker = picker(store);

    picker.vote("Daric", "alice", VoteValue::Like).await.unwrap();

    assert!(!picker.vote("Megan", "alice", VoteValue::Maybe).await.unwrap().is_match);
    assert!(!picker.vote("Megan", "alice", VoteValue::Dislike).await.unwrap().is_match);

    let outcome = picker.vote("Megan", "alice", VoteValue::Like).await.unwrap();

    assert_eq!(outcome.previous, Some(VoteValue::Dislike));
    assert!(outcome.is_match);
  }

  #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
  async fn simultaneous_submissions_create_one_name() {
    let store = MockedStore::default();
    let picker = picker(store.clone());

    let tasks = ["Megan", "Daric", "Rowan", "Ivy", "Megan", "Daric", "Rowan", "Ivy"]
      .into_iter()
      .map(|user| {
        let picker = picker.clone();

        tokio::spawn(async move { picker.submit_name("Juniper", Gender::Neutral, Some(user)).await })
      })
      .collect::<Vec<_>>();

    let mut created = 0;

    for task in tasks {
      if task.await.unwrap().unwrap().status == SubmitStatus::Created {
        created += 1;
      }
    }

    assert_eq!(created, 1);
    assert_eq!(store.list_names().await.unwrap().len(), 1);
    assert_eq!(store.votes().await.len(), 4);
  }

  #[tokio::test]
  async fn submitted_names_match_on_second_like() {
    let picker = picker(MockedStore::default());

    let submission = picker.submit_name("Juniper", Gender::Neutral, Some("Megan")).await.unwrap();

    assert_eq!(submission.status, SubmitStatus::Created);
    assert!(picker.feed("Megan").await.unwrap().is_empty());
    assert_eq!(picker.feed("Daric").await.unwrap().len(), 1);

    assert!(picker.vote("Daric", &submission.name.id, VoteValue::Like).await.unwrap().is_match);
  }

  #[tokio::test]
  async fn seed_uses_configured_parameters() {
    let source = MockedSource::builder().candidates(vec![Candidate::new("Sofia", Gender::Girl, "ES"), Candidate::new("Emma", Gender::Girl, "GB")]).build();
    let store = MockedStore::builder().names(vec![Name::builder().name("Sophia").gender(Gender::Girl).build()]).build();

    let config = PickerConfig {
      seed: SeedParams {
        candidates: 20,
        min_distance: 3,
        target: 10,
      },
    };

    let picker = Picker::new(store.clone()).source(source.clone()).suggester(MockedSuggester::default()).config(config).build();

    let added = picker.seed().await.unwrap();

    assert_eq!(source.last_requested(), 20);
    assert_eq!(added.iter().map(|name| name.name.as_str()).collect::<Vec<_>>(), vec!["Emma"]);
    assert_eq!(store.list_names().await.unwrap().len(), 2);
  }

  #[tokio::test]
  async fn seed_defaults() {
    let source = MockedSource::default();
    let picker = Picker::new(MockedStore::default()).source(source.clone()).suggester(MockedSuggester::default()).build();

    assert!(picker.seed().await.unwrap().is_empty());
    assert_eq!(source.last_requested(), 150);
  }

  #[tokio::test]
  async fn seed_fails_when_source_is_down() {
    let store = MockedStore::default();
    let source = MockedSource::builder().candidates(vec![Candidate::new("Ava", Gender::Girl, "US")]).available(false).build();
    let picker = Picker::new(store.clone()).source(source).suggester(MockedSuggester::default()).build();

    assert!(matches!(picker.seed().await, Err(PickerError::UpstreamUnavailable(_))));
    assert!(store.list_names().await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn suggest() {
    let suggester = MockedSuggester::builder().suggestions(vec!["Alicia".into()]).build();
    let picker = Picker::new(MockedStore::default()).source(MockedSource::default()).suggester(suggester).build();

    let suggestions = picker.suggest(SuggestionKind::SimilarVibes, "Alice", Gender::Girl).await.unwrap();

    assert_eq!(suggestions, vec!["Alicia (similar-vibes of Alice)".to_string()]);
    assert!(matches!(picker.suggest(SuggestionKind::Alternatives, " ", Gender::Girl).await, Err(PickerError::ValidationError(_))));
  }

  #[tokio::test]
  async fn health() {
    assert!(picker(MockedStore::default()).health().await.unwrap());
    assert!(!picker(MockedStore::builder().healthy(false).build()).health().await.unwrap());
  }
}
