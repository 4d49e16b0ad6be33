use std::collections::HashMap;

use jiff::Timestamp;
use metrics::counter;
use serde::Serialize;
use tracing::instrument;
use uuid::Uuid;

use crate::{
  error::PickerError,
  model::{Gender, Name, Vote, VoteValue, VotedName},
  store::Store,
};

/// Outcome of a name submission.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmitStatus {
  /// A new name was added to the pool.
  Created,
  /// The name already existed (ignoring case), the submission was folded into it.
  Merged,
}

#[derive(Clone, Debug)]
pub struct Submission {
  pub name: Name,
  pub status: SubmitStatus,
}

pub(crate) fn required<'s>(field: &str, value: &'s str) -> Result<&'s str, PickerError> {
  match value.trim() {
    "" => Err(PickerError::ValidationError(format!("{field} is required"))),
    value => Ok(value),
  }
}

fn new_vote(user_name: &str, name_id: &str, value: VoteValue) -> Vote {
  Vote {
    id: Uuid::new_v4().to_string(),
    user_name: user_name.to_string(),
    name_id: name_id.to_string(),
    vote: value,
    created_at: Timestamp::now(),
  }
}

/// Record `user_name`'s stance on a name, replacing any previous one.
///
/// Returns the value the user held before, if any.
#[instrument(skip(store))]
pub async fn upsert_vote<S: Store>(store: &S, user_name: &str, name_id: &str, value: VoteValue) -> Result<Option<VoteValue>, PickerError> {
  let user_name = required("userName", user_name)?;
  let name_id = required("nameId", name_id)?;

  if store.get_name(name_id).await?.is_none() {
    return Err(PickerError::ResourceNotFound);
  }

  let previous = store.upsert_vote(&new_vote(user_name, name_id, value)).await?;

  counter!("namepicker_votes_total", "vote" => value.as_str()).increment(1);

  tracing::debug!(previous = previous.map(|value| value.as_str()), "recorded vote");

  Ok(previous)
}

/// Add a name to the pool together with its creator's `like`.
///
/// Both rows are written in a single transaction.
#[instrument(skip_all, fields(name = %name.name))]
pub async fn create_name_with_vote<S: Store>(store: &S, mut name: Name, creator: &str) -> Result<Name, PickerError> {
  let creator = required("userName", creator)?;

  name.created_by = Some(creator.to_string());

  store.insert_name_with_vote(&name, &new_vote(creator, &name.id, VoteValue::Like)).await?;

  counter!("namepicker_votes_total", "vote" => VoteValue::Like.as_str()).increment(1);

  Ok(name)
}

/// Submit a name on behalf of `user_name`.
///
/// A name already in the pool (ignoring case) is not duplicated: the
/// submitter's vote on the existing entry becomes a `like` instead.
#[instrument(skip(store))]
pub async fn submit_name<S: Store>(store: &S, name: &str, gender: Gender, user_name: Option<&str>) -> Result<Submission, PickerError> {
  let name = required("name", name)?;
  let user_name = user_name.map(|user_name| required("userName", user_name)).transpose()?;

  let folded = name.to_lowercase();

  if let Some(existing) = store.list_names().await?.into_iter().find(|existing| existing.name.to_lowercase() == folded) {
    if let Some(user_name) = user_name {
      upsert_vote(store, user_name, &existing.id, VoteValue::Like).await?;
    }

    tracing::info!(id = %existing.id, "merged submitted name into existing entry");

    return Ok(Submission {
      name: existing,
      status: SubmitStatus::Merged,
    });
  }

  let name = Name::builder().name(name).gender(gender).build();

  let name = match user_name {
    Some(user_name) => create_name_with_vote(store, name, user_name).await?,

    None => {
      store.insert_name(&name).await?;
      name
    }
  };

  tracing::info!(id = %name.id, "created submitted name");

  Ok(Submission {
    name,
    status: SubmitStatus::Created,
  })
}

/// Every vote cast by `user_name`, joined with its name, most recent first.
#[instrument(skip(store))]
pub async fn voted_names<S: Store>(store: &S, user_name: &str) -> Result<Vec<VotedName>, PickerError> {
  let user_name = required("userName", user_name)?;

  let names = store.list_names().await?.into_iter().map(|name| (name.id.clone(), name)).collect::<HashMap<_, _>>();
  let mut votes = store.user_votes(user_name).await?;

  // Votes sharing a timestamp come out latest stored first.
  votes.reverse();
  votes.sort_by(|lhs, rhs| rhs.created_at.cmp(&lhs.created_at));

  Ok(
    votes
      .into_iter()
      .filter_map(|vote| {
        let name = names.get(&vote.name_id)?;

        Some(VotedName {
          name_id: vote.name_id,
          vote: vote.vote,
          created_at: vote.created_at,
          name: name.name.clone(),
          gender: name.gender,
        })
      })
      .collect(),
  )
}

#[cfg(test)]
mod tests {
  use jiff::{Timestamp, ToSpan};

  use super::SubmitStatus;
  use crate::{
    error::PickerError,
    model::{Gender, Name, Vote, VoteValue},
    store::{Store, mock::MockedStore},
  };

  fn alice() -> Name {
    Name::builder().id("alice").name("Alice").gender(Gender::Girl).build()
  }

  #[tokio::test]
  async fn upsert_inserts_then_updates() {
    let store = MockedStore::builder().names(vec![alice()]).build();

    assert_eq!(super::upsert_vote(&store, "Daric", "alice", VoteValue::Maybe).await.unwrap(), None);
    assert_eq!(super::upsert_vote(&store, "Daric", "alice", VoteValue::Like).await.unwrap(), Some(VoteValue::Maybe));

    let votes = store.user_votes("Daric").await.unwrap();

    assert_eq!(votes.len(), 1);
    assert_eq!(votes[0].vote, VoteValue::Like);
  }

  #[tokio::test]
  async fn upsert_refreshes_timestamp_and_keeps_id() {
    let stale = Vote {
      id: "v1".into(),
      user_name: "Daric".into(),
      name_id: "alice".into(),
      vote: VoteValue::Dislike,
      created_at: Timestamp::now() - 1.hour(),
    };

    let store = MockedStore::builder().names(vec![alice()]).votes(vec![stale.clone()]).build();

    super::upsert_vote(&store, "Daric", "alice", VoteValue::Like).await.unwrap();

    let votes = store.votes().await;

    assert_eq!(votes.len(), 1);
    assert_eq!(votes[0].id, "v1");
    assert!(votes[0].created_at > stale.created_at);
  }

  #[tokio::test]
  async fn upsert_validation() {
    let store = MockedStore::builder().names(vec![alice()]).build();

    assert!(matches!(super::upsert_vote(&store, "", "alice", VoteValue::Like).await, Err(PickerError::ValidationError(_))));
    assert!(matches!(super::upsert_vote(&store, "  ", "alice", VoteValue::Like).await, Err(PickerError::ValidationError(_))));
    assert!(matches!(super::upsert_vote(&store, "Daric", "", VoteValue::Like).await, Err(PickerError::ValidationError(_))));
    assert!(matches!(super::upsert_vote(&store, "Daric", "bob", VoteValue::Like).await, Err(PickerError::ResourceNotFound)));

    assert!(store.votes().await.is_empty());
  }

  #[tokio::test]
  async fn users_vote_independently() {
    let store = MockedStore::builder().names(vec![alice()]).build();

    super::upsert_vote(&store, "Daric", "alice", VoteValue::Like).await.unwrap();
    super::upsert_vote(&store, "Megan", "alice", VoteValue::Dislike).await.unwrap();

    assert_eq!(store.votes().await.len(), 2);
  }

  #[tokio::test]
  async fn submit_creates_name_with_creator_like() {
    let store = MockedStore::builder().build();

    let submission = super::submit_name(&store, " Juniper ", Gender::Neutral, Some("Megan")).await.unwrap();

    assert_eq!(submission.status, SubmitStatus::Created);
    assert_eq!(submission.name.name, "Juniper");
    assert_eq!(submission.name.created_by.as_deref(), Some("Megan"));

    let votes = store.user_votes("Megan").await.unwrap();

    assert_eq!(votes.len(), 1);
    assert_eq!(votes[0].name_id, submission.name.id);
    assert_eq!(votes[0].vote, VoteValue::Like);
  }

  #[tokio::test]
  async fn submit_merges_case_insensitive_duplicates() {
    let store = MockedStore::builder().names(vec![alice()]).build();

    super::upsert_vote(&store, "Daric", "alice", VoteValue::Dislike).await.unwrap();

    let submission = super::submit_name(&store, "ALICE", Gender::Girl, Some("Daric")).await.unwrap();

    assert_eq!(submission.status, SubmitStatus::Merged);
    assert_eq!(submission.name.id, "alice");
    assert_eq!(store.list_names().await.unwrap().len(), 1);

    let votes = store.user_votes("Daric").await.unwrap();

    assert_eq!(votes.len(), 1);
    assert_eq!(votes[0].vote, VoteValue::Like);
  }

  #[tokio::test]
  async fn submit_without_user() {
    let store = MockedStore::builder().build();

    let submission = super::submit_name(&store, "Rowan", Gender::Boy, None).await.unwrap();

    assert_eq!(submission.status, SubmitStatus::Created);
    assert_eq!(submission.name.created_by, None);
    assert!(store.votes().await.is_empty());

    assert!(matches!(super::submit_name(&store, "", Gender::Boy, None).await, Err(PickerError::ValidationError(_))));
    assert!(matches!(super::submit_name(&store, "Rowan", Gender::Boy, Some(" ")).await, Err(PickerError::ValidationError(_))));
  }

  #[tokio::test]
  async fn voted_names_most_recent_first() {
    let now = Timestamp::now();
    let bob = Name::builder().id("bob").name("Bob").gender(Gender::Boy).build();

    let votes = vec![
      Vote {
        id: "v1".into(),
        user_name: "Daric".into(),
        name_id: "alice".into(),
        vote: VoteValue::Like,
        created_at: now - 2.minutes(),
      },
      Vote {
        id: "v2".into(),
        user_name: "Daric".into(),
        name_id: "bob".into(),
        vote: VoteValue::Maybe,
        created_at: now - 1.minute(),
      },
      Vote {
        id: "v3".into(),
        user_name: "Megan".into(),
        name_id: "bob".into(),
        vote: VoteValue::Like,
        created_at: now,
      },
    ];

    let store = MockedStore::builder().names(vec![alice(), bob]).votes(votes).build();
    let history = super::voted_names(&store, "Daric").await.unwrap();

    assert_eq!(history.len(), 2);
    assert_eq!(history[0].name, "Bob");
    assert_eq!(history[0].vote, VoteValue::Maybe);
    assert_eq!(history[1].name, "Alice");
    assert_eq!(history[1].gender, Gender::Girl);
  }
}
