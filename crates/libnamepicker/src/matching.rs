use std::collections::HashSet;

use itertools::Itertools;
use tracing::instrument;

use crate::{
  error::PickerError,
  ledger::required,
  model::{Name, Vote, VoteValue},
  store::Store,
};

/// Whether another user than `acting_user` currently likes the name.
///
/// Meant to be called right after `acting_user` liked it. Creators count as
/// likers through the vote recorded when they submitted the name.
#[instrument(skip(store))]
pub async fn is_match<S: Store>(store: &S, name_id: &str, acting_user: &str) -> Result<bool, PickerError> {
  let acting_user = required("userName", acting_user)?;
  let likes = store.name_votes(name_id, VoteValue::Like).await?;

  Ok(likes.iter().any(|vote| vote.user_name != acting_user))
}

/// Ids of the names liked by `user_name` and at least one other user.
pub(crate) fn matched_name_ids<'v>(likes: &'v [Vote], user_name: &str) -> HashSet<&'v str> {
  likes
    .iter()
    .filter(|vote| vote.vote == VoteValue::Like)
    .into_group_map_by(|vote| vote.name_id.as_str())
    .into_iter()
    .filter(|(_, votes)| votes.iter().any(|vote| vote.user_name == user_name) && votes.iter().any(|vote| vote.user_name != user_name))
    .map(|(name_id, _)| name_id)
    .collect()
}

/// Every name matched by `user_name`, in storage order.
#[instrument(skip(store))]
pub async fn matches<S: Store>(store: &S, user_name: &str) -> Result<Vec<Name>, PickerError> {
  let user_name = required("userName", user_name)?;
  let likes = store.votes_with_value(VoteValue::Like).await?;
  let matched = matched_name_ids(&likes, user_name);

  if matched.is_empty() {
    return Ok(Vec::new());
  }

  Ok(store.list_names().await?.into_iter().filter(|name| matched.contains(name.id.as_str())).collect())
}

#[cfg(test)]
mod tests {
  use jiff::Timestamp;

  use crate::{
    ledger,
    model::{Gender, Name, Vote, VoteValue},
    store::mock::MockedStore,
  };

  fn vote(user: &str, name_id: &str, value: VoteValue) -> Vote {
    Vote {
      id: format!("{user}-{name_id}"),
      user_name: user.to_string(),
      name_id: name_id.to_string(),
      vote: value,
      created_at: Timestamp::now(),
    }
  }

  fn names() -> Vec<Name> {
    ["alice", "bob", "cleo"].iter().map(|id| Name::builder().id(*id).name(id.to_uppercase()).gender(Gender::Neutral).build()).collect()
  }

  #[test]
  fn matched_name_ids() {
    let likes = vec![
      vote("Daric", "alice", VoteValue::Like),
      vote("Megan", "alice", VoteValue::Like),
      vote("Daric", "bob", VoteValue::Like),
      vote("Megan", "cleo", VoteValue::Like),
      vote("Megan", "bob", VoteValue::Dislike),
    ];

    let matched = super::matched_name_ids(&likes, "Daric");

    assert_eq!(matched.len(), 1);
    assert!(matched.contains("alice"));

    // Order of votes does not matter.
    let reversed = likes.iter().rev().cloned().collect::<Vec<_>>();

    assert_eq!(super::matched_name_ids(&reversed, "Daric"), matched);
    assert_eq!(super::matched_name_ids(&reversed, "Megan"), matched);
    assert!(super::matched_name_ids(&likes, "Eve").is_empty());
  }

  #[tokio::test]
  async fn second_like_is_a_match() {
    let store = MockedStore::builder().names(names()).build();

    ledger::upsert_vote(&store, "Daric", "alice", VoteValue::Like).await.unwrap();
    assert!(!super::is_match(&store, "alice", "Daric").await.unwrap());

    ledger::upsert_vote(&store, "Megan", "alice", VoteValue::Like).await.unwrap();
    assert!(super::is_match(&store, "alice", "Megan").await.unwrap());

    let matches = super::matches(&store, "Daric").await.unwrap();

    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].id, "alice");
    assert_eq!(super::matches(&store, "Megan").await.unwrap(), matches);
  }

  #[tokio::test]
  async fn creator_counts_as_liker() {
    let store = MockedStore::builder().build();

    let submission = ledger::submit_name(&store, "Juniper", Gender::Neutral, Some("Megan")).await.unwrap();
    let id = submission.name.id;

    assert!(!super::is_match(&store, &id, "Megan").await.unwrap());

    ledger::upsert_vote(&store, "Daric", &id, VoteValue::Like).await.unwrap();

    assert!(super::is_match(&store, &id, "Daric").await.unwrap());
  }

  #[tokio::test]
  async fn same_user_twice_is_not_a_match() {
    let store = MockedStore::builder().names(names()).build();

    ledger::upsert_vote(&store, "Daric", "bob", VoteValue::Like).await.unwrap();
    ledger::upsert_vote(&store, "Daric", "bob", VoteValue::Like).await.unwrap();

    assert!(!super::is_match(&store, "bob", "Daric").await.unwrap());
    assert!(super::matches(&store, "Daric").await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn follows_current_votes() {
    let store = MockedStore::builder().names(names()).build();

    ledger::upsert_vote(&store, "Megan", "cleo", VoteValue::Like).await.unwrap();
    ledger::upsert_vote(&store, "Daric", "cleo", VoteValue::Dislike).await.unwrap();

    assert!(super::matches(&store, "Megan").await.unwrap().is_empty());

    ledger::upsert_vote(&store, "Daric", "cleo", VoteValue::Like).await.unwrap();

    assert!(super::is_match(&store, "cleo", "Daric").await.unwrap());
    assert_eq!(super::matches(&store, "Megan").await.unwrap().len(), 1);

    ledger::upsert_vote(&store, "Megan", "cleo", VoteValue::Maybe).await.unwrap();

    assert!(!super::is_match(&store, "cleo", "Daric").await.unwrap());
    assert!(super::matches(&store, "Daric").await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn matches_in_storage_order() {
    let store = MockedStore::builder().names(names()).build();

    for id in ["cleo", "alice", "bob"] {
      ledger::upsert_vote(&store, "Daric", id, VoteValue::Like).await.unwrap();
      ledger::upsert_vote(&store, "Megan", id, VoteValue::Like).await.unwrap();
    }

    let matches = super::matches(&store, "Daric").await.unwrap();

    assert_eq!(matches.iter().map(|name| name.id.as_str()).collect::<Vec<_>>(), vec!["alice", "bob", "cleo"]);
  }
}
