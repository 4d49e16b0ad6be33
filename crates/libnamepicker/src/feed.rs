use std::collections::{HashMap, HashSet};

use tracing::instrument;

use crate::{
  error::PickerError,
  ledger::required,
  model::{Name, Vote, VoteValue},
  store::Store,
};

/// Pick what to show a user next, given the pool and that user's votes.
///
/// Names the user never voted on come first, in storage order. Once every
/// name has a vote, the ones deferred with `maybe` come back, oldest vote
/// first.
pub(crate) fn select(names: Vec<Name>, votes: &[Vote]) -> Vec<Name> {
  let voted = votes.iter().map(|vote| vote.name_id.as_str()).collect::<HashSet<_>>();

  let unvoted = names.iter().filter(|name| !voted.contains(name.id.as_str())).cloned().collect::<Vec<_>>();

  if !unvoted.is_empty() {
    return unvoted;
  }

  let mut maybes = votes.iter().filter(|vote| vote.vote == VoteValue::Maybe).collect::<Vec<_>>();

  // Stable, so equal timestamps keep the order the votes were stored in.
  maybes.sort_by_key(|vote| vote.created_at);

  let mut names = names.into_iter().map(|name| (name.id.clone(), name)).collect::<HashMap<_, _>>();

  maybes.into_iter().filter_map(|vote| names.remove(&vote.name_id)).collect()
}

/// Next names to present to `user_name`.
#[instrument(skip(store))]
pub async fn next_batch<S: Store>(store: &S, user_name: &str) -> Result<Vec<Name>, PickerError> {
  let user_name = required("userName", user_name)?;

  let names = store.list_names().await?;
  let votes = store.user_votes(user_name).await?;

  let batch = select(names, &votes);

  tracing::debug!(size = batch.len(), "selected feed");

  Ok(batch)
}
