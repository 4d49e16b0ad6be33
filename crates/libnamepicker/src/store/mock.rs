use std::sync::Arc;

use bon::bon;
use tokio::sync::RwLock;

use crate::{
  error::PickerError,
  model::{Name, Vote, VoteValue},
  store::Store,
};

#[derive(Debug, Default)]
struct Tables {
  names: Vec<Name>,
  votes: Vec<Vote>,
}

/// In-memory store, used in tests.
///
/// `failing_after` makes name insertions fail once that many names were
/// inserted through this store, to exercise partial batch failures.
#[derive(Clone, Debug)]
pub struct MockedStore {
  tables: Arc<RwLock<Tables>>,
  healthy: bool,
  failing_after: Option<usize>,
  inserted: Arc<RwLock<usize>>,
}

#[bon]
impl MockedStore {
  #[builder]
  pub fn new(#[builder(default)] names: Vec<Name>, #[builder(default)] votes: Vec<Vote>, #[builder(default = true)] healthy: bool, failing_after: Option<usize>) -> MockedStore {
    MockedStore {
      tables: Arc::new(RwLock::new(Tables { names, votes })),
      healthy,
      failing_after,
      inserted: Arc::default(),
    }
  }

  /// Snapshot of every stored vote, in insertion order.
  pub async fn votes(&self) -> Vec<Vote> {
    self.tables.read().await.votes.clone()
  }

  async fn check_insert(&self) -> Result<(), PickerError> {
    let mut inserted = self.inserted.write().await;

    if let Some(limit) = self.failing_after
      && *inserted >= limit
    {
      return Err(PickerError::PersistenceError(sqlx::Error::Protocol("mocked store refused the write".into())));
    }

    *inserted += 1;

    Ok(())
  }
}

impl Default for MockedStore {
  fn default() -> Self {
    MockedStore::builder().build()
  }
}

fn upsert(tables: &mut Tables, vote: &Vote) -> Option<VoteValue> {
  match tables.votes.iter_mut().find(|existing| existing.user_name == vote.user_name && existing.name_id == vote.name_id) {
    Some(existing) => {
      let previous = existing.vote;

      existing.vote = vote.vote;
      existing.created_at = vote.created_at;

      Some(previous)
    }

    None => {
      tables.votes.push(vote.clone());

      None
    }
  }
}

impl Store for MockedStore {
  async fn health(&self) -> Result<bool, PickerError> {
    Ok(self.healthy)
  }

  async fn list_names(&self) -> Result<Vec<Name>, PickerError> {
    Ok(self.tables.read().await.names.clone())
  }

  async fn get_name(&self, id: &str) -> Result<Option<Name>, PickerError> {
    Ok(self.tables.read().await.names.iter().find(|name| name.id == id).cloned())
  }

  async fn insert_name(&self, name: &Name) -> Result<(), PickerError> {
    self.check_insert().await?;
    self.tables.write().await.names.push(name.clone());

    Ok(())
  }

  async fn insert_name_with_vote(&self, name: &Name, vote: &Vote) -> Result<(), PickerError> {
    self.check_insert().await?;

    let mut tables = self.tables.write().await;

    tables.names.push(name.clone());
    upsert(&mut tables, vote);

    Ok(())
  }

  async fn upsert_vote(&self, vote: &Vote) -> Result<Option<VoteValue>, PickerError> {
    Ok(upsert(&mut *self.tables.write().await, vote))
  }

  async fn user_votes(&self, user_name: &str) -> Result<Vec<Vote>, PickerError> {
    Ok(self.tables.read().await.votes.iter().filter(|vote| vote.user_name == user_name).cloned().collect())
  }

  async fn votes_with_value(&self, value: VoteValue) -> Result<Vec<Vote>, PickerError> {
    Ok(self.tables.read().await.votes.iter().filter(|vote| vote.vote == value).cloned().collect())
  }

  async fn name_votes(&self, name_id: &str, value: VoteValue) -> Result<Vec<Vote>, PickerError> {
    Ok(self.tables.read().await.votes.iter().filter(|vote| vote.name_id == name_id && vote.vote == value).cloned().collect())
  }
}
