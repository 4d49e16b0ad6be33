pub mod mock;
pub mod sqlite;

use crate::{
  error::PickerError,
  model::{Name, Vote, VoteValue},
};

/// Relational storage for the name pool and the vote ledger.
///
/// Listing methods return rows in natural storage (insertion) order.
#[allow(async_fn_in_trait)]
pub trait Store: Clone + Send + Sync + 'static {
  fn health(&self) -> impl Future<Output = Result<bool, PickerError>> + Send;

  fn list_names(&self) -> impl Future<Output = Result<Vec<Name>, PickerError>> + Send;
  fn get_name(&self, id: &str) -> impl Future<Output = Result<Option<Name>, PickerError>> + Send;
  fn insert_name(&self, name: &Name) -> impl Future<Output = Result<(), PickerError>> + Send;
  /// Insert a name and a vote on it atomically: either both rows are written
  /// or none is.
  fn insert_name_with_vote(&self, name: &Name, vote: &Vote) -> impl Future<Output = Result<(), PickerError>> + Send;

  /// Record a vote, keyed on `(user_name, name_id)`.
  ///
  /// An existing row for the pair keeps its `id` and gets its `vote` and
  /// `created_at` replaced, otherwise `vote` is inserted as-is. Returns the
  /// value the pair held before the call.
  fn upsert_vote(&self, vote: &Vote) -> impl Future<Output = Result<Option<VoteValue>, PickerError>> + Send;
  fn user_votes(&self, user_name: &str) -> impl Future<Output = Result<Vec<Vote>, PickerError>> + Send;
  fn votes_with_value(&self, value: VoteValue) -> impl Future<Output = Result<Vec<Vote>, PickerError>> + Send;
  /// Votes holding `value` on a single name.
  fn name_votes(&self, name_id: &str, value: VoteValue) -> impl Future<Output = Result<Vec<Vote>, PickerError>> + Send;
}
