use std::str::FromStr;

use jiff::Timestamp;
use sqlx::{
  Database, FromRow, Sqlite, SqlitePool,
  query::Query,
  sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
};
use tracing::instrument;

use crate::{
  error::PickerError,
  model::{Gender, Name, Vote, VoteValue},
  store::Store,
};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS names (
  id TEXT PRIMARY KEY NOT NULL,
  name TEXT NOT NULL,
  gender TEXT NOT NULL,
  origin TEXT,
  created_by TEXT,
  created_at INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS votes (
  id TEXT PRIMARY KEY NOT NULL,
  user_name TEXT NOT NULL,
  name_id TEXT NOT NULL REFERENCES names (id),
  vote TEXT NOT NULL,
  created_at INTEGER NOT NULL,
  UNIQUE (user_name, name_id)
);

CREATE INDEX IF NOT EXISTS votes_vote ON votes (vote);
CREATE INDEX IF NOT EXISTS votes_name_vote ON votes (name_id, vote);
"#;

// Takes the write lock upfront, so concurrent writers queue on the busy
// timeout instead of failing to upgrade a read lock.
const BEGIN_WRITE: &str = "BEGIN IMMEDIATE";

/// Store backed by a SQLite database.
#[derive(Clone, Debug)]
pub struct SqliteStore {
  pool: SqlitePool,
}

#[derive(FromRow)]
struct NameRow {
  id: String,
  name: String,
  gender: String,
  origin: Option<String>,
  created_by: Option<String>,
  created_at: i64,
}

#[derive(FromRow)]
struct VoteRow {
  id: String,
  user_name: String,
  name_id: String,
  vote: String,
  created_at: i64,
}

fn decode_error<E: std::error::Error + Send + Sync + 'static>(err: E) -> PickerError {
  PickerError::PersistenceError(sqlx::Error::Decode(Box::new(err)))
}

impl TryFrom<NameRow> for Name {
  type Error = PickerError;

  fn try_from(row: NameRow) -> Result<Self, Self::Error> {
    Ok(Name {
      id: row.id,
      name: row.name,
      gender: Gender::from_str(&row.gender).map_err(decode_error)?,
      origin: row.origin,
      created_by: row.created_by,
      created_at: Timestamp::from_millisecond(row.created_at).map_err(decode_error)?,
    })
  }
}

impl TryFrom<VoteRow> for Vote {
  type Error = PickerError;

  fn try_from(row: VoteRow) -> Result<Self, Self::Error> {
    Ok(Vote {
      id: row.id,
      user_name: row.user_name,
      name_id: row.name_id,
      vote: VoteValue::from_str(&row.vote).map_err(decode_error)?,
      created_at: Timestamp::from_millisecond(row.created_at).map_err(decode_error)?,
    })
  }
}

impl SqliteStore {
  /// Connect to the database at `url`, creating it and its tables if needed.
  pub async fn connect(url: &str) -> Result<SqliteStore, PickerError> {
    let options = SqliteConnectOptions::from_str(url)?
      .create_if_missing(true)
      .foreign_keys(true)
      .journal_mode(SqliteJournalMode::Wal);
    let pool = SqlitePoolOptions::new().connect_with(options).await?;

    SqliteStore::with_pool(pool).await
  }

  /// Private in-memory database, lost when the store is dropped.
  pub async fn in_memory() -> Result<SqliteStore, PickerError> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

    // Every connection to `:memory:` opens a distinct database, so the pool
    // must hold on to exactly one.
    let pool = SqlitePoolOptions::new()
      .min_connections(1)
      .max_connections(1)
      .idle_timeout(None)
      .max_lifetime(None)
      .connect_with(options)
      .await?;

    SqliteStore::with_pool(pool).await
  }

  async fn with_pool(pool: SqlitePool) -> Result<SqliteStore, PickerError> {
    sqlx::raw_sql(SCHEMA).execute(&pool).await?;

    tracing::info!("database schema is up to date");

    Ok(SqliteStore { pool })
  }
}

type SqliteQuery<'q> = Query<'q, Sqlite, <Sqlite as Database>::Arguments<'q>>;

fn insert_name_query(name: &Name) -> SqliteQuery<'_> {
  sqlx::query("INSERT INTO names (id, name, gender, origin, created_by, created_at) VALUES (?, ?, ?, ?, ?, ?)")
    .bind(name.id.as_str())
    .bind(name.name.as_str())
    .bind(name.gender.as_str())
    .bind(name.origin.as_deref())
    .bind(name.created_by.as_deref())
    .bind(name.created_at.as_millisecond())
}

// The row id of an existing pair is kept, only the stance and its timestamp change.
fn upsert_vote_query(vote: &Vote) -> SqliteQuery<'_> {
  sqlx::query(
    "INSERT INTO votes (id, user_name, name_id, vote, created_at) VALUES (?, ?, ?, ?, ?)
      ON CONFLICT (user_name, name_id) DO UPDATE SET vote = excluded.vote, created_at = excluded.created_at",
  )
  .bind(vote.id.as_str())
  .bind(vote.user_name.as_str())
  .bind(vote.name_id.as_str())
  .bind(vote.vote.as_str())
  .bind(vote.created_at.as_millisecond())
}

impl Store for SqliteStore {
  async fn health(&self) -> Result<bool, PickerError> {
    match sqlx::query("SELECT 1").execute(&self.pool).await {
      Ok(_) => Ok(true),

      Err(err) => {
        tracing::warn!(error = %err, "database is not reachable");

        Ok(false)
      }
    }
  }

  #[instrument(skip_all)]
  async fn list_names(&self) -> Result<Vec<Name>, PickerError> {
    sqlx::query_as::<_, NameRow>("SELECT id, name, gender, origin, created_by, created_at FROM names ORDER BY rowid")
      .fetch_all(&self.pool)
      .await?
      .into_iter()
      .map(Name::try_from)
      .collect()
  }

  #[instrument(skip(self))]
  async fn get_name(&self, id: &str) -> Result<Option<Name>, PickerError> {
    sqlx::query_as::<_, NameRow>("SELECT id, name, gender, origin, created_by, created_at FROM names WHERE id = ?")
      .bind(id)
      .fetch_optional(&self.pool)
      .await?
      .map(Name::try_from)
      .transpose()
  }

  #[instrument(skip_all, fields(name = %name.name))]
  async fn insert_name(&self, name: &Name) -> Result<(), PickerError> {
    insert_name_query(name).execute(&self.pool).await?;

    Ok(())
  }

  #[instrument(skip_all, fields(name = %name.name, user = %vote.user_name))]
  async fn insert_name_with_vote(&self, name: &Name, vote: &Vote) -> Result<(), PickerError> {
    let mut tx = self.pool.begin_with(BEGIN_WRITE).await?;

    insert_name_query(name).execute(&mut *tx).await?;

    upsert_vote_query(vote).execute(&mut *tx).await?;

    tx.commit().await?;

    Ok(())
  }

  #[instrument(skip_all, fields(user = %vote.user_name, name_id = %vote.name_id))]
  async fn upsert_vote(&self, vote: &Vote) -> Result<Option<VoteValue>, PickerError> {
    let mut tx = self.pool.begin_with(BEGIN_WRITE).await?;

    let previous: Option<String> = sqlx::query_scalar("SELECT vote FROM votes WHERE user_name = ? AND name_id = ?")
      .bind(vote.user_name.as_str())
      .bind(vote.name_id.as_str())
      .fetch_optional(&mut *tx)
      .await?;

    upsert_vote_query(vote).execute(&mut *tx).await?;

    tx.commit().await?;

    previous.map(|value| VoteValue::from_str(&value).map_err(decode_error)).transpose()
  }

  #[instrument(skip(self))]
  async fn user_votes(&self, user_name: &str) -> Result<Vec<Vote>, PickerError> {
    sqlx::query_as::<_, VoteRow>("SELECT id, user_name, name_id, vote, created_at FROM votes WHERE user_name = ? ORDER BY rowid")
      .bind(user_name)
      .fetch_all(&self.pool)
      .await?
      .into_iter()
      .map(Vote::try_from)
      .collect()
  }

  #[instrument(skip(self))]
  async fn votes_with_value(&self, value: VoteValue) -> Result<Vec<Vote>, PickerError> {
    sqlx::query_as::<_, VoteRow>("SELECT id, user_name, name_id, vote, created_at FROM votes WHERE vote = ? ORDER BY rowid")
      .bind(value.as_str())
      .fetch_all(&self.pool)
      .await?
      .into_iter()
      .map(Vote::try_from)
      .collect()
  }

  #[instrument(skip(self))]
  async fn name_votes(&self, name_id: &str, value: VoteValue) -> Result<Vec<Vote>, PickerError> {
    sqlx::query_as::<_, VoteRow>("SELECT id, user_name, name_id, vote, created_at FROM votes WHERE name_id = ? AND vote = ? ORDER BY rowid")
      .bind(name_id)
      .bind(value.as_str())
      .fetch_all(&self.pool)
      .await?
      .into_iter()
      .map(Vote::try_from)
      .collect()
  }
}
