//! [`SqliteStore`] — the SQLite implementation of [`RosterStore`].

use std::path::Path;

use rusqlite::OptionalExtension as _;

use meetchain_core::{person::Person, store::RosterStore};

use crate::{Error, Result, schema::SCHEMA};

/// The single key the roster blob is stored under. There are no other
/// keys; `save` overwrites this value wholesale.
const ROSTER_KEY: &str = "meetchain_people";

// ─── Store ───────────────────────────────────────────────────────────────────

/// A MeetChain roster store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Read the raw stored blob, if any.
  async fn read_blob(&self) -> Result<Option<String>> {
    let raw = self
      .conn
      .call(|conn| {
        Ok(
          conn
            .query_row(
              "SELECT value FROM kv WHERE key = ?1",
              rusqlite::params![ROSTER_KEY],
              |row| row.get(0),
            )
            .optional()?,
        )
      })
      .await?;
    Ok(raw)
  }

  /// Replace the stored blob under [`ROSTER_KEY`].
  async fn write_blob(&self, value: String) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO kv (key, value) VALUES (?1, ?2)
           ON CONFLICT(key) DO UPDATE SET value = excluded.value",
          rusqlite::params![ROSTER_KEY, value],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Store an arbitrary string under the roster key, bypassing
  /// serialisation. Lets tests exercise the malformed-data path.
  #[cfg(test)]
  pub(crate) async fn write_raw_for_test(&self, value: &str) -> Result<()> {
    self.write_blob(value.to_owned()).await
  }
}

// ─── RosterStore impl ────────────────────────────────────────────────────────

impl RosterStore for SqliteStore {
  type Error = Error;

  async fn save(&self, people: &[Person]) -> Result<()> {
    let json = serde_json::to_string(people).map_err(Error::Json)?;
    self.write_blob(json).await
  }

  async fn load(&self) -> Vec<Person> {
    let raw = match self.read_blob().await {
      Ok(raw) => raw,
      Err(e) => {
        tracing::warn!("failed to read stored roster, starting empty: {e}");
        return Vec::new();
      }
    };

    let Some(json) = raw else {
      return Vec::new();
    };

    match serde_json::from_str(&json) {
      Ok(people) => people,
      Err(e) => {
        tracing::warn!("stored roster is malformed, starting empty: {e}");
        Vec::new()
      }
    }
  }
}
