//! [`Warehouse`]: async access to a warehouse file.

use std::{path::Path, time::Duration};

use rusqlite::Connection;
use serde::Deserialize;
use trove_core::registry;

use crate::{Dal, Result, Session, schema};

/// Connection settings for the store.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
  /// How long a writer waits for the database lock before failing with
  /// [`Error::Busy`](crate::Error::Busy).
  pub busy_timeout_ms: u64,
}

impl Default for StoreConfig {
  fn default() -> Self { Self { busy_timeout_ms: 5_000 } }
}

impl StoreConfig {
  pub fn busy_timeout(&self) -> Duration { Duration::from_millis(self.busy_timeout_ms) }
}

/// Open a synchronous connection with the schema applied. Callers that want
/// their own threads use this and wrap it in a [`Dal`].
pub fn connect(path: impl AsRef<Path>, config: &StoreConfig) -> Result<Connection> {
  let conn = Connection::open(path)?;
  schema::configure(&conn, config.busy_timeout())?;
  schema::apply(&conn)?;
  Ok(conn)
}

pub fn connect_in_memory() -> Result<Connection> {
  let conn = Connection::open_in_memory()?;
  schema::configure(&conn, StoreConfig::default().busy_timeout())?;
  schema::apply(&conn)?;
  Ok(conn)
}

/// A warehouse backed by a single SQLite file, driven from async code.
///
/// All work runs on the connection's dedicated thread. Cloning is cheap;
/// clones share that thread and therefore serialise their calls.
#[derive(Clone)]
pub struct Warehouse {
  conn: tokio_rusqlite::Connection,
}

impl Warehouse {
  /// Open (or create) a warehouse at `path` with default settings.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    Self::open_with(path, &StoreConfig::default()).await
  }

  pub async fn open_with(path: impl AsRef<Path>, config: &StoreConfig) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    Self::init(conn, config).await
  }

  /// Open an in-memory warehouse, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    Self::init(conn, &StoreConfig::default()).await
  }

  async fn init(conn: tokio_rusqlite::Connection, config: &StoreConfig) -> Result<Self> {
    let busy_timeout = config.busy_timeout();
    conn
      .call(move |conn| {
        schema::configure(conn, busy_timeout)?;
        schema::apply(conn)?;
        Ok(())
      })
      .await?;
    tracing::debug!("warehouse schema ready");
    Ok(Self { conn })
  }

  /// Run `f` against the connection. Each DAL call inside manages its own
  /// session unless `f` opens one.
  pub async fn run<T, F>(&self, f: F) -> Result<T>
  where
    T: Send + 'static,
    F: FnOnce(Dal<'_>) -> Result<T> + Send + 'static,
  {
    self.conn.call(move |conn| Ok(f(Dal::new(conn)))).await?
  }

  /// Run `f` inside one session: committed if it returns `Ok`, rolled back
  /// otherwise.
  pub async fn transaction<T, F>(&self, f: F) -> Result<T>
  where
    T: Send + 'static,
    F: FnOnce(Dal<'_>, &Session<'_>) -> Result<T> + Send + 'static,
  {
    self
      .run(move |dal| dal.with_session(None, |session| f(dal, session)))
      .await
  }

  /// Row count of every registered entity, in registry order.
  pub async fn counts(&self) -> Result<Vec<(&'static str, i64)>> {
    self
      .transaction(|_, session| {
        registry::ALL
          .iter()
          .map(|&entity| Ok((entity.name, session.count(entity)?)))
          .collect::<Result<Vec<_>>>()
      })
      .await
  }
}
