//! [`Session`]: one open write transaction, and the scoping rule every DAL
//! method follows.

use rusqlite::{Connection, Transaction, TransactionBehavior};

use crate::{Error, Result};

/// A live transaction on one connection.
///
/// Sessions begin `IMMEDIATE`, taking the write lock up front. Dropping a
/// session without committing rolls it back.
pub struct Session<'c> {
  tx: Transaction<'c>,
}

impl<'c> Session<'c> {
  pub fn begin(conn: &'c Connection) -> Result<Self> {
    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)
      .map_err(|e| Error::from_sqlite("transaction", e))?;
    tracing::trace!("session begun");
    Ok(Self { tx })
  }

  pub fn commit(self) -> Result<()> {
    self
      .tx
      .commit()
      .map_err(|e| Error::from_sqlite("transaction", e))?;
    tracing::trace!("session committed");
    Ok(())
  }

  pub fn rollback(self) -> Result<()> {
    self.tx.rollback()?;
    tracing::trace!("session rolled back");
    Ok(())
  }

  pub(crate) fn conn(&self) -> &Connection { &self.tx }
}

/// Run `f` inside `session` if one is supplied, otherwise inside a fresh
/// session that is committed on `Ok` and rolled back on `Err`.
///
/// A supplied session is never committed or rolled back here; its owner
/// decides.
pub fn scoped<T, F>(conn: &Connection, session: Option<&Session<'_>>, f: F) -> Result<T>
where
  F: FnOnce(&Session<'_>) -> Result<T>,
{
  if let Some(session) = session {
    return f(session);
  }

  let session = Session::begin(conn)?;
  match f(&session) {
    Ok(value) => {
      session.commit()?;
      Ok(value)
    }
    Err(err) => {
      tracing::warn!(error = %err, "rolling back session");
      if let Err(rollback_err) = session.rollback() {
        tracing::error!(error = %rollback_err, "rollback failed");
      }
      Err(err)
    }
  }
}
