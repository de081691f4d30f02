//! Session provider and per-request units of work

use std::path::PathBuf;
use std::time::Duration;
use rusqlite::{Connection, Transaction, TransactionBehavior};
use crate::Result;
use super::schema;

/// How long a session waits on a locked database before failing
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Process-wide factory for sessions against one database file.
///
/// Holds configuration only; no connection outlives a request.
#[derive(Debug, Clone)]
pub struct SessionProvider {
    path: PathBuf,
}

impl SessionProvider {
    /// Prepare the database file (creates it and its tables if missing)
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let provider = Self { path };
        provider.session()?.initialize_schema()?;
        tracing::info!("Database ready at {}", provider.path.display());
        Ok(provider)
    }

    /// Open a fresh unit of work
    pub fn session(&self) -> Result<Session> {
        let conn = Connection::open(&self.path)?;
        conn.execute_batch(schema::SESSION_PRAGMAS)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        tracing::trace!("Session opened on {}", self.path.display());
        Ok(Session { conn })
    }
}

/// A single request's handle to the database.
///
/// The connection is closed when the session is dropped, whether the
/// request succeeded or not.
pub struct Session {
    conn: Connection,
}

impl Session {
    /// Initialize the database schema
    fn initialize_schema(&self) -> Result<()> {
        for stmt in schema::all_schema_statements() {
            self.conn.execute(stmt, [])?;
        }
        Ok(())
    }

    /// Read-only access to the underlying connection
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Run `work` inside a transaction.
    ///
    /// The write lock is taken up front (`BEGIN IMMEDIATE`) so concurrent
    /// read-then-write units wait on the busy timeout instead of failing
    /// with a lock-upgrade deadlock. Commits when `work` succeeds; rolls
    /// back and returns its error otherwise.
    pub fn unit_of_work<T, F>(&mut self, work: F) -> Result<T>
    where
        F: FnOnce(&Transaction<'_>) -> Result<T>,
    {
        let tx = self.conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        match work(&tx) {
            Ok(value) => {
                tx.commit()?;
                Ok(value)
            }
            Err(e) => {
                if let Err(rollback_err) = tx.rollback() {
                    tracing::warn!("Rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        tracing::trace!("Session released");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    fn provider() -> (tempfile::TempDir, SessionProvider) {
        let dir = tempfile::tempdir().unwrap();
        let provider = SessionProvider::open(dir.path().join("orderdesk.db")).unwrap();
        (dir, provider)
    }

    fn count_products(session: &Session) -> i64 {
        session
            .connection()
            .query_row(r#"SELECT COUNT(*) FROM "Product""#, [], |row| row.get(0))
            .unwrap()
    }

    #[test]
    fn test_open_creates_tables_and_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("data.db");
        let provider = SessionProvider::open(&path).unwrap();
        assert!(path.exists());

        let session = provider.session().unwrap();
        assert_eq!(count_products(&session), 0);

        // Reopening an existing database is a no-op for the schema
        drop(session);
        SessionProvider::open(&path).unwrap();
    }

    #[test]
    fn test_foreign_keys_enabled_per_session() {
        let (_dir, provider) = provider();
        let session = provider.session().unwrap();
        let enabled: i64 = session
            .connection()
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert_eq!(enabled, 1);
    }

    #[test]
    fn test_unit_of_work_commits_on_success() {
        let (_dir, provider) = provider();
        let mut session = provider.session().unwrap();

        session
            .unit_of_work(|tx| {
                tx.execute(r#"INSERT INTO "Product" (name, price) VALUES ('Widget', 1.5)"#, [])?;
                Ok(())
            })
            .unwrap();

        let other = provider.session().unwrap();
        assert_eq!(count_products(&other), 1);
    }

    #[test]
    fn test_unit_of_work_rolls_back_on_error() {
        let (_dir, provider) = provider();
        let mut session = provider.session().unwrap();

        let result: Result<()> = session.unit_of_work(|tx| {
            tx.execute(r#"INSERT INTO "Product" (name, price) VALUES ('Widget', 1.5)"#, [])?;
            tx.execute(
                r#"INSERT INTO "Order" (client_name, product_id, client_house) VALUES ('Ana', 999, 'Rua A')"#,
                [],
            )?;
            Ok(())
        });

        assert!(matches!(result, Err(Error::Storage(_))));
        assert_eq!(count_products(&session), 0);
    }
}
