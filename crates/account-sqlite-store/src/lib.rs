//! SQLite-backed implementation of the authoritative account store.
//!
//! All SQLite work runs on the dedicated background thread that
//! `tokio_rusqlite` owns, keeping the async runtime free. The `UNIQUE`
//! constraint on the handle column is the subsystem's correctness boundary:
//! concurrent claim writers race into it and exactly one commits; the loser
//! surfaces as [`StoreError::HandleTaken`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use handle_claim::{Account, AccountId, AccountStore, StoreError, StoreResult};
use rusqlite::{params, ErrorCode, OptionalExtension};
use std::path::Path;
use tokio_rusqlite::Connection;
use tracing::info;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS accounts (
    id          TEXT PRIMARY KEY,
    handle      TEXT NOT NULL UNIQUE,
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);
";

const PRAGMAS: &str = "
PRAGMA journal_mode = WAL;
PRAGMA synchronous = NORMAL;
PRAGMA foreign_keys = ON;
PRAGMA busy_timeout = 5000;
";

/// Account store over a single SQLite database.
#[derive(Clone)]
pub struct SqliteAccountStore {
    conn: Connection,
    temp_prefix: String,
}

impl SqliteAccountStore {
    /// Open (creating if needed) the database at `path` and run migrations.
    ///
    /// `temp_prefix` marks handles that have not completed the claim
    /// transition; permanent-account queries exclude it.
    pub async fn open(path: &Path, temp_prefix: impl Into<String>) -> StoreResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| StoreError::Backend(format!("failed to create db dir: {e}")))?;
        }

        let conn = Connection::open(path)
            .await
            .map_err(|e| StoreError::Backend(format!("failed to open database: {e}")))?;

        let store = Self {
            conn,
            temp_prefix: temp_prefix.into(),
        };
        store.migrate().await?;

        info!(path = %path.display(), "Opened account store");

        Ok(store)
    }

    /// Open an in-memory database, for tests and throwaway environments.
    pub async fn open_in_memory(temp_prefix: impl Into<String>) -> StoreResult<Self> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| StoreError::Backend(format!("failed to open database: {e}")))?;

        let store = Self {
            conn,
            temp_prefix: temp_prefix.into(),
        };
        store.migrate().await?;

        Ok(store)
    }

    async fn migrate(&self) -> StoreResult<()> {
        self.conn
            .call(|conn| {
                conn.execute_batch(PRAGMAS)?;
                conn.execute_batch(SCHEMA)?;
                Ok(())
            })
            .await
            .map_err(map_db_err)
    }

    /// Insert a new account row. `HandleTaken` if the handle is in use.
    pub async fn insert_account(&self, id: &AccountId, handle: &str) -> StoreResult<Account> {
        let id = id.as_str().to_string();
        let handle = handle.to_string();
        let now = Utc::now();

        self.conn
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO accounts (id, handle, created_at, updated_at)
                     VALUES (?1, ?2, ?3, ?4)",
                    params![id, handle, now.to_rfc3339(), now.to_rfc3339()],
                )?;
                Ok(Account {
                    id: AccountId::new(id),
                    handle,
                    created_at: now,
                    updated_at: now,
                })
            })
            .await
            .map_err(map_db_err)
    }
}

#[async_trait]
impl AccountStore for SqliteAccountStore {
    async fn lookup_by_handle(&self, handle: &str) -> StoreResult<Option<Account>> {
        let handle = handle.to_string();

        self.conn
            .call(move |conn| {
                let account = conn
                    .query_row(
                        "SELECT id, handle, created_at, updated_at
                         FROM accounts WHERE handle = ?1",
                        params![handle],
                        account_from_row,
                    )
                    .optional()?;
                Ok(account)
            })
            .await
            .map_err(map_db_err)
    }

    async fn get_by_id(&self, id: &AccountId) -> StoreResult<Account> {
        let id_str = id.as_str().to_string();

        let account = self
            .conn
            .call(move |conn| {
                let account = conn
                    .query_row(
                        "SELECT id, handle, created_at, updated_at
                         FROM accounts WHERE id = ?1",
                        params![id_str],
                        account_from_row,
                    )
                    .optional()?;
                Ok(account)
            })
            .await
            .map_err(map_db_err)?;

        account.ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn update_handle(&self, id: &AccountId, handle: &str) -> StoreResult<Account> {
        let id_str = id.as_str().to_string();
        let handle = handle.to_string();
        let now = Utc::now();

        let account = self
            .conn
            .call(move |conn| {
                let changed = conn.execute(
                    "UPDATE accounts SET handle = ?2, updated_at = ?3 WHERE id = ?1",
                    params![id_str, handle, now.to_rfc3339()],
                )?;
                if changed == 0 {
                    return Ok(None);
                }
                let account = conn.query_row(
                    "SELECT id, handle, created_at, updated_at
                     FROM accounts WHERE id = ?1",
                    params![id_str],
                    account_from_row,
                )?;
                Ok(Some(account))
            })
            .await
            .map_err(map_db_err)?;

        account.ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn count_permanent(&self) -> StoreResult<u64> {
        let prefix = self.temp_prefix.clone();

        self.conn
            .call(move |conn| {
                // substr comparison instead of LIKE: the prefix may contain
                // LIKE wildcards ('_').
                let count: u64 = conn.query_row(
                    "SELECT COUNT(*) FROM accounts
                     WHERE substr(handle, 1, length(?1)) <> ?1",
                    params![prefix],
                    |row| row.get(0),
                )?;
                Ok(count)
            })
            .await
            .map_err(map_db_err)
    }

    async fn list_permanent_handles(&self) -> StoreResult<Vec<String>> {
        let prefix = self.temp_prefix.clone();

        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT handle FROM accounts
                     WHERE substr(handle, 1, length(?1)) <> ?1
                     ORDER BY handle",
                )?;
                let handles = stmt
                    .query_map(params![prefix], |row| row.get(0))?
                    .collect::<Result<Vec<String>, _>>()?;
                Ok(handles)
            })
            .await
            .map_err(map_db_err)
    }
}

fn account_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Account> {
    Ok(Account {
        id: AccountId::new(row.get::<_, String>(0)?),
        handle: row.get(1)?,
        created_at: parse_timestamp(row, 2)?,
        updated_at: parse_timestamp(row, 3)?,
    })
}

fn parse_timestamp(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
}

/// Map a database error, surfacing unique-constraint violations as the
/// distinguished `HandleTaken` the claim path branches on.
fn map_db_err(e: tokio_rusqlite::Error) -> StoreError {
    if let tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(failure, _)) = &e {
        if failure.code == ErrorCode::ConstraintViolation {
            return StoreError::HandleTaken;
        }
    }
    StoreError::Backend(e.to_string())
}
