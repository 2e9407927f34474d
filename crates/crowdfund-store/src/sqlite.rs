//! SQLite implementation of the Store trait.
//!
//! This is the primary storage backend for the crowdfund ledger. It uses
//! rusqlite with bundled SQLite, wrapped in async via tokio::spawn_blocking.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use rusqlite::{params, Connection, OptionalExtension};

use crowdfund_core::Address;

use crate::error::{Result, StoreError};
use crate::migration::{self, now_millis};
use crate::traits::{CreateResult, Record, Store, UpdateResult};

/// SQLite-based store implementation.
///
/// Thread-safe via internal Mutex. All operations use spawn_blocking
/// to avoid blocking the async runtime.
pub struct SqliteStore {
    /// The SQLite connection, protected by a mutex.
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open a SQLite database at the given path.
    ///
    /// Creates the file and runs migrations if it doesn't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut conn = Connection::open(path)?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory SQLite database.
    ///
    /// Useful for testing.
    pub fn open_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run a blocking operation on the connection off the async runtime.
    async fn blocking<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = self.conn.clone();

        tokio::task::spawn_blocking(move || {
            let mut conn = conn.lock().map_err(|e| {
                StoreError::Database(rusqlite::Error::SqliteFailure(
                    rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_LOCKED),
                    Some(format!("mutex poisoned: {}", e)),
                ))
            })?;
            f(&mut conn)
        })
        .await
        .map_err(|e| StoreError::Task(format!("spawn_blocking failed: {}", e)))?
    }
}

fn address_from_blob(bytes: Vec<u8>, column: usize) -> rusqlite::Result<Address> {
    Address::try_from(bytes.as_slice()).map_err(|_| {
        rusqlite::Error::InvalidColumnType(column, "address".into(), rusqlite::types::Type::Blob)
    })
}

// Helper to convert a row to Record
fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<Record> {
    let address: Vec<u8> = row.get("address")?;
    let owner_program: Vec<u8> = row.get("owner_program")?;
    let data: Vec<u8> = row.get("data")?;
    let revision: i64 = row.get("revision")?;

    Ok(Record {
        address: address_from_blob(address, 0)?,
        owner_program: address_from_blob(owner_program, 1)?,
        data: Bytes::from(data),
        revision: revision as u64,
    })
}

#[async_trait]
impl Store for SqliteStore {
    async fn create_record(
        &self,
        address: &Address,
        owner_program: &Address,
        data: &[u8],
    ) -> Result<CreateResult> {
        let address = *address;
        let owner_program = *owner_program;
        let data = data.to_vec();

        self.blocking(move |conn| {
            let now = now_millis();
            let inserted = conn.execute(
                "INSERT OR IGNORE INTO records (
                    address, owner_program, data, size, revision, created_at, updated_at
                ) VALUES (?1, ?2, ?3, ?4, 0, ?5, ?5)",
                params![
                    address.0.as_slice(),
                    owner_program.0.as_slice(),
                    data.as_slice(),
                    data.len() as i64,
                    now,
                ],
            )?;

            if inserted == 0 {
                Ok(CreateResult::AlreadyExists)
            } else {
                tracing::debug!(%address, size = data.len(), "allocated record");
                Ok(CreateResult::Created)
            }
        })
        .await
    }

    async fn get_record(&self, address: &Address) -> Result<Option<Record>> {
        let address = *address;

        self.blocking(move |conn| {
            conn.query_row(
                "SELECT address, owner_program, data, revision FROM records WHERE address = ?1",
                params![address.0.as_slice()],
                row_to_record,
            )
            .optional()
            .map_err(StoreError::from)
        })
        .await
    }

    async fn has_record(&self, address: &Address) -> Result<bool> {
        let address = *address;

        self.blocking(move |conn| {
            let count: i64 = conn.query_row(
                "SELECT COUNT(*) FROM records WHERE address = ?1",
                params![address.0.as_slice()],
                |row| row.get(0),
            )?;
            Ok(count > 0)
        })
        .await
    }

    async fn update_record(
        &self,
        address: &Address,
        expected_revision: u64,
        data: &[u8],
    ) -> Result<UpdateResult> {
        let address = *address;
        let data = data.to_vec();

        self.blocking(move |conn| {
            let tx = conn.transaction()?;

            let current: Option<(i64, i64)> = tx
                .query_row(
                    "SELECT size, revision FROM records WHERE address = ?1",
                    params![address.0.as_slice()],
                    |row| Ok((row.get(0)?, row.get(1)?)),
                )
                .optional()?;

            let Some((size, revision)) = current else {
                return Ok(UpdateResult::NotFound);
            };

            if size as usize != data.len() {
                return Err(StoreError::SizeMismatch {
                    address: address.to_hex(),
                    expected: size as usize,
                    actual: data.len(),
                });
            }

            if revision as u64 != expected_revision {
                return Ok(UpdateResult::Stale {
                    current: revision as u64,
                });
            }

            tx.execute(
                "UPDATE records SET data = ?1, revision = revision + 1, updated_at = ?2
                 WHERE address = ?3",
                params![data.as_slice(), now_millis(), address.0.as_slice()],
            )?;
            tx.commit()?;

            Ok(UpdateResult::Updated {
                revision: revision as u64 + 1,
            })
        })
        .await
    }

    async fn list_records(&self, owner_program: &Address) -> Result<Vec<Address>> {
        let owner_program = *owner_program;

        self.blocking(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT address FROM records WHERE owner_program = ?1 ORDER BY address",
            )?;

            let addresses = stmt
                .query_map(params![owner_program.0.as_slice()], |row| {
                    address_from_blob(row.get(0)?, 0)
                })?
                .collect::<rusqlite::Result<Vec<_>>>()?;

            Ok(addresses)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn addr(b: u8) -> Address {
        Address::from_bytes([b; 32])
    }

    #[tokio::test]
    async fn test_sqlite_create_and_get() {
        let store = SqliteStore::open_memory().unwrap();

        let result = store.create_record(&addr(1), &addr(0xaa), b"abcd").await.unwrap();
        assert_eq!(result, CreateResult::Created);

        let record = store.get_record(&addr(1)).await.unwrap().unwrap();
        assert_eq!(record.address, addr(1));
        assert_eq!(record.owner_program, addr(0xaa));
        assert_eq!(record.data.as_ref(), b"abcd");
        assert_eq!(record.revision, 0);
    }

    #[tokio::test]
    async fn test_sqlite_duplicate_create() {
        let store = SqliteStore::open_memory().unwrap();

        store.create_record(&addr(1), &addr(0xaa), b"abcd").await.unwrap();
        let result = store.create_record(&addr(1), &addr(0xaa), b"zzzz").await.unwrap();
        assert_eq!(result, CreateResult::AlreadyExists);

        let record = store.get_record(&addr(1)).await.unwrap().unwrap();
        assert_eq!(record.data.as_ref(), b"abcd");
    }

    #[tokio::test]
    async fn test_sqlite_update_revisions() {
        let store = SqliteStore::open_memory().unwrap();
        store.create_record(&addr(1), &addr(0xaa), b"0000").await.unwrap();

        assert_eq!(
            store.update_record(&addr(1), 0, b"1111").await.unwrap(),
            UpdateResult::Updated { revision: 1 }
        );
        assert_eq!(
            store.update_record(&addr(1), 0, b"2222").await.unwrap(),
            UpdateResult::Stale { current: 1 }
        );
        assert_eq!(
            store.update_record(&addr(2), 0, b"2222").await.unwrap(),
            UpdateResult::NotFound
        );

        let record = store.get_record(&addr(1)).await.unwrap().unwrap();
        assert_eq!(record.data.as_ref(), b"1111");
        assert_eq!(record.revision, 1);
    }

    #[tokio::test]
    async fn test_sqlite_size_mismatch() {
        let store = SqliteStore::open_memory().unwrap();
        store.create_record(&addr(1), &addr(0xaa), b"0000").await.unwrap();

        let result = store.update_record(&addr(1), 0, b"00").await;
        assert!(matches!(result, Err(StoreError::SizeMismatch { expected: 4, actual: 2, .. })));
    }

    #[tokio::test]
    async fn test_sqlite_list_records() {
        let store = SqliteStore::open_memory().unwrap();
        store.create_record(&addr(2), &addr(0xaa), b"a").await.unwrap();
        store.create_record(&addr(1), &addr(0xaa), b"b").await.unwrap();
        store.create_record(&addr(3), &addr(0xbb), b"c").await.unwrap();

        assert_eq!(store.list_records(&addr(0xaa)).await.unwrap(), vec![addr(1), addr(2)]);
        assert!(store.has_record(&addr(3)).await.unwrap());
        assert!(!store.has_record(&addr(4)).await.unwrap());
    }

    #[tokio::test]
    async fn test_sqlite_persists_across_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("records.db");

        {
            let store = SqliteStore::open(&path).unwrap();
            store.create_record(&addr(1), &addr(0xaa), b"keep").await.unwrap();
            store.update_record(&addr(1), 0, b"kept").await.unwrap();
        }

        let store = SqliteStore::open(&path).unwrap();
        let record = store.get_record(&addr(1)).await.unwrap().unwrap();
        assert_eq!(record.data.as_ref(), b"kept");
        assert_eq!(record.revision, 1);
    }
}
