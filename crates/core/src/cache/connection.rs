//! SQLite-backed key-value store.
//!
//! Opens the database, applies pragmas for concurrent access (WAL mode) and
//! runs migrations. Values are stored as JSON text in a single `kv_store` table.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use serde_json::Value;
use tokio_rusqlite::{Connection, params};

use super::migrations;
use super::store::KeyValueStore;
use crate::Error;

const PRAGMAS: &str = "PRAGMA journal_mode=WAL;
     PRAGMA synchronous=NORMAL;
     PRAGMA temp_store=MEMORY;
     PRAGMA foreign_keys=ON;";

/// Cache database handle.
///
/// Wraps a tokio-rusqlite Connection that runs database operations
/// on a background thread. Clones share the connection.
#[derive(Clone, Debug)]
pub struct CacheDb {
    pub(crate) conn: Connection,
}

impl CacheDb {
    /// Open a database at the specified path, creating it if needed.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        let conn = Connection::open(path).await.map_err(|e| Error::Database(e.into()))?;
        Self::init(conn).await
    }

    /// Open an in-memory database for testing.
    pub async fn open_in_memory() -> Result<Self, Error> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| Error::Database(e.into()))?;
        Self::init(conn).await
    }

    async fn init(conn: Connection) -> Result<Self, Error> {
        conn.call(|conn| conn.execute_batch(PRAGMAS))
            .await
            .map_err(Error::Database)?;

        migrations::run(&conn).await?;

        Ok(Self { conn })
    }
}

fn decode_row(key: &str, raw: &str) -> Option<Value> {
    match serde_json::from_str(raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(key, error = %e, "skipping undecodable kv_store row");
            None
        }
    }
}

#[async_trait]
impl KeyValueStore for CacheDb {
    async fn get(&self, keys: &[String]) -> Result<HashMap<String, Value>, Error> {
        let keys = keys.to_vec();
        self.conn
            .call(move |conn| -> Result<HashMap<String, Value>, Error> {
                let mut stmt = conn.prepare_cached("SELECT value FROM kv_store WHERE key = ?1")?;
                let mut found = HashMap::new();
                for key in keys {
                    let mut rows = stmt.query(params![key])?;
                    if let Some(row) = rows.next()? {
                        let raw: String = row.get(0)?;
                        if let Some(value) = decode_row(&key, &raw) {
                            found.insert(key, value);
                        }
                    }
                }
                Ok(found)
            })
            .await
            .map_err(Error::from)
    }

    async fn set(&self, items: HashMap<String, Value>) -> Result<(), Error> {
        let rows = items
            .into_iter()
            .map(|(k, v)| serde_json::to_string(&v).map(|raw| (k, raw)))
            .collect::<Result<Vec<_>, _>>()?;
        let now = chrono::Utc::now().to_rfc3339();

        self.conn
            .call(move |conn| -> Result<(), Error> {
                let tx = conn.unchecked_transaction()?;
                {
                    let mut stmt = tx.prepare_cached(
                        "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)
                         ON CONFLICT(key) DO UPDATE SET
                            value = excluded.value,
                            updated_at = excluded.updated_at",
                    )?;
                    for (key, raw) in &rows {
                        stmt.execute(params![key, raw, now])?;
                    }
                }
                tx.commit()?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    async fn remove(&self, keys: &[String]) -> Result<(), Error> {
        if keys.is_empty() {
            return Ok(());
        }
        let keys = keys.to_vec();

        self.conn
            .call(move |conn| -> Result<(), Error> {
                let tx = conn.unchecked_transaction()?;
                {
                    let mut stmt = tx.prepare_cached("DELETE FROM kv_store WHERE key = ?1")?;
                    for key in &keys {
                        stmt.execute(params![key])?;
                    }
                }
                tx.commit()?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    async fn get_all(&self) -> Result<HashMap<String, Value>, Error> {
        self.conn
            .call(|conn| -> Result<HashMap<String, Value>, Error> {
                let mut stmt = conn.prepare("SELECT key, value FROM kv_store")?;
                let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?;

                let mut all = HashMap::new();
                for row in rows {
                    let (key, raw) = row?;
                    if let Some(value) = decode_row(&key, &raw) {
                        all.insert(key, value);
                    }
                }
                Ok(all)
            })
            .await
            .map_err(Error::from)
    }

    async fn increment(&self, key: &str) -> Result<u64, Error> {
        let key = key.to_string();
        let now = chrono::Utc::now().to_rfc3339();

        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let tx = conn.unchecked_transaction()?;
                let current = {
                    let mut stmt = tx.prepare_cached("SELECT value FROM kv_store WHERE key = ?1")?;
                    let mut rows = stmt.query(params![key])?;
                    match rows.next()? {
                        Some(row) => {
                            let raw: String = row.get(0)?;
                            decode_row(&key, &raw).and_then(|v| v.as_u64()).unwrap_or(0)
                        }
                        None => 0,
                    }
                };
                let next = current + 1;
                tx.execute(
                    "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)
                     ON CONFLICT(key) DO UPDATE SET
                        value = excluded.value,
                        updated_at = excluded.updated_at",
                    params![key, next.to_string(), now],
                )?;
                tx.commit()?;
                Ok(next)
            })
            .await
            .map_err(Error::from)
    }
}
