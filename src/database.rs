use std::collections::HashMap;
use std::future::Future;
use std::path::Path;
use std::sync::{Mutex, PoisonError};

use tokio_rusqlite::{rusqlite, Connection};

use crate::error::Result;

/// Preference key under which the last used gist id is kept.
pub const GIST_ID_KEY: &str = "GIST_ID_KEY";

/// Small string key-value store that outlives the process.
pub trait PreferenceStore: Send + Sync {
    fn load(&self, key: &str) -> impl Future<Output = Result<Option<String>>> + Send;

    fn save(&self, key: &str, value: &str) -> impl Future<Output = Result<()>> + Send;
}

pub struct Database {
    conn: Connection,
}

impl Database {
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path).await?;
        let db = Database { conn };
        db.create_tables().await?;
        Ok(db)
    }

    pub async fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().await?;
        let db = Database { conn };
        db.create_tables().await?;
        Ok(db)
    }

    async fn create_tables(&self) -> Result<()> {
        self.conn
            .call(|conn| {
                conn.execute(
                    r#"CREATE TABLE IF NOT EXISTS preferences (
                        key TEXT NOT NULL PRIMARY KEY,
                        value TEXT NOT NULL
                    )"#,
                    [],
                )?;
                Ok::<_, rusqlite::Error>(())
            })
            .await?;
        Ok(())
    }
}

impl PreferenceStore for Database {
    async fn load(&self, key: &str) -> Result<Option<String>> {
        let key = key.to_owned();
        let value = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare("SELECT value FROM preferences WHERE key = ?1")?;
                let mut rows = stmt.query_map([key.as_str()], |row| row.get::<_, String>(0))?;
                let value = rows.next().transpose()?;
                Ok::<_, rusqlite::Error>(value)
            })
            .await?;
        Ok(value)
    }

    async fn save(&self, key: &str, value: &str) -> Result<()> {
        let (key, value) = (key.to_owned(), value.to_owned());
        self.conn
            .call(move |conn| {
                conn.execute(
                    r#"INSERT INTO preferences (key, value) VALUES (?1, ?2)
                    ON CONFLICT(key) DO UPDATE SET value = excluded.value"#,
                    [key.as_str(), value.as_str()],
                )?;
                Ok::<_, rusqlite::Error>(())
            })
            .await?;
        Ok(())
    }
}

/// Process-local store, nothing is written to disk.
#[derive(Default)]
pub struct MemoryPreferences {
    values: Mutex<HashMap<String, String>>,
}

impl PreferenceStore for MemoryPreferences {
    async fn load(&self, key: &str) -> Result<Option<String>> {
        let values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(values.get(key).cloned())
    }

    async fn save(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        values.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}
