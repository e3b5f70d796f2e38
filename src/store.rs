//! Key-value storage for class records, one record per class id.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::info;

use crate::models::Class;
use crate::settings::{StoreBackend, StoreSettings};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("record encoding error: {0}")]
    Codec(#[from] serde_json::Error),
    #[error("store is closed")]
    Closed,
}

/// Storage contract used by the schedule. Writes replace the whole record.
#[async_trait]
pub trait ClassStore: Send + Sync {
    async fn get(&self, id: i64) -> Result<Option<Class>, StoreError>;
    async fn set(&self, class: &Class) -> Result<(), StoreError>;
    /// Removing an absent key succeeds.
    async fn delete(&self, id: i64) -> Result<(), StoreError>;
    /// Every record, in no particular order.
    async fn list(&self) -> Result<Vec<Class>, StoreError>;
    async fn ping(&self) -> Result<(), StoreError>;
    async fn close(&self) -> Result<(), StoreError>;
}

pub async fn open(settings: &StoreSettings) -> Result<Arc<dyn ClassStore>, StoreError> {
    match settings.backend {
        StoreBackend::Memory => {
            info!("Opening in-memory class store");
            Ok(Arc::new(MemoryStore::new()))
        }
        StoreBackend::Sqlite => {
            info!(url = %settings.database_url, "Opening SQLite class store");
            Ok(Arc::new(SqliteStore::open(&settings.database_url).await?))
        }
    }
}

#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<i64, Class>>,
    closed: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_open(&self) -> Result<(), StoreError> {
        if self.closed.load(Ordering::Acquire) {
            Err(StoreError::Closed)
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ClassStore for MemoryStore {
    async fn get(&self, id: i64) -> Result<Option<Class>, StoreError> {
        self.ensure_open()?;
        Ok(self.records.read().await.get(&id).cloned())
    }

    async fn set(&self, class: &Class) -> Result<(), StoreError> {
        self.ensure_open()?;
        self.records.write().await.insert(class.id, class.clone());
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        self.ensure_open()?;
        self.records.write().await.remove(&id);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Class>, StoreError> {
        self.ensure_open()?;
        Ok(self.records.read().await.values().cloned().collect())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.ensure_open()
    }

    async fn close(&self) -> Result<(), StoreError> {
        self.closed.store(true, Ordering::Release);
        self.records.write().await.clear();
        Ok(())
    }
}

/// Records stored as JSON text in a single `classes(key, value)` table.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub async fn open(database_url: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let mut pool_options = SqlitePoolOptions::new();
        if database_url.contains(":memory:") {
            // every connection would otherwise see its own empty database
            pool_options = pool_options
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None::<Duration>)
                .max_lifetime(None::<Duration>);
        }
        let pool = pool_options.connect_with(options).await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS classes (
                key INTEGER PRIMARY KEY,
                value TEXT NOT NULL
            )",
        )
        .execute(&pool)
        .await?;

        Ok(Self { pool })
    }

    fn ensure_open(&self) -> Result<(), StoreError> {
        if self.pool.is_closed() {
            Err(StoreError::Closed)
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ClassStore for SqliteStore {
    async fn get(&self, id: i64) -> Result<Option<Class>, StoreError> {
        self.ensure_open()?;
        let value = sqlx::query_scalar::<_, String>("SELECT value FROM classes WHERE key = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        value
            .map(|json| serde_json::from_str(&json))
            .transpose()
            .map_err(StoreError::from)
    }

    async fn set(&self, class: &Class) -> Result<(), StoreError> {
        self.ensure_open()?;
        let value = serde_json::to_string(class)?;
        sqlx::query(
            "INSERT INTO classes (key, value) VALUES (?, ?)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        )
        .bind(class.id)
        .bind(value)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        self.ensure_open()?;
        sqlx::query("DELETE FROM classes WHERE key = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Class>, StoreError> {
        self.ensure_open()?;
        let values = sqlx::query_scalar::<_, String>("SELECT value FROM classes")
            .fetch_all(&self.pool)
            .await?;
        values
            .iter()
            .map(|json| serde_json::from_str(json).map_err(StoreError::from))
            .collect()
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.ensure_open()?;
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn close(&self) -> Result<(), StoreError> {
        self.pool.close().await;
        info!("SQLite class store closed");
        Ok(())
    }
}
