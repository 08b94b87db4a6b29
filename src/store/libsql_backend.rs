//! libSQL backend: `KeyValueStore` over the `settings` table.
//!
//! Every row is keyed by `(user_id, key)`. A backend instance is scoped to a
//! single user id so the records of several users can share one database.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use libsql::{Connection, Database as LibSqlDatabase, params};
use tracing::{debug, info};

use crate::error::StoreError;
use crate::store::migrations;
use crate::store::traits::KeyValueStore;

/// User id used when no explicit scope is configured.
pub const DEFAULT_USER: &str = "default";

/// libSQL key-value backend.
///
/// Stores a single connection that is reused for all operations.
/// `libsql::Connection` is `Send + Sync` and safe for concurrent async use.
#[derive(Clone)]
pub struct LibSqlBackend {
    #[allow(dead_code)]
    db: Arc<LibSqlDatabase>,
    conn: Connection,
    user_id: String,
}

impl LibSqlBackend {
    /// Open (or create) a local database file and run migrations.
    pub async fn new_local(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                StoreError::Connection(format!("Failed to create database directory: {e}"))
            })?;
        }

        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(|e| StoreError::Connection(format!("Failed to open libSQL database: {e}")))?;

        let backend = Self::from_database(db)?;
        backend.init_schema().await?;
        info!(path = %path.display(), "Database opened");
        Ok(backend)
    }

    /// Create an in-memory database (for tests).
    pub async fn new_memory() -> Result<Self, StoreError> {
        let db = libsql::Builder::new_local(":memory:")
            .build()
            .await
            .map_err(|e| {
                StoreError::Connection(format!("Failed to create in-memory database: {e}"))
            })?;

        let backend = Self::from_database(db)?;
        backend.init_schema().await?;
        Ok(backend)
    }

    fn from_database(db: LibSqlDatabase) -> Result<Self, StoreError> {
        let conn = db
            .connect()
            .map_err(|e| StoreError::Connection(format!("Failed to create connection: {e}")))?;
        Ok(Self {
            db: Arc::new(db),
            conn,
            user_id: DEFAULT_USER.to_string(),
        })
    }

    /// Return a handle on the same database scoped to `user_id`.
    pub fn for_user(&self, user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            ..self.clone()
        }
    }

    /// The user id this handle reads and writes.
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Run all pending schema migrations.
    pub async fn init_schema(&self) -> Result<(), StoreError> {
        migrations::run_migrations(self.conn()).await
    }

    fn conn(&self) -> &Connection {
        &self.conn
    }
}

#[async_trait]
impl KeyValueStore for LibSqlBackend {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut rows = self
            .conn()
            .query(
                "SELECT value FROM settings WHERE user_id = ?1 AND key = ?2",
                params![self.user_id.as_str(), key],
            )
            .await
            .map_err(|e| StoreError::Query(format!("get: {e}")))?;

        match rows.next().await {
            Ok(Some(row)) => {
                let value: String = row
                    .get(0)
                    .map_err(|e| StoreError::Query(format!("get: {e}")))?;
                Ok(Some(value))
            }
            Ok(None) => Ok(None),
            Err(e) => Err(StoreError::Query(format!("get: {e}"))),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let now = Utc::now().to_rfc3339();
        self.conn()
            .execute(
                "INSERT INTO settings (user_id, key, value, updated_at) VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT (user_id, key) DO UPDATE SET value = ?3, updated_at = ?4",
                params![self.user_id.as_str(), key, value, now],
            )
            .await
            .map_err(|e| StoreError::Query(format!("set: {e}")))?;
        debug!(user_id = %self.user_id, key, "Setting stored");
        Ok(())
    }

    async fn remove_many(&self, keys: &[&str]) -> Result<(), StoreError> {
        for key in keys {
            self.conn()
                .execute(
                    "DELETE FROM settings WHERE user_id = ?1 AND key = ?2",
                    params![self.user_id.as_str(), *key],
                )
                .await
                .map_err(|e| StoreError::Query(format!("remove_many: {e}")))?;
        }
        debug!(user_id = %self.user_id, count = keys.len(), "Settings removed");
        Ok(())
    }
}
