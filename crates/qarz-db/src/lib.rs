//! Qarz Database - key/value persistence for the notification engine
//!
//! Every engine store is written as one JSON document under a fixed key
//! (`notifications`, `notification_logs`, ...). Two backends exist:
//! - [`Database`]: SQLite file via sqlx
//! - [`MemoryBackend`]: process memory

pub mod kv;
pub mod memory;
pub mod schema;

use async_trait::async_trait;
use qarz_core::{Error, Result};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use std::path::Path;
use tracing::info;

pub use kv::KvRepository;
pub use memory::MemoryBackend;

/// Persistence contract used by every engine store
#[async_trait]
pub trait KvBackend: Send + Sync {
    /// Read the document stored under `key`
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Replace the document stored under `key`
    async fn set(&self, key: &str, value: &[u8]) -> Result<()>;
}

/// Database connection and operations
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Create a new database connection
    pub async fn new(path: &Path) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| Error::DbError(e.to_string()))?;
        }

        let url = format!("sqlite:{}?mode=rwc", path.display());
        info!("Connecting to database: {}", url);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(&url)
            .await
            .map_err(|e| Error::DbError(e.to_string()))?;

        // Owner-only access to the database file
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Err(e) = std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600)) {
                tracing::warn!("Failed to set database file permissions: {}", e);
            }
        }

        sqlx::query(schema::SCHEMA)
            .execute(&pool)
            .await
            .map_err(|e| Error::DbError(e.to_string()))?;

        info!("Database initialized");
        Ok(Self { pool })
    }

    /// Get the connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Get key/value repository
    pub fn kv(&self) -> KvRepository {
        KvRepository::new(self.pool.clone())
    }

    /// Close the database connection
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl KvBackend for Database {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.kv().get(key).await
    }

    async fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        self.kv().set(key, value).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_database_creation() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");

        let db = Database::new(&db_path).await.unwrap();
        assert!(db_path.exists());
        db.close().await;
    }

    #[tokio::test]
    async fn test_kv_round_trip() {
        let dir = tempdir().unwrap();
        let db = Database::new(&dir.path().join("kv.db")).await.unwrap();

        assert!(db.get("notifications").await.unwrap().is_none());

        db.set("notifications", b"[]").await.unwrap();
        db.set("notifications", br#"[{"id":"n1"}]"#).await.unwrap();
        assert_eq!(
            db.get("notifications").await.unwrap().unwrap(),
            br#"[{"id":"n1"}]"#.to_vec()
        );

        db.set("notification_logs", b"[]").await.unwrap();
        assert_eq!(db.kv().get("notification_logs").await.unwrap().unwrap(), b"[]".to_vec());
        db.close().await;
    }

    #[tokio::test]
    async fn test_values_survive_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("reopen.db");

        let db = Database::new(&path).await.unwrap();
        db.set("manager_notification_rules", b"[1,2,3]").await.unwrap();
        db.close().await;

        let db = Database::new(&path).await.unwrap();
        assert_eq!(
            db.get("manager_notification_rules").await.unwrap().unwrap(),
            b"[1,2,3]".to_vec()
        );
        db.close().await;
    }
}
