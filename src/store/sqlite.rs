//! SQLite-based credential storage

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use super::{StoreResult, User, UserId, UserStore};
use crate::error::AuthError;

/// Current schema version
const SCHEMA_VERSION: i32 = 1;

/// SQLite-backed credential store. Sessions stay in memory; only user
/// records persist across restarts.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open or create a SQLite database at the given path
    pub fn open(path: &str) -> Result<Self, AuthError> {
        let conn = Connection::open(path).map_err(|e| AuthError::Internal(e.to_string()))?;

        Self::migrate(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Run database migrations
    fn migrate(conn: &Connection) -> Result<(), AuthError> {
        let current_version = Self::get_schema_version(conn)?;

        if current_version < SCHEMA_VERSION {
            tracing::info!(
                current = current_version,
                target = SCHEMA_VERSION,
                "Running database migrations"
            );

            if current_version < 1 {
                Self::migrate_v1(conn)?;
            }

            conn.execute(
                "INSERT OR REPLACE INTO schema_version (version) VALUES (?1)",
                params![SCHEMA_VERSION],
            )
            .map_err(|e| AuthError::Internal(e.to_string()))?;

            tracing::info!("Database migrations complete");
        }

        Ok(())
    }

    /// Get current schema version (0 if no schema exists)
    fn get_schema_version(conn: &Connection) -> Result<i32, AuthError> {
        let table_exists: bool = conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
                [],
                |row| row.get(0),
            )
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        if !table_exists {
            return Ok(0);
        }

        conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| {
            row.get::<_, Option<i32>>(0).map(|v| v.unwrap_or(0))
        })
        .map_err(|e| AuthError::Internal(e.to_string()))
    }

    /// Migration to version 1: initial schema
    fn migrate_v1(conn: &Connection) -> Result<(), AuthError> {
        conn.execute_batch(
            r#"
            -- Schema version tracking
            CREATE TABLE IF NOT EXISTS schema_version (
                version INTEGER PRIMARY KEY
            );

            -- Users table
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                phone TEXT NOT NULL,
                created_at TEXT NOT NULL
            );
            "#,
        )
        .map_err(|e| AuthError::Internal(e.to_string()))?;

        Ok(())
    }
}

fn row_to_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    let id: i64 = row.get(0)?;
    let username: String = row.get(1)?;
    let password_hash: String = row.get(2)?;
    let phone: String = row.get(3)?;
    let created_at: String = row.get(4)?;
    let created_at = DateTime::parse_from_rfc3339(&created_at)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(e))
        })?;
    Ok(User {
        id: UserId(id),
        username,
        password_hash,
        phone,
        created_at,
    })
}

impl UserStore for SqliteStore {
    fn create_user(&self, username: &str, password_hash: &str, phone: &str) -> StoreResult<User> {
        let conn = self.conn.lock().unwrap();
        let now = Utc::now();

        conn.execute(
            "INSERT INTO users (username, password_hash, phone, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![username, password_hash, phone, now.to_rfc3339()],
        )
        .map_err(|e| {
            if let rusqlite::Error::SqliteFailure(ref err, _) = e {
                if err.code == rusqlite::ErrorCode::ConstraintViolation {
                    return AuthError::DuplicateUsername;
                }
            }
            AuthError::Internal(e.to_string())
        })?;

        Ok(User {
            id: UserId(conn.last_insert_rowid()),
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            phone: phone.to_string(),
            created_at: now,
        })
    }

    fn get_user(&self, user_id: UserId) -> StoreResult<Option<User>> {
        let conn = self.conn.lock().unwrap();

        conn.query_row(
            "SELECT id, username, password_hash, phone, created_at FROM users WHERE id = ?1",
            params![user_id.0],
            row_to_user,
        )
        .optional()
        .map_err(|e| AuthError::Internal(e.to_string()))
    }

    fn get_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let conn = self.conn.lock().unwrap();

        conn.query_row(
            "SELECT id, username, password_hash, phone, created_at FROM users WHERE username = ?1",
            params![username],
            row_to_user,
        )
        .optional()
        .map_err(|e| AuthError::Internal(e.to_string()))
    }

    fn update_user(
        &self,
        user_id: UserId,
        new_password_hash: Option<&str>,
        new_phone: Option<&str>,
    ) -> StoreResult<()> {
        let conn = self.conn.lock().unwrap();

        let changed = conn
            .execute(
                "UPDATE users SET
                     password_hash = COALESCE(?1, password_hash),
                     phone = COALESCE(?2, phone)
                 WHERE id = ?3",
                params![new_password_hash, new_phone, user_id.0],
            )
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        if changed == 0 {
            return Err(AuthError::Internal("update for unknown user".to_string()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_store() -> (SqliteStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("test.db");
        let store = SqliteStore::open(path.to_str().unwrap()).unwrap();
        (store, dir)
    }

    #[test]
    fn test_create_and_find_user() {
        let (store, _dir) = create_test_store();

        let user = store.create_user("alice", "hashed", "+15551234567").unwrap();

        let by_name = store.get_user_by_username("alice").unwrap().unwrap();
        assert_eq!(by_name.id, user.id);
        assert_eq!(by_name.phone, "+15551234567");

        let by_id = store.get_user(user.id).unwrap().unwrap();
        assert_eq!(by_id.username, "alice");

        assert!(store.get_user_by_username("bob").unwrap().is_none());
    }

    #[test]
    fn test_duplicate_username_rejected() {
        let (store, _dir) = create_test_store();

        store.create_user("alice", "hash1", "+15551234567").unwrap();
        let result = store.create_user("alice", "hash2", "+15559999999");
        assert!(matches!(result, Err(AuthError::DuplicateUsername)));

        let user = store.get_user_by_username("alice").unwrap().unwrap();
        assert_eq!(user.password_hash, "hash1");
    }

    #[test]
    fn test_partial_update() {
        let (store, _dir) = create_test_store();
        let user = store.create_user("alice", "hash1", "+15551234567").unwrap();

        store.update_user(user.id, None, Some("+15550000000")).unwrap();
        let updated = store.get_user(user.id).unwrap().unwrap();
        assert_eq!(updated.password_hash, "hash1");
        assert_eq!(updated.phone, "+15550000000");

        store.update_user(user.id, Some("hash2"), None).unwrap();
        let updated = store.get_user(user.id).unwrap().unwrap();
        assert_eq!(updated.password_hash, "hash2");
    }

    #[test]
    fn test_corrupt_created_at_surfaces_as_error() {
        let (store, _dir) = create_test_store();

        store
            .conn
            .lock()
            .unwrap()
            .execute(
                "INSERT INTO users (username, password_hash, phone, created_at)
                 VALUES ('alice', 'hashed', '+15551234567', 'not-a-timestamp')",
                [],
            )
            .unwrap();

        let result = store.get_user_by_username("alice");
        assert!(matches!(result, Err(AuthError::Internal(_))));
    }

    #[test]
    fn test_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("test.db");
        let path = path.to_str().unwrap();

        {
            let store = SqliteStore::open(path).unwrap();
            store.create_user("alice", "hashed", "+15551234567").unwrap();
        }

        let store = SqliteStore::open(path).unwrap();
        assert!(store.get_user_by_username("alice").unwrap().is_some());
    }
}
