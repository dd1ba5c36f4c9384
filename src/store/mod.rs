//! Storage abstractions

pub mod memory;
pub mod models;
pub mod sqlite;

pub use memory::{InMemorySessionStore, InMemoryUserStore};
pub use models::*;
pub use sqlite::SqliteStore;

use std::sync::Arc;

use crate::error::AuthError;

/// Result type for store operations
pub type StoreResult<T> = Result<T, AuthError>;

/// Trait for credential storage
pub trait UserStore: Send + Sync {
    /// Create a new user. Fails with `DuplicateUsername` if the username
    /// is already taken.
    fn create_user(&self, username: &str, password_hash: &str, phone: &str) -> StoreResult<User>;

    /// Get a user by ID
    fn get_user(&self, user_id: UserId) -> StoreResult<Option<User>>;

    /// Get a user by username
    fn get_user_by_username(&self, username: &str) -> StoreResult<Option<User>>;

    /// Overwrite only the supplied fields of a user record
    fn update_user(
        &self,
        user_id: UserId,
        new_password_hash: Option<&str>,
        new_phone: Option<&str>,
    ) -> StoreResult<()>;
}

/// Trait for session storage
pub trait SessionStore: Send + Sync {
    /// Create a new anonymous session
    fn create(&self) -> StoreResult<Session>;

    /// Get a session by ID
    fn get(&self, session_id: &SessionId) -> StoreResult<Option<Session>>;

    /// Persist a session's current stage
    fn update(&self, session: &Session) -> StoreResult<()>;

    /// Delete a session
    fn delete(&self, session_id: &SessionId) -> StoreResult<()>;
}

/// Allow sharing a session store behind an `Arc`
impl<S: SessionStore> SessionStore for Arc<S> {
    fn create(&self) -> StoreResult<Session> {
        (**self).create()
    }

    fn get(&self, session_id: &SessionId) -> StoreResult<Option<Session>> {
        (**self).get(session_id)
    }

    fn update(&self, session: &Session) -> StoreResult<()> {
        (**self).update(session)
    }

    fn delete(&self, session_id: &SessionId) -> StoreResult<()> {
        (**self).delete(session_id)
    }
}
