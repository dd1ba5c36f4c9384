//! In-memory storage implementations

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::RwLock;

use chrono::Utc;
use uuid::Uuid;

use super::{Session, SessionId, SessionStore, StoreResult, User, UserId, UserStore};
use crate::error::AuthError;
use crate::flow::AuthStage;

/// In-memory credential store
pub struct InMemoryUserStore {
    users: RwLock<HashMap<UserId, User>>,
    next_user_id: AtomicI64,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            next_user_id: AtomicI64::new(1),
        }
    }
}

impl Default for InMemoryUserStore {
    fn default() -> Self {
        Self::new()
    }
}

impl UserStore for InMemoryUserStore {
    fn create_user(&self, username: &str, password_hash: &str, phone: &str) -> StoreResult<User> {
        let mut users = self.users.write().unwrap();
        if users.values().any(|u| u.username == username) {
            return Err(AuthError::DuplicateUsername);
        }

        let id = UserId(self.next_user_id.fetch_add(1, Ordering::SeqCst));
        let user = User {
            id,
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            phone: phone.to_string(),
            created_at: Utc::now(),
        };
        users.insert(id, user.clone());
        Ok(user)
    }

    fn get_user(&self, user_id: UserId) -> StoreResult<Option<User>> {
        Ok(self.users.read().unwrap().get(&user_id).cloned())
    }

    fn get_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let users = self.users.read().unwrap();
        Ok(users.values().find(|u| u.username == username).cloned())
    }

    fn update_user(
        &self,
        user_id: UserId,
        new_password_hash: Option<&str>,
        new_phone: Option<&str>,
    ) -> StoreResult<()> {
        let mut users = self.users.write().unwrap();
        let user = users
            .get_mut(&user_id)
            .ok_or_else(|| AuthError::Internal("update for unknown user".to_string()))?;
        if let Some(hash) = new_password_hash {
            user.password_hash = hash.to_string();
        }
        if let Some(phone) = new_phone {
            user.phone = phone.to_string();
        }
        Ok(())
    }
}

/// In-memory session store
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<SessionId, Session>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Shift the login time of every authenticated session into the past
    /// (for testing purposes)
    pub fn rewind_login_time(&self, by: chrono::Duration) {
        let mut sessions = self.sessions.write().unwrap();
        for session in sessions.values_mut() {
            if let AuthStage::Authenticated { login_time, .. } = &mut session.stage {
                *login_time = *login_time - by;
            }
        }
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore for InMemorySessionStore {
    fn create(&self) -> StoreResult<Session> {
        let session = Session {
            id: SessionId(Uuid::new_v4().to_string()),
            stage: AuthStage::Anonymous,
            created_at: Utc::now(),
        };
        self.sessions
            .write()
            .unwrap()
            .insert(session.id.clone(), session.clone());
        Ok(session)
    }

    fn get(&self, session_id: &SessionId) -> StoreResult<Option<Session>> {
        Ok(self.sessions.read().unwrap().get(session_id).cloned())
    }

    fn update(&self, session: &Session) -> StoreResult<()> {
        self.sessions
            .write()
            .unwrap()
            .insert(session.id.clone(), session.clone());
        Ok(())
    }

    fn delete(&self, session_id: &SessionId) -> StoreResult<()> {
        self.sessions.write().unwrap().remove(session_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_find_user() {
        let store = InMemoryUserStore::new();

        let user = store.create_user("alice", "hashed", "+15551234567").unwrap();

        let found = store.get_user_by_username("alice").unwrap();
        assert!(found.is_some());
        assert_eq!(found.unwrap().id, user.id);

        assert!(store.get_user_by_username("bob").unwrap().is_none());
    }

    #[test]
    fn test_duplicate_username_rejected() {
        let store = InMemoryUserStore::new();

        store.create_user("alice", "hash1", "+15551234567").unwrap();
        let result = store.create_user("alice", "hash2", "+15559999999");
        assert!(matches!(result, Err(AuthError::DuplicateUsername)));

        // Original record is untouched
        let user = store.get_user_by_username("alice").unwrap().unwrap();
        assert_eq!(user.password_hash, "hash1");
        assert_eq!(user.phone, "+15551234567");
    }

    #[test]
    fn test_partial_update() {
        let store = InMemoryUserStore::new();
        let user = store.create_user("alice", "hash1", "+15551234567").unwrap();

        store.update_user(user.id, None, Some("+15550000000")).unwrap();
        let updated = store.get_user(user.id).unwrap().unwrap();
        assert_eq!(updated.password_hash, "hash1");
        assert_eq!(updated.phone, "+15550000000");

        store.update_user(user.id, Some("hash2"), None).unwrap();
        let updated = store.get_user(user.id).unwrap().unwrap();
        assert_eq!(updated.password_hash, "hash2");
        assert_eq!(updated.phone, "+15550000000");
    }

    #[test]
    fn test_session_lifecycle() {
        let store = InMemorySessionStore::new();

        let mut session = store.create().unwrap();
        assert_eq!(session.stage, AuthStage::Anonymous);
        assert!(store.get(&session.id).unwrap().is_some());

        session.stage = AuthStage::Authenticated {
            user_id: UserId(1),
            login_time: Utc::now(),
        };
        store.update(&session).unwrap();
        let stored = store.get(&session.id).unwrap().unwrap();
        assert!(matches!(stored.stage, AuthStage::Authenticated { .. }));

        store.delete(&session.id).unwrap();
        assert!(store.get(&session.id).unwrap().is_none());
    }
}
