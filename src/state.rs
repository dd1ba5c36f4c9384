//! Application state shared across handlers

use tower_cookies::Key;

use crate::sms::SmsSender;
use crate::store::{SessionStore, UserStore};

/// Application state: explicitly constructed service handles, injected into
/// handlers via axum state rather than held as globals.
pub struct AppState<U, S, M> {
    pub user_store: U,
    pub session_store: S,
    pub sms_sender: M,
    /// Key for signing the session cookie
    pub cookie_key: Key,
}

impl<U: UserStore, S: SessionStore, M: SmsSender> AppState<U, S, M> {
    pub fn new(user_store: U, session_store: S, sms_sender: M, cookie_key: Key) -> Self {
        Self {
            user_store,
            session_store,
            sms_sender,
            cookie_key,
        }
    }
}
