//! Data models for credential and session storage

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::flow::AuthStage;

/// Unique user identifier (SQLite rowid)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub i64);

/// Unique session identifier, carried in a signed cookie
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

/// A user account
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub password_hash: String,
    /// E.164-like phone number, stored verbatim
    pub phone: String,
    pub created_at: DateTime<Utc>,
}

/// A browser session. The cookie carries only the id; the stage lives
/// server-side.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: SessionId,
    pub stage: AuthStage,
    pub created_at: DateTime<Utc>,
}
