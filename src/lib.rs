//! phoneauth
//!
//! A small web application implementing username/password login with an
//! SMS-delivered one-time-passcode second factor.

pub mod config;
pub mod crypto;
pub mod error;
pub mod flow;
pub mod routes;
pub mod sms;
pub mod state;
pub mod store;
pub mod views;

pub use config::{Config, TwilioConfig};
pub use error::AuthError;
pub use flow::{AuthFlow, AuthStage};
pub use sms::{SmsError, SmsSender, TwilioSmsSender};
pub use state::AppState;
pub use store::{InMemorySessionStore, InMemoryUserStore, SessionStore, SqliteStore, UserStore};
