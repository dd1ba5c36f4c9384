//! HTTP routes

mod auth;
mod dashboard;
mod register;
pub mod session;
mod verify;

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tower_cookies::CookieManagerLayer;
use tower_http::trace::TraceLayer;

use crate::sms::SmsSender;
use crate::state::AppState;
use crate::store::{SessionStore, UserStore};

/// Create the router with all routes
pub fn create_router<U, S, M>(state: Arc<AppState<U, S, M>>) -> Router
where
    U: UserStore + 'static,
    S: SessionStore + 'static,
    M: SmsSender + 'static,
{
    Router::new()
        .route("/", get(auth::home))
        .route("/register", get(register::show).post(register::submit))
        .route("/login", get(auth::show_login).post(auth::submit_login))
        .route("/verify", get(verify::show).post(verify::submit))
        .route("/dashboard", get(dashboard::show).post(dashboard::update))
        .route("/logout", get(auth::logout))
        .layer(CookieManagerLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
