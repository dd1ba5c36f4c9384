//! Account registration endpoints

use std::sync::Arc;

use axum::extract::State;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Form;
use serde::Deserialize;
use tower_cookies::Cookies;

use super::session::{flash_redirect, take_flash};
use crate::crypto::hash_password;
use crate::error::AuthError;
use crate::sms::SmsSender;
use crate::state::AppState;
use crate::store::{SessionStore, UserStore};
use crate::views;

/// GET /register
pub async fn show<U, S, M>(
    State(state): State<Arc<AppState<U, S, M>>>,
    cookies: Cookies,
) -> Response
where
    U: UserStore,
    S: SessionStore,
    M: SmsSender,
{
    views::register_page(take_flash(&cookies, &state.cookie_key).as_deref()).into_response()
}

#[derive(Deserialize)]
pub struct RegisterForm {
    pub username: String,
    pub password: String,
    pub phone: String,
}

/// POST /register
pub async fn submit<U, S, M>(
    State(state): State<Arc<AppState<U, S, M>>>,
    cookies: Cookies,
    Form(form): Form<RegisterForm>,
) -> Result<Redirect, AuthError>
where
    U: UserStore,
    S: SessionStore,
    M: SmsSender,
{
    let password_hash =
        hash_password(&form.password).map_err(|e| AuthError::Internal(e.to_string()))?;

    match state
        .user_store
        .create_user(&form.username, &password_hash, &form.phone)
    {
        Ok(user) => {
            tracing::info!(username = %user.username, "Registered new user");
            Ok(flash_redirect(
                &cookies,
                &state.cookie_key,
                "Registration successful! Please log in.",
                "/login",
            ))
        }
        Err(AuthError::DuplicateUsername) => Ok(flash_redirect(
            &cookies,
            &state.cookie_key,
            "Username already exists!",
            "/register",
        )),
        Err(other) => Err(other),
    }
}
