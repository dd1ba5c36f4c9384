//! Login and logout endpoints

use std::sync::Arc;

use axum::extract::State;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Form;
use chrono::Utc;
use serde::Deserialize;
use tower_cookies::Cookies;

use super::session::{
    clear_session_cookie, flash_redirect, load_session, open_session, set_flash, take_flash,
};
use crate::error::AuthError;
use crate::flow::AuthFlow;
use crate::sms::SmsSender;
use crate::state::AppState;
use crate::store::{SessionStore, UserStore};
use crate::views;

/// GET /
///
/// Redirects by stage presence only; the dashboard enforces expiry.
pub async fn home<U, S, M>(
    State(state): State<Arc<AppState<U, S, M>>>,
    cookies: Cookies,
) -> Redirect
where
    U: UserStore,
    S: SessionStore,
    M: SmsSender,
{
    let authenticated = load_session(&cookies, &state.cookie_key, &state.session_store)
        .map(|session| session.stage.is_authenticated())
        .unwrap_or(false);

    if authenticated {
        Redirect::to("/dashboard")
    } else {
        Redirect::to("/login")
    }
}

/// GET /login
pub async fn show_login<U, S, M>(
    State(state): State<Arc<AppState<U, S, M>>>,
    cookies: Cookies,
) -> Response
where
    U: UserStore,
    S: SessionStore,
    M: SmsSender,
{
    views::login_page(take_flash(&cookies, &state.cookie_key).as_deref()).into_response()
}

#[derive(Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// POST /login
pub async fn submit_login<U, S, M>(
    State(state): State<Arc<AppState<U, S, M>>>,
    cookies: Cookies,
    Form(form): Form<LoginForm>,
) -> Result<Redirect, AuthError>
where
    U: UserStore,
    S: SessionStore,
    M: SmsSender,
{
    let mut session = open_session(&cookies, &state.cookie_key, &state.session_store)?;
    let flow = AuthFlow::new(&state.user_store, &state.sms_sender);

    match flow
        .submit_login(&session.stage, &form.username, &form.password, Utc::now())
        .await
    {
        Ok(stage) => {
            session.stage = stage;
            state.session_store.update(&session)?;
            set_flash(
                &cookies,
                &state.cookie_key,
                "Sending OTP... Please check your phone.",
            );
            Ok(Redirect::to("/verify"))
        }
        Err(AuthError::VerificationInProgress) => Ok(flash_redirect(
            &cookies,
            &state.cookie_key,
            "Verification already in progress. Check your phone!",
            "/verify",
        )),
        Err(AuthError::InvalidCredentials) => Ok(flash_redirect(
            &cookies,
            &state.cookie_key,
            "Invalid credentials!",
            "/login",
        )),
        Err(AuthError::DeliveryUnverifiedRecipient) => Ok(flash_redirect(
            &cookies,
            &state.cookie_key,
            "Your phone number is unverified. Please contact the admin to verify it.",
            "/login",
        )),
        Err(AuthError::DeliveryFailed(reason)) => Ok(flash_redirect(
            &cookies,
            &state.cookie_key,
            &format!("Failed to send OTP: {reason}"),
            "/login",
        )),
        Err(other) => Err(other),
    }
}

/// GET /logout
///
/// Valid from any state; clears the session record and cookie.
pub async fn logout<U, S, M>(
    State(state): State<Arc<AppState<U, S, M>>>,
    cookies: Cookies,
) -> Result<Redirect, AuthError>
where
    U: UserStore,
    S: SessionStore,
    M: SmsSender,
{
    if let Some(session) = load_session(&cookies, &state.cookie_key, &state.session_store) {
        state.session_store.delete(&session.id)?;
    }
    clear_session_cookie(&cookies);

    Ok(flash_redirect(
        &cookies,
        &state.cookie_key,
        "Logged out successfully!",
        "/login",
    ))
}
