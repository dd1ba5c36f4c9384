//! Authenticated dashboard: profile view and update

use std::sync::Arc;

use axum::extract::State;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Form;
use chrono::Utc;
use serde::Deserialize;
use tower_cookies::{Cookies, Key};

use super::session::{flash_redirect, open_session, take_flash};
use crate::crypto::hash_password;
use crate::error::AuthError;
use crate::flow::AuthStage;
use crate::sms::SmsSender;
use crate::state::AppState;
use crate::store::{Session, SessionStore, UserId, UserStore};
use crate::views;

/// Run the session check that guards the authenticated area. Returns the
/// user id, or the redirect the caller should respond with.
fn guard<S: SessionStore>(
    cookies: &Cookies,
    key: &Key,
    session: &mut Session,
    sessions: &S,
) -> Result<Result<UserId, Redirect>, AuthError> {
    match session.stage.check_session(Utc::now()) {
        Ok(user_id) => Ok(Ok(user_id)),
        Err(AuthError::SessionExpired) => {
            session.stage = AuthStage::Anonymous;
            sessions.update(session)?;
            Ok(Err(flash_redirect(
                cookies,
                key,
                "Session expired. Please log in again.",
                "/login",
            )))
        }
        Err(AuthError::NotAuthenticated) => Ok(Err(Redirect::to("/login"))),
        Err(other) => Err(other),
    }
}

/// GET /dashboard
pub async fn show<U, S, M>(
    State(state): State<Arc<AppState<U, S, M>>>,
    cookies: Cookies,
) -> Result<Response, AuthError>
where
    U: UserStore,
    S: SessionStore,
    M: SmsSender,
{
    let mut session = open_session(&cookies, &state.cookie_key, &state.session_store)?;
    let user_id = match guard(&cookies, &state.cookie_key, &mut session, &state.session_store)? {
        Ok(user_id) => user_id,
        Err(redirect) => return Ok(redirect.into_response()),
    };

    let user = state
        .user_store
        .get_user(user_id)?
        .ok_or_else(|| AuthError::Internal("authenticated user no longer exists".to_string()))?;

    Ok(
        views::dashboard_page(take_flash(&cookies, &state.cookie_key).as_deref(), &user)
            .into_response(),
    )
}

#[derive(Deserialize)]
pub struct ProfileForm {
    pub password: Option<String>,
    pub phone: Option<String>,
}

/// POST /dashboard
///
/// Overwrites only the supplied fields; empty inputs leave the record
/// unchanged, as browsers post empty strings for untouched fields.
pub async fn update<U, S, M>(
    State(state): State<Arc<AppState<U, S, M>>>,
    cookies: Cookies,
    Form(form): Form<ProfileForm>,
) -> Result<Response, AuthError>
where
    U: UserStore,
    S: SessionStore,
    M: SmsSender,
{
    let mut session = open_session(&cookies, &state.cookie_key, &state.session_store)?;
    let user_id = match guard(&cookies, &state.cookie_key, &mut session, &state.session_store)? {
        Ok(user_id) => user_id,
        Err(redirect) => return Ok(redirect.into_response()),
    };

    let new_password = form.password.filter(|p| !p.is_empty());
    let new_phone = form.phone.filter(|p| !p.is_empty());

    let new_password_hash = match new_password {
        Some(password) => {
            Some(hash_password(&password).map_err(|e| AuthError::Internal(e.to_string()))?)
        }
        None => None,
    };

    state.user_store.update_user(
        user_id,
        new_password_hash.as_deref(),
        new_phone.as_deref(),
    )?;

    Ok(flash_redirect(
        &cookies,
        &state.cookie_key,
        "Profile updated successfully!",
        "/dashboard",
    )
    .into_response())
}
