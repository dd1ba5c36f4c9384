//! OTP verification endpoints

use std::sync::Arc;

use axum::extract::State;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Form;
use chrono::Utc;
use serde::Deserialize;
use tower_cookies::Cookies;

use super::session::{flash_redirect, open_session, take_flash};
use crate::error::AuthError;
use crate::flow::{AuthFlow, AuthStage};
use crate::sms::SmsSender;
use crate::state::AppState;
use crate::store::{SessionStore, UserStore};
use crate::views;

/// GET /verify
pub async fn show<U, S, M>(
    State(state): State<Arc<AppState<U, S, M>>>,
    cookies: Cookies,
) -> Result<Response, AuthError>
where
    U: UserStore,
    S: SessionStore,
    M: SmsSender,
{
    let session = open_session(&cookies, &state.cookie_key, &state.session_store)?;
    if !session.stage.is_pending() {
        return Ok(
            flash_redirect(&cookies, &state.cookie_key, "Please log in first!", "/login")
                .into_response(),
        );
    }

    Ok(views::verify_page(take_flash(&cookies, &state.cookie_key).as_deref()).into_response())
}

#[derive(Deserialize)]
pub struct VerifyForm {
    pub code: Option<String>,
    pub action: Option<String>,
}

/// POST /verify
///
/// Submits a code, or requests a new one with `action=resend`.
pub async fn submit<U, S, M>(
    State(state): State<Arc<AppState<U, S, M>>>,
    cookies: Cookies,
    Form(form): Form<VerifyForm>,
) -> Result<Redirect, AuthError>
where
    U: UserStore,
    S: SessionStore,
    M: SmsSender,
{
    let mut session = open_session(&cookies, &state.cookie_key, &state.session_store)?;
    if !session.stage.is_pending() {
        return Ok(flash_redirect(
            &cookies,
            &state.cookie_key,
            "Please log in first!",
            "/login",
        ));
    }

    if form.action.as_deref() == Some("resend") {
        let flow = AuthFlow::new(&state.user_store, &state.sms_sender);
        return match flow.resend_otp(&session.stage).await {
            Ok(stage) => {
                session.stage = stage;
                state.session_store.update(&session)?;
                Ok(flash_redirect(
                    &cookies,
                    &state.cookie_key,
                    "New OTP sent! Check your phone.",
                    "/verify",
                ))
            }
            // A failed resend commits nothing; the previous code stays valid
            Err(AuthError::DeliveryUnverifiedRecipient) => Ok(flash_redirect(
                &cookies,
                &state.cookie_key,
                "Your phone number is unverified. Please contact the admin to verify it.",
                "/verify",
            )),
            Err(AuthError::DeliveryFailed(reason)) => Ok(flash_redirect(
                &cookies,
                &state.cookie_key,
                &format!("Failed to send OTP: {reason}"),
                "/verify",
            )),
            Err(other) => Err(other),
        };
    }

    let code = form.code.unwrap_or_default();
    match session.stage.submit_otp(&code, Utc::now()) {
        Ok(stage) => {
            session.stage = stage;
            state.session_store.update(&session)?;
            Ok(Redirect::to("/dashboard"))
        }
        Err(AuthError::InvalidOtp) => Ok(flash_redirect(
            &cookies,
            &state.cookie_key,
            "Invalid code!",
            "/verify",
        )),
        Err(AuthError::OtpExpired) => {
            session.stage = AuthStage::Anonymous;
            state.session_store.update(&session)?;
            Ok(flash_redirect(
                &cookies,
                &state.cookie_key,
                "Verification code expired. Please log in again.",
                "/login",
            ))
        }
        Err(other) => Err(other),
    }
}
