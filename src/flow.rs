//! The authentication state machine
//!
//! A session moves anonymous → pending-OTP → authenticated → back to
//! anonymous on logout or expiry. `AuthStage` holds the per-session state;
//! `AuthFlow` drives the transitions that need the credential store and the
//! SMS gateway. Transitions return the NEW stage; on error the caller keeps
//! its current stage, so a failed delivery never leaves a stale pending code.

use chrono::{DateTime, Duration, Utc};

use crate::crypto::{generate_otp_code, verify_password};
use crate::error::AuthError;
use crate::sms::{SmsError, SmsSender};
use crate::store::{User, UserId, UserStore};

/// Authenticated sessions expire after this many seconds. Exactly 600 is
/// still valid; expiry needs strictly more.
pub const SESSION_TTL_SECONDS: i64 = 600;

/// A pending code is rejected once it is older than this
pub const OTP_TTL_MINUTES: i64 = 15;

/// Where a browser session stands in the login sequence. At most one of the
/// pending and authenticated user ids can exist at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthStage {
    Anonymous,
    PendingOtp {
        user_id: UserId,
        code: String,
        sent_at: DateTime<Utc>,
    },
    Authenticated {
        user_id: UserId,
        login_time: DateTime<Utc>,
    },
}

impl AuthStage {
    pub fn is_pending(&self) -> bool {
        matches!(self, AuthStage::PendingOtp { .. })
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthStage::Authenticated { .. })
    }

    /// Submit an OTP code. Valid only from `PendingOtp`; exact string
    /// equality with the most recently issued code authenticates. There is
    /// no attempt limit.
    pub fn submit_otp(&self, code: &str, now: DateTime<Utc>) -> Result<AuthStage, AuthError> {
        match self {
            AuthStage::PendingOtp {
                user_id,
                code: expected,
                sent_at,
            } => {
                if now - *sent_at > Duration::minutes(OTP_TTL_MINUTES) {
                    return Err(AuthError::OtpExpired);
                }
                if code == expected {
                    Ok(AuthStage::Authenticated {
                        user_id: *user_id,
                        login_time: now,
                    })
                } else {
                    Err(AuthError::InvalidOtp)
                }
            }
            _ => Err(AuthError::NotAuthenticated),
        }
    }

    /// Evaluate the session on access to the authenticated area. Returns the
    /// user id while the session is live, `SessionExpired` once more than
    /// `SESSION_TTL_SECONDS` have passed since login.
    pub fn check_session(&self, now: DateTime<Utc>) -> Result<UserId, AuthError> {
        match self {
            AuthStage::Authenticated {
                user_id,
                login_time,
            } => {
                if now - *login_time > Duration::seconds(SESSION_TTL_SECONDS) {
                    Err(AuthError::SessionExpired)
                } else {
                    Ok(*user_id)
                }
            }
            _ => Err(AuthError::NotAuthenticated),
        }
    }

    /// Logout is valid from any stage
    pub fn logged_out(&self) -> AuthStage {
        AuthStage::Anonymous
    }
}

/// Drives the transitions that consult the credential store and the SMS
/// gateway.
pub struct AuthFlow<'a, U, M> {
    users: &'a U,
    sms: &'a M,
}

impl<'a, U: UserStore, M: SmsSender> AuthFlow<'a, U, M> {
    pub fn new(users: &'a U, sms: &'a M) -> Self {
        Self { users, sms }
    }

    /// Submit username/password. On a credential match a code is generated
    /// and delivered; the pending stage is returned only if delivery
    /// succeeded. While a verification is already pending this re-prompts
    /// instead of starting over. A still-authenticated session is replaced
    /// by the fresh login.
    pub async fn submit_login(
        &self,
        stage: &AuthStage,
        username: &str,
        password: &str,
        now: DateTime<Utc>,
    ) -> Result<AuthStage, AuthError> {
        if stage.is_pending() {
            return Err(AuthError::VerificationInProgress);
        }

        let user = self
            .users
            .get_user_by_username(username)?
            .ok_or(AuthError::InvalidCredentials)?;

        let valid = verify_password(password, &user.password_hash)
            .map_err(|e| AuthError::Internal(e.to_string()))?;
        if !valid {
            return Err(AuthError::InvalidCredentials);
        }

        let code = generate_otp_code();
        tracing::debug!(username = %user.username, code = %code, "Generated OTP");
        self.deliver(&user, &code).await?;

        Ok(AuthStage::PendingOtp {
            user_id: user.id,
            code,
            sent_at: now,
        })
    }

    /// Issue a fresh code for a pending verification, invalidating the
    /// previous one. The issuance clock is NOT reset: the new code lives
    /// only until the original deadline. If delivery fails nothing is
    /// committed and the previous code stays valid.
    pub async fn resend_otp(&self, stage: &AuthStage) -> Result<AuthStage, AuthError> {
        let (user_id, sent_at) = match stage {
            AuthStage::PendingOtp {
                user_id, sent_at, ..
            } => (*user_id, *sent_at),
            _ => return Err(AuthError::NotAuthenticated),
        };

        let user = self
            .users
            .get_user(user_id)?
            .ok_or_else(|| AuthError::Internal("pending user no longer exists".to_string()))?;

        let code = generate_otp_code();
        tracing::debug!(username = %user.username, code = %code, "Resent OTP");
        self.deliver(&user, &code).await?;

        Ok(AuthStage::PendingOtp {
            user_id,
            code,
            sent_at,
        })
    }

    async fn deliver(&self, user: &User, code: &str) -> Result<(), AuthError> {
        let body = format!("Your 2FA code is: {code}");
        self.sms.send(&user.phone, &body).await.map_err(|e| match e {
            SmsError::UnverifiedRecipient => AuthError::DeliveryUnverifiedRecipient,
            SmsError::Provider(reason) => AuthError::DeliveryFailed(reason),
        })
    }
}
