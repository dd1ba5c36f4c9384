//! Session-cookie and flash-notice helpers

use axum::response::Redirect;
use percent_encoding::{percent_decode_str, utf8_percent_encode, NON_ALPHANUMERIC};
use tower_cookies::{Cookie, Cookies, Key};

use crate::error::AuthError;
use crate::store::{Session, SessionId, SessionStore};

/// Carries the session id, signed with the key derived from `SECRET_KEY`
pub const SESSION_COOKIE: &str = "phoneauth_session";

/// One-shot user-facing notice, consumed on the next page render. Signed
/// with the same key as the session cookie so clients cannot forge notices.
pub const FLASH_COOKIE: &str = "phoneauth_flash";

/// Look up the current session, if the cookie verifies and the record exists
pub fn load_session<S: SessionStore>(cookies: &Cookies, key: &Key, store: &S) -> Option<Session> {
    let cookie = cookies.signed(key).get(SESSION_COOKIE)?;
    let session_id = SessionId(cookie.value().to_string());
    store.get(&session_id).ok().flatten()
}

/// Load the current session or create a fresh anonymous one, setting the
/// cookie. A cookie pointing at a missing record (e.g. after a restart) is
/// replaced.
pub fn open_session<S: SessionStore>(
    cookies: &Cookies,
    key: &Key,
    store: &S,
) -> Result<Session, AuthError> {
    if let Some(session) = load_session(cookies, key, store) {
        return Ok(session);
    }
    let session = store.create()?;
    set_session_cookie(cookies, key, &session.id.0);
    Ok(session)
}

pub fn set_session_cookie(cookies: &Cookies, key: &Key, session_id: &str) {
    let cookie = Cookie::build((SESSION_COOKIE, session_id.to_string()))
        .path("/")
        .http_only(true)
        .build();
    cookies.signed(key).add(cookie);
}

pub fn clear_session_cookie(cookies: &Cookies) {
    let cookie = Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .http_only(true)
        .max_age(tower_cookies::cookie::time::Duration::ZERO)
        .build();
    cookies.add(cookie);
}

/// Queue a flash notice. Percent-encoded so the message survives cookie
/// value restrictions.
pub fn set_flash(cookies: &Cookies, key: &Key, message: &str) {
    let encoded = utf8_percent_encode(message, NON_ALPHANUMERIC).to_string();
    let cookie = Cookie::build((FLASH_COOKIE, encoded))
        .path("/")
        .http_only(true)
        .build();
    cookies.signed(key).add(cookie);
}

/// Read and clear the pending flash notice. A notice that fails signature
/// verification is ignored.
pub fn take_flash(cookies: &Cookies, key: &Key) -> Option<String> {
    let cookie = cookies.signed(key).get(FLASH_COOKIE)?;
    let message = percent_decode_str(cookie.value())
        .decode_utf8()
        .ok()?
        .to_string();
    cookies
        .signed(key)
        .remove(Cookie::build((FLASH_COOKIE, "")).path("/").build());
    Some(message)
}

/// Flash a notice and redirect
pub fn flash_redirect(cookies: &Cookies, key: &Key, message: &str, to: &str) -> Redirect {
    set_flash(cookies, key, message);
    Redirect::to(to)
}
