//! Tests that client-forged cookies are rejected

mod common;

use common::{authenticate, create_test_server};

/// Test: a flash cookie written by the client fails signature
/// verification and never renders
#[tokio::test]
async fn test_forged_flash_notice_not_rendered() {
    let (server, _sms_sender, _sessions) = create_test_server();

    let response = server
        .get("/login")
        .add_cookie(cookie::Cookie::new("phoneauth_flash", "Forged%20notice"))
        .await;

    assert_eq!(response.status_code(), 200);
    assert!(!response.text().contains("Forged"));
}

/// Test: an unsigned session cookie does not open anyone's session
#[tokio::test]
async fn test_forged_session_cookie_not_authenticated() {
    let (server, sms_sender, _sessions) = create_test_server();
    authenticate(&server, &sms_sender, "alice", "pw1", "+15551234567").await;

    // A second client that only learns a raw session id cannot use it
    // without the server's signature
    let (intruder, _, _) = create_test_server();
    let response = intruder
        .get("/dashboard")
        .add_cookie(cookie::Cookie::new(
            "phoneauth_session",
            "0b5c1e6e-1111-2222-3333-444455556666",
        ))
        .await;

    assert_eq!(response.status_code(), 303);
    assert_eq!(response.header("location"), "/login");
}
