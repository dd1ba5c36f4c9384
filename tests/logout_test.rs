//! Tests for logout

mod common;

use common::{authenticate, create_test_server, page_text, submit_login};

/// Test: logout clears an authenticated session
#[tokio::test]
async fn test_logout_when_authenticated() {
    let (server, sms_sender, _) = create_test_server();
    authenticate(&server, &sms_sender, "alice", "pw1", "+15551234567").await;

    let response = server.get("/logout").await;
    assert_eq!(response.status_code(), 303);
    assert_eq!(response.header("location"), "/login");

    let body = page_text(&server, "/login").await;
    assert!(body.contains("Logged out successfully!"));

    let response = server.get("/dashboard").await;
    assert_eq!(response.status_code(), 303);
    assert_eq!(response.header("location"), "/login");
}

/// Test: logout also cancels a pending verification
#[tokio::test]
async fn test_logout_while_pending() {
    let (server, _, _) = create_test_server();
    common::register_user(&server, "alice", "pw1", "+15551234567").await;
    submit_login(&server, "alice", "pw1").await;

    server.get("/logout").await;

    let response = server.get("/verify").await;
    assert_eq!(response.status_code(), 303);
    assert_eq!(response.header("location"), "/login");
}

/// Test: logout from an anonymous session is harmless
#[tokio::test]
async fn test_logout_when_anonymous() {
    let (server, _, _) = create_test_server();

    let response = server.get("/logout").await;
    assert_eq!(response.status_code(), 303);
    assert_eq!(response.header("location"), "/login");
}

/// Test: a user can log in again after logging out
#[tokio::test]
async fn test_relogin_after_logout() {
    let (server, sms_sender, _) = create_test_server();
    authenticate(&server, &sms_sender, "alice", "pw1", "+15551234567").await;

    server.get("/logout").await;

    let target = submit_login(&server, "alice", "pw1").await;
    assert_eq!(target, "/verify");

    let code = sms_sender.get_code("+15551234567").unwrap();
    let response = server.post("/verify").form(&[("code", code.as_str())]).await;
    assert_eq!(response.header("location"), "/dashboard");
}
